//! The token ledger: owns every token and the id counter.

use crate::core::{
    AccessContext, AccessPolicy, Attributes, BattleOutcome, EventHistory, EventRecord, Identity,
    LedgerEvent, Operation, Token, TokenId,
};
use crate::ledger::error::LedgerError;
use crate::validation::{self, InputViolation, UpgradePlan};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// In-memory ledger of character tokens.
///
/// Every mutating operation validates its caller and arguments completely
/// before writing anything, so a failed call never leaves a partial change
/// behind. Operations take `&mut self`; wrap the ledger in a
/// [`SharedLedger`](crate::ledger::SharedLedger) to share it across threads.
///
/// # Example
///
/// ```rust
/// use arena_ledger::core::{Attributes, BattleOutcome, Identity};
/// use arena_ledger::ledger::TokenLedger;
///
/// let admin = Identity::new("admin");
/// let alice = Identity::new("alice");
/// let mut ledger = TokenLedger::new(admin.clone());
///
/// let hero = ledger
///     .mint(&admin, alice.clone(), "ipfs://hero", Attributes::new(10, 15, 20))
///     .unwrap();
/// let rival = ledger
///     .mint(&admin, alice.clone(), "ipfs://rival", Attributes::new(5, 10, 15))
///     .unwrap();
///
/// ledger.upgrade(&alice, hero, Attributes::new(5, 3, 2)).unwrap();
/// assert_eq!(ledger.attributes(hero).unwrap(), Attributes::new(15, 18, 22));
/// assert_eq!(ledger.experience(hero).unwrap(), 10);
///
/// let outcome = ledger.battle(&alice, hero, rival).unwrap();
/// assert_eq!(outcome, BattleOutcome::Winner(hero));
/// assert_eq!(ledger.experience(hero).unwrap(), 11);
/// ```
#[derive(Debug)]
pub struct TokenLedger {
    controller: Identity,
    policy: AccessPolicy,
    tokens: BTreeMap<TokenId, Token>,
    last_issued: u64,
    history: EventHistory,
    /// Sequence number of the first record not yet handed to observers.
    delivered: u64,
}

impl TokenLedger {
    /// Create an empty ledger whose tokens can only be minted by `controller`.
    ///
    /// Prefer [`LedgerBuilder`](crate::builder::LedgerBuilder), which also
    /// rejects an empty controller identity.
    pub fn new(controller: Identity) -> Self {
        Self {
            controller,
            policy: AccessPolicy::default(),
            tokens: BTreeMap::new(),
            last_issued: 0,
            history: EventHistory::new(),
            delivered: 0,
        }
    }

    /// Rebuild a ledger from restored parts. Callers validate consistency.
    pub(crate) fn from_parts(
        controller: Identity,
        tokens: impl IntoIterator<Item = Token>,
        last_issued: u64,
        history: EventHistory,
    ) -> Self {
        let delivered = history.next_sequence();
        Self {
            controller,
            policy: AccessPolicy::default(),
            tokens: tokens.into_iter().map(|token| (token.id, token)).collect(),
            last_issued,
            history,
            delivered,
        }
    }

    /// Create a token owned by `to`. Only the controller may mint.
    ///
    /// Returns the new token's id. Ids start at 1 and increase by one per
    /// mint.
    pub fn mint(
        &mut self,
        caller: &Identity,
        to: Identity,
        metadata_ref: impl Into<String>,
        attributes: Attributes,
    ) -> Result<TokenId, LedgerError> {
        self.authorize(Operation::Mint, caller, None)?;
        validation::into_result(validation::check_mint(&to)).map_err(|violations| {
            warn!(%caller, ?violations, "mint rejected");
            LedgerError::from(violations)
        })?;

        let next = self
            .last_issued
            .checked_add(1)
            .ok_or_else(|| LedgerError::from(vec![InputViolation::IdSpaceExhausted]))?;
        let id = TokenId(next);
        let token = Token::minted(id, to, metadata_ref, attributes);

        self.last_issued = next;
        info!(token = %id, owner = %token.owner, %attributes, "minted token");
        self.record(LedgerEvent::Minted {
            token: id,
            owner: token.owner.clone(),
            attributes,
            metadata_ref: token.metadata_ref.clone(),
        });
        self.tokens.insert(id, token);

        Ok(id)
    }

    /// Permanently raise a token's attributes. Only the owner may upgrade.
    ///
    /// Each field of `delta` is added to the matching attribute and the sum
    /// of all three is added to experience, as one transition.
    pub fn upgrade(
        &mut self,
        caller: &Identity,
        id: TokenId,
        delta: Attributes,
    ) -> Result<(), LedgerError> {
        let token = self.tokens.get(&id).ok_or(LedgerError::NotFound(id))?;
        self.authorize(Operation::Upgrade, caller, Some(&token.owner))?;
        let UpgradePlan { after, experience } =
            validation::into_result(validation::check_upgrade(token, &delta)).map_err(
                |violations| {
                    warn!(token = %id, ?violations, "upgrade rejected");
                    LedgerError::from(violations)
                },
            )?;
        let before = token.attributes;

        let token = self.tokens.get_mut(&id).ok_or(LedgerError::NotFound(id))?;
        token.attributes = after;
        token.experience = experience;
        let owner = token.owner.clone();

        info!(token = %id, %before, %after, experience, "upgraded token");
        self.record(LedgerEvent::Upgraded {
            token: id,
            owner,
            before,
            after,
            experience,
        });

        Ok(())
    }

    /// Pit two tokens against each other. Any caller may start a battle.
    ///
    /// The token with strictly greater power gains one point of experience.
    /// On equal power neither token changes and [`BattleOutcome::Tie`] is
    /// returned.
    pub fn battle(
        &mut self,
        caller: &Identity,
        challenger: TokenId,
        defender: TokenId,
    ) -> Result<BattleOutcome, LedgerError> {
        validation::into_result(validation::check_battle(challenger, defender))
            .map_err(LedgerError::from)?;
        let a = self
            .tokens
            .get(&challenger)
            .ok_or(LedgerError::NotFound(challenger))?;
        let b = self
            .tokens
            .get(&defender)
            .ok_or(LedgerError::NotFound(defender))?;
        self.authorize(Operation::Battle, caller, None)?;

        let challenger_power = a.power();
        let defender_power = b.power();
        let outcome = BattleOutcome::resolve((a.id, a.attributes), (b.id, b.attributes));

        if let BattleOutcome::Winner(winner) = outcome {
            let token = self
                .tokens
                .get_mut(&winner)
                .ok_or(LedgerError::NotFound(winner))?;
            validation::into_result(validation::check_battle_award(token))
                .map_err(LedgerError::from)?;
            token.experience += 1;
        }

        info!(
            %caller,
            %challenger,
            %defender,
            %challenger_power,
            %defender_power,
            %outcome,
            "battle resolved"
        );
        self.record(LedgerEvent::BattleResolved {
            caller: caller.clone(),
            challenger,
            defender,
            challenger_power,
            defender_power,
            outcome,
        });

        Ok(outcome)
    }

    // === Accessors ===

    /// Current attributes of `id`.
    pub fn attributes(&self, id: TokenId) -> Result<Attributes, LedgerError> {
        self.token(id).map(|token| token.attributes)
    }

    /// Experience gained through upgrades and battle wins.
    pub fn experience(&self, id: TokenId) -> Result<u64, LedgerError> {
        self.token(id).map(|token| token.experience)
    }

    /// Identity that holds `id` and may upgrade it.
    pub fn owner(&self, id: TokenId) -> Result<&Identity, LedgerError> {
        self.token(id).map(|token| &token.owner)
    }

    /// Opaque metadata reference given at mint time.
    pub fn metadata_ref(&self, id: TokenId) -> Result<&str, LedgerError> {
        self.token(id).map(|token| token.metadata_ref.as_str())
    }

    /// Sum of the three attributes, as compared in battle.
    pub fn power(&self, id: TokenId) -> Result<u128, LedgerError> {
        self.token(id).map(Token::power)
    }

    /// The full record for `id`.
    pub fn token(&self, id: TokenId) -> Result<&Token, LedgerError> {
        self.tokens.get(&id).ok_or(LedgerError::NotFound(id))
    }

    /// Id of the most recently minted token, or 0 before the first mint.
    pub fn last_issued_id(&self) -> u64 {
        self.last_issued
    }

    /// The identity allowed to mint.
    pub fn controller(&self) -> &Identity {
        &self.controller
    }

    /// Number of tokens minted so far. Tokens are never burned.
    pub fn total_supply(&self) -> usize {
        self.tokens.len()
    }

    /// All tokens in ascending id order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.values()
    }

    /// Ids of every token `owner` holds, ascending.
    pub fn tokens_owned_by(&self, owner: &Identity) -> Vec<TokenId> {
        self.tokens
            .values()
            .filter(|token| token.is_owned_by(owner))
            .map(|token| token.id)
            .collect()
    }

    // === Notifications ===

    /// Notifications still held by the ledger.
    ///
    /// Delivered records are kept until [`compact_history`](Self::compact_history)
    /// discards them.
    pub fn history(&self) -> &EventHistory {
        &self.history
    }

    /// Notifications not yet handed out by [`drain_notifications`](Self::drain_notifications).
    pub fn pending_notifications(&self) -> &[EventRecord] {
        self.history.since(self.delivered)
    }

    /// Take the notifications emitted since the previous drain.
    ///
    /// They stay in [`history`](Self::history); only the delivery cursor moves.
    /// Use [`acknowledge`](Self::acknowledge) instead when delivery can fail.
    pub fn drain_notifications(&mut self) -> Vec<EventRecord> {
        let pending = self.pending_notifications().to_vec();
        self.delivered = self.history.next_sequence();
        pending
    }

    /// Mark pending notifications as delivered, given the sequence numbers an
    /// observer accepted.
    ///
    /// The cursor only moves across an unbroken run of accepted records from
    /// the front of the pending list, so a record that was not accepted stays
    /// pending along with everything after it. Returns how far the cursor
    /// moved.
    pub fn acknowledge(&mut self, accepted: &[u64]) -> usize {
        let advanced = self
            .pending_notifications()
            .iter()
            .take_while(|record| accepted.contains(&record.sequence))
            .count();
        self.delivered += advanced as u64;
        advanced
    }

    /// Discard notifications that were already delivered.
    ///
    /// Sequence numbers of the remaining records are unchanged. Returns the
    /// number of records dropped.
    pub fn compact_history(&mut self) -> usize {
        let dropped = self.history.discard_before(self.delivered);
        if dropped > 0 {
            debug!(dropped, retained = self.history.len(), "compacted history");
        }
        dropped
    }

    fn authorize(
        &self,
        operation: Operation,
        caller: &Identity,
        owner: Option<&Identity>,
    ) -> Result<(), LedgerError> {
        let ctx = AccessContext {
            caller,
            controller: &self.controller,
            owner,
        };
        if self.policy.permits(operation, &ctx) {
            return Ok(());
        }

        warn!(
            %caller,
            %operation,
            guard = self.policy.guard(operation).label(),
            "caller not authorized"
        );
        Err(LedgerError::Unauthorized {
            caller: caller.clone(),
            operation,
        })
    }

    fn record(&mut self, event: LedgerEvent) {
        debug!(event = event.name(), sequence = self.history.next_sequence(), "recording event");
        self.history = std::mem::take(&mut self.history).record(event);
    }
}

//! Token value types.
//!
//! A token is a character record: an id, an owner, an opaque metadata
//! reference, three attributes and an experience counter. The types here
//! are plain values with no side effects; the ledger owns the mutation rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential token identifier.
///
/// Ids are issued by the ledger starting at 1 and are never reused.
/// `0` is never a valid id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u64);

impl TokenId {
    /// The id assigned to the first token a ledger mints.
    pub const FIRST: TokenId = TokenId(1);

    /// Create a token id from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for TokenId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An already-authenticated caller or owner identity.
///
/// The ledger never interprets the contents; it only compares identities
/// for equality. Authentication happens before a value reaches the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap an identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An identity with no content cannot own a token.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for Identity {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Identity {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed attribute triple carried by every token.
///
/// # Example
///
/// ```rust
/// use arena_ledger::core::Attributes;
///
/// let attrs = Attributes::new(10, 15, 20);
/// assert_eq!(attrs.power(), 45);
///
/// let raised = attrs.checked_raise(&Attributes::new(5, 3, 2)).unwrap();
/// assert_eq!(raised, Attributes::new(15, 18, 22));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: u64,
    pub agility: u64,
    pub intelligence: u64,
}

impl Attributes {
    #[must_use]
    pub const fn new(strength: u64, agility: u64, intelligence: u64) -> Self {
        Self {
            strength,
            agility,
            intelligence,
        }
    }

    /// Sum of all three attributes, used to resolve battles.
    ///
    /// Widened to `u128` so the sum of three `u64` values cannot overflow.
    #[must_use]
    pub fn power(&self) -> u128 {
        u128::from(self.strength) + u128::from(self.agility) + u128::from(self.intelligence)
    }

    /// Sum of all three values as a `u64`, or `None` on overflow.
    ///
    /// Used when a delta triple is credited to experience.
    #[must_use]
    pub fn checked_total(&self) -> Option<u64> {
        self.strength
            .checked_add(self.agility)?
            .checked_add(self.intelligence)
    }

    /// Add `delta` field by field, or `None` if any field overflows.
    ///
    /// Pure: `self` is left untouched either way.
    #[must_use]
    pub fn checked_raise(&self, delta: &Attributes) -> Option<Attributes> {
        Some(Attributes {
            strength: self.strength.checked_add(delta.strength)?,
            agility: self.agility.checked_add(delta.agility)?,
            intelligence: self.intelligence.checked_add(delta.intelligence)?,
        })
    }

    /// True when every field is greater than or equal to the same field in `other`.
    #[must_use]
    pub fn dominates(&self, other: &Attributes) -> bool {
        self.strength >= other.strength
            && self.agility >= other.agility
            && self.intelligence >= other.intelligence
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "STR {} / AGI {} / INT {}",
            self.strength, self.agility, self.intelligence
        )
    }
}

/// A minted character token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub owner: Identity,
    /// Caller-supplied content locator, stored verbatim.
    pub metadata_ref: String,
    pub attributes: Attributes,
    pub experience: u64,
}

impl Token {
    /// A freshly minted token: experience starts at zero.
    pub fn minted(
        id: TokenId,
        owner: Identity,
        metadata_ref: impl Into<String>,
        attributes: Attributes,
    ) -> Self {
        Self {
            id,
            owner,
            metadata_ref: metadata_ref.into(),
            attributes,
            experience: 0,
        }
    }

    #[must_use]
    pub fn power(&self) -> u128 {
        self.attributes.power()
    }

    #[must_use]
    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        &self.owner == identity
    }
}

/// Result of a battle between two tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    /// The token with strictly greater power.
    Winner(TokenId),
    /// Equal power. Nobody is awarded experience.
    Tie,
}

impl BattleOutcome {
    /// Decide a battle from the two combatants' current attributes.
    ///
    /// Argument order never breaks a tie.
    ///
    /// ```rust
    /// use arena_ledger::core::{Attributes, BattleOutcome, TokenId};
    ///
    /// let a = (TokenId(1), Attributes::new(10, 15, 20));
    /// let b = (TokenId(2), Attributes::new(5, 10, 15));
    /// assert_eq!(BattleOutcome::resolve(a, b), BattleOutcome::Winner(TokenId(1)));
    ///
    /// let c = (TokenId(3), Attributes::new(15, 5, 25));
    /// assert_eq!(BattleOutcome::resolve(a, c), BattleOutcome::Tie);
    /// ```
    #[must_use]
    pub fn resolve(a: (TokenId, Attributes), b: (TokenId, Attributes)) -> Self {
        match a.1.power().cmp(&b.1.power()) {
            std::cmp::Ordering::Greater => Self::Winner(a.0),
            std::cmp::Ordering::Less => Self::Winner(b.0),
            std::cmp::Ordering::Equal => Self::Tie,
        }
    }

    #[must_use]
    pub fn winner(&self) -> Option<TokenId> {
        match self {
            Self::Winner(id) => Some(*id),
            Self::Tie => None,
        }
    }

    #[must_use]
    pub fn is_tie(&self) -> bool {
        matches!(self, Self::Tie)
    }
}

impl fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Winner(id) => write!(f, "winner {id}"),
            Self::Tie => f.write_str("tie"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_sums_all_attributes() {
        assert_eq!(Attributes::new(10, 15, 20).power(), 45);
        assert_eq!(Attributes::default().power(), 0);
    }

    #[test]
    fn power_does_not_overflow_at_max() {
        let attrs = Attributes::new(u64::MAX, u64::MAX, u64::MAX);
        assert_eq!(attrs.power(), 3 * u128::from(u64::MAX));
    }

    #[test]
    fn checked_raise_adds_each_field() {
        let raised = Attributes::new(10, 15, 20)
            .checked_raise(&Attributes::new(5, 3, 2))
            .unwrap();
        assert_eq!(raised, Attributes::new(15, 18, 22));
    }

    #[test]
    fn checked_raise_rejects_overflow() {
        let attrs = Attributes::new(u64::MAX, 0, 0);
        assert!(attrs.checked_raise(&Attributes::new(1, 0, 0)).is_none());
        assert!(attrs.checked_raise(&Attributes::new(0, 1, 1)).is_some());
    }

    #[test]
    fn checked_total_detects_overflow() {
        assert_eq!(Attributes::new(5, 3, 2).checked_total(), Some(10));
        assert_eq!(Attributes::new(u64::MAX, 1, 0).checked_total(), None);
    }

    #[test]
    fn dominates_compares_every_field() {
        let base = Attributes::new(1, 2, 3);
        assert!(Attributes::new(1, 2, 3).dominates(&base));
        assert!(Attributes::new(2, 2, 3).dominates(&base));
        assert!(!Attributes::new(0, 9, 9).dominates(&base));
    }

    #[test]
    fn empty_identity_is_detected() {
        assert!(Identity::new("").is_empty());
        assert!(Identity::new("   ").is_empty());
        assert!(!Identity::new("player-1").is_empty());
    }

    #[test]
    fn minted_token_starts_without_experience() {
        let token = Token::minted(
            TokenId::FIRST,
            Identity::new("alice"),
            "ipfs://hero",
            Attributes::new(1, 2, 3),
        );
        assert_eq!(token.experience, 0);
        assert_eq!(token.metadata_ref, "ipfs://hero");
        assert!(token.is_owned_by(&Identity::new("alice")));
        assert!(!token.is_owned_by(&Identity::new("bob")));
    }

    #[test]
    fn resolve_picks_stronger_side_in_either_position() {
        let strong = (TokenId(1), Attributes::new(10, 15, 20));
        let weak = (TokenId(2), Attributes::new(5, 10, 15));

        assert_eq!(BattleOutcome::resolve(strong, weak), BattleOutcome::Winner(TokenId(1)));
        assert_eq!(BattleOutcome::resolve(weak, strong), BattleOutcome::Winner(TokenId(1)));
    }

    #[test]
    fn resolve_equal_power_is_tie_in_either_position() {
        let a = (TokenId(1), Attributes::new(10, 10, 10));
        let b = (TokenId(2), Attributes::new(15, 5, 10));

        assert_eq!(BattleOutcome::resolve(a, b), BattleOutcome::Tie);
        assert_eq!(BattleOutcome::resolve(b, a), BattleOutcome::Tie);
        assert_eq!(BattleOutcome::Tie.winner(), None);
    }

    #[test]
    fn token_id_display() {
        assert_eq!(TokenId(7).to_string(), "#7");
    }

    #[test]
    fn token_serializes_correctly() {
        let token = Token::minted(
            TokenId(3),
            Identity::new("alice"),
            "ipfs://hero",
            Attributes::new(4, 5, 6),
        );
        let json = serde_json::to_string(&token).unwrap();
        let deserialized: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(token, deserialized);
        assert!(json.contains("\"id\":3"));
        assert!(json.contains("\"owner\":\"alice\""));
    }
}

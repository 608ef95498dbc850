//! Validation rules for ledger operations.
//!
//! Every rule is a pure function of the current token state and the
//! requested change. Nothing is written until all rules pass.

use crate::core::{Attributes, Identity, Token, TokenId};
use crate::validation::violations::InputViolation;
use stillwater::validation::{ValidateAll, Validation};
use stillwater::NonEmptyVec;

/// Outcome of a validation rule.
pub type Checked<T = ()> = Validation<T, NonEmptyVec<InputViolation>>;

fn require(condition: bool, violation: InputViolation) -> Checked {
    if condition {
        Validation::success(())
    } else {
        Validation::fail(violation)
    }
}

/// A minted token needs somebody to own it.
pub fn check_mint(to: &Identity) -> Checked {
    require(!to.is_empty(), InputViolation::EmptyRecipient)
}

/// Attributes and experience a token will hold after an accepted upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradePlan {
    pub after: Attributes,
    pub experience: u64,
}

/// Every attribute and the experience counter must absorb the delta.
///
/// All overflowing fields are reported together. On success the raised
/// values are returned so the caller writes exactly what was checked.
pub fn check_upgrade(token: &Token, delta: &Attributes) -> Checked<UpgradePlan> {
    let current = &token.attributes;
    let raise = |attribute: &'static str, value: u64, by: u64| -> Checked<u64> {
        value.checked_add(by).map_or_else(
            || {
                Validation::fail(InputViolation::AttributeOverflow {
                    token: token.id,
                    attribute,
                })
            },
            Validation::success,
        )
    };

    let experience = delta
        .checked_total()
        .and_then(|total| token.experience.checked_add(total))
        .map_or_else(
            || Checked::<u64>::fail(InputViolation::ExperienceOverflow { token: token.id }),
            Checked::success,
        );

    (
        raise("strength", current.strength, delta.strength),
        raise("agility", current.agility, delta.agility),
        raise("intelligence", current.intelligence, delta.intelligence),
        experience,
    )
        .validate_all()
        .map(|(strength, agility, intelligence, experience)| UpgradePlan {
            after: Attributes::new(strength, agility, intelligence),
            experience,
        })
}

/// Two distinct tokens are needed for a battle.
pub fn check_battle(challenger: TokenId, defender: TokenId) -> Checked {
    require(
        challenger != defender,
        InputViolation::SelfBattle { token: challenger },
    )
}

/// The winner must have room for one more point of experience.
pub fn check_battle_award(winner: &Token) -> Checked {
    require(
        winner.experience < u64::MAX,
        InputViolation::ExperienceOverflow { token: winner.id },
    )
}

/// Collapse a validation into a `Result` carrying every violation.
pub fn into_result<T>(checked: Checked<T>) -> Result<T, Vec<InputViolation>> {
    match checked {
        Validation::Success(value) => Ok(value),
        Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
    }
}

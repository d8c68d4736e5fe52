//! The module contains the balance aggregation for one event.
//!
//! Every cost line item says how much a participant owes for something and
//! how much they actually paid for it. Summing `paid - cost` per participant
//! gives the net positions the settlement works on.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::{Amount, EngineError, ResultEngine};

/// Net signed position per participant within one event.
///
/// Positive = is owed money, negative = owes money. When the line items of
/// an event are complete, the values sum to zero: everything someone paid is
/// a cost shared by others in the same event.
pub type Positions = HashMap<String, Amount>;

/// One cost line item of an event.
///
/// `cost` is the share this participant owes for the item, `paid` is what
/// they actually put down for it. Both are raw caller figures and are
/// validated by [`aggregate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub participant: String,
    pub cost: f64,
    pub paid: f64,
}

impl Contribution {
    pub fn new(participant: impl Into<String>, cost: f64, paid: f64) -> Self {
        Self {
            participant: participant.into(),
            cost,
            paid,
        }
    }
}

/// Reduces the cost line items of one event to net positions.
///
/// A participant with several line items accumulates in a single pass, so
/// two runs over the same input produce the same figures. Participants
/// without a line item are absent from the result, not zero-initialized.
///
/// # Errors
///
/// [`EngineError::InvalidAmount`] if a cost or paid figure is not finite, or
/// a participant id is blank. The whole call is rejected; no partial
/// positions are returned.
pub fn aggregate<I>(contributions: I) -> ResultEngine<Positions>
where
    I: IntoIterator<Item = Contribution>,
{
    let mut positions = Positions::new();
    for contribution in contributions {
        let participant = normalize_participant(&contribution.participant)?;
        let cost = Amount::new(contribution.cost)?;
        let paid = Amount::new(contribution.paid)?;
        let position = positions.entry(participant).or_insert(Amount::ZERO);
        *position += paid - cost;
    }
    Ok(positions)
}

/// Trims and NFC-normalizes a participant id so visually identical ids key
/// the same position.
pub(crate) fn normalize_participant(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(
            "participant id must not be empty".to_string(),
        ));
    }
    Ok(trimmed.nfc().collect())
}

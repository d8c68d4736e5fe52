//! The module contains the greedy pairing that settles one event.
//!
//! Given the net positions of an event, the solver pairs the largest debt
//! with the largest credit until everything is within tolerance of zero.
//! Each emitted transfer fully settles at least one participant, which caps
//! the output at `N - 1` transfers for `N` unsettled participants.
use serde::{Deserialize, Serialize};

use crate::{Amount, Contribution, EngineError, Positions, ResultEngine, balances};

/// A resolved payment instruction from a debtor to a creditor.
///
/// Produced only by [`settle`] and never mutated afterwards; the caller
/// records it as an expense entry. The amount is always strictly positive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub payer: String,
    pub payee: String,
    pub amount: Amount,
}

/// Computes the transfers that bring every net position to zero.
///
/// The positions are sorted ascending (largest debt first, largest credit
/// last) with the participant id as tie-break, then scanned with a cursor at
/// each end. An endpoint within [`EPSILON`] of zero is dropped without a
/// transfer; otherwise the smaller of the two magnitudes moves from debtor
/// to creditor and whichever endpoint reached zero is dropped. Positions
/// only move toward zero, so the ordering never needs repair.
///
/// The same positions produce the same transfer list, in the same order, on
/// every run.
///
/// # Errors
///
/// [`EngineError::UnbalancedLedger`] if the positions do not sum to zero
/// within [`EPSILON`], or a non-settled residue remains after pairing. Both
/// signal a data integrity bug upstream (a missing or double-counted line
/// item) and are never silently corrected here.
///
/// [`EPSILON`]: crate::EPSILON
pub fn settle(positions: &Positions) -> ResultEngine<Vec<Transfer>> {
    let total = positions
        .values()
        .fold(Amount::ZERO, |sum, position| sum + *position);
    if !total.is_settled() {
        return Err(EngineError::UnbalancedLedger(format!(
            "positions sum to {total}, expected 0"
        )));
    }

    let mut entries: Vec<(&str, Amount)> = positions
        .iter()
        .map(|(participant, position)| (participant.as_str(), *position))
        .collect();
    entries.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));

    let mut transfers = Vec::new();
    if entries.is_empty() {
        return Ok(transfers);
    }

    let mut low = 0;
    let mut high = entries.len() - 1;
    while low < high {
        if entries[low].1.is_settled() {
            low += 1;
            continue;
        }
        if entries[high].1.is_settled() {
            high -= 1;
            continue;
        }

        // Both endpoints live: the remaining entries still sum to ~0, so the
        // low end owes and the high end is owed. The moved amount equals at
        // least one endpoint's magnitude exactly, settling it.
        let amount = entries[low].1.abs().min(entries[high].1);
        transfers.push(Transfer {
            payer: entries[low].0.to_string(),
            payee: entries[high].0.to_string(),
            amount,
        });
        entries[low].1 += amount;
        entries[high].1 -= amount;

        if entries[low].1.is_settled() {
            low += 1;
        }
        if entries[high].1.is_settled() {
            high -= 1;
        }
    }

    if !entries[low].1.is_settled() {
        return Err(EngineError::UnbalancedLedger(format!(
            "residual position {} left on \"{}\" after pairing",
            entries[low].1, entries[low].0
        )));
    }

    Ok(transfers)
}

/// Aggregates the cost line items of one event and settles them in one call.
///
/// # Errors
///
/// [`EngineError::InvalidAmount`] from the aggregation,
/// [`EngineError::UnbalancedLedger`] from the settlement.
pub fn settle_contributions<I>(contributions: I) -> ResultEngine<Vec<Transfer>>
where
    I: IntoIterator<Item = Contribution>,
{
    let positions = balances::aggregate(contributions)?;
    settle(&positions)
}

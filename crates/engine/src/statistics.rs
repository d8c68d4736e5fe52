//! Balance queries over recorded expenses.
//!
//! Expense records are persisted outside the engine; these helpers compute
//! the aggregates the API layer serves from a snapshot of records. A record
//! belongs to its owner and optionally names a counterparty: the owner sees
//! the amount as stored, the counterparty sees it negated, and a private
//! record is invisible to the counterparty.
use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Amount, EngineError, ResultEngine, Transfer};

/// A recorded expense between two users.
///
/// `amount` is signed from the owner's perspective: positive means the
/// counterparty owes the owner, negative means the owner owes. A record
/// without a counterparty is a personal expense and only ever affects the
/// owner's own totals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub owner: String,
    pub counterparty: Option<String>,
    pub amount: Amount,
    pub category: String,
    pub occurred_at: DateTime<Utc>,
    pub private: bool,
}

/// Incoming, outgoing and net totals for one user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub incoming: Amount,
    pub outgoing: Amount,
    pub total: Amount,
}

/// Received/paid totals for one day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub received: Amount,
    pub paid: Amount,
}

/// Signed amount of a record as seen by `viewer`, if visible to them.
fn viewed_amount(viewer: &str, expense: &Expense) -> Option<Amount> {
    if expense.owner == viewer {
        return Some(expense.amount);
    }
    match &expense.counterparty {
        Some(counterparty) if counterparty == viewer && !expense.private => Some(-expense.amount),
        _ => None,
    }
}

/// Net amount per counterparty, from the viewer's perspective.
///
/// Positive means that counterparty owes the viewer. Personal expenses
/// (no counterparty) and records hidden from the viewer are skipped.
pub fn counterparty_balances(viewer: &str, expenses: &[Expense]) -> HashMap<String, Amount> {
    let mut balances: HashMap<String, Amount> = HashMap::new();
    for expense in expenses {
        let Some(amount) = viewed_amount(viewer, expense) else {
            continue;
        };
        let other = if expense.owner == viewer {
            match &expense.counterparty {
                Some(counterparty) => counterparty.clone(),
                None => continue,
            }
        } else {
            expense.owner.clone()
        };
        *balances.entry(other).or_insert(Amount::ZERO) += amount;
    }
    balances
}

/// Totals over every record visible to the viewer.
///
/// `incoming` collects the positive side, `outgoing` the negative side,
/// `total` their sum.
pub fn balance_summary(viewer: &str, expenses: &[Expense]) -> BalanceSummary {
    let mut summary = BalanceSummary::default();
    for expense in expenses {
        let Some(amount) = viewed_amount(viewer, expense) else {
            continue;
        };
        if amount.is_positive() {
            summary.incoming += amount;
        } else {
            summary.outgoing += amount;
        }
        summary.total += amount;
    }
    summary
}

/// Received/paid totals per day over an inclusive date range.
///
/// Returns one bucket per day from `from` to `to`, in order, including days
/// without records. Records outside the range are skipped.
///
/// # Errors
///
/// [`EngineError::InvalidAmount`] if `to` precedes `from`.
pub fn daily_breakdown(
    viewer: &str,
    expenses: &[Expense],
    from: NaiveDate,
    to: NaiveDate,
) -> ResultEngine<Vec<DailyTotals>> {
    if to < from {
        return Err(EngineError::InvalidAmount(format!(
            "invalid date range: {from} is after {to}"
        )));
    }

    let days = (to - from).num_days() as usize + 1;
    let mut buckets: Vec<DailyTotals> = (0..days)
        .map(|offset| DailyTotals {
            date: from + Days::new(offset as u64),
            received: Amount::ZERO,
            paid: Amount::ZERO,
        })
        .collect();

    for expense in expenses {
        let Some(amount) = viewed_amount(viewer, expense) else {
            continue;
        };
        let date = expense.occurred_at.date_naive();
        if date < from || date > to {
            continue;
        }
        let bucket = &mut buckets[(date - from).num_days() as usize];
        if amount.is_negative() {
            bucket.paid += amount;
        } else {
            bucket.received += amount;
        }
    }

    Ok(buckets)
}

/// Builds the expense records that persist one event settlement.
///
/// One record per transfer, owned by the debtor and carrying the debtor's
/// negative amount, so the viewer-perspective queries read a settlement the
/// same way on both sides.
pub fn settlement_expenses(
    event_name: &str,
    occurred_at: DateTime<Utc>,
    transfers: &[Transfer],
) -> Vec<Expense> {
    transfers
        .iter()
        .map(|transfer| Expense {
            owner: transfer.payer.clone(),
            counterparty: Some(transfer.payee.clone()),
            amount: -transfer.amount,
            category: event_name.to_string(),
            occurred_at,
            private: false,
        })
        .collect()
}

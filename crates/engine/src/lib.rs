//! Settlement engine for shared-expense events.
//!
//! The engine reduces per-participant cost/paid line items to net positions
//! ([`aggregate`]) and pairs debtors with creditors into a minimal list of
//! transfers ([`settle`]). It owns no state and does no I/O: callers hand in
//! a snapshot of one event's figures and persist the returned transfers as
//! expense records. Balance queries over recorded expenses live in
//! [`statistics`].
pub use balances::{Contribution, Positions, aggregate};
pub use error::EngineError;
pub use money::{Amount, EPSILON};
pub use settlement::{Transfer, settle, settle_contributions};
pub use statistics::{BalanceSummary, DailyTotals, Expense};

mod balances;
mod error;
mod money;
mod settlement;
pub mod statistics;

pub type ResultEngine<T> = Result<T, EngineError>;

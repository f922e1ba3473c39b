//! kibubu-core: transaction records, the dual-ledger replayer, and savings
//! transfer direction inference

pub mod direction;
pub mod ledger;
pub mod record;
pub mod replay;

pub use direction::{Direction, DirectionContext, DirectionRule, Inference, infer_direction};
pub use ledger::{Analysis, BalanceMismatch, LedgerEntry, Movement, OpeningBalances, Summary};
pub use record::{Category, TransactionRecord, debit_total};
pub use replay::{
    DEFAULT_OPENING_BALANCE, DayGroup, DayTotals, ReplayConfig, Replayer, analyze, group_by_day,
};

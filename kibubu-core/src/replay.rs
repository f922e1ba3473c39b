//! Dual-ledger replay: walks the records day by day and keeps the main and
//! savings balances running.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::direction::{DirectionContext, infer_direction};
use crate::ledger::{Analysis, LedgerEntry, Movement, OpeningBalances, Summary};
use crate::record::{TransactionRecord, debit_total};

/// Main-account balance the statement period starts from
pub const DEFAULT_OPENING_BALANCE: f64 = 2680.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayConfig {
    pub opening_main_balance: f64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            opening_main_balance: DEFAULT_OPENING_BALANCE,
        }
    }
}

impl ReplayConfig {
    pub fn with_opening_balance(opening_main_balance: f64) -> Self {
        Self { opening_main_balance }
    }

    /// Savings always opens empty.
    pub fn opening(&self) -> OpeningBalances {
        OpeningBalances {
            main: self.opening_main_balance,
            savings: 0.0,
        }
    }
}

/// All records sharing one date string, in extraction order
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub date: String,
    pub records: Vec<TransactionRecord>,
}

/// Group records by exact date string. Groups come out in the order their
/// first record appeared; records keep their order inside a group.
pub fn group_by_day(records: &[TransactionRecord]) -> Vec<DayGroup> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<DayGroup> = Vec::new();

    for record in records {
        let slot = *index.entry(record.date.as_str()).or_insert_with(|| {
            groups.push(DayGroup {
                date: record.date.clone(),
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].records.push(record.clone());
    }

    groups
}

/// External cash flow of one day. Saving Early records count on neither side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayTotals {
    /// Amount plus service charge of every debit record
    pub debits: f64,
    /// Amount of every other record except Saving Early
    pub credits: f64,
}

impl DayTotals {
    pub fn from_records(day: &[TransactionRecord]) -> Self {
        let credits = day
            .iter()
            .filter(|r| !r.is_debit() && !r.category.is_savings_transfer())
            .map(|r| r.amount)
            .sum();
        Self {
            debits: debit_total(day),
            credits,
        }
    }
}

/// Replays records against the two running balances
#[derive(Debug)]
pub struct Replayer {
    opening: OpeningBalances,
    main_balance: f64,
    savings_balance: f64,
    main_account: Vec<LedgerEntry>,
    savings_account: Vec<LedgerEntry>,
}

impl Replayer {
    pub fn new(config: &ReplayConfig) -> Self {
        let opening = config.opening();
        Self {
            opening,
            main_balance: opening.main,
            savings_balance: opening.savings,
            main_account: Vec::new(),
            savings_account: Vec::new(),
        }
    }

    pub fn replay(mut self, records: &[TransactionRecord]) -> Analysis {
        for day in group_by_day(records) {
            self.replay_day(&day.records);
        }

        let summary = Summary::from_ledgers(
            &self.main_account,
            &self.savings_account,
            self.opening,
            records.len(),
        );
        info!(
            records = records.len(),
            main_entries = self.main_account.len(),
            savings_entries = self.savings_account.len(),
            main_balance = summary.main_balance,
            savings_balance = summary.savings_balance,
            "replay complete"
        );

        Analysis {
            main_account: self.main_account,
            savings_account: self.savings_account,
            summary,
        }
    }

    fn replay_day(&mut self, day: &[TransactionRecord]) {
        let totals = DayTotals::from_records(day);

        for (i, record) in day.iter().enumerate() {
            if record.is_debit() {
                let cost = record.total_cost();
                self.main_balance -= cost;
                self.main_account
                    .push(LedgerEntry::for_record(record, -cost, self.main_balance));
            } else if !record.category.is_savings_transfer() {
                self.main_balance += record.amount;
                self.main_account
                    .push(LedgerEntry::for_record(record, record.amount, self.main_balance));
            } else {
                let ctx = DirectionContext {
                    record,
                    prev: i.checked_sub(1).map(|p| &day[p]),
                    next: day.get(i + 1),
                    main_balance: self.main_balance,
                    savings_balance: self.savings_balance,
                    totals,
                    remaining: &day[i + 1..],
                };
                let inference = infer_direction(&ctx);
                debug!(
                    date = %record.date,
                    amount = record.amount,
                    rule = ?inference.rule,
                    direction = ?inference.direction,
                    "savings transfer direction"
                );

                if inference.into_savings() {
                    self.deposit(record);
                } else {
                    self.withdraw(record);
                }
            }
        }
    }

    fn deposit(&mut self, record: &TransactionRecord) {
        let amount = record.amount;
        self.main_balance -= amount;
        self.savings_balance += amount;
        self.main_account.push(LedgerEntry::transfer(
            record,
            "Transfer to Savings",
            -amount,
            self.main_balance,
        ));
        self.savings_account.push(LedgerEntry::savings(
            record,
            "Savings Deposit",
            amount,
            self.savings_balance,
            Movement::TransferIn,
        ));
    }

    fn withdraw(&mut self, record: &TransactionRecord) {
        let amount = record.amount;
        self.main_balance += amount;
        self.savings_balance -= amount;
        self.main_account.push(LedgerEntry::transfer(
            record,
            "Transfer from Savings",
            amount,
            self.main_balance,
        ));
        self.savings_account.push(LedgerEntry::savings(
            record,
            "Withdrawal to Main Account",
            -amount,
            self.savings_balance,
            Movement::TransferOut,
        ));
    }
}

/// Replay `records` from the configured opening balances
pub fn analyze(records: &[TransactionRecord], config: &ReplayConfig) -> Analysis {
    Replayer::new(config).replay(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;

    fn rec(date: &str, amount: f64, service_charge: f64, category: Category) -> TransactionRecord {
        TransactionRecord::new(date, amount, service_charge, category)
    }

    #[test]
    fn test_group_by_day_first_occurrence_order() {
        let records = vec![
            rec("02/01/2024", 1.0, 0.0, Category::CashIn),
            rec("01/01/2024", 2.0, 0.0, Category::CashIn),
            rec("02/01/2024", 3.0, 0.0, Category::CashOut),
            rec("01/01/2024", 4.0, 0.0, Category::Other),
        ];
        let groups = group_by_day(&records);
        let dates: Vec<_> = groups.iter().map(|g| g.date.as_str()).collect();
        assert_eq!(dates, ["02/01/2024", "01/01/2024"]);
        let amounts: Vec<_> = groups[0].records.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, [1.0, 3.0]);
        assert_eq!(groups[1].records[1].category, Category::Other);
    }

    #[test]
    fn test_day_totals_exclude_saving_early() {
        let day = vec![
            rec("01/15/2024", 1000.0, 0.0, Category::CashIn),
            rec("01/15/2024", 300.0, 0.0, Category::SavingEarly),
            rec("01/15/2024", 200.0, 5.0, Category::SendMoney),
            rec("01/15/2024", 50.0, 2.0, Category::Kibubu),
        ];
        let totals = DayTotals::from_records(&day);
        assert_eq!(totals.debits, 205.0);
        // Service charge never counts on the credit side
        assert_eq!(totals.credits, 1050.0);
    }

    #[test]
    fn test_empty_input_keeps_opening_balances() {
        let analysis = analyze(&[], &ReplayConfig::default());
        assert!(analysis.main_account.is_empty());
        assert!(analysis.savings_account.is_empty());
        assert_eq!(analysis.summary.main_balance, DEFAULT_OPENING_BALANCE);
        assert_eq!(analysis.summary.savings_balance, 0.0);
        assert_eq!(analysis.summary.total_balance, DEFAULT_OPENING_BALANCE);
        assert_eq!(analysis.summary.transaction_count, 0);
    }

    #[test]
    fn test_deposit_then_withdraw_before_debit() {
        let config = ReplayConfig::with_opening_balance(1000.0);
        let records = vec![
            rec("01/10/2024", 400.0, 0.0, Category::SavingEarly),
            rec("01/11/2024", 100.0, 0.0, Category::SavingEarly),
            rec("01/11/2024", 1000.0, 0.0, Category::CashOut),
        ];
        let analysis = analyze(&records, &config);

        assert_eq!(analysis.main_account.len(), 3);
        assert_eq!(analysis.savings_account.len(), 2);
        assert_eq!(analysis.savings_account[0].movement, Some(Movement::TransferIn));
        assert_eq!(analysis.savings_account[1].movement, Some(Movement::TransferOut));
        assert_eq!(analysis.main_account[1].description, "Transfer from Savings");
        assert_eq!(analysis.summary.main_balance, 1000.0 - 400.0 + 100.0 - 1000.0);
        assert_eq!(analysis.summary.savings_balance, 300.0);
        assert_eq!(analysis.summary.transaction_count, 3);
        assert!(analysis.verify_running_balances(config.opening()).is_ok());
    }

    #[test]
    fn test_grouping_changes_lookahead() {
        // The Cash Out is on a later day, so Rule 1 cannot see it and the
        // default decides on the current main balance alone.
        let config = ReplayConfig::with_opening_balance(0.0);
        let records = vec![
            rec("01/10/2024", 500.0, 0.0, Category::CashIn),
            rec("01/10/2024", 500.0, 0.0, Category::SavingEarly),
            rec("01/12/2024", 100.0, 0.0, Category::SavingEarly),
            rec("01/13/2024", 100.0, 0.0, Category::CashOut),
        ];
        let analysis = analyze(&records, &config);
        let movements: Vec<_> = analysis.savings_account.iter().filter_map(|e| e.movement).collect();
        assert_eq!(movements, [Movement::TransferIn, Movement::TransferOut]);
        assert_eq!(analysis.summary.savings_balance, 400.0);
        assert_eq!(analysis.summary.main_balance, 0.0);
    }
}

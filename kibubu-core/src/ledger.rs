//! Ledger entries and the analysis returned for one statement

use serde::{Deserialize, Serialize};

use crate::record::{Category, TransactionRecord};

/// Tolerance used when checking running balances built from f64 sums
const BALANCE_EPSILON: f64 = 1e-9;

/// Direction of a savings-account movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Movement {
    #[serde(rename = "Transfer In")]
    TransferIn,
    #[serde(rename = "Transfer Out")]
    TransferOut,
}

/// One signed, balance-stamped movement on an account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub date: String,
    pub description: String,
    /// Positive = credit, negative = debit
    pub amount: f64,
    /// Account balance after this entry
    pub balance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_charge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txn_id: Option<String>,
    /// Savings entries only
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub movement: Option<Movement>,
}

impl LedgerEntry {
    /// Main-account entry echoing a regular (non-transfer) record
    pub fn for_record(record: &TransactionRecord, amount: f64, balance: f64) -> Self {
        Self {
            date: record.date.clone(),
            description: record.category.label().to_string(),
            amount,
            balance,
            category: Some(record.category),
            service_charge: Some(record.service_charge),
            txn_id: record.txn_id.clone(),
            movement: None,
        }
    }

    /// Main-account side of a savings transfer
    pub fn transfer(record: &TransactionRecord, description: &str, amount: f64, balance: f64) -> Self {
        Self {
            date: record.date.clone(),
            description: description.to_string(),
            amount,
            balance,
            category: None,
            service_charge: None,
            txn_id: record.txn_id.clone(),
            movement: None,
        }
    }

    /// Savings-account side of a savings transfer
    pub fn savings(
        record: &TransactionRecord,
        description: &str,
        amount: f64,
        balance: f64,
        movement: Movement,
    ) -> Self {
        Self {
            movement: Some(movement),
            ..Self::transfer(record, description, amount, balance)
        }
    }

    pub fn is_credit(&self) -> bool {
        self.amount > 0.0
    }
}

/// Final balances of both accounts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub main_balance: f64,
    pub savings_balance: f64,
    pub total_balance: f64,
    pub transaction_count: usize,
}

impl Summary {
    pub fn new(main_balance: f64, savings_balance: f64, transaction_count: usize) -> Self {
        Self {
            main_balance,
            savings_balance,
            total_balance: main_balance + savings_balance,
            transaction_count,
        }
    }

    /// Recompute a summary from the ledgers alone. An empty ledger leaves
    /// its account at the opening balance.
    pub fn from_ledgers(
        main: &[LedgerEntry],
        savings: &[LedgerEntry],
        opening: OpeningBalances,
        transaction_count: usize,
    ) -> Self {
        let main_balance = main.last().map_or(opening.main, |e| e.balance);
        let savings_balance = savings.last().map_or(opening.savings, |e| e.balance);
        Self::new(main_balance, savings_balance, transaction_count)
    }
}

/// Starting point of the two running balances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningBalances {
    pub main: f64,
    pub savings: f64,
}

/// Which ledger broke the running-balance invariant, and where
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceMismatch {
    Main(usize),
    Savings(usize),
}

/// Result of replaying one statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub main_account: Vec<LedgerEntry>,
    pub savings_account: Vec<LedgerEntry>,
    pub summary: Summary,
}

impl Analysis {
    /// Check that every entry's balance equals the previous balance plus
    /// its signed amount, on both ledgers.
    pub fn verify_running_balances(&self, opening: OpeningBalances) -> Result<(), BalanceMismatch> {
        if let Some(i) = first_break(&self.main_account, opening.main) {
            return Err(BalanceMismatch::Main(i));
        }
        match first_break(&self.savings_account, opening.savings) {
            Some(i) => Err(BalanceMismatch::Savings(i)),
            None => Ok(()),
        }
    }
}

fn first_break(entries: &[LedgerEntry], opening: f64) -> Option<usize> {
    let mut prev = opening;
    for (i, e) in entries.iter().enumerate() {
        if (prev + e.amount - e.balance).abs() > BALANCE_EPSILON {
            return Some(i);
        }
        prev = e.balance;
    }
    None
}

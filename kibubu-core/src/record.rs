//! Transaction records extracted from a mobile-money statement

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used by the statement's transaction markers
pub const STATEMENT_DATE_FORMAT: &str = "%m/%d/%Y";

/// A single transaction parsed from one date-delimited statement block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Date marker exactly as found in the text (MM/DD/YYYY)
    pub date: String,
    /// Face value, never negative
    pub amount: f64,
    /// Fee charged on top of `amount`; 0 when the block has none
    pub service_charge: f64,
    /// Business type inferred from the block's keywords
    #[serde(rename = "type")]
    pub category: Category,
    /// Statement transaction id, when the block carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txn_id: Option<String>,
}

/// Business type of a statement record.
///
/// The set is closed: anything the keyword rules cannot place is `Other`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Kibubu")]
    Kibubu,
    #[serde(rename = "Cash In")]
    CashIn,
    #[serde(rename = "Cash Out")]
    CashOut,
    #[serde(rename = "Send Money")]
    SendMoney,
    #[serde(rename = "Bill Payment")]
    BillPayment,
    #[serde(rename = "Wallet To Bank")]
    WalletToBank,
    #[serde(rename = "Bank to Wallet")]
    BankToWallet,
    #[serde(rename = "Promotion")]
    Promotion,
    #[serde(rename = "Saving Early")]
    SavingEarly,
    #[serde(rename = "Government Payments")]
    GovernmentPayments,
    #[serde(rename = "Receive Money")]
    ReceiveMoney,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// Categories whose amount plus service charge leaves the main account
    pub const DEBITS: [Category; 5] = [
        Category::SendMoney,
        Category::BillPayment,
        Category::WalletToBank,
        Category::CashOut,
        Category::GovernmentPayments,
    ];

    /// Human label, identical to the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            Category::Kibubu => "Kibubu",
            Category::CashIn => "Cash In",
            Category::CashOut => "Cash Out",
            Category::SendMoney => "Send Money",
            Category::BillPayment => "Bill Payment",
            Category::WalletToBank => "Wallet To Bank",
            Category::BankToWallet => "Bank to Wallet",
            Category::Promotion => "Promotion",
            Category::SavingEarly => "Saving Early",
            Category::GovernmentPayments => "Government Payments",
            Category::ReceiveMoney => "Receive Money",
            Category::Other => "Other",
        }
    }

    pub fn is_debit(&self) -> bool {
        Self::DEBITS.contains(self)
    }

    /// Saving Early records move money between the two accounts rather
    /// than in or out of the wallet.
    pub fn is_savings_transfer(&self) -> bool {
        matches!(self, Category::SavingEarly)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TransactionRecord {
    pub fn new(date: impl Into<String>, amount: f64, service_charge: f64, category: Category) -> Self {
        Self {
            date: date.into(),
            amount,
            service_charge,
            category,
            txn_id: None,
        }
    }

    pub fn with_txn_id(mut self, txn_id: impl Into<String>) -> Self {
        self.txn_id = Some(txn_id.into());
        self
    }

    /// Amount plus service charge
    pub fn total_cost(&self) -> f64 {
        self.amount + self.service_charge
    }

    pub fn is_debit(&self) -> bool {
        self.category.is_debit()
    }

    /// The date marker as a calendar date, if the digits form a real one
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, STATEMENT_DATE_FORMAT).ok()
    }
}

/// Sum of `amount + service_charge` over the debit records in `records`.
///
/// Both the daily aggregate and the look-ahead in direction inference go
/// through this one function.
pub fn debit_total<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    records
        .into_iter()
        .filter(|r| r.is_debit())
        .map(TransactionRecord::total_cost)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_set_membership() {
        for c in Category::DEBITS {
            assert!(c.is_debit(), "{c} should be a debit");
        }
        assert!(!Category::CashIn.is_debit());
        assert!(!Category::Kibubu.is_debit());
        assert!(!Category::SavingEarly.is_debit());
        assert!(!Category::Other.is_debit());
    }

    #[test]
    fn test_label_matches_serde_name() {
        let json = serde_json::to_string(&Category::WalletToBank).unwrap();
        assert_eq!(json, "\"Wallet To Bank\"");
        let back: Category = serde_json::from_str("\"Bank to Wallet\"").unwrap();
        assert_eq!(back, Category::BankToWallet);
        assert_eq!(Category::ReceiveMoney.to_string(), "Receive Money");
    }

    #[test]
    fn test_debit_total_skips_credits_and_transfers() {
        let day = vec![
            TransactionRecord::new("01/15/2024", 1000.0, 0.0, Category::CashIn),
            TransactionRecord::new("01/15/2024", 200.0, 5.0, Category::SendMoney),
            TransactionRecord::new("01/15/2024", 300.0, 0.0, Category::SavingEarly),
            TransactionRecord::new("01/15/2024", 40.0, 1.5, Category::GovernmentPayments),
        ];
        assert_eq!(debit_total(&day), 246.5);
        assert_eq!(debit_total(&day[..1]), 0.0);
    }

    #[test]
    fn test_calendar_date() {
        let ok = TransactionRecord::new("02/29/2024", 1.0, 0.0, Category::Other);
        assert_eq!(ok.calendar_date(), NaiveDate::from_ymd_opt(2024, 2, 29));

        let bogus = TransactionRecord::new("13/45/2024", 1.0, 0.0, Category::Other);
        assert!(bogus.calendar_date().is_none());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let rec = TransactionRecord::new("01/15/2024", 200.0, 5.0, Category::SendMoney)
            .with_txn_id("ABC123");
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["serviceCharge"], 5.0);
        assert_eq!(v["type"], "Send Money");
        assert_eq!(v["txnId"], "ABC123");
        assert_eq!(rec.total_cost(), 205.0);
    }
}

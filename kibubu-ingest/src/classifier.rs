//! Keyword rules assigning a category to one statement block.
//!
//! Rules are tried top to bottom and the first match wins. Broad one-word
//! evidence ("Bill", "Bank", "Saving") sits below the multi-word rules that
//! share it, so moving a row changes results. Keywords are matched
//! case-sensitively and literally, including the statement's "Recieve".

use kibubu_core::Category;

/// One row of the classification table
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub category: Category,
    pub matches: fn(&str) -> bool,
}

fn any(block: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| block.contains(n))
}

fn all(block: &str, needles: &[&str]) -> bool {
    needles.iter().all(|n| block.contains(n))
}

pub static RULES: &[Rule] = &[
    Rule {
        name: "kibubu",
        category: Category::Kibubu,
        matches: |b| all(b, &["SavingsDisbursement", "Bill"]),
    },
    Rule {
        name: "cash-in",
        category: Category::CashIn,
        matches: |b| all(b, &["Cash", "In"]) || b.contains("Cash In"),
    },
    Rule {
        name: "cash-out",
        category: Category::CashOut,
        matches: |b| all(b, &["Cash", "Out"]) || b.contains("Cash Out"),
    },
    Rule {
        name: "send-money",
        category: Category::SendMoney,
        matches: |b| any(b, &["Send", "Send Money"]),
    },
    Rule {
        name: "bill-payment",
        category: Category::BillPayment,
        matches: |b| any(b, &["Bill Payment", "Bill"]),
    },
    Rule {
        name: "wallet-to-bank",
        category: Category::WalletToBank,
        matches: |b| any(b, &["Wallet To", "Wallet"]),
    },
    Rule {
        name: "bank-to-wallet",
        category: Category::BankToWallet,
        matches: |b| any(b, &["Bank to", "Bank"]),
    },
    Rule {
        name: "promotion",
        category: Category::Promotion,
        matches: |b| any(b, &["MIC Promotion", "Promotion"]),
    },
    Rule {
        name: "saving-early",
        category: Category::SavingEarly,
        matches: |b| any(b, &["Saving Early", "Saving", "Early"]),
    },
    Rule {
        name: "government-payments",
        category: Category::GovernmentPayments,
        matches: |b| any(b, &["Government Payments", "Government"]),
    },
    Rule {
        name: "receive-money",
        category: Category::ReceiveMoney,
        matches: |b| any(b, &["Recieve Money", "Recieve"]),
    },
];

/// Category of the first rule matching `block`, or `Other`
pub fn classify(block: &str) -> Category {
    matching_rule(block).map_or(Category::Other, |r| r.category)
}

/// The rule that decides `block`, if any
pub fn matching_rule(block: &str) -> Option<&'static Rule> {
    RULES.iter().find(|r| (r.matches)(block))
}

/// Categories in evaluation order
pub fn rule_order() -> Vec<Category> {
    RULES.iter().map(|r| r.category).collect()
}

use anyhow::{Context, Result};
use kibubu_core::{Analysis, LedgerEntry, TransactionRecord};
use serde::Serialize;
use std::fmt::Write;

use crate::config::{OutputFormat, OutputSection};

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let s = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    s.context("serialize report")
}

pub fn render(analysis: &Analysis, output: &OutputSection) -> Result<String> {
    match output.format {
        OutputFormat::Json => to_json(analysis, output.pretty),
        OutputFormat::Table => Ok(render_table(analysis)),
    }
}

fn render_table(analysis: &Analysis) -> String {
    let mut out = String::new();

    out.push_str("## Main account\n\n");
    push_entries(&mut out, &analysis.main_account);

    out.push_str("\n## Savings account\n\n");
    if analysis.savings_account.is_empty() {
        out.push_str("(no savings movements)\n");
    }
    push_entries(&mut out, &analysis.savings_account);

    let s = &analysis.summary;
    let _ = writeln!(out, "\n## Summary\n");
    let _ = writeln!(out, "Transactions:    {}", s.transaction_count);
    let _ = writeln!(out, "Main balance:    {:>14.2}", s.main_balance);
    let _ = writeln!(out, "Savings balance: {:>14.2}", s.savings_balance);
    let _ = writeln!(out, "Total balance:   {:>14.2}", s.total_balance);
    out
}

fn push_entries(out: &mut String, entries: &[LedgerEntry]) {
    for e in entries {
        let side = if e.is_credit() { "CR" } else { "DR" };
        let _ = writeln!(
            out,
            "{}  {:<28} {} {:>14.2} {:>14.2}",
            e.date,
            e.description,
            side,
            e.amount.abs(),
            e.balance
        );
    }
}

/// Date markers that matched the statement pattern but are not real
/// calendar dates, such as `13/45/2024`
pub fn impossible_dates(records: &[TransactionRecord]) -> Vec<&str> {
    records
        .iter()
        .filter(|r| r.calendar_date().is_none())
        .map(|r| r.date.as_str())
        .collect()
}

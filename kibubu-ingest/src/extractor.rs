//! Mobile-money statement text extractor
//!
//! Expected extracted-text layout (one transaction per date marker):
//!   01/15/2024 10:32 Cash In TxnID:8H2K1LQ Amount:1,000.00 ServiceCharge:0.00
//!   01/15/2024 11:05 Send Money TxnID:8H2K9PZ Amount:200.00 ServiceCharge:5.00
//!
//! Every `MM/DD/YYYY` marker opens a block that runs up to the next marker.
//! Blocks without an `Amount:` field (page headers, totals) are skipped.

use kibubu_core::TransactionRecord;
use regex::{Captures, Regex};
use tracing::debug;

use crate::classifier::classify;
use crate::error::{IngestError, Result};

pub const DATE_PATTERN: &str = r"\d{2}/\d{2}/\d{4}";

/// Compiled statement patterns
#[derive(Debug, Clone)]
pub struct Extractor {
    date_re: Regex,
    amount_re: Regex,
    service_charge_re: Regex,
    txn_id_re: Regex,
}

/// One date marker and the text following it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub date: &'a str,
    pub body: &'a str,
}

impl Extractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            date_re: Regex::new(DATE_PATTERN)?,
            amount_re: Regex::new(r"Amount:\s*(\d[\d,]*(?:\.\d+)*)")?,
            service_charge_re: Regex::new(r"ServiceCharge:\s*(\d[\d,]*(?:\.\d+)*)")?,
            txn_id_re: Regex::new(r"TxnID:([^,\s]+)")?,
        })
    }

    /// Split `text` at every date marker. Text before the first marker
    /// belongs to no block.
    pub fn blocks<'a>(&self, text: &'a str) -> Vec<Block<'a>> {
        let markers: Vec<_> = self.date_re.find_iter(text).collect();
        markers
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let end = markers.get(i + 1).map_or(text.len(), |next| next.start());
                Block {
                    date: m.as_str(),
                    body: &text[m.end()..end],
                }
            })
            .collect()
    }

    /// Parse every block of `text` into records, in marker order.
    pub fn extract(&self, text: &str) -> Result<Vec<TransactionRecord>> {
        let mut out = Vec::new();

        for block in self.blocks(text) {
            match self.parse_block(&block)? {
                Some(record) => {
                    debug!(
                        date = %record.date,
                        amount = record.amount,
                        category = %record.category,
                        "extracted record"
                    );
                    out.push(record);
                }
                None => debug!(date = block.date, "no amount in block, skipping"),
            }
        }

        Ok(out)
    }

    /// `Ok(None)` when the block has no amount field at all
    pub fn parse_block(&self, block: &Block<'_>) -> Result<Option<TransactionRecord>> {
        let Some(amount) = self.amount_re.captures(block.body) else {
            return Ok(None);
        };
        let amount = parse_number(&amount, block.date, "Amount")?;

        let service_charge = match self.service_charge_re.captures(block.body) {
            Some(caps) => parse_number(&caps, block.date, "ServiceCharge")?,
            None => 0.0,
        };

        let mut record = TransactionRecord::new(block.date, amount, service_charge, classify(block.body));
        if let Some(caps) = self.txn_id_re.captures(block.body) {
            record = record.with_txn_id(&caps[1]);
        }

        Ok(Some(record))
    }
}

/// Parse a captured number, dropping thousands separators. Values too large
/// for an `f64` are as malformed as unparseable ones.
fn parse_number(caps: &Captures<'_>, date: &str, field: &'static str) -> Result<f64> {
    let raw = &caps[1];
    let malformed = || IngestError::MalformedNumber {
        date: date.to_string(),
        field,
        raw: raw.to_string(),
    };
    let value = raw.replace(',', "").parse::<f64>().map_err(|_| malformed())?;
    if !value.is_finite() {
        return Err(malformed());
    }
    Ok(value)
}

/// Extract records with a freshly compiled [`Extractor`]
pub fn extract(text: &str) -> Result<Vec<TransactionRecord>> {
    Extractor::new()?.extract(text)
}

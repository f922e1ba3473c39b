//! kibubu-ingest: turns extracted statement text into classified records
//! and replays them into the main and savings ledgers.

pub mod classifier;
pub mod error;
pub mod extractor;

pub use classifier::{Rule, RULES, classify};
pub use error::{IngestError, Result};
pub use extractor::{Block, Extractor, extract};

use kibubu_core::{Analysis, ReplayConfig, analyze};

/// Extract every record from `text` and replay it against both accounts.
///
/// All or nothing: a malformed number anywhere fails the whole call.
pub fn extract_and_analyze(text: &str, config: &ReplayConfig) -> Result<Analysis> {
    let records = extract(text)?;
    Ok(analyze(&records, config))
}

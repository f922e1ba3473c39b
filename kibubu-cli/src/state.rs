use anyhow::{Context, Result, anyhow};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `$KIBUBU_HOME`, or `~/.kibubu`
pub fn kibubu_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("KIBUBU_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".kibubu"))
}

pub fn ensure_kibubu_home() -> Result<PathBuf> {
    let dir = kibubu_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Statement PDFs are recognised by extension; anything else is read as text.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Read statement text from `path`, or from stdin when it is `-` or absent.
/// A `.pdf` path has its text layer extracted first.
pub fn read_statement_text(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") && is_pdf(p) => {
            let text = pdf_extract::extract_text(p)
                .map_err(|e| anyhow!("extract text from {}: {e}", p.display()))?;
            debug!(path = %p.display(), chars = text.len(), "extracted pdf text");
            Ok(text)
        }
        Some(p) if p != Path::new("-") => {
            fs::read_to_string(p).with_context(|| format!("read {}", p.display()))
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("read statement text from stdin")?;
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_detected_by_extension() {
        assert!(is_pdf(Path::new("statement.pdf")));
        assert!(is_pdf(Path::new("/tmp/MIXX_JAN.PDF")));
        assert!(!is_pdf(Path::new("statement.txt")));
        assert!(!is_pdf(Path::new("pdf")));
        assert!(!is_pdf(Path::new("-")));
    }

    #[test]
    fn test_text_file_read_as_is() {
        let p = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("fixtures")
            .join("statement_sample.txt");
        let text = read_statement_text(Some(&p)).unwrap();
        assert!(text.contains("Saving Early"));
    }
}

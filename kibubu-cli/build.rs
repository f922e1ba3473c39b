//! Stamps the binary with the source revision shown by `kibubu --version`.

use std::path::Path;
use std::process::Command;

/// Run git against the workspace root, returning trimmed stdout on success.
fn git(root: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new("git").arg("-C").arg(root).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let text = String::from_utf8(out.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn main() {
    println!("cargo:rerun-if-env-changed=KIBUBU_REVISION");

    // Source tarballs have no .git; packagers pass the revision in.
    let revision = std::env::var("KIBUBU_REVISION").ok().or_else(|| {
        let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").ok()?;
        let root = Path::new(&manifest_dir).parent()?.to_path_buf();
        println!("cargo:rerun-if-changed={}", root.join(".git/HEAD").display());
        git(&root, &["describe", "--always", "--dirty", "--abbrev=8"])
    });

    println!(
        "cargo:rustc-env=KIBUBU_BUILD_SHA={}",
        revision.as_deref().unwrap_or("unknown")
    );
}

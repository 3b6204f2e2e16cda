//! Stamps the server binary with where and when it was built
//!
//! Sets `MSCOPE_GIT_HASH`, `MSCOPE_BUILT_AT` (UTC, RFC 3339) and
//! `MSCOPE_PROFILE` for the startup banner and `/api/buildinfo`.

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");

    let built_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=MSCOPE_GIT_HASH={}", git_revision().unwrap_or_else(|| "unknown".into()));
    println!("cargo:rustc-env=MSCOPE_BUILT_AT={}", built_at);
    println!("cargo:rustc-env=MSCOPE_PROFILE={}", profile);
}

/// Short commit hash, `+dirty` when the tree has local edits
fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())?;
    let hash = String::from_utf8(output.stdout).ok()?.trim().to_string();

    let dirty = Command::new("git")
        .args(["status", "--porcelain", "--untracked-files=no"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .is_some_and(|o| !o.stdout.is_empty());

    Some(if dirty { format!("{}+dirty", hash) } else { hash })
}

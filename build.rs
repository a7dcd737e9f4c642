// build.rs
use std::process::Command;

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!hash.is_empty()).then_some(hash)
}

fn git_dirty_suffix() -> &'static str {
    Command::new("git")
        .args(["diff", "--quiet"])
        .status()
        .map(|status| if status.success() { "" } else { "-dirty" })
        .unwrap_or("")
}

fn main() {
    let version = std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    // outside of a checkout (e.g. a packaged crate) only the build profile is known
    let full_version = match git_short_hash() {
        Some(hash) => format!("{} {}{}-{}", version, hash, git_dirty_suffix(), profile),
        None => format!("{} {}", version, profile),
    };

    println!("cargo:rustc-env=SCHISMRS_MLD_VERSION={}", full_version);
    println!("cargo:rerun-if-changed=.git/HEAD");
}

// Build script: inject AGRIPLAN_VERSION from `git describe`
//
// Falls back to CARGO_PKG_VERSION when git or tags are unavailable
// (source tarballs, vendored builds).

use std::process::Command;

fn main() {
    let version = git_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=AGRIPLAN_VERSION={}", version);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
    println!("cargo:rerun-if-changed=.git/refs/tags");
}

/// Version string derived from the nearest tag
///
/// - `v0.2.0` → `0.2.0`
/// - `v0.2.0-3-gabc123[-dirty]` → `0.2.0`
/// - `abc123[-dirty]` (no tags) → `<pkg version>-abc123[-dirty]`
fn git_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();

    match described.strip_prefix('v') {
        Some(tagged) => Some(tagged.split('-').next().unwrap_or(tagged).to_string()),
        None => Some(format!("{}-{}", env!("CARGO_PKG_VERSION"), described)),
    }
}

//! Build script to inject version and git SHA at compile time.
//!
//! Environment variables (set by CI or fall back to defaults):
//! - RIAD_VERSION: Version string (defaults to CARGO_PKG_VERSION)
//! - RIAD_GIT_SHA: Git commit SHA (defaults to GITHUB_SHA, git rev-parse, or "unknown")
//! - RIAD_API_BASE_URL: Backend API base baked into the browser build

use std::process::Command;

fn main() {
    let version = std::env::var("RIAD_VERSION").unwrap_or_else(|_| {
        std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "unknown".into())
    });
    println!("cargo:rustc-env=RIAD_VERSION={}", version);

    let git_sha = std::env::var("RIAD_GIT_SHA")
        .or_else(|_| {
            std::env::var("GITHUB_SHA").map(|s| s.chars().take(7).collect::<String>())
        })
        .unwrap_or_else(|_| get_git_sha());
    println!("cargo:rustc-env=RIAD_GIT_SHA={}", git_sha);

    println!("cargo:rerun-if-env-changed=RIAD_VERSION");
    println!("cargo:rerun-if-env-changed=RIAD_GIT_SHA");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");
    println!("cargo:rerun-if-env-changed=RIAD_API_BASE_URL");
}

fn get_git_sha() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|o| {
            if o.status.success() {
                String::from_utf8(o.stdout)
                    .ok()
                    .map(|s| s.trim().to_string())
            } else {
                None
            }
        })
        .unwrap_or_else(|| "unknown".into())
}

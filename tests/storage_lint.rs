//! Source lint: browser storage is only touched by the session module.
//!
//! Tokens must go through `TokenStore` so tests can swap in the in-memory
//! store and every read/clear is consistent with the guard.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

const ALLOWED: &[&str] = &["src/app/session.rs"];
const FORBIDDEN: &[&str] = &["local_storage", "session_storage", "localStorage"];

#[test]
fn storage_access_is_confined_to_session_module() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut violations = Vec::new();

    for entry in WalkDir::new(root.join("src"))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
    {
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");
        if ALLOWED.contains(&relative.as_str()) {
            continue;
        }
        let source = fs::read_to_string(entry.path()).unwrap();
        for (line_no, line) in source.lines().enumerate() {
            if line.trim_start().starts_with("//") {
                continue;
            }
            if FORBIDDEN.iter().any(|needle| line.contains(needle)) {
                violations.push(format!("{}:{}: {}", relative, line_no + 1, line.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Browser storage used outside the session module:\n{}",
        violations.join("\n")
    );
}

#[test]
fn token_keys_are_only_spelled_in_session_module() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    for entry in WalkDir::new(root.join("src"))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
    {
        if entry.path().ends_with("session.rs") {
            continue;
        }
        let source = fs::read_to_string(entry.path()).unwrap();
        assert!(
            !source.contains("\"token_admin\""),
            "{} spells the admin token key",
            entry.path().display()
        );
    }
}

//! Source lint: error alerts keep "retry" and "dismiss" apart.
//!
//! Refetching belongs on `on_retry`; `on_dismiss` must only hide the message,
//! otherwise a failed load can never be closed.

use std::fs;
use std::path::Path;

use regex::Regex;
use walkdir::WalkDir;

fn sources() -> Vec<(String, String)> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    WalkDir::new(root.join("src"))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .map(|e| {
            let relative = e
                .path()
                .strip_prefix(root)
                .unwrap_or(e.path())
                .to_string_lossy()
                .replace('\\', "/");
            (relative, fs::read_to_string(e.path()).unwrap())
        })
        .collect()
}

#[test]
fn dismiss_never_refetches() {
    let refetch_on_dismiss = Regex::new(r"on_dismiss:\s*move\s*\|[^|]*\|\s*\w+\.restart\(\)").unwrap();
    let violations: Vec<String> = sources()
        .iter()
        .flat_map(|(path, source)| {
            source
                .lines()
                .enumerate()
                .filter(|(_, line)| refetch_on_dismiss.is_match(line))
                .map(move |(n, line)| format!("{}:{}: {}", path, n + 1, line.trim()))
        })
        .collect();

    assert!(
        violations.is_empty(),
        "Dismiss wired to a refetch:\n{}",
        violations.join("\n")
    );
}

#[test]
fn load_failures_offer_retry() {
    let retry = Regex::new(r"ErrorAlert \{[^}]*on_retry:\s*move\s*\|_\|\s*\w+\.restart\(\)").unwrap();
    let screens = sources()
        .into_iter()
        .filter(|(path, _)| path.starts_with("src/app/pages/"))
        .filter(|(_, source)| source.contains("use_resource("))
        .collect::<Vec<_>>();

    assert!(!screens.is_empty());
    for (path, source) in screens {
        assert!(retry.is_match(&source), "{path} has no retry on its load error");
    }
}

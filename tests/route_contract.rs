//! Route table contract.
//!
//! Bookmarked and emailed links (password reset, admin pages) depend on these
//! paths. The declared routes in `src/app/mod.rs` must match
//! `tests/fixtures/routes.txt` line for line.

use std::fs;
use std::path::Path;

use regex::Regex;

fn declared_routes() -> Vec<String> {
    let source = fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join("src/app/mod.rs"))
        .expect("read src/app/mod.rs");
    let attr = Regex::new(r#"#\[(route|redirect)\("([^"]*)""#).unwrap();
    attr.captures_iter(&source)
        .map(|c| format!("{} {}", &c[1], &c[2]))
        .collect()
}

fn golden_routes() -> Vec<String> {
    fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/routes.txt"))
        .expect("read routes fixture")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[test]
fn routes_match_golden_file() {
    let declared = declared_routes();
    let golden = golden_routes();
    assert_eq!(
        declared, golden,
        "Route table changed. If intentional, update tests/fixtures/routes.txt"
    );
}

#[test]
fn catch_all_is_last() {
    let declared = declared_routes();
    assert_eq!(declared.last().map(String::as_str), Some("route /:..segments"));
}

#[test]
fn route_paths_are_unique() {
    let mut paths: Vec<_> = declared_routes()
        .into_iter()
        .filter_map(|r| r.split_once(' ').map(|(_, p)| p.to_string()))
        .collect();
    let total = paths.len();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), total, "duplicate route path");
}

#[test]
fn routes_render_to_their_paths() {
    use riad_booking::app::Route;

    assert_eq!(Route::AdminRiads {}.to_string(), "/listRiads");
    assert_eq!(Route::RiadDetail { id: 4 }.to_string(), "/riad/4");
    assert_eq!(Route::EditUser { user_id: 12 }.to_string(), "/edit-user/12");
    assert_eq!(Route::UserDetail { user_id: 3 }.to_string(), "/users/3");
}

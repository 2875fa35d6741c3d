mod common;

use common::{resolved, table, translate};
use indoc::indoc;
use rstest::rstest;
use viewmap::mapping::{CaseMode, Direction, MapError, MapFlag, MapTable};

// ========================================
// Basic views
// ========================================

#[rstest]
#[case::nested("//depot/foo/bar", Some("//client/foo/bar"))]
#[case::top_level_file("//depot/readme", Some("//client/readme"))]
#[case::other_depot("//other/foo", None)]
#[case::depot_root_itself("//depot", None)]
fn whole_depot_view(#[case] path: &str, #[case] expected: Option<&str>) {
    let t = resolved("//depot/... //client/...");
    assert_eq!(translate(&t, Direction::Lhs, path).as_deref(), expected);
}

#[rstest]
#[case::secret_excluded("//depot/secret/x", None)]
#[case::public_mapped("//depot/public/x", Some("//client/public/x"))]
#[case::secret_prefix_is_not_secret_dir("//depot/secretive/x", Some("//client/secretive/x"))]
fn exclusion_before_mapping(#[case] path: &str, #[case] expected: Option<&str>) {
    let t = resolved(indoc! {"
        -//depot/secret/... //client/secret/...
        //depot/... //client/...
    "});
    assert_eq!(translate(&t, Direction::Lhs, path).as_deref(), expected);
}

#[test]
fn exclusion_after_mapping_excludes_too() {
    let t = resolved(indoc! {"
        //depot/... //client/...
        -//depot/secret/... //client/secret/...
    "});
    assert_eq!(translate(&t, Direction::Lhs, "//depot/secret/x"), None);
    assert_eq!(
        translate(&t, Direction::Lhs, "//depot/public/x").as_deref(),
        Some("//client/public/x")
    );
}

#[test]
fn overlay_reinstates_excluded_region() {
    let t = resolved(indoc! {"
        //depot/... //client/...
        -//depot/vendor/... //client/vendor/...
        +//depot/vendor/keep/... //client/third_party/...
    "});
    assert_eq!(translate(&t, Direction::Lhs, "//depot/vendor/drop/a"), None);
    assert_eq!(
        translate(&t, Direction::Lhs, "//depot/vendor/keep/a").as_deref(),
        Some("//client/third_party/a")
    );
    assert_eq!(
        translate(&t, Direction::Rhs, "//client/third_party/a").as_deref(),
        Some("//depot/vendor/keep/a")
    );
}

// ========================================
// Ditto mappings
// ========================================

#[test]
fn explode_returns_every_ditto_translation() {
    let t = resolved(indoc! {"
        &//depot/file //client/a/file
        //depot/file //client/deep/file
    "});
    let all = t.explode(Direction::Lhs, "//depot/file").unwrap();
    assert_eq!(all.len(), 2);

    let paths: Vec<&str> = all.iter().map(|tr| tr.path.as_str()).collect();
    assert_eq!(paths, vec!["//client/deep/file", "//client/a/file"]);
    assert_eq!(all.iter().filter(|tr| tr.is_read_only()).count(), 1);
    assert!(all[1].is_read_only());
    assert_eq!(all[1].rule.flag(), MapFlag::Andmap);
}

#[test]
fn translate_prefers_the_writable_mapping() {
    let t = resolved(indoc! {"
        &//depot/file //client/a/file
        //depot/file //client/deep/file
    "});
    let tr = t.translate(Direction::Lhs, "//depot/file").unwrap().unwrap();
    assert_eq!(tr.path, "//client/deep/file");
    assert!(!tr.is_read_only());
}

#[test]
fn ditto_rows_map_back_individually() {
    let t = resolved(indoc! {"
        //depot/file //client/deep/file
        &//depot/file //client/a/file
    "});
    assert_eq!(
        translate(&t, Direction::Rhs, "//client/a/file").as_deref(),
        Some("//depot/file")
    );
    assert_eq!(
        translate(&t, Direction::Rhs, "//client/deep/file").as_deref(),
        Some("//depot/file")
    );
}

// ========================================
// Wildcards
// ========================================

#[rstest]
#[case::positional_swap("//depot/%%1/%%2 //client/%%2/%%1", "//depot/a/b", Some("//client/b/a"))]
#[case::positional_stays_in_component("//depot/%%1/%%2 //client/%%2/%%1", "//depot/a/b/c", None)]
#[case::star_one_component("//depot/*.c //client/src/*.c", "//depot/main.c", Some("//client/src/main.c"))]
#[case::star_stops_at_slash("//depot/*.c //client/src/*.c", "//depot/lib/main.c", None)]
#[case::dots_reordered_with_star(
    "//depot/.../*.h //client/headers/*.h/...",
    "//depot/a/b/x.h",
    Some("//client/headers/x.h/a/b")
)]
#[case::dots_in_the_middle(
    "//depot/.../bin/... //client/bins/.../...",
    "//depot/x/bin/tool",
    Some("//client/bins/x/tool")
)]
fn wildcard_rewrites(#[case] view: &str, #[case] path: &str, #[case] expected: Option<&str>) {
    let t = resolved(view);
    assert_eq!(translate(&t, Direction::Lhs, path).as_deref(), expected);
}

#[test]
fn empty_translation_is_distinct_from_no_match() {
    let t = resolved("//depot/... ...");
    let hit = t.explode(Direction::Lhs, "//depot/").unwrap();
    assert_eq!(hit.len(), 1);
    assert_eq!(hit[0].path, "");
    assert!(t.explode(Direction::Lhs, "//other/").unwrap().is_empty());
}

// ========================================
// Case handling
// ========================================

#[rstest]
#[case::insensitive(CaseMode::Insensitive, Some("//client/Src/main.c"))]
#[case::sensitive(CaseMode::Sensitive, None)]
#[case::default_is_sensitive(CaseMode::Default, None)]
fn case_mode_controls_literal_matching(#[case] case: CaseMode, #[case] expected: Option<&str>) {
    let mut t = table("//sentrysuite/... //client/...");
    t.set_case_mode(case);
    let t = t.disambiguate();
    assert_eq!(
        translate(&t, Direction::Lhs, "//SentrySuite/Src/main.c").as_deref(),
        expected
    );
}

#[rstest]
#[case::legacy_insensitive(0, Some("//client/x"))]
#[case::legacy_sensitive(1, None)]
fn legacy_case_codes(#[case] code: i32, #[case] expected: Option<&str>) {
    let mut t = table("//sentrysuite/... //client/...");
    t.set_case_sensitivity(code);
    let t = t.disambiguate();
    assert_eq!(translate(&t, Direction::Lhs, "//SENTRYSUITE/x").as_deref(), expected);
}

#[test]
fn uninterpretable_path_is_an_error_not_a_miss() {
    let mut t = table("//depot/... //client/...");
    t.set_case_mode(CaseMode::Insensitive);
    let t = t.disambiguate();
    let err = t.translate(Direction::Lhs, "//depot/\u{130}").unwrap_err();
    assert!(matches!(err, MapError::InvalidPath { position: 8, .. }));
}

// ========================================
// Loading
// ========================================

#[test]
fn load_is_all_or_nothing() {
    let mut t = table("//depot/... //client/...");
    let err = t
        .load(indoc! {"
            //depot/a/... //client/a/...
            //depot/%%1 //client/%%2
        "})
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "line 2: wildcard mismatch between '//depot/%%1' and '//client/%%2'"
    );
    assert_eq!(t.len(), 1);
}

#[test]
fn validate_does_not_touch_the_table() {
    let t = MapTable::new();
    assert!(t.validate("//depot/...", "//client/*").is_err());
    assert!(t.validate("//depot/...", "//client/...").is_ok());
    assert!(t.is_empty());
}

#[test]
fn quoted_paths_with_spaces() {
    let t = resolved(r#""//depot/My Docs/..." "//client/my docs/...""#);
    assert_eq!(
        translate(&t, Direction::Lhs, "//depot/My Docs/a.txt").as_deref(),
        Some("//client/my docs/a.txt")
    );
}

use super::{rows, table, translate};

use indoc::indoc;
use rstest::rstest;
use viewmap::mapping::{Direction, JoinOp, MapFlag, ResolvedMapTable};

const CLIENT: &str = indoc! {"
    //depot/... //client/...
    -//depot/tmp/... //client/tmp/...
"};

// ========================================
// Join composes namespaces
// ========================================

#[test]
fn join_chains_depot_to_local_paths() {
    let client = table(CLIENT);
    let local = table("//client/... /home/me/ws/...");
    let joined = client.join(Direction::Rhs, &local, Direction::Lhs);

    assert_eq!(
        rows(&joined),
        vec![
            "//depot/... /home/me/ws/...",
            "-//depot/tmp/... /home/me/ws/tmp/...",
        ]
    );
    let t = joined.disambiguate();
    assert_eq!(
        translate(&t, Direction::Lhs, "//depot/src/lib.rs").as_deref(),
        Some("/home/me/ws/src/lib.rs")
    );
    assert_eq!(translate(&t, Direction::Lhs, "//depot/tmp/x"), None);
    assert_eq!(
        translate(&t, Direction::Rhs, "/home/me/ws/src/lib.rs").as_deref(),
        Some("//depot/src/lib.rs")
    );
}

#[rstest]
#[case::plain("//depot/a/b", Some("/local/a/b"))]
#[case::top("//depot/readme", Some("/local/readme"))]
#[case::excluded("//depot/tmp/x", None)]
#[case::outside("//other/x", None)]
fn join_is_nearly_associative(#[case] path: &str, #[case] expected: Option<&str>) {
    let a = table(CLIENT);
    let b = table("//client/... //ws/...");
    let c = table("//ws/... /local/...");

    let left = a
        .join(Direction::Rhs, &b, Direction::Lhs)
        .join(Direction::Rhs, &c, Direction::Lhs)
        .disambiguate();
    let right = a
        .join(Direction::Rhs, &b.join(Direction::Rhs, &c, Direction::Lhs), Direction::Lhs)
        .disambiguate();

    assert_eq!(translate(&left, Direction::Lhs, path).as_deref(), expected);
    assert_eq!(translate(&right, Direction::Lhs, path).as_deref(), expected);
}

#[test]
fn join_keeps_one_row_per_overlap() {
    let a = table("//depot/... //client/...");
    let b = table(indoc! {"
        //client/x/... //ws/x/...
        &//client/x/... //mirror/x/...
    "});
    let joined = a.join(Direction::Rhs, &b, Direction::Lhs);
    assert_eq!(
        rows(&joined),
        vec!["//depot/x/... //ws/x/...", "&//depot/x/... //mirror/x/..."]
    );

    let all = joined
        .disambiguate()
        .explode(Direction::Lhs, "//depot/x/y")
        .unwrap()
        .into_iter()
        .map(|tr| (tr.path.clone(), tr.is_read_only()))
        .collect::<Vec<_>>();
    assert_eq!(
        all,
        vec![
            ("//ws/x/y".to_string(), false),
            ("//mirror/x/y".to_string(), true),
        ]
    );
}

// ========================================
// Join translates like chained lookups
// ========================================

const MIXED_A: &str = indoc! {"
    //d/... //c/...
    -//d/tmp/... //c/tmp/...
    +//d/tmp/keep/... //c/keep/...
    &//d/docs/index //c/index
"};

const MIXED_B: &str = indoc! {"
    //c/... //L/...
    -//c/keep/old/... //L/keep/old/...
    +//c/index //L/idx
"};

const CHAIN_PATHS: &[&str] = &[
    "//d/a/b",
    "//d/f",
    "//d/x",
    "//d/x/y",
    "//d/tmp/z",
    "//d/tmp/keep/n",
    "//d/tmp/keep/old/n",
    "//d/keep/old/n",
    "//d/docs/index",
    "//d/index",
    "//e/z",
];

fn exploded(t: &ResolvedMapTable, path: &str) -> Vec<String> {
    t.explode(Direction::Lhs, path)
        .unwrap()
        .into_iter()
        .map(|tr| tr.path)
        .collect()
}

#[rstest]
#[case::overlay_over_exclusion("+//d/... //c/...", "-//c/x/... //L/x/...\n//c/... //L/...")]
#[case::overlay_under_exclusion("+//d/... //c/...", "//c/... //L/...\n-//c/x/... //L/x/...")]
#[case::ditto_over_exclusion("&//d/f //c/f", "-//c/f\n//c/... //L/...")]
#[case::ditto_under_exclusion("&//d/f //c/f", "//c/... //L/...\n-//c/f")]
#[case::ditto_through_map("&//d/f //c/f", "//c/... //L/...")]
#[case::mixed(MIXED_A, MIXED_B)]
fn join_translates_like_chained_lookups(#[case] a: &str, #[case] b: &str) {
    let (a, b) = (table(a), table(b));
    let joined = a.join(Direction::Rhs, &b, Direction::Lhs).disambiguate();
    let (a, b) = (a.disambiguate(), b.disambiguate());

    for path in CHAIN_PATHS {
        let chained = translate(&a, Direction::Lhs, path)
            .and_then(|mid| translate(&b, Direction::Lhs, &mid));
        assert_eq!(translate(&joined, Direction::Lhs, path), chained, "translate {path}");

        let chained_all: Vec<String> = exploded(&a, path)
            .iter()
            .flat_map(|mid| exploded(&b, mid))
            .collect();
        assert_eq!(exploded(&joined, path), chained_all, "explode {path}");
    }
}

// ========================================
// Restrict narrows a view
// ========================================

#[test]
fn restrict_narrows_to_filter() {
    let client = table(indoc! {"
        //depot/... //client/...
        -//depot/foo/tmp/... //client/foo/tmp/...
    "});
    let filter = table(indoc! {"
        //depot/foo/...
        //depot/bar/baz.c
    "});
    let narrowed = client.restrict(Direction::Lhs, &filter, Direction::Lhs);

    assert_eq!(
        rows(&narrowed),
        vec![
            "//depot/foo/... //client/foo/...",
            "//depot/bar/baz.c //client/bar/baz.c",
            "-//depot/foo/tmp/... //client/foo/tmp/...",
        ]
    );
    assert!(!narrowed.join_error());

    let t = narrowed.disambiguate();
    for (path, expected) in [
        ("//depot/foo/a", Some("//client/foo/a")),
        ("//depot/foo/tmp/a", None),
        ("//depot/bar/baz.c", Some("//client/bar/baz.c")),
        ("//depot/bar/other.c", None),
        ("//depot/qux", None),
    ] {
        assert_eq!(translate(&t, Direction::Lhs, path).as_deref(), expected, "{path}");
    }
}

#[test]
fn composed_rows_keep_left_ordinals() {
    let client = table(indoc! {"
        //depot/a/... //client/a/...
        //depot/b/... //client/b/...
    "});
    let filter = table("//depot/...");
    let narrowed = client.restrict(Direction::Lhs, &filter, Direction::Lhs);
    let ordinals: Vec<usize> = narrowed.items().iter().map(|i| i.ordinal()).collect();
    assert_eq!(ordinals, vec![0, 1]);
}

#[rstest]
#[case::map_map("//depot/... //client/...", MapFlag::Map)]
#[case::map_remap("+//depot/... //client/...", MapFlag::Remap)]
#[case::map_andmap("&//depot/... //client/...", MapFlag::Andmap)]
#[case::map_unmap("-//depot/... //client/...", MapFlag::Unmap)]
fn composed_flag_is_most_restrictive(#[case] other: &str, #[case] expected: MapFlag) {
    let a = table("//src/... //depot/...");
    let b = table(other);
    let joined = a.join(Direction::Rhs, &b, Direction::Lhs);
    assert_eq!(joined.len(), 1);
    assert_eq!(joined.items()[0].flag(), expected);
}

// ========================================
// Empty compositions
// ========================================

#[test]
fn empty_restrict_reports_reason() {
    let client = table(CLIENT);
    let filter = table("//elsewhere/...");
    let narrowed = client.restrict(Direction::Lhs, &filter, Direction::Lhs);

    assert!(narrowed.join_error());
    assert_eq!(
        narrowed.empty_reason(),
        Some("restrict LHS:LHS has no overlapping rules")
    );
    assert_eq!(
        narrowed.dump("narrowed"),
        "narrowed: 0 items, joinError true, emptyReason restrict LHS:LHS has no overlapping rules\n"
    );
    let t = narrowed.disambiguate();
    assert_eq!(translate(&t, Direction::Lhs, "//depot/a"), None);
}

#[test]
fn empty_reason_is_inherited_from_empty_operand() {
    let client = table(CLIENT);
    let empty = client.compose(
        JoinOp::Restrict,
        Direction::Lhs,
        &table("//elsewhere/..."),
        Direction::Lhs,
        Some("no files selected"),
    );
    assert_eq!(empty.empty_reason(), Some("no files selected"));

    let downstream = empty.join(Direction::Rhs, &table("//client/... //ws/..."), Direction::Lhs);
    assert!(downstream.join_error());
    assert_eq!(downstream.empty_reason(), Some("no files selected"));
}

#[test]
fn exclusions_only_count_as_empty() {
    let client = table(indoc! {"
        -//depot/tmp/... //client/tmp/...
        //depot/a/... //client/a/...
    "});
    let filter = table("//depot/tmp/x/...");
    let narrowed = client.restrict(Direction::Lhs, &filter, Direction::Lhs);
    assert!(narrowed.join_error());
    assert!(!narrowed.is_empty());
    assert!(!narrowed.has_maps());
}

#[test]
fn operands_are_not_modified() {
    let a = table(CLIENT);
    let b = table("//client/... //ws/...");
    let (a_before, b_before) = (a.clone(), b.clone());
    let _ = a.join(Direction::Rhs, &b, Direction::Lhs);
    let _ = a.restrict(Direction::Lhs, &b, Direction::Rhs);
    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

#[test]
fn join_check_probes_single_paths() {
    let client = table(CLIENT);
    assert!(client.join_check(Direction::Lhs, "//depot/a/b"));
    assert!(!client.join_check(Direction::Lhs, "//other/a"));
    assert!(client.join_check(Direction::Rhs, "//client/a"));
    assert!(!client.join_check(Direction::Rhs, "//depot/a"));
}

use super::{table, translate};

use indoc::indoc;
use rstest::rstest;
use viewmap::mapping::Direction;

const VIEW: &str = indoc! {"
    //depot/... //client/...
    -//depot/secret/... //client/secret/...
    +//depot/secret/ok/... //client/ok/...
    //depot/%%1/%%2.c //client/src/%%2/%%1.c
    &//depot/docs/index //client/index
"};

// ========================================
// Round trip through the swapped table
// ========================================

#[rstest]
#[case::plain("//depot/a/b")]
#[case::top_level("//depot/top")]
#[case::overlay("//depot/secret/ok/y")]
#[case::docs("//depot/docs/index")]
fn round_trip_through_swapped_table(#[case] path: &str) {
    let forward = table(VIEW).disambiguate();
    let backward = table(VIEW).swap().disambiguate();

    let there = translate(&forward, Direction::Lhs, path).unwrap();
    assert_eq!(translate(&backward, Direction::Lhs, &there).as_deref(), Some(path));
    assert_eq!(translate(&forward, Direction::Rhs, &there).as_deref(), Some(path));
}

#[test]
fn swapped_table_keeps_flags() {
    let raw = table(VIEW);
    let flags: Vec<_> = raw.items().iter().map(|i| i.flag()).collect();
    let swapped: Vec<_> = raw.swap().items().iter().map(|i| i.flag()).collect();
    assert_eq!(flags, swapped);
}

// ========================================
// Disambiguation is idempotent
// ========================================

#[test]
fn disambiguate_twice_gives_same_active_set_and_trees() {
    let raw = table(VIEW);
    let first = raw.disambiguate();
    let second = raw.disambiguate();
    assert_eq!(first, second);

    let again = first.clone().into_table().disambiguate();
    assert_eq!(first.rows(), again.rows());
    for dir in [Direction::Lhs, Direction::Rhs] {
        assert_eq!(first.tree(dir), again.tree(dir));
        assert_eq!(first.dump_tree(dir), again.dump_tree(dir));
    }
}

#[test]
fn disambiguate_leaves_raw_table_untouched() {
    let raw = table(VIEW);
    let before = raw.clone();
    let _ = raw.disambiguate();
    assert_eq!(raw, before);
}

// ========================================
// Explode contains translate
// ========================================

#[rstest]
#[case::view(VIEW)]
#[case::ditto_only(indoc! {"
    -//depot/f //client/f
    &//depot/f //client/g
    &//depot/... //mirror/...
"})]
#[case::overlapping(indoc! {"
    //depot/a/... //one/...
    //depot/... //two/...
    &//depot/a/b //three/b
"})]
fn explode_starts_with_translate(#[case] view: &str) {
    let t = table(view).disambiguate();
    for path in [
        "//depot/a/b",
        "//depot/f",
        "//depot/secret/x",
        "//depot/secret/ok/y",
        "//depot/docs/index",
        "//depot/x/y.c",
        "//nowhere/z",
    ] {
        let single = t.translate(Direction::Lhs, path).unwrap();
        let all = t.explode(Direction::Lhs, path).unwrap();
        match single {
            Some(single) => assert_eq!(all.first(), Some(&single), "path {path}"),
            None => assert!(all.is_empty(), "path {path}"),
        }
    }
}

#[test]
fn explode_orders_dittos_by_precedence() {
    let t = table(indoc! {"
        &//depot/a/b //three/b
        //depot/a/... //one/...
        &//depot/... //mirror/...
    "})
    .disambiguate();
    let paths: Vec<String> = t
        .explode(Direction::Lhs, "//depot/a/b")
        .unwrap()
        .into_iter()
        .map(|tr| tr.path)
        .collect();
    assert_eq!(paths, vec!["//one/b", "//three/b", "//mirror/a/b"]);
}

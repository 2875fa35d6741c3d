use viewmap::mapping::{Direction, MapTable, ResolvedMapTable};

pub fn table(text: &str) -> MapTable {
    MapTable::parse(text).unwrap()
}

pub fn resolved(text: &str) -> ResolvedMapTable {
    table(text).disambiguate()
}

/// Translated path only, `None` when nothing maps.
pub fn translate(t: &ResolvedMapTable, dir: Direction, path: &str) -> Option<String> {
    t.translate(dir, path).unwrap().map(|tr| tr.path)
}

/// `Display` form of every row, in table order.
pub fn rows(t: &MapTable) -> Vec<String> {
    t.items().iter().map(ToString::to_string).collect()
}

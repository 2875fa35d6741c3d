mod composition_algebra;
mod translation_properties;

use viewmap::mapping::{Direction, MapTable, ResolvedMapTable};

fn table(text: &str) -> MapTable {
    MapTable::parse(text).unwrap()
}

fn translate(t: &ResolvedMapTable, dir: Direction, path: &str) -> Option<String> {
    t.translate(dir, path).unwrap().map(|tr| tr.path)
}

fn rows(t: &MapTable) -> Vec<String> {
    t.items().iter().map(ToString::to_string).collect()
}

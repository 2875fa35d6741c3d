pub mod disambiguate;
mod error;
pub mod join;
pub mod map_item;
pub mod map_table;
pub mod map_tree;
pub mod pattern;
pub mod pattern_join;
pub mod pattern_lexer;
pub mod pattern_matcher;
pub mod resolved;
pub mod view_parser;

pub use error::*;
pub use join::JoinOp;
pub use map_item::{Direction, MapFlag, MapItem};
pub use map_table::{MapTable, valid_depot_map};
pub use pattern::CaseMode;
pub use resolved::{ProbeString, ResolvedMapTable, Translation};

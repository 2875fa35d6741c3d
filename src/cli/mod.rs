mod command;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::mapping::{CaseMode, Direction};

pub use command::run;

#[derive(Parser)]
#[command(name = "viewmap", version, about)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Cli {
    /// Config file to use instead of ./viewmap.yml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured case handling
    #[arg(long, global = true, value_enum)]
    pub case: Option<CaseArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub enum Commands {
    /// Translate paths through a view
    Translate(TranslateArgs),
    /// Print the rules of a view
    Dump(DumpArgs),
    /// Validate a view file
    Check(CheckArgs),
}

#[derive(clap::Args)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct TranslateArgs {
    /// View name from the config
    pub view: String,

    /// Paths to translate
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Translate right to left
    #[arg(long)]
    pub reverse: bool,

    /// Print every translation, including read-only ones
    #[arg(long)]
    pub explode: bool,

    /// Print one JSON object per path
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct DumpArgs {
    /// View name from the config
    pub view: String,

    /// Dump the disambiguated rules
    #[arg(long)]
    pub resolved: bool,

    /// Also dump the lookup tree for one side (lhs or rhs)
    #[arg(long)]
    pub tree: Option<Direction>,

    /// Also dump the probe strings for one side (lhs or rhs)
    #[arg(long)]
    pub strings: Option<Direction>,
}

#[derive(clap::Args)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct CheckArgs {
    /// File holding raw view text
    pub file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CaseArg {
    Insensitive,
    Sensitive,
}

impl From<CaseArg> for CaseMode {
    fn from(arg: CaseArg) -> Self {
        match arg {
            CaseArg::Insensitive => CaseMode::Insensitive,
            CaseArg::Sensitive => CaseMode::Sensitive,
        }
    }
}

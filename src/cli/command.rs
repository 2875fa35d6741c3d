use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::catalog::ViewCatalog;
use crate::config::ConfigLoader;
use crate::mapping::{CaseMode, Direction, MapTable, ResolvedMapTable, Translation};

use super::{CheckArgs, Cli, Commands, DumpArgs, TranslateArgs};

/// Exit code when a path did not translate.
const EXIT_UNMAPPED: u8 = 1;

#[derive(Serialize)]
struct TranslateRecord<'a> {
    path: &'a str,
    translations: Vec<TranslationRecord>,
}

#[derive(Serialize)]
struct TranslationRecord {
    path: String,
    rule: String,
    read_only: bool,
}

impl From<&Translation<'_>> for TranslationRecord {
    fn from(t: &Translation<'_>) -> Self {
        Self {
            path: t.path.clone(),
            rule: t.rule.to_string(),
            read_only: t.is_read_only(),
        }
    }
}

/// Execute one command, writing its report to `out`. Returns the process
/// exit code for a run that completed.
pub fn run(
    cli: &Cli,
    loader: &impl ConfigLoader,
    cwd: &Path,
    out: &mut impl Write,
) -> Result<u8, anyhow::Error> {
    let case = cli.case.map(CaseMode::from);
    match &cli.command {
        Commands::Translate(args) => {
            let table = load_view(loader, cwd, case, &args.view)?;
            translate(&table.disambiguate(), args, out)
        }
        Commands::Dump(args) => {
            let table = load_view(loader, cwd, case, &args.view)?;
            dump(&table, args, out)?;
            Ok(0)
        }
        Commands::Check(args) => {
            check(args, case.unwrap_or_default(), out)?;
            Ok(0)
        }
    }
}

fn load_view(
    loader: &impl ConfigLoader,
    cwd: &Path,
    case: Option<CaseMode>,
    view: &str,
) -> Result<MapTable, anyhow::Error> {
    let mut config = loader
        .load(cwd)
        .map_err(describe("config error".to_string()))?;
    if case.is_some() {
        config.case = case;
    }
    let catalog = ViewCatalog::build(&config)?;
    Ok(catalog.get(view)?.clone())
}

fn translate(
    resolved: &ResolvedMapTable,
    args: &TranslateArgs,
    out: &mut impl Write,
) -> Result<u8, anyhow::Error> {
    let dir = if args.reverse {
        Direction::Rhs
    } else {
        Direction::Lhs
    };

    let mut exit = 0;
    for path in &args.paths {
        let found = if args.explode {
            resolved.explode(dir, path)?
        } else {
            resolved.translate(dir, path)?.into_iter().collect()
        };
        if found.is_empty() {
            exit = EXIT_UNMAPPED;
        }

        if args.json {
            let record = TranslateRecord {
                path,
                translations: found.iter().map(TranslationRecord::from).collect(),
            };
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
            continue;
        }
        if found.is_empty() {
            writeln!(out, "{path} -> ")?;
        }
        for t in &found {
            let suffix = if t.is_read_only() { " (readonly)" } else { "" };
            writeln!(out, "{path} -> {}{suffix}", t.path)?;
        }
    }
    Ok(exit)
}

fn dump(table: &MapTable, args: &DumpArgs, out: &mut impl Write) -> Result<(), anyhow::Error> {
    if !args.resolved && args.tree.is_none() && args.strings.is_none() {
        write!(out, "{}", table.dump(&args.view))?;
        return Ok(());
    }

    let resolved = table.disambiguate();
    if args.resolved {
        write!(out, "{}", resolved.dump(&args.view))?;
    } else {
        write!(out, "{}", table.dump(&args.view))?;
    }
    if let Some(dir) = args.tree {
        write!(out, "{}", resolved.dump_tree(dir))?;
    }
    if let Some(dir) = args.strings {
        write!(out, "{}", resolved.dump_strings(dir))?;
    }
    Ok(())
}

fn check(args: &CheckArgs, case: CaseMode, out: &mut impl Write) -> Result<(), anyhow::Error> {
    let text = std::fs::read_to_string(&args.file)
        .map_err(describe(format!("cannot read {}", args.file.display())))?;
    let mut table = MapTable::with_case(case);
    table
        .load(&text)
        .map_err(describe(format!("invalid view {}", args.file.display())))?;
    write!(out, "{}", table.dump(&args.file.display().to_string()))?;
    Ok(())
}

/// Prefix `err` with `what` while keeping it as the source.
fn describe<E>(what: String) -> impl FnOnce(E) -> anyhow::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |err| {
        let message = format!("{what}: {err}");
        anyhow::Error::new(err).context(message)
    }
}

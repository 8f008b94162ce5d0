//! `roster`: browse, filter and page through a student roster.

mod args;
mod logger;
mod output;

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info};
use roster::{
    dataset, EditOutcome, MemoryStore, PageResult, PageSize, QueryEngine, RosterConfig, Session,
    SourceConfig, SqliteStore, Store,
};
use serde::Serialize;

use crate::args::{Cli, Command, FilterArgs};
use crate::output::{
    render_details, render_facets, render_page, serialize_structured, OutputFormat,
};

/// A page as printed by `list` in a structured format.
#[derive(Serialize)]
struct Listing<'a> {
    #[serde(flatten)]
    page: &'a PageResult,
    summary: String,
}

#[derive(Serialize)]
struct Count {
    total: usize,
    active_filters: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => RosterConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RosterConfig::default(),
    };
    debug!("config: {config:?}");

    let mut stdout = io::stdout().lock();
    run(&cli, &config, &mut stdout)
}

fn run(cli: &Cli, config: &RosterConfig, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Command::List {
            filter,
            page,
            page_size,
        } => {
            let page_size = match page_size {
                Some(size) => *size,
                None => config.page_size,
            };
            check_page_size(config, page_size)?;
            let mut session = open_session(cli, config, page_size, filter)?;
            session.goto_page(*page)?;
            let summary = session.summary();
            match cli.output {
                OutputFormat::Text => write!(out, "{}", render_page(session.current(), &summary))?,
                OutputFormat::Csv => emit(out, &session.current().records, cli.output)?,
                format => emit(
                    out,
                    &Listing {
                        page: session.current(),
                        summary: summary.label(),
                    },
                    format,
                )?,
            }
        }

        Command::Count { filter } => {
            let session = open_session(cli, config, config.page_size, filter)?;
            let summary = session.summary();
            match cli.output {
                OutputFormat::Text => writeln!(out, "{summary}")?,
                format => emit(
                    out,
                    &Count {
                        total: summary.total,
                        active_filters: summary.active_filters,
                    },
                    format,
                )?,
            }
        }

        Command::Facets => {
            let engine = QueryEngine::new(open_store(cli, config)?);
            let facets = engine.facets()?;
            match cli.output {
                OutputFormat::Text => write!(out, "{}", render_facets(&facets))?,
                format => emit(out, &facets, format)?,
            }
        }

        Command::Show { lrn, filter } => {
            let session = open_session(cli, config, PageSize::All, filter)?;
            let Some(student) = session.find_by_lrn(lrn)? else {
                bail!("no student with LRN {lrn} matches");
            };
            match cli.output {
                OutputFormat::Text => write!(out, "{}", render_details(&student))?,
                format => emit(out, &student, format)?,
            }
        }

        Command::Print { lrns, filter } => {
            let session = open_session(cli, config, PageSize::All, filter)?;
            let lrns: Vec<&str> = lrns.iter().map(String::as_str).collect();
            let lines = session.export_lines(&lrns)?;
            if lines.len() < lrns.len() {
                info!("{} of {} selected students matched", lines.len(), lrns.len());
            }
            match cli.output {
                OutputFormat::Text => {
                    for line in &lines {
                        writeln!(out, "{line}")?;
                    }
                }
                format => emit(out, &lines, format)?,
            }
        }

        Command::Import { file, into } => {
            let target = import_target(cli, config, into.as_ref())?;
            let students = dataset::read_csv_path(file)
                .with_context(|| format!("reading {}", file.display()))?;
            let mut store = SqliteStore::open(&target)
                .with_context(|| format!("opening {}", target.display()))?;
            let inserted = store.insert_students(&students)?;
            info!("imported {inserted} students into {}", target.display());
            writeln!(out, "Imported {inserted} students into {}", target.display())?;
        }

        Command::Export { filter, out: path } => {
            let session = open_session(cli, config, PageSize::All, filter)?;
            let students = session.current().records.clone();
            match path {
                Some(path) => {
                    let file = File::create(path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    dataset::write_csv(file, &students)?;
                    info!("exported {} students to {}", students.len(), path.display());
                }
                None => dataset::write_csv(&mut *out, &students)?,
            }
        }
    }
    Ok(())
}

fn emit<T: Serialize>(out: &mut impl Write, data: &T, format: OutputFormat) -> Result<()> {
    let text = serialize_structured(data, format)?;
    write!(out, "{text}")?;
    if !text.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

fn check_page_size(config: &RosterConfig, page_size: PageSize) -> Result<()> {
    let choices = config.page_size_choices();
    match page_size {
        PageSize::Rows(n) if !choices.contains(&n) => {
            bail!("page size {n} is not one of {choices:?} or \"all\"")
        }
        _ => Ok(()),
    }
}

fn source(cli: &Cli, config: &RosterConfig) -> SourceConfig {
    cli.source().unwrap_or_else(|| config.source.clone())
}

fn open_store(cli: &Cli, config: &RosterConfig) -> Result<Box<dyn Store>> {
    let store: Box<dyn Store> = match source(cli, config) {
        SourceConfig::Sqlite(path) => Box::new(
            SqliteStore::open(&path).with_context(|| format!("opening {}", path.display()))?,
        ),
        SourceConfig::Csv(path) => {
            let students = dataset::read_csv_path(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            Box::new(MemoryStore::new(students)?)
        }
        SourceConfig::Sample(count) => {
            let seed = cli.seed.unwrap_or(config.seed);
            debug!("generating {count} students with seed {seed}");
            Box::new(MemoryStore::new(dataset::generate(count, seed))?)
        }
    };
    Ok(store)
}

/// Opens the source, applies the filter flags over the reset criteria and
/// fetches page 1.
fn open_session(
    cli: &Cli,
    config: &RosterConfig,
    page_size: PageSize,
    filter: &FilterArgs,
) -> Result<Session<Box<dyn Store>>> {
    let engine = QueryEngine::new(open_store(cli, config)?);
    let mut session = Session::new(engine, page_size)?;
    let criteria = filter.apply(session.criteria().clone());
    session.apply_edit(EditOutcome::Applied(criteria))?;
    Ok(session)
}

fn import_target(cli: &Cli, config: &RosterConfig, into: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(path) = into.or(cli.db.as_ref()) {
        return Ok(path.clone());
    }
    match &config.source {
        SourceConfig::Sqlite(path) => Ok(path.clone()),
        _ => bail!("no database to import into; pass --into or --db"),
    }
}

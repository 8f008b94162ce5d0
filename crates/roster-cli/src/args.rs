//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use roster::{FilterCriteria, PageSize, SourceConfig};

use crate::output::OutputFormat;

/// Browse, filter and page through a student roster.
#[derive(Debug, Parser)]
#[command(name = "roster", version, about)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read students from a SQLite database
    #[arg(long, global = true, value_name = "FILE", group = "source")]
    pub db: Option<PathBuf>,

    /// Read students from a CSV file
    #[arg(long, global = true, value_name = "FILE", group = "source")]
    pub csv: Option<PathBuf>,

    /// Use a generated sample of this many students
    #[arg(long, global = true, value_name = "COUNT", group = "source")]
    pub sample: Option<usize>,

    /// Seed for the generated sample
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// More log output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The source chosen on the command line, if any.
    pub fn source(&self) -> Option<SourceConfig> {
        if let Some(path) = &self.db {
            Some(SourceConfig::Sqlite(path.clone()))
        } else if let Some(path) = &self.csv {
            Some(SourceConfig::Csv(path.clone()))
        } else {
            self.sample.map(SourceConfig::Sample)
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show one page of matching students
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Rows per page, or "all"
        #[arg(short = 's', long, value_name = "ROWS")]
        page_size: Option<PageSize>,
    },

    /// Count matching students
    Count {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List grade levels, sections, tracks and the age range
    Facets,

    /// Show one student's details
    Show {
        /// Learner reference number
        lrn: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print "LRN, Name" lines for selected students
    Print {
        /// Learner reference numbers, in print order
        #[arg(required = true)]
        lrns: Vec<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Load a CSV file into a SQLite database
    Import {
        /// CSV file with a header row
        file: PathBuf,

        /// Target database (defaults to --db or the configured database)
        #[arg(long, value_name = "FILE")]
        into: Option<PathBuf>,
    },

    /// Write matching students as CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output file (defaults to stdout)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

/// Which sexes to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SexFilter {
    Both,
    Male,
    Female,
    #[value(name = "none")]
    Neither,
}

/// Filters shared by the record commands.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Free text matched against LRN and names
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    #[arg(long, value_name = "TEXT")]
    pub first_name: Option<String>,

    #[arg(long, value_name = "TEXT")]
    pub last_name: Option<String>,

    #[arg(long, value_name = "TEXT")]
    pub middle_name: Option<String>,

    /// Match only the first letter of --middle-name
    #[arg(long)]
    pub initial_only: bool,

    #[arg(long, value_name = "GRADE")]
    pub grade: Option<String>,

    #[arg(long)]
    pub section: Option<String>,

    #[arg(long, value_name = "TRACK")]
    pub track: Option<String>,

    #[arg(long, value_enum)]
    pub sex: Option<SexFilter>,

    #[arg(long, value_name = "AGE")]
    pub min_age: Option<u32>,

    #[arg(long, value_name = "AGE")]
    pub max_age: Option<u32>,
}

impl FilterArgs {
    /// Applies the given flags on top of `base`; unset flags keep its values.
    pub fn apply(&self, mut base: FilterCriteria) -> FilterCriteria {
        let texts = [
            (&self.search, &mut base.search_term),
            (&self.first_name, &mut base.first_name),
            (&self.last_name, &mut base.last_name),
            (&self.middle_name, &mut base.middle_name),
            (&self.grade, &mut base.grade_level),
            (&self.section, &mut base.section),
            (&self.track, &mut base.track_and_strand),
        ];
        for (flag, field) in texts {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }
        if self.initial_only {
            base.middle_initial_only = true;
        }
        if let Some(sex) = self.sex {
            (base.include_male, base.include_female) = match sex {
                SexFilter::Both => (true, true),
                SexFilter::Male => (true, false),
                SexFilter::Female => (false, true),
                SexFilter::Neither => (false, false),
            };
        }
        if let Some(age) = self.min_age {
            base.min_age = age;
        }
        if let Some(age) = self.max_age {
            base.max_age = age;
        }
        base
    }
}

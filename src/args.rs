//! These structs provide the CLI interface for the budget-export CLI.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// budget-export: Turn planning-system exports into a QuickBooks budget import workbook.
///
/// The program reads two CSV exports from a planning system: an intersections file, holding one
/// value per account, department, year, period and scenario, and a hierarchies file, holding the
/// parent, child and alias relationships of the Account and Department dimensions. It writes an
/// .xlsx workbook with a Guidelines sheet and one sheet per department, laid out the way the
/// QuickBooks budget import expects.
#[derive(Debug, Parser, Clone)]
#[command(version)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate the QuickBooks budget workbook for one year and scenario.
    Generate(GenerateArgs),
    /// Check an intersections export and list the years and scenarios it holds.
    Scan(ScanArgs),
    /// Write a configuration file holding the default settings to the --config path.
    ///
    /// Edit the file to set your company name, budget name, scenario, account root or the header
    /// names of your exports, then pass it with --config (or BUDGET_EXPORT_CONFIG) on later runs.
    Init(InitArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// A JSON configuration file holding defaults for your exports. See the init command.
    #[arg(long, env = "BUDGET_EXPORT_CONFIG")]
    config: Option<PathBuf>,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }
}

/// Args for the `generate` command. Options given here take precedence over the config file.
#[derive(Debug, Parser, Clone)]
pub struct GenerateArgs {
    /// The intersections CSV export.
    #[arg(long)]
    intersections: PathBuf,

    /// The hierarchies CSV export.
    #[arg(long)]
    hierarchies: PathBuf,

    /// The budget year. Defaults to the latest year in the intersections export.
    #[arg(long)]
    year: Option<i32>,

    /// The scenario to export, matched exactly. Defaults to "Plan".
    #[arg(long)]
    scenario: Option<String>,

    /// Written to the Guidelines sheet as the company name.
    #[arg(long)]
    company_name: Option<String>,

    /// Written to the Guidelines sheet and used in the output file name.
    #[arg(long)]
    budget_name: Option<String>,

    /// Replaces the computed period text of the Guidelines sheet,
    /// e.g. "FY 2026 (Jan 2026 - Dec 2026)".
    #[arg(long)]
    fiscal_period: Option<String>,

    /// Only export accounts below this member of the Account hierarchy, e.g. "Net Income".
    #[arg(long, conflicts_with = "all_accounts")]
    account_root: Option<String>,

    /// Export every account, ignoring any account root in the config file.
    #[arg(long)]
    all_accounts: bool,

    /// Title each department sheet with the department's alias instead of its code.
    #[arg(long)]
    department_aliases: bool,

    /// Where to write the workbook: a file, or a directory for the default file name
    /// QB_Budget_{budget name}_{year}.xlsx. Defaults to the current directory.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Overwrite the output file if it exists.
    #[arg(long)]
    force: bool,
}

impl GenerateArgs {
    pub fn intersections(&self) -> &Path {
        &self.intersections
    }

    pub fn hierarchies(&self) -> &Path {
        &self.hierarchies
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn scenario(&self) -> Option<&str> {
        self.scenario.as_deref()
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company_name.as_deref()
    }

    pub fn budget_name(&self) -> Option<&str> {
        self.budget_name.as_deref()
    }

    pub fn fiscal_period(&self) -> Option<&str> {
        self.fiscal_period.as_deref()
    }

    pub fn account_root(&self) -> Option<&str> {
        self.account_root.as_deref()
    }

    pub fn all_accounts(&self) -> bool {
        self.all_accounts
    }

    pub fn department_aliases(&self) -> bool {
        self.department_aliases
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn force(&self) -> bool {
        self.force
    }
}

/// Args for the `scan` command.
#[derive(Debug, Parser, Clone)]
pub struct ScanArgs {
    /// The intersections CSV export.
    #[arg(long)]
    intersections: PathBuf,
}

impl ScanArgs {
    pub fn intersections(&self) -> &Path {
        &self.intersections
    }
}

/// Args for the `init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Overwrite the config file if it exists.
    #[arg(long)]
    force: bool,
}

impl InitArgs {
    pub fn force(&self) -> bool {
        self.force
    }
}

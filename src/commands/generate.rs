use crate::args::GenerateArgs;
use crate::commands::Out;
use crate::model::{Code, RawFact, Table};
use crate::pipeline::{
    self, available, validate, AccountFilter, FilterReport, Selection, Settings,
};
use crate::workbook::output_filename;
use crate::{utils, Config, Result};
use anyhow::{bail, Context};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What `generate` wrote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateSummary {
    pub path: PathBuf,
    pub year: i32,
    pub scenario: String,
    pub sheets: Vec<String>,
    pub report: FilterReport,
}

/// Reads both exports, runs the pipeline and writes the budget workbook.
///
/// Options given in `args` take precedence over `config`, which takes precedence over the
/// built-in defaults.
///
/// # Errors
/// - Returns an error if an input cannot be read or parsed, if the pipeline fails, or if the
///   output exists and `--force` was not given.
pub async fn generate(config: &Config, args: &GenerateArgs) -> Result<Out<GenerateSummary>> {
    let facts = load_table(args.intersections()).await?;
    let hierarchies = load_table(args.hierarchies()).await?;
    info!(
        "Loaded {} intersection rows and {} hierarchy rows",
        facts.len(),
        hierarchies.len()
    );

    let year = match args.year() {
        Some(year) => year,
        None => latest_year(config, &facts, &hierarchies)?,
    };
    let settings = settings(config, args, year);

    let generated = pipeline::run(&facts, &hierarchies, &settings)?;
    let bytes = generated.to_xlsx()?;

    let path = output_path(args.output(), &settings.budget_name, year);
    if !args.force() && utils::exists(&path).await? {
        bail!(
            "The output file '{}' already exists, pass --force to overwrite it",
            path.display()
        )
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        utils::make_dir(parent).await?;
    }
    utils::write(&path, bytes).await?;

    let report = generated.report;
    if report.dropped() > 0 {
        warn!(
            "{} intersection row(s) were left out of the budget, see the warnings above",
            report.dropped()
        );
    }
    let sheets: Vec<String> = generated
        .workbook
        .sheet_names()
        .into_iter()
        .map(String::from)
        .collect();
    let message = format!(
        "Generated a QuickBooks budget file with {} department tabs at {}",
        generated.departments.len(),
        path.display()
    );
    Ok(Out::new(
        message,
        GenerateSummary {
            path,
            year,
            scenario: settings.selection.scenario,
            sheets,
            report,
        },
    ))
}

async fn load_table(path: &Path) -> Result<Table> {
    let bytes = utils::read_bytes(path).await?;
    Table::from_csv(bytes.as_slice()).with_context(|| format!("Unable to read {}", path.display()))
}

fn latest_year(config: &Config, facts: &Table, hierarchies: &Table) -> Result<i32> {
    let columns = config.intersection_columns();
    validate(
        &facts.column_names(),
        &hierarchies.column_names(),
        columns,
        config.hierarchy_columns(),
    )?;
    let found = available(&RawFact::from_table(facts, columns));
    match found.latest_year() {
        Some(year) => {
            info!("No --year given, using {year}, the latest year in the intersections");
            Ok(year)
        }
        None => bail!("The intersections file has no rows with a valid year, pass --year"),
    }
}

fn settings(config: &Config, args: &GenerateArgs, year: i32) -> Settings {
    let account_root = if args.all_accounts() {
        None
    } else {
        args.account_root().or(config.account_root())
    };
    Settings {
        company_name: args
            .company_name()
            .unwrap_or(config.company_name())
            .to_string(),
        budget_name: args
            .budget_name()
            .unwrap_or(config.budget_name())
            .to_string(),
        fiscal_period: args
            .fiscal_period()
            .or(config.fiscal_period())
            .map(String::from),
        selection: Selection::new(year, args.scenario().unwrap_or(config.scenario())),
        accounts: match account_root {
            Some(root) => AccountFilter::DescendantsOf(Code::new(root)),
            None => AccountFilter::All,
        },
        department_aliases: args.department_aliases() || config.department_aliases(),
        fact_columns: config.intersection_columns().clone(),
        hierarchy_columns: config.hierarchy_columns().clone(),
    }
}

/// A directory gets the conventional file name; anything else is used as the file path.
fn output_path(output: Option<&Path>, budget_name: &str, year: i32) -> PathBuf {
    let filename = output_filename(budget_name, year);
    match output {
        None => PathBuf::from(filename),
        Some(dir) if dir.is_dir() => dir.join(filename),
        Some(file) => file.to_path_buf(),
    }
}

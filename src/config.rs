//! Configuration file handling.
//!
//! The configuration file is an optional JSON file, passed with `--config` or
//! `BUDGET_EXPORT_CONFIG`, that holds defaults for a company's budget exports: the names written
//! to the Guidelines sheet, the scenario, the account filter, and the header names of the two
//! exports. Command line options take precedence over it.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "budget-export";
const CONFIG_VERSION: u8 = 1;
pub const DEFAULT_COMPANY_NAME: &str = "My Company";
pub const DEFAULT_BUDGET_NAME: &str = "Budget";
pub const DEFAULT_SCENARIO: &str = "Plan";

/// Header names of the six intersections columns.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct FactColumns {
    pub account: String,
    pub department: String,
    pub year: String,
    pub period: String,
    pub scenario: String,
    pub value: String,
}

impl Default for FactColumns {
    fn default() -> Self {
        Self {
            account: "_Account".to_string(),
            department: "_Department".to_string(),
            year: "_Year".to_string(),
            period: "_Period".to_string(),
            scenario: "_Scenario".to_string(),
            value: "_value".to_string(),
        }
    }
}

impl FactColumns {
    /// All required header names in declaration order.
    pub fn required(&self) -> [&str; 6] {
        [
            &self.account,
            &self.department,
            &self.year,
            &self.period,
            &self.scenario,
            &self.value,
        ]
    }
}

/// Header names of the four hierarchies columns.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct HierarchyColumns {
    pub dimension: String,
    pub member_code: String,
    pub alias: String,
    pub parent_code: String,
}

impl Default for HierarchyColumns {
    fn default() -> Self {
        Self {
            dimension: "_dim".to_string(),
            member_code: "_member_name".to_string(),
            alias: "_member_alias".to_string(),
            parent_code: "_parent_name".to_string(),
        }
    }
}

impl HierarchyColumns {
    /// All required header names in declaration order.
    pub fn required(&self) -> [&str; 4] {
        [
            &self.dimension,
            &self.member_code,
            &self.alias,
            &self.parent_code,
        ]
    }
}

/// The `Config` object represents the configuration of the app. It is either loaded from a
/// configuration file or holds the defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    path: Option<PathBuf>,
    config_file: ConfigFile,
}

impl Config {
    /// Writes a configuration file holding the default settings to `path` and returns it.
    ///
    /// # Errors
    /// - Returns an error if `path` already exists and `force` is false, or if writing fails.
    pub async fn create(path: impl Into<PathBuf>, force: bool) -> Result<Self> {
        let path = path.into();
        if !force && utils::exists(&path).await? {
            bail!(
                "The config file '{}' already exists, pass --force to overwrite it",
                path.display()
            )
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            utils::make_dir(parent).await?;
        }
        let config_file = ConfigFile::default();
        config_file.save(&path).await?;
        Ok(Self {
            path: Some(path),
            config_file,
        })
    }

    /// Loads and validates the configuration file at `path`.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            bail!("The config file is missing '{}'", path.display())
        }
        let config_file = ConfigFile::load(&path).await?;
        Ok(Self {
            path: Some(path),
            config_file,
        })
    }

    /// Loads `path` if one was given, otherwise returns the defaults.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p).await,
            None => Ok(Self::default()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn company_name(&self) -> &str {
        &self.config_file.company_name
    }

    pub fn budget_name(&self) -> &str {
        &self.config_file.budget_name
    }

    pub fn fiscal_period(&self) -> Option<&str> {
        self.config_file.fiscal_period.as_deref()
    }

    pub fn scenario(&self) -> &str {
        &self.config_file.scenario
    }

    pub fn account_root(&self) -> Option<&str> {
        self.config_file.account_root.as_deref()
    }

    pub fn department_aliases(&self) -> bool {
        self.config_file.department_aliases
    }

    pub fn intersection_columns(&self) -> &FactColumns {
        &self.config_file.intersection_columns
    }

    pub fn hierarchy_columns(&self) -> &HierarchyColumns {
        &self.config_file.hierarchy_columns
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budget-export",
///   "config_version": 1,
///   "company_name": "Skagit Valley Family YMCA",
///   "budget_name": "Budget_FY26_P&L",
///   "scenario": "Plan",
///   "account_root": "Net Income"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budget-export"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Written to the Guidelines sheet as "Company name"
    #[serde(default = "default_company_name")]
    company_name: String,

    /// Written to the Guidelines sheet as "Budget name" and used in the output filename
    #[serde(default = "default_budget_name")]
    budget_name: String,

    /// Replaces the computed "Period" text of the Guidelines sheet,
    /// e.g. "FY 2026 (Jan 2026 - Dec 2026)"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fiscal_period: Option<String>,

    /// The scenario to export
    #[serde(default = "default_scenario")]
    scenario: String,

    /// When set, only accounts below this member of the Account hierarchy are exported
    #[serde(default)]
    account_root: Option<String>,

    /// Title department sheets with the Department hierarchy alias instead of the code
    #[serde(default)]
    department_aliases: bool,

    #[serde(default)]
    intersection_columns: FactColumns,

    #[serde(default)]
    hierarchy_columns: HierarchyColumns,
}

fn default_company_name() -> String {
    DEFAULT_COMPANY_NAME.to_string()
}

fn default_budget_name() -> String {
    DEFAULT_BUDGET_NAME.to_string()
}

fn default_scenario() -> String {
    DEFAULT_SCENARIO.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            company_name: default_company_name(),
            budget_name: default_budget_name(),
            fiscal_period: None,
            scenario: default_scenario(),
            account_root: None,
            department_aliases: false,
            intersection_columns: FactColumns::default(),
            hierarchy_columns: HierarchyColumns::default(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .context("Unable to load the config file")?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version <= CONFIG_VERSION,
            "Config file version {} is newer than this program supports ({})",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

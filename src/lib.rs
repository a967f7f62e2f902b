pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod pipeline;
mod utils;
pub mod workbook;


pub use config::{Config, FactColumns, HierarchyColumns};
pub use error::{BudgetError, Error, Result, SchemaError, TableKind};

//! Types that represent the core data model: the two uploaded tables, the rows read from them, and
//! the codes, amounts and months the pipeline works in.
mod amount;
mod code;
mod fact;
mod hierarchy;
mod mapping;
mod month;
mod row_col;
mod table;

pub use amount::{Amount, AmountError};
pub use code::Code;
pub use fact::{FactRecord, RawFact};
pub use hierarchy::{Dimension, HierarchyIndex, HierarchyRecord, MAX_DEPTH};
pub use mapping::{Header, Mapping, MappingError};
pub use month::{month_from_period, month_index, month_label, parse_whole_number, MONTHS};
pub use row_col::{column_letters, RowCol};
pub use table::{Row, Table};

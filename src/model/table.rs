use crate::model::{Header, Mapping};
use crate::Result;
use anyhow::{bail, Context};
use std::collections::BTreeSet;
use std::io::Read;

/// A CSV export held as text: the header mapping and the data rows, each padded to the header
/// length. Cells are looked up by header name through `Row::get`.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct Table {
    mapping: Mapping,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from rows of cells where the first row is the header row.
    pub fn new<S, R, I>(data: I) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
        I: IntoIterator<Item = R>,
    {
        let mut rows = data.into_iter();
        let mapping = match rows.next() {
            Some(header_row) => Mapping::new(header_row)?,
            None => {
                bail!("An empty data set cannot be parsed into a Table, a header row is needed")
            }
        };

        let mut table = Self {
            mapping,
            rows: Vec::new(),
        };
        for (row_ix, row) in rows.enumerate() {
            // Header is line 1, so the first data row is line 2
            table.push(row.into_iter().map(|s| s.into()).collect(), row_ix + 2)?;
        }
        Ok(table)
    }

    /// Parse CSV text from `reader`. The first record is the header row.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut records = rdr.records();

        let header = match records.next() {
            Some(record) => record.context("Unable to read the CSV header row")?,
            None => bail!("The CSV data is empty, a header row is needed"),
        };
        let mapping = Mapping::new(header.iter())?;

        let mut table = Self {
            mapping,
            rows: Vec::new(),
        };
        for result in records {
            let record = result.context("Unable to read a CSV record")?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(table.rows.len() + 2);
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            table.push(record.iter().map(String::from).collect(), line)?;
        }
        Ok(table)
    }

    fn push(&mut self, mut values: Vec<String>, line: usize) -> Result<()> {
        let len = self.mapping.len();
        if values.len() > len {
            bail!("A row longer than the headers list was encountered at line {line}");
        }
        values.resize(len, String::new());
        self.rows.push(values);
        Ok(())
    }

    pub fn headers(&self) -> &[Header] {
        self.mapping.headers()
    }

    /// The set of header names, which is what schema validation looks at.
    pub fn column_names(&self) -> BTreeSet<String> {
        self.headers().iter().map(|h| h.to_string()).collect()
    }

    /// The number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            mapping: &self.mapping,
            values,
        })
    }
}

/// A borrowed data row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    mapping: &'a Mapping,
    values: &'a [String],
}

impl<'a> Row<'a> {
    /// The cell under the header named `column`, or `None` if the table has no such column.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let values = self.values;
        self.mapping
            .index(column)
            .and_then(|ix| values.get(ix))
            .map(|s| s.as_str())
    }

    /// Like `get` but treats a missing column as an empty cell.
    pub fn text(&self, column: &str) -> &'a str {
        self.get(column).unwrap_or_default()
    }
}

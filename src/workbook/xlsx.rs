use crate::workbook::{CellValue, Workbook};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook as XlsxWorkbook, XlsxError};

/// Serializes a logical workbook to `.xlsx` bytes. Sheets are written in order; numbers are
/// written as numeric cells and bold cells with a bold font.
pub fn to_xlsx(workbook: &Workbook) -> Result<Vec<u8>, XlsxError> {
    let mut xlsx = XlsxWorkbook::new();
    let bold = Format::new().set_bold();

    for sheet in workbook.sheets() {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(sheet.name())?;

        for (at, cell) in sheet.cells() {
            let row = row_num(at.row())?;
            let col = col_num(at.col())?;
            match (&cell.value, cell.bold) {
                (CellValue::Text(text), true) => {
                    worksheet.write_string_with_format(row, col, text, &bold)?;
                }
                (CellValue::Text(text), false) => {
                    worksheet.write_string(row, col, text)?;
                }
                (CellValue::Number(n), true) => {
                    worksheet.write_number_with_format(row, col, n.to_f64(), &bold)?;
                }
                (CellValue::Number(n), false) => {
                    worksheet.write_number(row, col, n.to_f64())?;
                }
            }
        }

        for (col, width) in sheet.widths() {
            worksheet.set_column_width(col_num(col)?, width)?;
        }
    }

    xlsx.save_to_buffer()
}

fn row_num(row: usize) -> Result<RowNum, XlsxError> {
    RowNum::try_from(row).map_err(|_| XlsxError::RowColumnLimitError)
}

fn col_num(col: usize) -> Result<ColNum, XlsxError> {
    ColNum::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Code;
    use crate::pipeline::MonthValues;
    use crate::workbook::{assemble, AccountRow, DepartmentSheet, Guidelines};
    use chrono::Month;
    use std::str::FromStr;

    fn guidelines() -> Guidelines {
        Guidelines {
            company_name: "My Company".to_string(),
            budget_name: "Budget".to_string(),
            scenario: "Plan".to_string(),
            year: 2026,
            fiscal_period: None,
        }
    }

    #[test]
    fn test_to_xlsx_writes_a_zip_archive() {
        let mut values = MonthValues::default();
        values
            .add(Month::March, crate::model::Amount::from_str("200").unwrap())
            .unwrap();
        let departments = vec![DepartmentSheet {
            department: Code::new("Programs"),
            title: "Programs".to_string(),
            rows: vec![AccountRow {
                label: "5000 Salaries".to_string(),
                values,
            }],
        }];
        let bytes = to_xlsx(&assemble(&guidelines(), &departments)).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_to_xlsx_with_only_guidelines() {
        let bytes = to_xlsx(&assemble(&guidelines(), &[])).unwrap();
        assert!(bytes.len() > 100);
    }
}

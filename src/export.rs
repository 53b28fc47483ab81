use crate::models::Record;
use rust_xlsxwriter::{Workbook, XlsxError};

pub const EXPORT_FILENAME: &str = "fitter_meter_records.xlsx";
pub const SHEET_NAME: &str = "패션 소비 기록";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("내보낼 데이터가 없습니다.")]
    Empty,

    #[error(transparent)]
    Xlsx(#[from] XlsxError),
}

/// Writes the records into a single-sheet workbook: header row, then one
/// row per record in the order given.
pub fn export_workbook(records: &[Record]) -> Result<Vec<u8>, ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in Record::COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, value) in record.columns().into_iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(row, col as u16, value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

use crate::error::Result;
use crate::schema::CombinedMonthlyRow;
use log::debug;
use rust_xlsxwriter::Workbook;

/// Conventional download file name for the combined monthly workbook.
pub const SPREADSHEET_FILE_NAME: &str = "combined_monthly_data.xlsx";

/// MIME type for xlsx workbooks, as sent in a download response.
pub const SPREADSHEET_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SHEET_NAME: &str = "Sheet1";

/// An in-memory workbook plus the metadata a caller needs to serve it as a
/// file download.
#[derive(Debug, Clone)]
pub struct SpreadsheetArtifact {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Serializes the combined monthly table to an xlsx workbook with a single
/// sheet named `Sheet1`.
///
/// The header row comes from [`CombinedMonthlyRow::COLUMNS`]; months are
/// written as `YYYY-MM` strings and every other column as a number.
pub fn combined_to_xlsx(rows: &[CombinedMonthlyRow]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in CombinedMonthlyRow::COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write_string(r, 0, row.month_year.to_string())?;
        worksheet.write_number(r, 1, row.renewals)?;
        worksheet.write_number(r, 2, row.cumulative_renewals)?;
        worksheet.write_number(r, 3, row.forecast_fee)?;
        worksheet.write_number(r, 4, row.total)?;
        worksheet.write_number(r, 5, row.cumulative_total)?;
    }

    let bytes = workbook.save_to_buffer()?;
    debug!(
        "Serialized {} combined row(s) into a {} byte workbook",
        rows.len(),
        bytes.len()
    );
    Ok(bytes)
}

/// Builds the downloadable workbook artifact for the combined monthly table,
/// using the conventional file name and MIME type.
pub fn combined_spreadsheet(rows: &[CombinedMonthlyRow]) -> Result<SpreadsheetArtifact> {
    Ok(SpreadsheetArtifact {
        file_name: SPREADSHEET_FILE_NAME,
        mime_type: SPREADSHEET_MIME_TYPE,
        bytes: combined_to_xlsx(rows)?,
    })
}

/// Serializes the combined monthly table to CSV text. The header row is
/// always present, even for an empty table.
pub fn combined_to_csv(rows: &[CombinedMonthlyRow]) -> Result<String> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buffer);
        writer.write_record(CombinedMonthlyRow::COLUMNS)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

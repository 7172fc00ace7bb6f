use itertools::Itertools;

use super::{
    fiscal_year::FiscalYear,
    meeting_record::{ShareholderMeetingRecord, MISSING_CELL, NOT_AVAILABLE},
    raw_row::RawRow,
};

/// Shape of one logical record in the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Current format: the record spans two rows, the second one holding the
    /// transfer-suspension dates.
    TwoRow,
    /// Legacy format: one row per record, no suspension dates or meeting mode.
    SingleRow,
}

impl Layout {
    pub fn of(row: &RawRow) -> Self {
        match row.spans_two_rows {
            true => Layout::TwoRow,
            false => Layout::SingleRow,
        }
    }

    pub fn rows_consumed(self) -> usize {
        match self {
            Layout::TwoRow => 2,
            Layout::SingleRow => 1,
        }
    }
}

/// Converts result rows into records, one per logical row group.
///
/// Rows without cells are skipped. Missing cells never drop a record, they
/// are filled with a placeholder instead.
pub fn extract(rows: &[RawRow], year: FiscalYear) -> Vec<ShareholderMeetingRecord> {
    let mut records = vec![];
    let mut cursor = 0;

    while let Some(row) = rows.get(cursor) {
        if row.is_empty() {
            cursor += 1;
            continue;
        }

        let layout = Layout::of(row);
        let record = match layout {
            Layout::TwoRow => two_row_record(row, rows.get(cursor + 1), year),
            Layout::SingleRow => single_row_record(row, year),
        };

        records.push(record);
        cursor += layout.rows_consumed();
    }

    records
}

/// Distinct company codes in first-seen order.
pub fn company_codes(records: &[ShareholderMeetingRecord]) -> Vec<&str> {
    records
        .iter()
        .map(|r| r.company_code.as_str())
        .unique()
        .collect()
}

fn two_row_record(
    row: &RawRow,
    date_row: Option<&RawRow>,
    year: FiscalYear,
) -> ShareholderMeetingRecord {
    let date_cell = |index| {
        date_row
            .and_then(|r| r.cell(index))
            .unwrap_or(MISSING_CELL)
            .to_string()
    };

    ShareholderMeetingRecord {
        query_year: year,
        company_code: cell_or(row, 0, MISSING_CELL),
        company_name: cell_or(row, 1, MISSING_CELL),
        meeting_type: cell_or(row, 3, MISSING_CELL),
        meeting_date: cell_or(row, 4, MISSING_CELL),
        transfer_suspension_start: date_cell(0),
        transfer_suspension_end: date_cell(1),
        meeting_mode: cell_or(row, 7, MISSING_CELL),
        meeting_location: cell_or(row, 8, MISSING_CELL),
        board_reelection: cell_or(row, 10, MISSING_CELL),
        e_voting_platform: cell_or(row, 15, NOT_AVAILABLE),
        e_voting_url: cell_or(row, 16, NOT_AVAILABLE),
    }
}

fn single_row_record(row: &RawRow, year: FiscalYear) -> ShareholderMeetingRecord {
    ShareholderMeetingRecord {
        query_year: year,
        company_code: cell_or(row, 0, MISSING_CELL),
        company_name: cell_or(row, 1, MISSING_CELL),
        meeting_type: cell_or(row, 3, MISSING_CELL),
        meeting_date: cell_or(row, 4, MISSING_CELL),
        transfer_suspension_start: NOT_AVAILABLE.to_string(),
        transfer_suspension_end: NOT_AVAILABLE.to_string(),
        meeting_mode: NOT_AVAILABLE.to_string(),
        meeting_location: cell_or(row, 5, MISSING_CELL),
        board_reelection: cell_or(row, 6, MISSING_CELL),
        e_voting_platform: cell_or(row, 11, NOT_AVAILABLE),
        e_voting_url: cell_or(row, 12, NOT_AVAILABLE),
    }
}

fn cell_or(row: &RawRow, index: usize, fallback: &str) -> String {
    row.cell(index).unwrap_or(fallback).trim().to_string()
}

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::NaiveDate;

use crate::domain::{
    company_label::CompanyLabel, fiscal_year::sanitize_year_spec,
    meeting_record::ShareholderMeetingRecord,
};

/// Lets spreadsheet tools detect the file as UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn export_file_name(date: NaiveDate, year_spec: &str, company: &CompanyLabel) -> String {
    format!(
        "{}_{}_{}.csv",
        date.format("%Y%m%d"),
        sanitize_year_spec(year_spec),
        company.file_label()
    )
}

/// Writes `records` to `dir/file_name`, creating `dir` if needed.
///
/// Nothing is written for an empty slice and `Ok(None)` is returned.
pub fn export_records(
    records: &[ShareholderMeetingRecord],
    dir: &Path,
    file_name: &str,
) -> anyhow::Result<Option<PathBuf>> {
    if records.is_empty() {
        return Ok(None);
    }

    if !dir.as_os_str().is_empty() && !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let path = dir.join(file_name);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(BufWriter::new(file), records)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(Some(path))
}

fn write_csv<W: Write>(mut out: W, records: &[ShareholderMeetingRecord]) -> anyhow::Result<()> {
    out.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(out);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

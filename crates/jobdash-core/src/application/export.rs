use std::io::Write;

use chrono::NaiveDate;

use crate::domain::{
    DomainError,
    DomainResult,
    JobSummary,
};

pub const CSV_HEADER: [&str; 7] = [
    "Name",
    "Folder",
    "Status",
    "Last Build",
    "Duration",
    "Success Rate",
    "URL",
];

pub fn export_filename(date: NaiveDate) -> String {
    format!("jenkins-pipelines-{}.csv", date.format("%Y-%m-%d"))
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn write_row<W: Write>(out: &mut W, fields: &[&str]) -> std::io::Result<()> {
    let line = fields
        .iter()
        .map(|f| escape(f))
        .collect::<Vec<_>>()
        .join(",");
    out.write_all(line.as_bytes())?;
    out.write_all(b"\r\n")
}

/// Writes jobs as CSV, one row per job in the given order.
pub fn write_csv<W: Write>(out: &mut W, jobs: &[JobSummary]) -> DomainResult<()> {
    let to_export_error = |e: std::io::Error| DomainError::Export(e.to_string());

    write_row(out, &CSV_HEADER).map_err(to_export_error)?;
    for job in jobs {
        let success_rate = format!("{:.1}%", job.success_rate);
        write_row(
            out,
            &[
                job.name.as_str(),
                job.folder.as_str(),
                job.last_build_status.as_str(),
                job.last_build.as_str(),
                job.duration.as_str(),
                success_rate.as_str(),
                job.url.as_str(),
            ],
        )
        .map_err(to_export_error)?;
    }
    out.flush().map_err(to_export_error)
}

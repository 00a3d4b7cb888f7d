pub mod json;
pub mod markdown;

use crate::error::Result;
use crate::model::Report;
use clap::ValueEnum;
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Markdown,
}

pub fn render(report: &Report, format: Format) -> Result<String> {
    match format {
        Format::Json => json::render(report),
        Format::Markdown => markdown::MarkdownReport::report_create(report),
    }
}

/// Writes to `output` when given, to stdout otherwise.
pub fn write(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            log::info!("Report written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn writes_report_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = Report::new(Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap());

        let content = render(&report, Format::Json).unwrap();
        write(&content, Some(&path)).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }
}

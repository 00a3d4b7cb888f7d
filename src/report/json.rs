use crate::error::Result;
use crate::model::Report;

pub fn render(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Advisory, AdvisoryKind, CommitSource, RepositoryInfo};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn empty_series_and_options_are_omitted() {
        let mut report = Report::new(Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap());
        report.metadata.repository = Some(RepositoryInfo::new("octo/pulse"));
        report.metadata.commit_source = CommitSource::Local;
        report.metadata.advisories.push(Advisory::new(
            AdvisoryKind::SourceUnavailable,
            "forge unreachable",
        ));

        let value: Value = serde_json::from_str(&render(&report).unwrap()).unwrap();

        assert_eq!(
            value["metadata"],
            json!({
                "analyzed_at": "2024-06-03T09:00:00Z",
                "repository": {"full_name": "octo/pulse"},
                "commit_source": "local",
                "activity_source": "daily",
                "capabilities": {"merge_times": false},
                "advisories": [{"kind": "source_unavailable", "message": "forge unreachable"}],
            })
        );
        assert_eq!(value["visualization"], json!({}));
        assert_eq!(value["commit_activity"], json!({}));
        assert!(value.get("contributor_stats").is_none());
    }
}

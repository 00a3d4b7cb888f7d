use crate::error::{Error, Result};
use crate::model::{AdvisoryKind, CommitSource, Report};
use markdown_builder::Markdown;
use markdown_table::{Heading, HeadingAlignment, MarkdownTable};

pub trait MarkdownReport {
    fn report_create(&self) -> Result<String>;
}

impl MarkdownReport for Report {
    fn report_create(&self) -> Result<String> {
        let mut doc = Markdown::new();

        let title = match &self.metadata.repository {
            Some(repository) => format!("Repository report: {}", repository.full_name),
            None => "Repository report".to_string(),
        };
        doc.header1(title);
        doc.add_metadata(self);
        doc.add_advisories(self);
        doc.add_commits(self)?;
        doc.add_pull_requests(self)?;
        doc.add_lines_of_code(self)?;
        doc.add_commit_activity(self)?;
        doc.add_open_aging(self)?;

        Ok(doc.render())
    }
}

trait MarkdownExt {
    fn add_metadata(&mut self, report: &Report);
    fn add_advisories(&mut self, report: &Report);
    fn add_commits(&mut self, report: &Report) -> Result<()>;
    fn add_pull_requests(&mut self, report: &Report) -> Result<()>;
    fn add_lines_of_code(&mut self, report: &Report) -> Result<()>;
    fn add_commit_activity(&mut self, report: &Report) -> Result<()>;
    fn add_open_aging(&mut self, report: &Report) -> Result<()>;
    fn add_table(&mut self, headings: &[&str], rows: Vec<Vec<String>>) -> Result<()>;
}

impl MarkdownExt for Markdown {
    fn add_metadata(&mut self, report: &Report) {
        let metadata = &report.metadata;
        let window = format!(
            "{} - {}",
            metadata.since.as_deref().unwrap_or("beginning"),
            metadata.until.as_deref().unwrap_or("now"),
        );
        let source = match metadata.commit_source {
            CommitSource::Local => "local checkout",
            CommitSource::Remote => "remote repository",
            CommitSource::None => "none",
        };
        self.paragraph(format!(
            "Analyzed at *{}*, window *{}*, commits from *{}*",
            metadata.analyzed_at.format("%d.%m.%Y %H:%M"),
            window,
            source,
        ));
    }

    fn add_advisories(&mut self, report: &Report) {
        let advisories = &report.metadata.advisories;
        if advisories.is_empty() {
            return;
        }
        self.header2("Advisories");
        let lines = advisories
            .iter()
            .map(|advisory| {
                let kind = match advisory.kind {
                    AdvisoryKind::SourceUnavailable => "source unavailable",
                    AdvisoryKind::ConfigurationMismatch => "configuration mismatch",
                };
                format!("- **{}**: {}", kind, advisory.message)
            })
            .collect::<Vec<_>>();
        self.paragraph(lines.join("\n"));
    }

    fn add_commits(&mut self, report: &Report) -> Result<()> {
        self.header2("Commits");
        let rows = report
            .commits
            .iter()
            .map(|(author, summary)| {
                vec![
                    format!("**{author}**"),
                    summary.total_commits.to_string(),
                    format!("*+ {}* / *- {}*", summary.total_additions, summary.total_deletions),
                ]
            })
            .collect();
        self.add_table(&["Author", "Commits", "Lines changed"], rows)
    }

    fn add_pull_requests(&mut self, report: &Report) -> Result<()> {
        self.header2("Pull requests");
        let rows = report
            .pull_requests
            .iter()
            .map(|(author, summary)| {
                vec![
                    format!("**{author}**"),
                    summary.total_prs.to_string(),
                    summary.merged.to_string(),
                    summary.open.to_string(),
                    summary.closed.to_string(),
                    format!("*+ {}* / *- {}*", summary.total_additions, summary.total_deletions),
                ]
            })
            .collect();
        self.add_table(
            &["Author", "Created", "Merged", "Open", "Closed", "Lines changed"],
            rows,
        )
    }

    fn add_lines_of_code(&mut self, report: &Report) -> Result<()> {
        self.header2("Lines of code");
        let rows = report
            .lines_of_code
            .iter()
            .map(|(author, lines)| vec![format!("**{author}**"), lines.to_string()])
            .collect();
        self.add_table(&["Author", "Lines"], rows)
    }

    fn add_commit_activity(&mut self, report: &Report) -> Result<()> {
        self.header2("Commit activity");
        let rows = report
            .commit_activity
            .counts()
            .into_iter()
            .map(|(date, commits)| vec![date.format("%d.%m.%Y").to_string(), commits.to_string()])
            .collect();
        self.add_table(&["Date", "Commits"], rows)
    }

    fn add_open_aging(&mut self, report: &Report) -> Result<()> {
        let Some(aging) = &report.visualization.open_prs_aging else {
            return Ok(());
        };
        self.header2("Open pull requests by age");
        let rows = aging
            .iter()
            .map(|bucket| vec![bucket.bucket.clone(), bucket.count.to_string()])
            .collect();
        self.add_table(&["Age", "Open"], rows)
    }

    fn add_table(&mut self, headings: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if rows.is_empty() {
            self.paragraph("*No data*");
            return Ok(());
        }
        let headings = headings
            .iter()
            .enumerate()
            .map(|(i, heading)| {
                let alignment = if i == 0 { HeadingAlignment::Left } else { HeadingAlignment::Center };
                Heading::new(heading.to_string(), Some(alignment))
            })
            .collect::<Vec<_>>();
        let mut table = MarkdownTable::new(rows);
        table.with_headings(headings);
        let rendered = table
            .as_markdown()
            .map_err(|e| Error::Render(format!("{:?}", e)))?;
        self.paragraph(rendered);
        Ok(())
    }
}

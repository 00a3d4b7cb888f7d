use crate::analyze::AuthorCommits;
use crate::error::Result;
use crate::git::commit::GitCommitRepository;
use crate::git::remote::parse_remote_identifier;
use crate::model::Window;
use chrono::NaiveDate;
use git2::{ErrorCode, ObjectType, Repository, TreeWalkMode, TreeWalkResult};
use indexmap::IndexMap;
use std::path::Path;

/// Read side of a local checkout.
pub trait LocalReader {
    fn commits_since_until(&self, window: &Window) -> Result<AuthorCommits>;
    fn lines_of_code(&self) -> Result<IndexMap<String, usize>>;
    fn commit_activity_by_day(&self, window: &Window) -> Result<IndexMap<NaiveDate, usize>>;
    fn remote_identifier(&self) -> Option<String>;
}

pub struct LocalRepository {
    repo: Repository,
}

// Create
impl LocalRepository {
    /// `None` when `path` carries no git metadata at all.
    pub fn discover(path: &Path) -> Result<Option<Self>> {
        if !path.join(".git").exists() {
            return Ok(None);
        }
        let repo = Repository::open(path)?;
        Ok(Some(Self { repo }))
    }
}

impl LocalReader for LocalRepository {
    fn commits_since_until(&self, window: &Window) -> Result<AuthorCommits> {
        self.repo.get_commits(window)
    }

    /// Current lines per author email, from blaming every text file at HEAD.
    fn lines_of_code(&self) -> Result<IndexMap<String, usize>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                return Ok(IndexMap::new());
            }
            Err(e) => return Err(e.into()),
        };
        let tree = head.peel_to_tree()?;

        let mut files = vec![];
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() == Some(ObjectType::Blob) {
                if let Some(name) = entry.name() {
                    files.push((format!("{}{}", root, name), entry.id()));
                }
            }
            TreeWalkResult::Ok
        })?;

        let mut lines: IndexMap<String, usize> = IndexMap::new();
        for (path, id) in files {
            if self.repo.find_blob(id)?.is_binary() {
                continue;
            }
            let blame = match self.repo.blame_file(Path::new(&path), None) {
                Ok(blame) => blame,
                Err(e) => {
                    log::warn!("Skipping blame of {}: {}", path, e);
                    continue;
                }
            };
            for hunk in blame.iter() {
                let email = hunk.final_signature().email().unwrap_or("").to_string();
                *lines.entry(email).or_insert(0) += hunk.lines_in_hunk();
            }
        }
        Ok(lines)
    }

    fn commit_activity_by_day(&self, window: &Window) -> Result<IndexMap<NaiveDate, usize>> {
        self.repo.get_daily_activity(window)
    }

    fn remote_identifier(&self) -> Option<String> {
        let remote = self.repo.find_remote("origin").ok()?;
        parse_remote_identifier(remote.url()?)
    }
}

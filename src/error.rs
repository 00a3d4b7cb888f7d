use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("git: {0}")]
    Git(#[from] git2::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("remote: {0}")]
    Remote(String),
    #[error("`{}` is not a git checkout", .0.display())]
    NotACheckout(PathBuf),
    #[error("Not a valid date: {0}")]
    InvalidDate(String),
    #[error("config: {0}")]
    Config(String),
    #[error("render: {0}")]
    Render(String),
}

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepositoryInfo {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}

impl RepositoryInfo {
    pub fn new(full_name: impl ToString) -> Self {
        Self {
            full_name: full_name.to_string(),
            ..Self::default()
        }
    }
}

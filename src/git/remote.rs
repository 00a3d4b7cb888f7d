use regex::Regex;
use std::sync::OnceLock;

fn remote_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:https?://[^/\s]+/|git@[^:\s]+:)([\w.-]+)/([\w.-]+?)(?:\.git)?/?$")
            .expect("remote pattern is valid")
    })
}

/// `owner/repo` from an `https://host/owner/repo(.git)` or
/// `git@host:owner/repo(.git)` URL.
pub fn parse_remote_identifier(url: &str) -> Option<String> {
    let captures = remote_pattern().captures(url.trim())?;
    Some(format!("{}/{}", &captures[1], &captures[2]))
}

/// Splits `owner/repo` into its parts.
pub fn split_identifier(identifier: &str) -> Option<(&str, &str)> {
    let (owner, name) = identifier.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((owner, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_https_and_ssh_urls() {
        for url in [
            "https://gitea.com/octo/pulse.git",
            "https://gitea.com/octo/pulse",
            "http://git.local:3000/octo/pulse/",
            "git@gitea.com:octo/pulse.git",
            "git@gitea.com:octo/pulse",
        ] {
            assert_eq!(parse_remote_identifier(url).as_deref(), Some("octo/pulse"), "{}", url);
        }
    }

    #[test]
    fn keeps_dots_inside_repository_names() {
        assert_eq!(
            parse_remote_identifier("https://gitea.com/octo/pulse.rs.git").as_deref(),
            Some("octo/pulse.rs")
        );
    }

    #[test]
    fn other_urls_have_no_identifier() {
        assert_eq!(parse_remote_identifier("/srv/git/pulse.git"), None);
        assert_eq!(parse_remote_identifier("https://gitea.com/group/sub/pulse"), None);
    }

    #[test]
    fn splits_identifier() {
        assert_eq!(split_identifier("octo/pulse"), Some(("octo", "pulse")));
        assert_eq!(split_identifier("octo"), None);
        assert_eq!(split_identifier("a/b/c"), None);
    }
}

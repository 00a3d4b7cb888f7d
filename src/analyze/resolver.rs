use crate::error::{Error, Result};
use crate::model::{Advisory, AdvisoryKind};
use std::future::Future;
use std::path::Path;

/// Everything known about the available sources before any data is read.
#[derive(Debug, Clone)]
pub struct SourceRequest<'a> {
    pub path: &'a Path,
    pub explicit_remote: Option<&'a str>,
    pub local_remote: Option<&'a str>,
    pub has_checkout: bool,
    pub require_local: bool,
    pub token: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Backend {
    Cli,
    Token,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RemotePlan {
    pub identifier: String,
    pub backend: Backend,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SourcePlan {
    pub analyze_local: bool,
    pub remote: Option<RemotePlan>,
    pub advisories: Vec<Advisory>,
}

impl SourcePlan {
    /// Commits come from the forge only when the checkout was not read.
    pub fn commits_from_remote(&self) -> bool {
        !self.analyze_local && self.remote.is_some()
    }
}

/// Decides which sources a run reads. `cli_available` is only awaited when
/// a remote repository is in play and no token was given.
pub async fn resolve(
    request: &SourceRequest<'_>,
    cli_available: impl Future<Output = bool>,
) -> Result<SourcePlan> {
    if request.require_local && !request.has_checkout {
        return Err(Error::NotACheckout(request.path.to_path_buf()));
    }

    let mut advisories = vec![];
    let analyze_local = request.has_checkout
        && match request.explicit_remote {
            None => true,
            Some(explicit) => request.local_remote == Some(explicit),
        };

    if request.has_checkout && !analyze_local {
        let message = format!(
            "Skipping local checkout at {}: its origin is {} but {} was requested",
            request.path.display(),
            request.local_remote.unwrap_or("not a known forge"),
            request.explicit_remote.unwrap_or_default(),
        );
        if request.require_local {
            return Err(Error::Config(message));
        }
        log::warn!("{}", message);
        advisories.push(Advisory::new(AdvisoryKind::ConfigurationMismatch, message));
    }

    let identifier = request.explicit_remote.or(request.local_remote);
    let remote = match identifier {
        None => None,
        Some(identifier) => {
            let backend = if request.token.is_some() {
                Some(Backend::Token)
            } else if cli_available.await {
                Some(Backend::Cli)
            } else {
                None
            };
            if backend.is_none() {
                let kind = if request.explicit_remote.is_some() {
                    AdvisoryKind::ConfigurationMismatch
                } else {
                    AdvisoryKind::SourceUnavailable
                };
                let message = format!(
                    "No token given and the forge CLI is unavailable; skipping remote analysis of {}",
                    identifier
                );
                log::warn!("{}", message);
                advisories.push(Advisory::new(kind, message));
            }
            backend.map(|backend| RemotePlan {
                identifier: identifier.to_string(),
                backend,
            })
        }
    };

    if !analyze_local && remote.is_none() {
        let message = "Neither a local checkout nor a remote repository is available";
        log::warn!("{}", message);
        advisories.push(Advisory::new(AdvisoryKind::SourceUnavailable, message));
    }

    Ok(SourcePlan {
        analyze_local,
        remote,
        advisories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::future::ready;

    async fn unprobed() -> bool {
        panic!("CLI must not be probed")
    }

    fn request<'a>(
        explicit_remote: Option<&'a str>,
        local_remote: Option<&'a str>,
        token: Option<&'a str>,
    ) -> SourceRequest<'a> {
        SourceRequest {
            path: Path::new("."),
            explicit_remote,
            local_remote,
            has_checkout: true,
            require_local: false,
            token,
        }
    }

    #[tokio::test]
    async fn local_only_without_remote() {
        let plan = resolve(&request(None, None, None), unprobed()).await.unwrap();

        assert!(plan.analyze_local);
        assert_eq!(plan.remote, None);
        assert!(plan.advisories.is_empty());
    }

    #[tokio::test]
    async fn derived_identifier_uses_cli_when_available() {
        let plan = resolve(&request(None, Some("o/r"), None), ready(true)).await.unwrap();

        assert!(plan.analyze_local);
        assert!(!plan.commits_from_remote());
        assert_eq!(
            plan.remote,
            Some(RemotePlan { identifier: "o/r".to_string(), backend: Backend::Cli })
        );
    }

    #[tokio::test]
    async fn token_wins_without_probing_cli() {
        let plan = resolve(&request(Some("o/r"), Some("o/r"), Some("secret")), unprobed())
            .await
            .unwrap();

        assert!(plan.analyze_local);
        assert_eq!(plan.remote.map(|r| r.backend), Some(Backend::Token));
    }

    #[tokio::test]
    async fn mismatched_checkout_is_skipped() {
        let plan = resolve(&request(Some("o/r"), Some("o/other"), Some("secret")), ready(false))
            .await
            .unwrap();

        assert!(!plan.analyze_local);
        assert!(plan.commits_from_remote());
        assert_eq!(plan.remote.as_ref().map(|r| r.identifier.as_str()), Some("o/r"));
        assert_eq!(plan.advisories[0].kind, AdvisoryKind::ConfigurationMismatch);
    }

    #[tokio::test]
    async fn mismatch_without_remote_access_leaves_nothing() {
        let plan = resolve(&request(Some("o/r"), Some("o/other"), None), ready(false))
            .await
            .unwrap();

        assert!(!plan.analyze_local);
        assert_eq!(plan.remote, None);
        assert_eq!(plan.advisories.len(), 3);
        assert!(plan
            .advisories
            .iter()
            .all(|a| a.kind != AdvisoryKind::SourceUnavailable || a.message.starts_with("Neither")));
    }

    #[tokio::test]
    async fn required_checkout_must_exist() {
        let mut missing = request(None, None, None);
        missing.has_checkout = false;
        missing.require_local = true;

        assert!(matches!(resolve(&missing, ready(false)).await, Err(Error::NotACheckout(_))));
    }

    #[tokio::test]
    async fn required_checkout_must_match() {
        let mut mismatched = request(Some("o/r"), Some("o/other"), Some("secret"));
        mismatched.require_local = true;

        assert!(matches!(resolve(&mismatched, ready(false)).await, Err(Error::Config(_))));
    }
}

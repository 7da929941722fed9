use crate::model::{Error, Result};
use reqwest::Url;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

// New
impl Repository {
    fn new(owner: impl ToString, name: impl ToString) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    /// Accepts a URL (`https://github.com/owner/name`, `github.com/owner/name`,
    /// `git@github.com:owner/name.git`), `owner/name` or a bare `name`
    /// (owned by `default_owner`).
    pub fn parse(reference: &str, default_owner: &str) -> Result<Self> {
        let reference = reference.trim().trim_end_matches('/');
        if reference.is_empty() {
            return Err(Error::Input("repository reference is empty".into()));
        }

        let path = if let Some(path) = reference.strip_prefix("git@github.com:") {
            owner_and_name(reference, path)?
        } else if reference.contains("://") || reference.starts_with("github.com/") {
            let url = match reference.contains("://") {
                true => Url::parse(reference),
                false => Url::parse(&format!("https://{reference}")),
            }
            .map_err(|e| Error::Input(format!("`{reference}` is not a valid URL: {e}")))?;
            owner_and_name(reference, url.path())?
        } else {
            reference.to_string()
        };

        let repository = match path.split_once('/') {
            Some((owner, name)) => Self::new(owner, name.trim_end_matches(".git")),
            None => Self::new(default_owner, &path),
        };
        repository.validate(reference)?;
        Ok(repository)
    }

    fn validate(&self, reference: &str) -> Result<()> {
        fn valid(part: &str) -> bool {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        }
        if valid(&self.owner) && valid(&self.name) {
            Ok(())
        } else {
            Err(Error::Input(format!(
                "`{reference}` is not a valid repository reference"
            )))
        }
    }
}

/// First two path segments of a URL; anything after them (`/pulls`) is ignored.
fn owner_and_name(reference: &str, path: &str) -> Result<String> {
    let segments = path.split('/').filter(|s| !s.is_empty()).take(2).collect::<Vec<_>>();
    match segments.as_slice() {
        [owner, name] => Ok(format!("{owner}/{name}")),
        _ => Err(Error::Input(format!(
            "`{reference}` does not name a repository"
        ))),
    }
}

impl Display for Repository {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_url() {
        let repo = Repository::parse("https://github.com/rust-lang/cargo", "me").unwrap();
        assert_eq!(repo, Repository::new("rust-lang", "cargo"));
    }

    #[test]
    fn parses_url_with_trailing_path() {
        let repo = Repository::parse("https://github.com/rust-lang/cargo/pulls/", "me").unwrap();
        assert_eq!(repo.to_string(), "rust-lang/cargo");
        let repo = Repository::parse("git@github.com:rust-lang/cargo.git", "me").unwrap();
        assert_eq!(repo.to_string(), "rust-lang/cargo");
    }

    #[test]
    fn bare_name_uses_default_owner() {
        let repo = Repository::parse("dashboard", "octocat").unwrap();
        assert_eq!(repo, Repository::new("octocat", "dashboard"));
    }

    #[test]
    fn scheme_less_url_is_a_url() {
        let repo = Repository::parse("github.com/rust-lang/cargo", "me").unwrap();
        assert_eq!(repo.to_string(), "rust-lang/cargo");
    }

    #[test]
    fn pages_names_are_not_urls() {
        let repo = Repository::parse("octocat/octocat.github.com", "me").unwrap();
        assert_eq!(repo, Repository::new("octocat", "octocat.github.com"));
        let repo = Repository::parse("octocat.github.com", "octocat").unwrap();
        assert_eq!(repo, Repository::new("octocat", "octocat.github.com"));
        let repo = Repository::parse("https://github.com/octocat/octocat.github.com", "me").unwrap();
        assert_eq!(repo.to_string(), "octocat/octocat.github.com");
    }

    #[test]
    fn rejects_malformed_references() {
        assert!(matches!(Repository::parse("  ", "me"), Err(Error::Input(_))));
        assert!(matches!(
            Repository::parse("https://github.com/only-owner", "me"),
            Err(Error::Input(_))
        ));
        assert!(matches!(
            Repository::parse("has space", "me"),
            Err(Error::Input(_))
        ));
    }
}

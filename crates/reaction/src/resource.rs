//! Resolution of GitHub resource URLs into repository coordinates.
//!
//! Two address shapes are understood:
//!
//! | Host | Path | Result |
//! |------|------|--------|
//! | `github.com` | `/{owner}/{repo}/...` | owner + repo |
//! | `api.github.com` | `/{prefix}/{owner}/{repo}/{kind}/{number}` | owner + repo (+ number when present) |
//!
//! Anything else is unresolvable. Resolution never fails loudly: callers get
//! `None` and skip the reaction.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{IssueNumber, RepositoryName, RepositoryOwner};

const WEB_HOST: &str = "github.com";
const API_HOST: &str = "api.github.com";

/// Repository coordinates extracted from a resource URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Repository owner.
    pub owner: RepositoryOwner,
    /// Repository name.
    pub repo: RepositoryName,
    /// Issue or pull request number, only known for API URLs.
    pub number: Option<IssueNumber>,
}

impl ResourceRef {
    /// Narrows this reference to an addressable issue thread.
    ///
    /// Returns `None` when the URL did not carry a number.
    pub fn issue_target(&self) -> Option<IssueTarget> {
        self.number.map(|number| IssueTarget {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            number,
        })
    }
}

/// A fully addressed issue or pull request thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssueTarget {
    /// Repository owner.
    pub owner: RepositoryOwner,
    /// Repository name.
    pub repo: RepositoryName,
    /// Issue or pull request number.
    pub number: IssueNumber,
}

impl std::fmt::Display for IssueTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// Parses a web or REST API URL into a [`ResourceRef`].
///
/// Returns `None` for unknown hosts, unparseable URLs and paths that are too
/// short to name a repository. A number segment that is not an integer is
/// dropped rather than treated as an error.
pub fn resolve(url: &str) -> Option<ResourceRef> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.collect();

    match parsed.host_str()? {
        WEB_HOST => {
            let owner = RepositoryOwner::new(*segments.first()?)?;
            let repo = RepositoryName::new(*segments.get(1)?)?;
            Some(ResourceRef {
                owner,
                repo,
                number: None,
            })
        }
        API_HOST => {
            let owner = RepositoryOwner::new(*segments.get(1)?)?;
            let repo = RepositoryName::new(*segments.get(2)?)?;
            let number = segments
                .get(4)
                .and_then(|raw| raw.parse::<u64>().ok())
                .map(IssueNumber::new);
            Some(ResourceRef { owner, repo, number })
        }
        _ => None,
    }
}

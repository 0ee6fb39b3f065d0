//! Route state for page navigation.
//!
//! `/` is the directory list and `/user/{id}` the detail page of one user.

use std::fmt::{Display, Formatter};

use crate::{DirectoryError, UserId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Directory,
    UserDetail(UserId),
}

impl Route {
    /// Resolve a path. A malformed id under `/user/` is `InvalidId`; any other
    /// unmatched path is `UnknownRoute`.
    pub fn parse(path: &str) -> Result<Self, DirectoryError> {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');

        if normalized.is_empty() {
            return Ok(Self::Directory);
        }
        if let Some(raw_id) = normalized.strip_prefix("/user/") {
            return raw_id.parse().map(Self::UserDetail);
        }
        if normalized == "/user" {
            return Err(DirectoryError::InvalidId(String::new()));
        }
        Err(DirectoryError::UnknownRoute(trimmed.to_owned()))
    }

    pub fn path(&self) -> String {
        match self {
            Self::Directory => "/".to_owned(),
            Self::UserDetail(id) => format!("/user/{id}"),
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

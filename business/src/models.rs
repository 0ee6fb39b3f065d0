//! Wire types of the directory API.
//!
//! Field names follow the JSON served by `GET /users`; everything except `id`,
//! `name`, `email` and `company.name` is optional on the wire and defaults to an
//! empty string.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DirectoryError;

/// Identifier of a user. Always a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct UserId(u32);

impl UserId {
    pub fn new(id: u32) -> Result<Self, DirectoryError> {
        Self::try_from(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for UserId {
    type Error = DirectoryError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        if id == 0 {
            Err(DirectoryError::InvalidId(id.to_string()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<UserId> for u32 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl FromStr for UserId {
    type Err = DirectoryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        // `u32::from_str` accepts a leading '+', which is not a valid path id.
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DirectoryError::InvalidId(raw.to_owned()));
        }
        let id = trimmed
            .parse::<u32>()
            .map_err(|_| DirectoryError::InvalidId(raw.to_owned()))?;
        Self::try_from(id).map_err(|_| DirectoryError::InvalidId(raw.to_owned()))
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    /// Shown as the company tagline.
    #[serde(rename = "catchPhrase", default)]
    pub catch_phrase: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub suite: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
}

/// One user as served by the API. Never mutated after it is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    pub company: Company,
    #[serde(default)]
    pub address: Address,
}

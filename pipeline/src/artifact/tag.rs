use std::{fmt, str::FromStr};

use rand::{Rng, distr::Alphanumeric};

use crate::error::StoreErr;

/// Length of generated version ids.
pub const VERSION_LEN: usize = 16;

/// Version part of a tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    Latest,
    Pinned(String),
}

impl Version {
    /// Draws a fresh version id of lowercase letters and digits.
    pub fn generate<R: Rng>(rng: &mut R) -> String {
        rng.sample_iter(Alphanumeric)
            .take(VERSION_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Latest => f.write_str("latest"),
            Version::Pinned(v) => f.write_str(v),
        }
    }
}

/// A `name:version` reference to a stored model. A bare name means the latest
/// version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelTag {
    pub name: String,
    pub version: Version,
}

impl ModelTag {
    pub fn latest(name: &str) -> Result<Self, StoreErr> {
        check_part("name", name)?;
        Ok(Self {
            name: name.to_string(),
            version: Version::Latest,
        })
    }

    pub fn pinned(name: &str, version: &str) -> Result<Self, StoreErr> {
        check_part("name", name)?;
        check_part("version", version)?;
        if version == "latest" {
            return Err(StoreErr::InvalidTag(
                "\"latest\" is reserved and cannot be pinned".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            version: Version::Pinned(version.to_string()),
        })
    }
}

impl FromStr for ModelTag {
    type Err = StoreErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            None => Self::latest(s),
            Some((name, "latest")) => Self::latest(name),
            Some((name, version)) => Self::pinned(name, version),
        }
    }
}

impl fmt::Display for ModelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// Names and versions become directory names, so they are restricted to
/// `[A-Za-z0-9_.-]` and cannot start with a dot.
fn check_part(what: &str, part: &str) -> Result<(), StoreErr> {
    if part.is_empty() {
        return Err(StoreErr::InvalidTag(format!("empty {what}")));
    }
    if part.starts_with('.') {
        return Err(StoreErr::InvalidTag(format!("{what} {part:?} starts with a dot")));
    }
    if let Some(c) = part
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(StoreErr::InvalidTag(format!("{what} {part:?} contains {c:?}")));
    }
    Ok(())
}

//! OSGi-style version values.
//!
//! Descriptor schema selection parses the `version:` directive as an OSGi
//! version: `major[.minor[.micro[.qualifier]]]` with numeric segments. The
//! display form reproduces exactly the segments that were given, so a
//! directive of `1.2` selects the `/v1.2` schema rather than `/v1.2.0`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A parsed OSGi version value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Major segment (always present).
    pub major: u32,
    /// Minor segment, when given.
    pub minor: Option<u32>,
    /// Micro segment, when given.
    pub micro: Option<u32>,
    /// Qualifier segment, when given.
    pub qualifier: Option<String>,
}

/// Error produced when a version token cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a valid version: \"{token}\"")]
pub struct InvalidVersion {
    /// The rejected token.
    pub token: String,
}

fn numeric_segment(segment: &str, token: &str) -> Result<u32, InvalidVersion> {
    segment.parse().map_err(|_| InvalidVersion {
        token: token.to_owned(),
    })
}

fn qualifier_segment(segment: &str, token: &str) -> Result<String, InvalidVersion> {
    let valid = !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(segment.to_owned())
    } else {
        Err(InvalidVersion {
            token: token.to_owned(),
        })
    }
}

impl FromStr for Version {
    type Err = InvalidVersion;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        let mut segments = token.split('.');
        let major = match segments.next() {
            Some(first) if !first.is_empty() => numeric_segment(first, token)?,
            _ => {
                return Err(InvalidVersion {
                    token: token.to_owned(),
                });
            }
        };
        let minor = segments.next().map(|s| numeric_segment(s, token)).transpose()?;
        let micro = segments.next().map(|s| numeric_segment(s, token)).transpose()?;
        let qualifier = segments
            .next()
            .map(|s| qualifier_segment(s, token))
            .transpose()?;
        if segments.next().is_some() {
            return Err(InvalidVersion {
                token: token.to_owned(),
            });
        }
        Ok(Self {
            major,
            minor,
            micro,
            qualifier,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{minor}")?;
        }
        if let Some(micro) = self.micro {
            write!(f, ".{micro}")?;
        }
        if let Some(ref qualifier) = self.qualifier {
            write!(f, ".{qualifier}")?;
        }
        Ok(())
    }
}

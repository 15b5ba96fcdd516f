//! Fully-qualified unit names.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Ordered path segments locating a unit in its project, e.g.
/// `my_project.staging.orders`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fqn(Vec<String>);

impl Fqn {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromStr for Fqn {
    type Err = Infallible;

    /// Split on `.`, dropping empty segments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.split('.').filter(|segment| !segment.is_empty())))
    }
}

impl fmt::Display for Fqn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl From<Vec<String>> for Fqn {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl AsRef<[String]> for Fqn {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

//! Resource addressing.
//!
//! Every namespace and record has an address of the form
//! `content://<authority>/<namespace>[/<token>]`. Addresses are parsed and
//! resolved to a [`Target`] once at the boundary; the store itself works on
//! [`Namespace`] values.

use crate::error::{DayFlagError, Result};
use crate::model::Namespace;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_AUTHORITY: &str = "dayflags";

const SCHEME_PREFIX: &str = "content://";

/// A parsed `content://` address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUri {
    authority: String,
    segments: Vec<String>,
}

impl ResourceUri {
    /// Top-level address for `authority` (no path).
    #[must_use]
    pub fn root(authority: &str) -> Self {
        Self {
            authority: authority.to_string(),
            segments: Vec::new(),
        }
    }

    /// Canonical address of a namespace.
    #[must_use]
    pub fn namespace(authority: &str, namespace: Namespace) -> Self {
        Self::root(authority).join(namespace.path())
    }

    /// Parse an address.
    ///
    /// # Errors
    ///
    /// Returns [`DayFlagError::InvalidUri`] if the scheme is not `content`,
    /// the authority is empty, or a path segment is empty.
    pub fn parse(input: &str) -> Result<Self> {
        let rest = input
            .strip_prefix(SCHEME_PREFIX)
            .ok_or_else(|| DayFlagError::invalid_uri(input, "expected content:// scheme"))?;

        if rest.contains(['?', '#']) {
            return Err(DayFlagError::invalid_uri(
                input,
                "query and fragment parts are not supported",
            ));
        }

        let rest = rest.strip_suffix('/').unwrap_or(rest);
        let mut parts = rest.split('/');
        let authority = parts.next().unwrap_or_default();
        if authority.is_empty() {
            return Err(DayFlagError::invalid_uri(input, "missing authority"));
        }
        if authority.chars().any(char::is_whitespace) {
            return Err(DayFlagError::invalid_uri(input, "authority contains whitespace"));
        }

        let mut segments = Vec::new();
        for segment in parts {
            if segment.is_empty() {
                return Err(DayFlagError::invalid_uri(input, "empty path segment"));
            }
            segments.push(segment.to_string());
        }

        Ok(Self {
            authority: authority.to_string(),
            segments,
        })
    }

    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Append one path segment.
    #[must_use]
    pub fn join(mut self, segment: &str) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    /// Append a row id as the last path segment.
    #[must_use]
    pub fn with_appended_id(&self, id: i64) -> Self {
        self.clone().join(&id.to_string())
    }

    /// Parse the last path segment as a row id.
    #[must_use]
    pub fn last_id(&self) -> Option<i64> {
        self.segments.last().and_then(|s| s.parse().ok())
    }

    /// True if `self` is a strict prefix of `other` (same authority, fewer segments).
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.authority == other.authority
            && self.segments.len() < other.segments.len()
            && other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME_PREFIX}{}", self.authority)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for ResourceUri {
    type Err = DayFlagError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ResourceUri {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceUri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// What an address refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A whole namespace: `content://<authority>/<namespace>`.
    Collection(Namespace),
    /// One item: `content://<authority>/<namespace>/<token>`.
    Item(Namespace, String),
}

impl Target {
    /// Resolve an address under `authority`.
    ///
    /// Namespace segments are matched exactly (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns [`DayFlagError::InvalidArgument`] for a foreign authority, an
    /// unknown namespace, or a path deeper than one item token.
    pub fn resolve(uri: &ResourceUri, authority: &str) -> Result<Self> {
        let unknown = || DayFlagError::InvalidArgument {
            uri: uri.to_string(),
        };

        if uri.authority() != authority {
            return Err(unknown());
        }

        match uri.segments() {
            [ns] => ns
                .parse()
                .map(Self::Collection)
                .map_err(|_| unknown()),
            [ns, token] => ns
                .parse()
                .map(|ns| Self::Item(ns, token.clone()))
                .map_err(|_| unknown()),
            _ => Err(unknown()),
        }
    }

    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        match self {
            Self::Collection(ns) | Self::Item(ns, _) => *ns,
        }
    }
}

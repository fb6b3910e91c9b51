// src/component/release.rs

//! Release history entries

use super::LocaleMap;
use crate::pool::{RefStr, StringPool};
use std::sync::Arc;

/// Stability of a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReleaseKind {
    #[default]
    Unknown,
    Stable,
    Development,
}

impl ReleaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Stable => "stable",
            Self::Development => "development",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stable" => Some(Self::Stable),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// How urgently a release should be installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Urgency {
    #[default]
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// One entry of a component's release history
///
/// Releases are identified by version: adding a release whose version is
/// already present updates the existing entry instead of duplicating it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Release {
    pub version: Option<RefStr>,
    pub kind: ReleaseKind,
    /// Unix timestamp, 0 when unknown
    pub timestamp: u64,
    pub urgency: Urgency,
    /// Locale-keyed markup description
    pub description: LocaleMap,
    /// Download locations
    pub locations: Vec<RefStr>,
}

impl Release {
    /// Create a release for a version
    pub fn new(version: &str) -> Self {
        Self {
            version: Some(Arc::from(version)),
            ..Default::default()
        }
    }

    /// Set the release timestamp
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set the description for a locale (`None` is the untranslated `C` locale)
    pub fn with_description(mut self, locale: Option<&str>, markup: &str) -> Self {
        self.description
            .insert(Arc::from(locale.unwrap_or("C")), Arc::from(markup));
        self
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }

    /// Whether two entries describe the same release
    pub fn same_release(&self, other: &Release) -> bool {
        self.version.is_some() && self.version == other.version
    }

    /// Fold another entry for the same version into this one
    ///
    /// An entry with a description is preferred over one without; other
    /// fields are only filled where this entry has nothing.
    pub fn absorb(&mut self, other: &Release) {
        if !self.has_description() && other.has_description() {
            self.description = other.description.clone();
        }
        if self.timestamp == 0 {
            self.timestamp = other.timestamp;
        }
        if self.kind == ReleaseKind::Unknown {
            self.kind = other.kind;
        }
        if self.urgency == Urgency::Unknown {
            self.urgency = other.urgency;
        }
        for location in &other.locations {
            if !self.locations.contains(location) {
                self.locations.push(Arc::clone(location));
            }
        }
    }

    pub(crate) fn intern(&mut self, pool: &StringPool) {
        if let Some(version) = self.version.as_mut() {
            pool.intern_in_place(version);
        }
        for location in &mut self.locations {
            pool.intern_in_place(location);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_prefers_description() {
        let mut bare = Release::new("1.0").with_timestamp(100);
        let described = Release::new("1.0")
            .with_timestamp(200)
            .with_description(None, "<p>Fixes</p>");

        bare.absorb(&described);
        assert!(bare.has_description());
        // Existing timestamp is kept
        assert_eq!(bare.timestamp, 100);
    }

    #[test]
    fn test_absorb_keeps_existing_description() {
        let mut a = Release::new("1.0").with_description(None, "<p>Original</p>");
        let b = Release::new("1.0").with_description(None, "<p>Other</p>");
        a.absorb(&b);
        assert_eq!(a.description.get("C").map(|s| &**s), Some("<p>Original</p>"));
    }

    #[test]
    fn test_same_release() {
        assert!(Release::new("1.0").same_release(&Release::new("1.0")));
        assert!(!Release::new("1.0").same_release(&Release::new("1.1")));
        assert!(!Release::default().same_release(&Release::default()));
    }

    #[test]
    fn test_urgency_parse_and_order() {
        assert_eq!(Urgency::parse("high"), Some(Urgency::High));
        assert!(Urgency::Critical > Urgency::Low);
        assert_eq!(ReleaseKind::parse("development"), Some(ReleaseKind::Development));
    }
}

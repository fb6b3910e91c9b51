// src/component/identity.rs

//! Unique IDs
//!
//! A unique ID joins the six identity attributes of a component with `/`:
//!
//! ```text
//! scope/bundle-kind/origin/kind/id/branch
//! system/flatpak/flathub/desktop/org.gnome.Maps.desktop/stable
//! ```
//!
//! Unset attributes are written as the `*` wildcard, and a `*` segment
//! matches anything when two unique IDs are compared.

use super::{BundleKind, ComponentKind, Scope};
use crate::error::{Error, Result};
use std::fmt;

/// Placeholder for an unset unique-ID segment
pub const UNIQUE_ID_WILDCARD: &str = "*";

/// Number of segments in a unique ID
pub const UNIQUE_ID_SEGMENTS: usize = 6;

/// Parsed form of a unique ID
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UniqueId {
    pub scope: Scope,
    pub bundle_kind: BundleKind,
    pub origin: Option<String>,
    pub kind: ComponentKind,
    pub id: Option<String>,
    pub branch: Option<String>,
}

impl UniqueId {
    /// Parse `scope/bundle/origin/kind/id/branch`
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != UNIQUE_ID_SEGMENTS {
            return Err(Error::InvalidUniqueId(s.to_string()));
        }

        let text = |segment: &str| {
            if segment == UNIQUE_ID_WILDCARD || segment.is_empty() {
                None
            } else {
                Some(segment.to_string())
            }
        };

        Ok(Self {
            scope: Scope::parse(parts[0]).unwrap_or_default(),
            bundle_kind: BundleKind::parse(parts[1]).unwrap_or_default(),
            origin: text(parts[2]),
            kind: ComponentKind::parse(parts[3]).unwrap_or_default(),
            id: text(parts[4]),
            branch: text(parts[5]),
        })
    }

    /// Build the canonical string form
    pub fn build(
        scope: Scope,
        bundle_kind: BundleKind,
        origin: Option<&str>,
        kind: ComponentKind,
        id: Option<&str>,
        branch: Option<&str>,
    ) -> String {
        let segment = |value: Option<&str>| match value {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => UNIQUE_ID_WILDCARD.to_string(),
        };
        let known = |value: &'static str, unknown: bool| {
            if unknown {
                UNIQUE_ID_WILDCARD
            } else {
                value
            }
        };

        [
            known(scope.as_str(), scope == Scope::Unknown).to_string(),
            known(bundle_kind.as_str(), bundle_kind == BundleKind::Unknown).to_string(),
            segment(origin),
            known(kind.as_str(), kind == ComponentKind::Unknown).to_string(),
            segment(id),
            segment(branch),
        ]
        .join("/")
    }
}

impl fmt::Display for UniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::build(
            self.scope,
            self.bundle_kind,
            self.origin.as_deref(),
            self.kind,
            self.id.as_deref(),
            self.branch.as_deref(),
        ))
    }
}

/// Check that a string has the six-segment unique ID shape
pub fn unique_id_valid(s: &str) -> bool {
    s.split('/').count() == UNIQUE_ID_SEGMENTS
}

/// Compare two unique IDs segment by segment, treating `*` as a wildcard
///
/// Strings that are not valid unique IDs only compare equal when identical.
pub fn unique_id_equal(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    if !unique_id_valid(a) || !unique_id_valid(b) {
        return false;
    }
    a.split('/').zip(b.split('/')).all(|(x, y)| {
        x == UNIQUE_ID_WILDCARD || y == UNIQUE_ID_WILDCARD || x == y
    })
}

/// Whether a unique ID contains any wildcard segment
pub fn unique_id_has_wildcard(s: &str) -> bool {
    s.split('/').any(|segment| segment == UNIQUE_ID_WILDCARD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_wildcards() {
        let uid = UniqueId::build(
            Scope::System,
            BundleKind::Unknown,
            None,
            ComponentKind::Desktop,
            Some("org.gnome.Maps.desktop"),
            None,
        );
        assert_eq!(uid, "system/*/*/desktop/org.gnome.Maps.desktop/*");
    }

    #[test]
    fn test_parse_and_display() {
        let s = "user/flatpak/flathub/desktop/org.gnome.Maps.desktop/stable";
        let uid = UniqueId::parse(s).unwrap();
        assert_eq!(uid.scope, Scope::User);
        assert_eq!(uid.bundle_kind, BundleKind::Flatpak);
        assert_eq!(uid.origin.as_deref(), Some("flathub"));
        assert_eq!(uid.kind, ComponentKind::Desktop);
        assert_eq!(uid.branch.as_deref(), Some("stable"));
        assert_eq!(uid.to_string(), s);
    }

    #[test]
    fn test_parse_rejects_wrong_segment_count() {
        assert!(matches!(
            UniqueId::parse("system/desktop/foo"),
            Err(Error::InvalidUniqueId(_))
        ));
    }

    #[test]
    fn test_equal_with_wildcards() {
        let concrete = "system/package/fedora/desktop/foo.desktop/*";
        assert!(unique_id_equal(concrete, concrete));
        assert!(unique_id_equal("*/*/*/*/foo.desktop/*", concrete));
        assert!(unique_id_equal(concrete, "*/*/*/*/foo.desktop/*"));
        assert!(!unique_id_equal("user/*/*/*/foo.desktop/*", concrete));
        assert!(!unique_id_equal("*/*/*/*/bar.desktop/*", concrete));
        assert!(!unique_id_equal("foo.desktop", concrete));
        assert!(unique_id_equal("foo.desktop", "foo.desktop"));
    }

    #[test]
    fn test_has_wildcard() {
        assert!(unique_id_has_wildcard("*/*/*/*/foo.desktop/*"));
        assert!(!unique_id_has_wildcard("system/package/fedora/desktop/foo.desktop/master"));
    }
}

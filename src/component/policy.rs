// src/component/policy.rs

//! Content ratings, agreements and user reviews

use super::LocaleMap;
use crate::pool::RefStr;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Intensity of one content rating attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum RatingValue {
    #[default]
    Unknown,
    None,
    Mild,
    Moderate,
    Intense,
}

impl RatingValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::None => "none",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Intense => "intense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "mild" => Some(Self::Mild),
            "moderate" => Some(Self::Moderate),
            "intense" => Some(Self::Intense),
            _ => None,
        }
    }
}

/// A content rating (e.g. OARS) with its attribute values
///
/// A component carries at most one rating per kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRating {
    pub kind: RefStr,
    pub attributes: BTreeMap<RefStr, RatingValue>,
}

impl ContentRating {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: Arc::from(kind),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, id: &str, value: RatingValue) -> Self {
        self.attributes.insert(Arc::from(id), value);
        self
    }

    /// Value of one attribute; missing attributes rate `None`
    pub fn value(&self, id: &str) -> RatingValue {
        self.attributes.get(id).copied().unwrap_or(RatingValue::None)
    }
}

/// Kind of a user agreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AgreementKind {
    #[default]
    Unknown,
    Generic,
    Eula,
    Privacy,
}

impl AgreementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Generic => "generic",
            Self::Eula => "eula",
            Self::Privacy => "privacy",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "generic" => Some(Self::Generic),
            "eula" => Some(Self::Eula),
            "privacy" => Some(Self::Privacy),
            _ => None,
        }
    }
}

/// One section of an agreement
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AgreementSection {
    pub kind: Option<RefStr>,
    pub name: LocaleMap,
    pub description: LocaleMap,
}

/// A versioned agreement the user has to accept
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Agreement {
    pub kind: AgreementKind,
    pub version_id: Option<RefStr>,
    pub sections: Vec<AgreementSection>,
}

impl Agreement {
    pub fn new(kind: AgreementKind, version_id: &str) -> Self {
        Self {
            kind,
            version_id: Some(Arc::from(version_id)),
            sections: Vec::new(),
        }
    }

    /// Agreements are identified by kind and version
    pub fn same_agreement(&self, other: &Agreement) -> bool {
        self.kind == other.kind && self.version_id == other.version_id
    }
}

/// A user review
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Review {
    pub id: Option<RefStr>,
    pub summary: Option<RefStr>,
    pub description: Option<RefStr>,
    pub reviewer_name: Option<RefStr>,
    pub locale: Option<RefStr>,
    pub version: Option<RefStr>,
    /// Rating out of 100
    pub rating: u8,
    /// Unix timestamp, 0 when unknown
    pub date: u64,
}

impl Review {
    pub fn new(id: &str, rating: u8) -> Self {
        Self {
            id: Some(Arc::from(id)),
            rating,
            ..Default::default()
        }
    }

    /// Reviews with an ID are identified by it; anonymous ones by content
    pub fn same_review(&self, other: &Review) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

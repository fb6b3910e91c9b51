// src/component/format.rs

//! Source formats contributing to a component
//!
//! Every source that contributed data to a component leaves a `Format`
//! behind: its kind and, where known, the file it came from. The format
//! list is how the store knows which components a changed file owns, and
//! the format kinds drive precedence when two sources describe the same ID.

use crate::pool::{RefStr, StringPool};
use std::fmt;
use std::sync::Arc;

/// Kind of source a component was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatKind {
    #[default]
    Unknown,
    /// Remote catalog (AppStream collection XML or DEP-11 YAML)
    AppStream,
    /// Installed AppData file
    AppData,
    /// Installed MetaInfo file
    MetaInfo,
    /// Installed desktop launcher
    Desktop,
}

impl FormatKind {
    /// Get the string representation of the format kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::AppStream => "appstream",
            Self::AppData => "appdata",
            Self::MetaInfo => "metainfo",
            Self::Desktop => "desktop",
        }
    }

    /// Parse a format kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "appstream" => Some(Self::AppStream),
            "appdata" => Some(Self::AppData),
            "metainfo" => Some(Self::MetaInfo),
            "desktop" => Some(Self::Desktop),
            _ => None,
        }
    }

    /// Guess the format kind from a file name
    pub fn guess_from_filename(filename: &str) -> Self {
        const RULES: &[(&str, FormatKind)] = &[
            (".appdata.xml", FormatKind::AppData),
            (".appdata.xml.in", FormatKind::AppData),
            (".metainfo.xml", FormatKind::MetaInfo),
            (".metainfo.xml.in", FormatKind::MetaInfo),
            (".desktop", FormatKind::Desktop),
            (".desktop.in", FormatKind::Desktop),
            (".xml.gz", FormatKind::AppStream),
            (".yml", FormatKind::AppStream),
            (".yml.gz", FormatKind::AppStream),
            (".yaml", FormatKind::AppStream),
            (".xml", FormatKind::AppStream),
        ];
        RULES
            .iter()
            .find(|(suffix, _)| filename.ends_with(suffix))
            .map(|(_, kind)| *kind)
            .unwrap_or(Self::Unknown)
    }

    /// Formats describing software installed on this machine
    pub fn is_local(&self) -> bool {
        matches!(self, Self::AppData | Self::MetaInfo | Self::Desktop)
    }

    /// Installed companion metadata (not a bare launcher)
    pub fn is_local_metadata(&self) -> bool {
        matches!(self, Self::AppData | Self::MetaInfo)
    }

    /// Formats coming from a remote catalog
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::AppStream)
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One contributing source of a component
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Format {
    kind: FormatKind,
    filename: Option<RefStr>,
}

impl Format {
    /// Create a format of a known kind with no file
    pub fn new(kind: FormatKind) -> Self {
        Self {
            kind,
            filename: None,
        }
    }

    /// Create a format for a file, guessing the kind from its name
    pub fn from_filename(filename: &str) -> Self {
        Self::new(FormatKind::Unknown).with_filename(filename)
    }

    /// Attach a source filename
    ///
    /// An unknown kind is guessed from the name.
    pub fn with_filename(mut self, filename: &str) -> Self {
        self.set_filename(filename);
        self
    }

    /// Set the source filename, guessing the kind when it is still unknown
    pub fn set_filename(&mut self, filename: &str) {
        if self.kind == FormatKind::Unknown {
            self.kind = FormatKind::guess_from_filename(filename);
        }
        self.filename = Some(Arc::from(filename));
    }

    /// Set the format kind
    pub fn set_kind(&mut self, kind: FormatKind) {
        self.kind = kind;
    }

    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub(crate) fn intern(&mut self, pool: &StringPool) {
        if let Some(filename) = self.filename.as_mut() {
            pool.intern_in_place(filename);
        }
    }
}

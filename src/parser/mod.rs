// src/parser/mod.rs

//! Source parsers
//!
//! The store consumes fully populated [`Component`] records; turning bytes
//! into those records is the job of a [`Parser`]. The built-in
//! [`SourceParser`] picks a dialect from the source file name:
//!
//! - `*.xml`: AppStream collections (`<components>`) and single
//!   AppData/MetaInfo documents (`<component>`)
//! - `*.yml` / `*.yaml`: DEP-11 collections
//! - `*.desktop`: desktop entries
//!
//! Every parsed component is stamped with a [`Format`] naming its source
//! file, and with the scope and architecture of the load that read it.

mod desktop;
mod node;
mod xml;
mod yaml;

pub use desktop::DesktopParser;
pub use node::{NodeId, NodeTree};
pub use xml::XmlParser;
pub use yaml::YamlParser;

use crate::component::{Component, Format, FormatKind, Scope};
use thiserror::Error;

/// Errors raised while turning a source into components
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid XML: {0}")]
    Xml(String),

    #[error("invalid YAML: {0}")]
    Yaml(String),

    #[error("invalid desktop entry: {0}")]
    Desktop(String),

    #[error("source is not valid UTF-8")]
    Encoding,

    #[error("component has no <id>")]
    MissingId,

    #[error("unsupported source format: {0}")]
    UnsupportedFormat(String),
}

/// Where a source came from and how its components should be stamped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceInfo {
    /// Path or name of the source; drives format detection
    pub filename: Option<String>,
    pub scope: Scope,
    pub arch: Option<String>,
}

impl SourceInfo {
    pub fn new(filename: &str) -> Self {
        Self {
            filename: Some(filename.to_string()),
            ..Default::default()
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_arch(mut self, arch: Option<&str>) -> Self {
        self.arch = arch.map(str::to_string);
        self
    }

    /// Format kind guessed from the file name
    pub fn format_kind(&self) -> FormatKind {
        self.filename
            .as_deref()
            .map(FormatKind::guess_from_filename)
            .unwrap_or_default()
    }

    /// Final path segment of the file name
    pub fn basename(&self) -> Option<&str> {
        self.filename
            .as_deref()
            .and_then(|f| f.rsplit('/').next())
            .filter(|b| !b.is_empty())
    }

    /// Apply format, scope and architecture to a freshly parsed component
    pub(crate) fn stamp(&self, component: &mut Component, kind: FormatKind) {
        let mut format = Format::new(kind);
        if let Some(filename) = self.filename.as_deref() {
            format.set_filename(filename);
        }
        component.add_format(format);
        if self.scope != Scope::Unknown {
            component.set_scope(self.scope);
        }
        if let Some(arch) = self.arch.as_deref() {
            component.add_architecture(arch);
        }
    }
}

/// Turns source bytes into component records
pub trait Parser: Send + Sync {
    fn parse(&self, bytes: &[u8], source: &SourceInfo) -> Result<Vec<Component>, ParseError>;
}

/// Dispatches to the built-in parser matching a source's file name
#[derive(Debug, Default)]
pub struct SourceParser {
    xml: XmlParser,
    yaml: YamlParser,
    desktop: DesktopParser,
}

impl SourceParser {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Parser for SourceParser {
    fn parse(&self, bytes: &[u8], source: &SourceInfo) -> Result<Vec<Component>, ParseError> {
        let name = source.filename.as_deref().unwrap_or_default();
        if name.ends_with(".yml") || name.ends_with(".yaml") {
            return self.yaml.parse(bytes, source);
        }
        match source.format_kind() {
            FormatKind::Desktop => self.desktop.parse(bytes, source),
            FormatKind::AppStream | FormatKind::AppData | FormatKind::MetaInfo
                if !name.ends_with(".gz") =>
            {
                self.xml.parse(bytes, source)
            }
            // in-memory sources without a usable name: sniff for XML
            FormatKind::Unknown if bytes.trim_ascii_start().starts_with(b"<") => {
                self.xml.parse(bytes, source)
            }
            _ => Err(ParseError::UnsupportedFormat(name.to_string())),
        }
    }
}

pub(crate) fn utf8(bytes: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|_| ParseError::Encoding)
}

// src/component/relations.rs

//! What a component provides, requires, suggests and how it is delivered
//!
//! All of these are plain values compared field-by-field, which is what the
//! duplicate-checked `Component::add_*` operations rely on.

use super::BundleKind;
use crate::pool::{RefStr, StringPool};
use std::sync::Arc;

/// Kind of a provided item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProvideKind {
    #[default]
    Unknown,
    Library,
    Binary,
    Font,
    Modalias,
    FirmwareRuntime,
    FirmwareFlashed,
    Python2,
    Python3,
    DbusSession,
    DbusSystem,
    /// Another component ID this one supersedes
    Id,
    MediaType,
}

impl ProvideKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Library => "library",
            Self::Binary => "binary",
            Self::Font => "font",
            Self::Modalias => "modalias",
            Self::FirmwareRuntime => "firmware-runtime",
            Self::FirmwareFlashed => "firmware-flashed",
            Self::Python2 => "python2",
            Self::Python3 => "python3",
            Self::DbusSession => "dbus-session",
            Self::DbusSystem => "dbus-system",
            Self::Id => "id",
            Self::MediaType => "mediatype",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "library" => Some(Self::Library),
            "binary" => Some(Self::Binary),
            "font" => Some(Self::Font),
            "modalias" => Some(Self::Modalias),
            "firmware-runtime" => Some(Self::FirmwareRuntime),
            "firmware-flashed" => Some(Self::FirmwareFlashed),
            "python2" => Some(Self::Python2),
            "python3" => Some(Self::Python3),
            "dbus-session" => Some(Self::DbusSession),
            "dbus-system" => Some(Self::DbusSystem),
            "id" => Some(Self::Id),
            "mediatype" | "mimetype" => Some(Self::MediaType),
            _ => None,
        }
    }
}

/// Something a component provides to the system
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Provide {
    pub kind: ProvideKind,
    pub value: RefStr,
}

impl Provide {
    pub fn new(kind: ProvideKind, value: &str) -> Self {
        Self {
            kind,
            value: Arc::from(value),
        }
    }
}

/// How a component can be launched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LaunchableKind {
    #[default]
    Unknown,
    DesktopId,
    Service,
    CockpitManifest,
    Url,
}

impl LaunchableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::DesktopId => "desktop-id",
            Self::Service => "service",
            Self::CockpitManifest => "cockpit-manifest",
            Self::Url => "url",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "desktop-id" => Some(Self::DesktopId),
            "service" => Some(Self::Service),
            "cockpit-manifest" => Some(Self::CockpitManifest),
            "url" => Some(Self::Url),
            _ => None,
        }
    }
}

/// A launch entry point
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Launchable {
    pub kind: LaunchableKind,
    pub value: RefStr,
}

impl Launchable {
    pub fn new(kind: LaunchableKind, value: &str) -> Self {
        Self {
            kind,
            value: Arc::from(value),
        }
    }
}

/// A delivery bundle (flatpak ref, snap name, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bundle {
    pub kind: BundleKind,
    pub id: RefStr,
    pub runtime: Option<RefStr>,
    pub sdk: Option<RefStr>,
}

impl Bundle {
    pub fn new(kind: BundleKind, id: &str) -> Self {
        Self {
            kind,
            id: Arc::from(id),
            runtime: None,
            sdk: None,
        }
    }

    /// Bundles are identified by kind and ID
    pub fn same_bundle(&self, other: &Bundle) -> bool {
        self.kind == other.kind && self.id == other.id
    }
}

/// Translation system used by a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TranslationKind {
    #[default]
    Unknown,
    Gettext,
    Qt,
}

impl TranslationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Gettext => "gettext",
            Self::Qt => "qt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "gettext" => Some(Self::Gettext),
            "qt" => Some(Self::Qt),
            _ => None,
        }
    }
}

/// Translation domain of a component
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Translation {
    pub kind: TranslationKind,
    pub id: RefStr,
}

impl Translation {
    pub fn new(kind: TranslationKind, id: &str) -> Self {
        Self {
            kind,
            id: Arc::from(id),
        }
    }
}

/// Who suggested related components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SuggestKind {
    #[default]
    Unknown,
    Upstream,
    Heuristic,
}

impl SuggestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Upstream => "upstream",
            Self::Heuristic => "heuristic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "upstream" => Some(Self::Upstream),
            "heuristic" => Some(Self::Heuristic),
            _ => None,
        }
    }
}

/// Related components a user may also want
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Suggest {
    pub kind: SuggestKind,
    pub ids: Vec<RefStr>,
}

impl Suggest {
    pub fn new(kind: SuggestKind) -> Self {
        Self {
            kind,
            ids: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.ids.push(Arc::from(id));
        self
    }
}

/// What a requirement refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequireKind {
    #[default]
    Unknown,
    Id,
    Firmware,
    Hardware,
    Modalias,
    Kernel,
    Memory,
}

impl RequireKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Id => "id",
            Self::Firmware => "firmware",
            Self::Hardware => "hardware",
            Self::Modalias => "modalias",
            Self::Kernel => "kernel",
            Self::Memory => "memory",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "id" => Some(Self::Id),
            "firmware" => Some(Self::Firmware),
            "hardware" => Some(Self::Hardware),
            "modalias" => Some(Self::Modalias),
            "kernel" => Some(Self::Kernel),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Version comparison of a requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequireCompare {
    #[default]
    Unknown,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Glob,
    Regex,
}

impl RequireCompare {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Gt => "gt",
            Self::Le => "le",
            Self::Ge => "ge",
            Self::Glob => "glob",
            Self::Regex => "regex",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "lt" => Some(Self::Lt),
            "gt" => Some(Self::Gt),
            "le" => Some(Self::Le),
            "ge" => Some(Self::Ge),
            "glob" => Some(Self::Glob),
            "regex" => Some(Self::Regex),
            _ => None,
        }
    }
}

/// A requirement on the target system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Require {
    pub kind: RequireKind,
    pub compare: RequireCompare,
    pub value: Option<RefStr>,
    pub version: Option<RefStr>,
}

impl Require {
    pub fn new(kind: RequireKind, value: &str) -> Self {
        Self {
            kind,
            value: Some(Arc::from(value)),
            ..Default::default()
        }
    }

    pub fn with_version(mut self, compare: RequireCompare, version: &str) -> Self {
        self.compare = compare;
        self.version = Some(Arc::from(version));
        self
    }
}

pub(crate) fn intern_provide(provide: &mut Provide, pool: &StringPool) {
    pool.intern_in_place(&mut provide.value);
}

pub(crate) fn intern_launchable(launchable: &mut Launchable, pool: &StringPool) {
    pool.intern_in_place(&mut launchable.value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provide_kind_aliases() {
        assert_eq!(ProvideKind::parse("mimetype"), Some(ProvideKind::MediaType));
        assert_eq!(ProvideKind::parse("mediatype"), Some(ProvideKind::MediaType));
        assert_eq!(ProvideKind::FirmwareFlashed.as_str(), "firmware-flashed");
    }

    #[test]
    fn test_same_bundle_ignores_runtime() {
        let mut a = Bundle::new(BundleKind::Flatpak, "app/org.foo.Bar/x86_64/stable");
        let b = Bundle::new(BundleKind::Flatpak, "app/org.foo.Bar/x86_64/stable");
        a.runtime = Some(Arc::from("org.gnome.Platform"));
        assert!(a.same_bundle(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_require_with_version() {
        let req = Require::new(RequireKind::Firmware, "bootloader")
            .with_version(RequireCompare::Ge, "1.2.3");
        assert_eq!(req.compare, RequireCompare::Ge);
        assert_eq!(req.version.as_deref(), Some("1.2.3"));
    }
}

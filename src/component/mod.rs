// src/component/mod.rs

//! Component records
//!
//! A `Component` is one software item (application, font, firmware, addon,
//! ...) as described by one or more sources. The store never holds two
//! records for the same identity; instead later descriptions are folded into
//! earlier ones with [`Component::subsume_from`].
//!
//! # Identity
//!
//! Six attributes identify a component: scope, bundle kind, origin, kind, id
//! and branch. Each may be unset, and an unset attribute acts as a wildcard
//! in [`Component::identity_equal`]:
//!
//! ```ignore
//! use appcatalog::component::{Component, Scope};
//!
//! let mut stored = Component::new("org.gnome.Maps.desktop");
//! stored.set_scope(Scope::System);
//! stored.set_origin(Some("fedora"));
//!
//! let query = Component::new("org.gnome.Maps.desktop");
//! assert!(query.identity_equal(&stored));
//! ```
//!
//! The bundle kind is derived rather than stored: the first bundle's kind,
//! else `package` when package names are present.
//!
//! # Formats and state
//!
//! Every contributing source leaves a [`Format`] on the component. The
//! installation [`State`] is derived from them: any locally installed format
//! makes the component installed, a remote catalog entry makes it available.

mod flags;
mod format;
mod identity;
mod media;
mod policy;
mod relations;
mod release;
mod subsume;

pub use flags::{ProblemFlags, Quirks};
pub use format::{Format, FormatKind};
pub use identity::{
    unique_id_equal, unique_id_has_wildcard, unique_id_valid, UniqueId, UNIQUE_ID_WILDCARD,
};
pub use media::{Icon, IconKind, Image, ImageKind, Screenshot, ScreenshotKind};
pub use policy::{
    Agreement, AgreementKind, AgreementSection, ContentRating, RatingValue, Review,
};
pub use relations::{
    Bundle, Launchable, LaunchableKind, Provide, ProvideKind, Require, RequireCompare,
    RequireKind, Suggest, SuggestKind, Translation, TranslationKind,
};
pub use release::{Release, ReleaseKind, Urgency};
pub use subsume::SubsumeFlags;

use crate::error::Result;
use crate::pool::{RefStr, StringPool};
use crate::search::TokenCache;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Locale-keyed text; the untranslated value lives under `C`
pub type LocaleMap = BTreeMap<RefStr, RefStr>;

/// Locale used for untranslated values
pub const DEFAULT_LOCALE: &str = "C";

/// Whether a component was installed system-wide or per-user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    Unknown,
    System,
    User,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::System => "system",
            Self::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Packaging technology that delivered a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BundleKind {
    #[default]
    Unknown,
    Package,
    Flatpak,
    Snap,
    Cabinet,
    AppImage,
    Limba,
}

impl BundleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Package => "package",
            Self::Flatpak => "flatpak",
            Self::Snap => "snap",
            Self::Cabinet => "cabinet",
            Self::AppImage => "appimage",
            Self::Limba => "limba",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "package" => Some(Self::Package),
            "flatpak" => Some(Self::Flatpak),
            "snap" => Some(Self::Snap),
            "cabinet" => Some(Self::Cabinet),
            "appimage" => Some(Self::AppImage),
            "limba" => Some(Self::Limba),
            _ => None,
        }
    }
}

impl fmt::Display for BundleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What sort of software a component is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentKind {
    #[default]
    Unknown,
    Desktop,
    Console,
    WebApp,
    Font,
    Codec,
    InputMethod,
    Addon,
    Firmware,
    Runtime,
    Driver,
    Localization,
    ShellExtension,
    OsUpgrade,
    Generic,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Desktop => "desktop",
            Self::Console => "console-application",
            Self::WebApp => "web-application",
            Self::Font => "font",
            Self::Codec => "codec",
            Self::InputMethod => "inputmethod",
            Self::Addon => "addon",
            Self::Firmware => "firmware",
            Self::Runtime => "runtime",
            Self::Driver => "driver",
            Self::Localization => "localization",
            Self::ShellExtension => "shell-extension",
            Self::OsUpgrade => "operating-system",
            Self::Generic => "generic",
        }
    }

    /// Parse a kind, accepting the spellings used by the different formats
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "desktop" | "desktop-application" | "desktop-app" => Some(Self::Desktop),
            "console-application" | "console" => Some(Self::Console),
            "web-application" | "webapp" => Some(Self::WebApp),
            "font" => Some(Self::Font),
            "codec" => Some(Self::Codec),
            "inputmethod" | "input-method" => Some(Self::InputMethod),
            "addon" => Some(Self::Addon),
            "firmware" => Some(Self::Firmware),
            "runtime" => Some(Self::Runtime),
            "driver" => Some(Self::Driver),
            "localization" => Some(Self::Localization),
            "shell-extension" => Some(Self::ShellExtension),
            "operating-system" | "os-upgrade" => Some(Self::OsUpgrade),
            "generic" => Some(Self::Generic),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marks a record as a patch applied to other components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MergeKind {
    /// A standalone component
    #[default]
    None,
    /// Add the patch's data to matching components
    Append,
    /// Replace matching components' collections with the patch's data
    Replace,
}

impl MergeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Append => "append",
            Self::Replace => "replace",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "append" => Some(Self::Append),
            "replace" => Some(Self::Replace),
            _ => None,
        }
    }

    pub fn is_patch(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Installation state derived from a component's formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    #[default]
    Unknown,
    /// Described by a remote catalog only
    Available,
    /// Described by locally installed metadata
    Installed,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Available => "available",
            Self::Installed => "installed",
        }
    }
}

/// One catalog record
#[derive(Debug, Clone, Default)]
pub struct Component {
    // identity
    scope: Scope,
    origin: Option<RefStr>,
    kind: ComponentKind,
    id: Option<RefStr>,
    branch: Option<RefStr>,
    unique_id: OnceLock<RefStr>,

    formats: Vec<Format>,
    priority: i32,
    merge_kind: MergeKind,
    quirks: Quirks,
    problems: ProblemFlags,

    // scalar metadata
    project_license: Option<RefStr>,
    metadata_license: Option<RefStr>,
    project_group: Option<RefStr>,
    source_pkgname: Option<RefStr>,

    // locale-keyed text
    names: LocaleMap,
    comments: LocaleMap,
    descriptions: LocaleMap,
    developer_names: LocaleMap,
    keywords: BTreeMap<RefStr, Vec<RefStr>>,
    urls: BTreeMap<RefStr, RefStr>,
    metadata: BTreeMap<RefStr, RefStr>,

    // free lists
    categories: Vec<RefStr>,
    kudos: Vec<RefStr>,
    permissions: Vec<RefStr>,
    mimetypes: Vec<RefStr>,
    pkgnames: Vec<RefStr>,
    architectures: Vec<RefStr>,
    extends: Vec<RefStr>,
    vetoes: Vec<RefStr>,

    // object collections
    releases: Vec<Release>,
    provides: Vec<Provide>,
    launchables: Vec<Launchable>,
    screenshots: Vec<Screenshot>,
    reviews: Vec<Review>,
    icons: Vec<Icon>,
    bundles: Vec<Bundle>,
    translations: Vec<Translation>,
    suggests: Vec<Suggest>,
    requires: Vec<Require>,
    content_ratings: Vec<ContentRating>,
    agreements: Vec<Agreement>,

    /// Unique IDs of attached addons
    addons: Vec<RefStr>,

    pub(crate) token_cache: OnceLock<TokenCache>,
}

fn localized<'a>(map: &'a LocaleMap, locale: Option<&str>) -> Option<&'a str> {
    let key = locale.unwrap_or(DEFAULT_LOCALE);
    map.get(key)
        .or_else(|| map.get(DEFAULT_LOCALE))
        .map(|v| &**v)
}

fn push_unique(list: &mut Vec<RefStr>, value: &str) {
    if !list.iter().any(|v| &**v == value) {
        list.push(Arc::from(value));
    }
}

fn opt_str(value: Option<&str>) -> Option<RefStr> {
    value.filter(|v| !v.is_empty()).map(Arc::from)
}

impl Component {
    /// Create a component with an ID
    pub fn new(id: &str) -> Self {
        let mut component = Self::default();
        component.set_id(id);
        component
    }

    /// Build a query object from a unique ID; `*` segments stay unset
    pub fn from_unique_id(unique_id: &str) -> Result<Self> {
        let parsed = UniqueId::parse(unique_id)?;
        let mut component = Self {
            scope: parsed.scope,
            kind: parsed.kind,
            origin: parsed.origin.as_deref().map(Arc::from),
            id: parsed.id.as_deref().map(Arc::from),
            branch: parsed.branch.as_deref().map(Arc::from),
            ..Default::default()
        };
        if parsed.bundle_kind != BundleKind::Unknown {
            let bundle_id = parsed.id.as_deref().unwrap_or_default();
            component.bundles.push(Bundle::new(parsed.bundle_kind, bundle_id));
        }
        Ok(component)
    }

    // ------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub(crate) fn id_ref(&self) -> Option<&RefStr> {
        self.id.as_ref()
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Bundle kind derived from bundles, then package names
    pub fn bundle_kind(&self) -> BundleKind {
        if let Some(bundle) = self.bundles.first() {
            return bundle.kind;
        }
        if !self.pkgnames.is_empty() {
            return BundleKind::Package;
        }
        BundleKind::Unknown
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = opt_str(Some(id));
        self.identity_changed();
    }

    pub fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
        self.identity_changed();
    }

    pub fn set_kind(&mut self, kind: ComponentKind) {
        self.kind = kind;
        self.identity_changed();
    }

    pub fn set_origin(&mut self, origin: Option<&str>) {
        self.origin = opt_str(origin);
        self.identity_changed();
    }

    pub fn set_branch(&mut self, branch: Option<&str>) {
        self.branch = opt_str(branch);
        self.identity_changed();
    }

    /// The canonical six-segment unique ID, computed on first use
    pub fn unique_id(&self) -> &str {
        self.unique_id_ref()
    }

    pub(crate) fn unique_id_ref(&self) -> &RefStr {
        self.unique_id.get_or_init(|| {
            Arc::from(UniqueId::build(
                self.scope,
                self.bundle_kind(),
                self.origin.as_deref(),
                self.kind,
                self.id.as_deref(),
                self.branch.as_deref(),
            ))
        })
    }

    fn identity_changed(&mut self) {
        self.unique_id = OnceLock::new();
        self.search_changed();
    }

    fn search_changed(&mut self) {
        self.token_cache = OnceLock::new();
    }

    /// Wildcard-aware identity comparison
    ///
    /// For each identity attribute (and the first architecture) either side
    /// may be unset, otherwise both must be equal.
    pub fn identity_equal(&self, other: &Component) -> bool {
        fn enum_eq<T: PartialEq + Default>(a: T, b: T) -> bool {
            a == T::default() || b == T::default() || a == b
        }
        fn str_eq(a: Option<&str>, b: Option<&str>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
        }

        enum_eq(self.scope, other.scope)
            && enum_eq(self.bundle_kind(), other.bundle_kind())
            && str_eq(self.origin(), other.origin())
            && enum_eq(self.kind, other.kind)
            && str_eq(self.id(), other.id())
            && str_eq(self.branch(), other.branch())
            && str_eq(
                self.architectures.first().map(|a| &**a),
                other.architectures.first().map(|a| &**a),
            )
    }

    // ------------------------------------------------------------------
    // Formats, state, precedence
    // ------------------------------------------------------------------

    pub fn formats(&self) -> &[Format] {
        &self.formats
    }

    /// The first contributing format
    pub fn format_default(&self) -> Option<&Format> {
        self.formats.first()
    }

    /// Whether any contributing format has this kind
    pub fn has_format_kind(&self, kind: FormatKind) -> bool {
        self.formats.iter().any(|f| f.kind() == kind)
    }

    /// Record a contributing source; identical formats are not re-added
    pub fn add_format(&mut self, format: Format) {
        if !self.formats.contains(&format) {
            self.formats.push(format);
        }
    }

    /// Remove a contributing source, returning whether it was present
    pub fn remove_format(&mut self, format: &Format) -> bool {
        let before = self.formats.len();
        self.formats.retain(|f| f != format);
        before != self.formats.len()
    }

    /// Remove every format read from `filename`, returning how many were removed
    pub fn remove_formats_from_file(&mut self, filename: &str) -> usize {
        let before = self.formats.len();
        self.formats.retain(|f| f.filename() != Some(filename));
        before - self.formats.len()
    }

    /// Whether any format was read from `filename`
    pub fn has_source_file(&self, filename: &str) -> bool {
        self.formats.iter().any(|f| f.filename() == Some(filename))
    }

    /// Installation state derived from the current formats
    pub fn state(&self) -> State {
        if self.formats.iter().any(|f| f.kind().is_local()) {
            State::Installed
        } else if self.formats.iter().any(|f| f.kind().is_remote()) {
            State::Available
        } else {
            State::Unknown
        }
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn merge_kind(&self) -> MergeKind {
        self.merge_kind
    }

    pub fn set_merge_kind(&mut self, merge_kind: MergeKind) {
        self.merge_kind = merge_kind;
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn has_quirk(&self, quirk: Quirks) -> bool {
        self.quirks.contains(quirk)
    }

    pub fn add_quirk(&mut self, quirk: Quirks) {
        self.quirks |= quirk;
    }

    pub fn problems(&self) -> ProblemFlags {
        self.problems
    }

    pub fn add_problem(&mut self, problem: ProblemFlags) {
        self.problems |= problem;
    }

    // ------------------------------------------------------------------
    // Scalar metadata
    // ------------------------------------------------------------------

    pub fn project_license(&self) -> Option<&str> {
        self.project_license.as_deref()
    }

    pub fn set_project_license(&mut self, license: Option<&str>) {
        self.project_license = opt_str(license);
    }

    pub fn metadata_license(&self) -> Option<&str> {
        self.metadata_license.as_deref()
    }

    pub fn set_metadata_license(&mut self, license: Option<&str>) {
        self.metadata_license = opt_str(license);
    }

    pub fn project_group(&self) -> Option<&str> {
        self.project_group.as_deref()
    }

    pub fn set_project_group(&mut self, group: Option<&str>) {
        self.project_group = opt_str(group);
    }

    pub fn source_pkgname(&self) -> Option<&str> {
        self.source_pkgname.as_deref()
    }

    pub fn set_source_pkgname(&mut self, pkgname: Option<&str>) {
        self.source_pkgname = opt_str(pkgname);
    }

    // ------------------------------------------------------------------
    // Locale-keyed text
    // ------------------------------------------------------------------

    /// Name for a locale (`None` = untranslated), falling back to `C`
    pub fn name(&self, locale: Option<&str>) -> Option<&str> {
        localized(&self.names, locale)
    }

    pub fn names(&self) -> &LocaleMap {
        &self.names
    }

    pub fn set_name(&mut self, locale: Option<&str>, value: &str) {
        self.names
            .insert(Arc::from(locale.unwrap_or(DEFAULT_LOCALE)), Arc::from(value));
        self.search_changed();
    }

    /// One-line summary for a locale, falling back to `C`
    pub fn comment(&self, locale: Option<&str>) -> Option<&str> {
        localized(&self.comments, locale)
    }

    pub fn comments(&self) -> &LocaleMap {
        &self.comments
    }

    pub fn set_comment(&mut self, locale: Option<&str>, value: &str) {
        self.comments
            .insert(Arc::from(locale.unwrap_or(DEFAULT_LOCALE)), Arc::from(value));
        self.search_changed();
    }

    /// Markup description for a locale, falling back to `C`
    pub fn description(&self, locale: Option<&str>) -> Option<&str> {
        localized(&self.descriptions, locale)
    }

    pub fn descriptions(&self) -> &LocaleMap {
        &self.descriptions
    }

    pub fn set_description(&mut self, locale: Option<&str>, markup: &str) {
        self.descriptions
            .insert(Arc::from(locale.unwrap_or(DEFAULT_LOCALE)), Arc::from(markup));
        self.search_changed();
    }

    pub fn developer_name(&self, locale: Option<&str>) -> Option<&str> {
        localized(&self.developer_names, locale)
    }

    pub fn developer_names(&self) -> &LocaleMap {
        &self.developer_names
    }

    pub fn set_developer_name(&mut self, locale: Option<&str>, value: &str) {
        self.developer_names
            .insert(Arc::from(locale.unwrap_or(DEFAULT_LOCALE)), Arc::from(value));
    }

    /// Keywords for exactly this locale (`None` = `C`)
    pub fn keywords(&self, locale: Option<&str>) -> &[RefStr] {
        self.keywords
            .get(locale.unwrap_or(DEFAULT_LOCALE))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn all_keywords(&self) -> &BTreeMap<RefStr, Vec<RefStr>> {
        &self.keywords
    }

    pub fn add_keyword(&mut self, locale: Option<&str>, keyword: &str) {
        let list = self
            .keywords
            .entry(Arc::from(locale.unwrap_or(DEFAULT_LOCALE)))
            .or_default();
        push_unique(list, keyword);
        self.search_changed();
    }

    /// Drop translated text for every locale `keep` rejects; `C` always stays
    ///
    /// Returns the number of entries removed.
    pub fn retain_locales(&mut self, keep: impl Fn(&str) -> bool) -> usize {
        let keep = |locale: &RefStr| &**locale == DEFAULT_LOCALE || keep(locale);
        let before = self.names.len()
            + self.comments.len()
            + self.descriptions.len()
            + self.developer_names.len()
            + self.keywords.len();
        self.names.retain(|locale, _| keep(locale));
        self.comments.retain(|locale, _| keep(locale));
        self.descriptions.retain(|locale, _| keep(locale));
        self.developer_names.retain(|locale, _| keep(locale));
        self.keywords.retain(|locale, _| keep(locale));
        let after = self.names.len()
            + self.comments.len()
            + self.descriptions.len()
            + self.developer_names.len()
            + self.keywords.len();
        if after != before {
            self.search_changed();
        }
        before - after
    }

    pub fn url(&self, kind: &str) -> Option<&str> {
        self.urls.get(kind).map(|v| &**v)
    }

    pub fn urls(&self) -> &BTreeMap<RefStr, RefStr> {
        &self.urls
    }

    pub fn add_url(&mut self, kind: &str, url: &str) {
        self.urls.insert(Arc::from(kind), Arc::from(url));
    }

    pub fn metadata_item(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(|v| &**v)
    }

    pub fn metadata(&self) -> &BTreeMap<RefStr, RefStr> {
        &self.metadata
    }

    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(Arc::from(key), Arc::from(value));
    }

    pub fn remove_metadata(&mut self, key: &str) {
        self.metadata.remove(key);
    }

    // ------------------------------------------------------------------
    // Free lists
    // ------------------------------------------------------------------

    pub fn categories(&self) -> &[RefStr] {
        &self.categories
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| &**c == category)
    }

    pub fn add_category(&mut self, category: &str) {
        push_unique(&mut self.categories, category);
    }

    pub fn kudos(&self) -> &[RefStr] {
        &self.kudos
    }

    pub fn add_kudo(&mut self, kudo: &str) {
        push_unique(&mut self.kudos, kudo);
    }

    pub fn permissions(&self) -> &[RefStr] {
        &self.permissions
    }

    pub fn add_permission(&mut self, permission: &str) {
        push_unique(&mut self.permissions, permission);
    }

    pub fn mimetypes(&self) -> &[RefStr] {
        &self.mimetypes
    }

    pub fn add_mimetype(&mut self, mimetype: &str) {
        push_unique(&mut self.mimetypes, mimetype);
        self.search_changed();
    }

    pub fn pkgnames(&self) -> &[RefStr] {
        &self.pkgnames
    }

    pub fn add_pkgname(&mut self, pkgname: &str) {
        push_unique(&mut self.pkgnames, pkgname);
        // package names feed the derived bundle kind
        self.identity_changed();
    }

    pub fn architectures(&self) -> &[RefStr] {
        &self.architectures
    }

    pub fn add_architecture(&mut self, arch: &str) {
        push_unique(&mut self.architectures, arch);
    }

    /// IDs of the components this addon extends
    pub fn extends(&self) -> &[RefStr] {
        &self.extends
    }

    pub fn add_extends(&mut self, id: &str) {
        push_unique(&mut self.extends, id);
    }

    /// Reasons this component should be excluded from a published catalog
    pub fn vetoes(&self) -> &[RefStr] {
        &self.vetoes
    }

    pub fn add_veto(&mut self, reason: &str) {
        push_unique(&mut self.vetoes, reason);
    }

    // ------------------------------------------------------------------
    // Object collections
    // ------------------------------------------------------------------

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn release(&self, version: &str) -> Option<&Release> {
        self.releases.iter().find(|r| r.version() == Some(version))
    }

    /// Add a release; an existing entry with the same version is updated
    pub fn add_release(&mut self, release: Release) {
        match self.releases.iter_mut().find(|r| r.same_release(&release)) {
            Some(existing) => existing.absorb(&release),
            None => self.releases.push(release),
        }
    }

    /// Add a release read from a source document, flagging repeated versions
    pub fn add_source_release(&mut self, release: Release) {
        if self.releases.iter().any(|r| r.same_release(&release)) {
            self.problems |= ProblemFlags::DUPLICATE_RELEASE;
        }
        self.add_release(release);
    }

    pub fn provides(&self) -> &[Provide] {
        &self.provides
    }

    pub fn add_provide(&mut self, provide: Provide) {
        if !self.provides.contains(&provide) {
            self.provides.push(provide);
        }
    }

    pub fn launchables(&self) -> &[Launchable] {
        &self.launchables
    }

    pub fn launchable(&self, kind: LaunchableKind) -> Option<&Launchable> {
        self.launchables.iter().find(|l| l.kind == kind)
    }

    pub fn add_launchable(&mut self, launchable: Launchable) {
        if !self.launchables.contains(&launchable) {
            self.launchables.push(launchable);
        }
    }

    pub fn screenshots(&self) -> &[Screenshot] {
        &self.screenshots
    }

    pub fn add_screenshot(&mut self, screenshot: Screenshot) {
        if !self.screenshots.iter().any(|s| s.same_screenshot(&screenshot)) {
            self.screenshots.push(screenshot);
        }
    }

    /// Add a screenshot read from a source document, flagging repeats
    pub fn add_source_screenshot(&mut self, screenshot: Screenshot) {
        if self.screenshots.iter().any(|s| s.same_screenshot(&screenshot)) {
            self.problems |= ProblemFlags::DUPLICATE_SCREENSHOT;
            return;
        }
        self.screenshots.push(screenshot);
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn add_review(&mut self, review: Review) {
        if !self.reviews.iter().any(|r| r.same_review(&review)) {
            self.reviews.push(review);
        }
    }

    pub fn icons(&self) -> &[Icon] {
        &self.icons
    }

    /// Best icon of a kind, preferring the largest
    pub fn icon(&self, kind: IconKind) -> Option<&Icon> {
        self.icons
            .iter()
            .filter(|i| i.kind == kind)
            .max_by_key(|i| i.width * i.scale.max(1))
    }

    pub fn add_icon(&mut self, icon: Icon) {
        if !self.icons.iter().any(|i| i.same_icon(&icon)) {
            self.icons.push(icon);
        }
    }

    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    pub fn add_bundle(&mut self, bundle: Bundle) {
        if !self.bundles.iter().any(|b| b.same_bundle(&bundle)) {
            self.bundles.push(bundle);
            self.identity_changed();
        }
    }

    pub fn translations(&self) -> &[Translation] {
        &self.translations
    }

    pub fn add_translation(&mut self, translation: Translation) {
        if !self.translations.contains(&translation) {
            self.translations.push(translation);
        }
    }

    pub fn suggests(&self) -> &[Suggest] {
        &self.suggests
    }

    pub fn add_suggest(&mut self, suggest: Suggest) {
        if !self.suggests.contains(&suggest) {
            self.suggests.push(suggest);
        }
    }

    pub fn requires(&self) -> &[Require] {
        &self.requires
    }

    pub fn add_require(&mut self, require: Require) {
        if !self.requires.contains(&require) {
            self.requires.push(require);
        }
    }

    pub fn content_ratings(&self) -> &[ContentRating] {
        &self.content_ratings
    }

    pub fn content_rating(&self, kind: &str) -> Option<&ContentRating> {
        self.content_ratings.iter().find(|r| &*r.kind == kind)
    }

    /// Add a content rating; only one rating per kind is kept
    pub fn add_content_rating(&mut self, rating: ContentRating) {
        if self.content_rating(&rating.kind).is_none() {
            self.content_ratings.push(rating);
        }
    }

    /// Add a content rating read from a source document, flagging repeats
    pub fn add_source_content_rating(&mut self, rating: ContentRating) {
        if self.content_rating(&rating.kind).is_some() {
            self.problems |= ProblemFlags::DUPLICATE_CONTENT_RATING;
            return;
        }
        self.content_ratings.push(rating);
    }

    pub fn agreements(&self) -> &[Agreement] {
        &self.agreements
    }

    pub fn add_agreement(&mut self, agreement: Agreement) {
        if !self.agreements.iter().any(|a| a.same_agreement(&agreement)) {
            self.agreements.push(agreement);
        }
    }

    // ------------------------------------------------------------------
    // Addons
    // ------------------------------------------------------------------

    /// Unique IDs of the addons attached to this component
    pub fn addons(&self) -> &[RefStr] {
        &self.addons
    }

    pub(crate) fn add_addon(&mut self, unique_id: RefStr) {
        if !self.addons.contains(&unique_id) {
            self.addons.push(unique_id);
            self.search_changed();
        }
    }

    /// Detach an addon; returns whether it was attached
    pub(crate) fn remove_addon(&mut self, unique_id: &str) -> bool {
        let before = self.addons.len();
        self.addons.retain(|addon| &**addon != unique_id);
        let removed = self.addons.len() != before;
        if removed {
            self.search_changed();
        }
        removed
    }

    pub(crate) fn clear_addons(&mut self) {
        if !self.addons.is_empty() {
            self.addons.clear();
            self.search_changed();
        }
    }

    /// The search token cache, if it has been built
    pub fn token_cache(&self) -> Option<&TokenCache> {
        self.token_cache.get()
    }

    // ------------------------------------------------------------------
    // Interning
    // ------------------------------------------------------------------

    /// Swap every repeated string for the pool's shared copy
    pub(crate) fn intern(&mut self, pool: &StringPool) {
        fn opt(pool: &StringPool, value: &mut Option<RefStr>) {
            if let Some(v) = value.as_mut() {
                pool.intern_in_place(v);
            }
        }
        fn list(pool: &StringPool, values: &mut [RefStr]) {
            for v in values {
                pool.intern_in_place(v);
            }
        }
        fn map(pool: &StringPool, values: &mut BTreeMap<RefStr, RefStr>) {
            *values = std::mem::take(values)
                .into_iter()
                .map(|(k, v)| (pool.intern(&k), pool.intern(&v)))
                .collect();
        }

        opt(pool, &mut self.origin);
        opt(pool, &mut self.id);
        opt(pool, &mut self.branch);
        opt(pool, &mut self.project_license);
        opt(pool, &mut self.metadata_license);
        opt(pool, &mut self.project_group);
        opt(pool, &mut self.source_pkgname);

        // descriptions are long and rarely shared; only their locale keys are pooled
        self.descriptions = std::mem::take(&mut self.descriptions)
            .into_iter()
            .map(|(k, v)| (pool.intern(&k), v))
            .collect();
        map(pool, &mut self.names);
        map(pool, &mut self.comments);
        map(pool, &mut self.developer_names);
        map(pool, &mut self.urls);
        map(pool, &mut self.metadata);
        self.keywords = std::mem::take(&mut self.keywords)
            .into_iter()
            .map(|(locale, mut words)| {
                list(pool, &mut words);
                (pool.intern(&locale), words)
            })
            .collect();

        list(pool, &mut self.categories);
        list(pool, &mut self.kudos);
        list(pool, &mut self.permissions);
        list(pool, &mut self.mimetypes);
        list(pool, &mut self.pkgnames);
        list(pool, &mut self.architectures);
        list(pool, &mut self.extends);
        list(pool, &mut self.vetoes);

        for format in &mut self.formats {
            format.intern(pool);
        }
        for release in &mut self.releases {
            release.intern(pool);
        }
        for provide in &mut self.provides {
            relations::intern_provide(provide, pool);
        }
        for launchable in &mut self.launchables {
            relations::intern_launchable(launchable, pool);
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.unique_id())
    }
}

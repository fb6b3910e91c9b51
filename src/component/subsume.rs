// src/component/subsume.rs

//! Field-level union of two descriptions of one component
//!
//! `subsume_from` copies the field categories selected in a `SubsumeFlags`
//! from a donor into a target. Policy bits decide how conflicts resolve:
//!
//! - `NO_OVERWRITE`: a value the target already has is never replaced
//! - `REPLACE`: target collections are cleared before a non-empty donor
//!   collection is copied in
//! - `DEDUPE`: implies `NO_OVERWRITE` and skips translations that merely
//!   repeat the untranslated value
//! - `BOTH_WAYS`: honoured by [`Component::merge_with`], which runs a
//!   reverse pass with `NO_OVERWRITE` forced on
//!
//! Collections always go through the target's duplicate-checked `add_*`
//! operations, so nested identity rules (release versions, one content
//! rating per kind, ...) apply here too.

use super::{Component, LocaleMap, DEFAULT_LOCALE};
use crate::pool::RefStr;
use bitflags::bitflags;
use std::collections::BTreeMap;
use std::sync::Arc;

bitflags! {
    /// Field categories and policy for [`Component::subsume_from`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SubsumeFlags: u64 {
        // policy
        const NO_OVERWRITE = 1 << 0;
        const BOTH_WAYS = 1 << 1;
        const REPLACE = 1 << 2;
        const DEDUPE = 1 << 3;

        // scalars
        const ORIGIN = 1 << 8;
        const BRANCH = 1 << 9;
        const KIND = 1 << 10;
        const LICENSES = 1 << 11;
        const PROJECT_GROUP = 1 << 12;
        const SOURCE_PKGNAME = 1 << 13;
        const QUIRKS = 1 << 14;

        // locale-keyed text
        const NAME = 1 << 16;
        const COMMENT = 1 << 17;
        const DESCRIPTION = 1 << 18;
        const DEVELOPER_NAME = 1 << 19;
        const KEYWORDS = 1 << 20;
        const URL = 1 << 21;
        const METADATA = 1 << 22;

        // free lists
        const CATEGORIES = 1 << 24;
        const KUDOS = 1 << 25;
        const PERMISSIONS = 1 << 26;
        const MIMETYPES = 1 << 27;
        const PKGNAMES = 1 << 28;
        const ARCHITECTURES = 1 << 29;
        const EXTENDS = 1 << 30;
        const VETOES = 1 << 31;

        // object collections
        const FORMATS = 1 << 32;
        const RELEASES = 1 << 33;
        const PROVIDES = 1 << 34;
        const LAUNCHABLES = 1 << 35;
        const SCREENSHOTS = 1 << 36;
        const REVIEWS = 1 << 37;
        const ICONS = 1 << 38;
        const BUNDLES = 1 << 39;
        const TRANSLATIONS = 1 << 40;
        const SUGGESTS = 1 << 41;
        const REQUIRES = 1 << 42;
        const CONTENT_RATINGS = 1 << 43;
        const AGREEMENTS = 1 << 44;
    }
}

impl SubsumeFlags {
    /// Every field category, no policy bits
    pub const DEFAULT: Self = Self::from_bits_truncate(
        Self::all().bits()
            & !(Self::NO_OVERWRITE.bits()
                | Self::BOTH_WAYS.bits()
                | Self::REPLACE.bits()
                | Self::DEDUPE.bits()),
    );

    /// Whether values the target already has must be kept
    pub fn keeps_existing(&self) -> bool {
        self.intersects(Self::NO_OVERWRITE | Self::DEDUPE)
    }

    /// Only the field categories of these flags
    pub fn fields(&self) -> Self {
        *self & Self::DEFAULT
    }
}

impl Default for SubsumeFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn merge_scalar(target: &mut Option<RefStr>, donor: &Option<RefStr>, flags: SubsumeFlags) {
    if let Some(value) = donor
        && (!flags.keeps_existing() || target.is_none())
    {
        *target = Some(Arc::clone(value));
    }
}

fn merge_text(target: &mut LocaleMap, donor: &LocaleMap, flags: SubsumeFlags) {
    if donor.is_empty() {
        return;
    }
    if flags.contains(SubsumeFlags::REPLACE) {
        target.clear();
    }
    let untranslated = donor.get(DEFAULT_LOCALE);
    for (locale, value) in donor {
        if flags.contains(SubsumeFlags::DEDUPE)
            && &**locale != DEFAULT_LOCALE
            && Some(value) == untranslated
        {
            continue;
        }
        if flags.keeps_existing() && target.contains_key(locale) {
            continue;
        }
        target.insert(Arc::clone(locale), Arc::clone(value));
    }
}

fn merge_list(target: &mut Vec<RefStr>, donor: &[RefStr], flags: SubsumeFlags) {
    if donor.is_empty() {
        return;
    }
    if flags.contains(SubsumeFlags::REPLACE) {
        target.clear();
    }
    for value in donor {
        if !target.contains(value) {
            target.push(Arc::clone(value));
        }
    }
}

fn merge_keywords(
    target: &mut BTreeMap<RefStr, Vec<RefStr>>,
    donor: &BTreeMap<RefStr, Vec<RefStr>>,
    flags: SubsumeFlags,
) {
    if donor.is_empty() {
        return;
    }
    if flags.contains(SubsumeFlags::REPLACE) {
        target.clear();
    }
    // keywords are a union even under NO_OVERWRITE
    for (locale, words) in donor {
        let list = target.entry(Arc::clone(locale)).or_default();
        merge_list(list, words, flags - SubsumeFlags::REPLACE);
    }
}

/// Copy donor entries into a collection through its duplicate-checked adder
macro_rules! merge_objects {
    ($target:expr, $donor:expr, $flags:expr, $field:ident, $bit:ident, $add:ident) => {
        if $flags.contains(SubsumeFlags::$bit) && !$donor.$field.is_empty() {
            if $flags.contains(SubsumeFlags::REPLACE) {
                $target.$field.clear();
            }
            for item in &$donor.$field {
                $target.$add(item.clone());
            }
        }
    };
}

impl Component {
    /// Fold `donor`'s data into this component
    ///
    /// `BOTH_WAYS` is ignored here since the donor is borrowed immutably;
    /// use [`Component::merge_with`] for two-way merges.
    pub fn subsume_from(&mut self, donor: &Component, flags: SubsumeFlags) {
        if flags.contains(SubsumeFlags::ORIGIN) {
            merge_scalar(&mut self.origin, &donor.origin, flags);
        }
        if flags.contains(SubsumeFlags::BRANCH) {
            merge_scalar(&mut self.branch, &donor.branch, flags);
        }
        if flags.contains(SubsumeFlags::KIND)
            && donor.kind != super::ComponentKind::Unknown
            && (!flags.keeps_existing() || self.kind == super::ComponentKind::Unknown)
        {
            self.kind = donor.kind;
        }
        if flags.contains(SubsumeFlags::LICENSES) {
            merge_scalar(&mut self.project_license, &donor.project_license, flags);
            merge_scalar(&mut self.metadata_license, &donor.metadata_license, flags);
        }
        if flags.contains(SubsumeFlags::PROJECT_GROUP) {
            merge_scalar(&mut self.project_group, &donor.project_group, flags);
        }
        if flags.contains(SubsumeFlags::SOURCE_PKGNAME) {
            merge_scalar(&mut self.source_pkgname, &donor.source_pkgname, flags);
        }
        if flags.contains(SubsumeFlags::QUIRKS) {
            self.quirks |= donor.quirks;
        }

        if flags.contains(SubsumeFlags::NAME) {
            merge_text(&mut self.names, &donor.names, flags);
        }
        if flags.contains(SubsumeFlags::COMMENT) {
            merge_text(&mut self.comments, &donor.comments, flags);
        }
        if flags.contains(SubsumeFlags::DESCRIPTION) {
            merge_text(&mut self.descriptions, &donor.descriptions, flags);
        }
        if flags.contains(SubsumeFlags::DEVELOPER_NAME) {
            merge_text(&mut self.developer_names, &donor.developer_names, flags);
        }
        if flags.contains(SubsumeFlags::KEYWORDS) {
            merge_keywords(&mut self.keywords, &donor.keywords, flags);
        }
        if flags.contains(SubsumeFlags::URL) {
            merge_text(&mut self.urls, &donor.urls, flags - SubsumeFlags::DEDUPE);
        }
        if flags.contains(SubsumeFlags::METADATA) {
            merge_text(&mut self.metadata, &donor.metadata, flags - SubsumeFlags::DEDUPE);
        }

        let lists: [(SubsumeFlags, &mut Vec<RefStr>, &[RefStr]); 8] = [
            (SubsumeFlags::CATEGORIES, &mut self.categories, donor.categories.as_slice()),
            (SubsumeFlags::KUDOS, &mut self.kudos, donor.kudos.as_slice()),
            (SubsumeFlags::PERMISSIONS, &mut self.permissions, donor.permissions.as_slice()),
            (SubsumeFlags::MIMETYPES, &mut self.mimetypes, donor.mimetypes.as_slice()),
            (SubsumeFlags::PKGNAMES, &mut self.pkgnames, donor.pkgnames.as_slice()),
            (SubsumeFlags::ARCHITECTURES, &mut self.architectures, donor.architectures.as_slice()),
            (SubsumeFlags::EXTENDS, &mut self.extends, donor.extends.as_slice()),
            (SubsumeFlags::VETOES, &mut self.vetoes, donor.vetoes.as_slice()),
        ];
        for (bit, target, source) in lists {
            if flags.contains(bit) {
                merge_list(target, source, flags);
            }
        }

        merge_objects!(self, donor, flags, formats, FORMATS, add_format);
        merge_objects!(self, donor, flags, releases, RELEASES, add_release);
        merge_objects!(self, donor, flags, provides, PROVIDES, add_provide);
        merge_objects!(self, donor, flags, launchables, LAUNCHABLES, add_launchable);
        merge_objects!(self, donor, flags, screenshots, SCREENSHOTS, add_screenshot);
        merge_objects!(self, donor, flags, reviews, REVIEWS, add_review);
        merge_objects!(self, donor, flags, icons, ICONS, add_icon);
        merge_objects!(self, donor, flags, bundles, BUNDLES, add_bundle);
        merge_objects!(self, donor, flags, translations, TRANSLATIONS, add_translation);
        merge_objects!(self, donor, flags, suggests, SUGGESTS, add_suggest);
        merge_objects!(self, donor, flags, requires, REQUIRES, add_require);
        merge_objects!(self, donor, flags, content_ratings, CONTENT_RATINGS, add_content_rating);
        merge_objects!(self, donor, flags, agreements, AGREEMENTS, add_agreement);

        // origin, branch, kind, bundles and pkgnames all feed the unique ID
        self.identity_changed();
    }

    /// Merge with another component, in both directions when `BOTH_WAYS` is set
    ///
    /// The reverse pass always runs with `NO_OVERWRITE`, so after a two-way
    /// merge both records are supersets of each other and neither has lost a
    /// value it already had.
    pub fn merge_with(&mut self, other: &mut Component, flags: SubsumeFlags) {
        self.subsume_from(other, flags);
        if flags.contains(SubsumeFlags::BOTH_WAYS) {
            let reverse = (flags | SubsumeFlags::NO_OVERWRITE) - SubsumeFlags::REPLACE;
            other.subsume_from(self, reverse);
        }
    }
}

// src/component/flags.rs

//! Bit sets carried on a component: quirks and accumulated problems

use bitflags::bitflags;

bitflags! {
    /// Behavioural quirks of a component
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Quirks: u32 {
        /// Installed by the OS, cannot be removed
        const COMPULSORY = 1 << 0;
        /// Has a source package available
        const HAS_SOURCE = 1 << 1;
        /// A merge component matches any component sharing only the ID,
        /// ignoring scope, origin, bundle kind and branch
        const MATCH_ANY_PREFIX = 1 << 2;
        /// Installing or updating requires a reboot
        const NEEDS_REBOOT = 1 << 3;
        /// Reviews are not accepted
        const NOT_REVIEWABLE = 1 << 4;
        /// Cannot be launched
        const NOT_LAUNCHABLE = 1 << 5;
        /// Data comes from a trusted distribution source
        const PROVENANCE = 1 << 6;
        /// Updating requires user interaction
        const NEEDS_USER_ACTION = 1 << 7;
    }
}

impl Quirks {
    /// Parse a single quirk name as used in catalog metadata
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "compulsory" => Some(Self::COMPULSORY),
            "has-source" => Some(Self::HAS_SOURCE),
            "match-any-prefix" => Some(Self::MATCH_ANY_PREFIX),
            "needs-reboot" => Some(Self::NEEDS_REBOOT),
            "not-reviewable" => Some(Self::NOT_REVIEWABLE),
            "not-launchable" => Some(Self::NOT_LAUNCHABLE),
            "provenance" => Some(Self::PROVENANCE),
            "needs-user-action" => Some(Self::NEEDS_USER_ACTION),
            _ => None,
        }
    }
}

bitflags! {
    /// Non-fatal data problems noticed while a component was read
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ProblemFlags: u32 {
        /// Two releases shared one version
        const DUPLICATE_RELEASE = 1 << 0;
        /// The same screenshot appeared twice
        const DUPLICATE_SCREENSHOT = 1 << 1;
        /// Two content ratings of the same kind
        const DUPLICATE_CONTENT_RATING = 1 << 2;
        /// XML source had no `<?xml ...?>` declaration
        const NO_XML_HEADER = 1 << 3;
        /// The `<id>` element carried an `xml:lang` attribute
        const TRANSLATED_ID = 1 << 4;
    }
}

impl ProblemFlags {
    /// Human readable description of each set problem
    pub fn descriptions(&self) -> Vec<&'static str> {
        self.iter_names()
            .map(|(name, _)| match name {
                "DUPLICATE_RELEASE" => "duplicate release version",
                "DUPLICATE_SCREENSHOT" => "duplicate screenshot",
                "DUPLICATE_CONTENT_RATING" => "duplicate content rating",
                "NO_XML_HEADER" => "missing XML header",
                "TRANSLATED_ID" => "translated <id> element",
                _ => "unknown problem",
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quirk_parse() {
        assert_eq!(Quirks::parse("match-any-prefix"), Some(Quirks::MATCH_ANY_PREFIX));
        assert_eq!(Quirks::parse("nope"), None);
    }

    #[test]
    fn test_problem_descriptions() {
        let problems = ProblemFlags::DUPLICATE_RELEASE | ProblemFlags::NO_XML_HEADER;
        assert_eq!(
            problems.descriptions(),
            vec!["duplicate release version", "missing XML header"]
        );
        assert!(ProblemFlags::empty().descriptions().is_empty());
    }
}

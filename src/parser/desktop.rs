// src/parser/desktop.rs

//! Desktop entry launchers (`*.desktop`)
//!
//! Only the `[Desktop Entry]` group is read. The component ID is the file's
//! basename, and a desktop-id launchable pointing at it is always added.

use super::{utf8, ParseError, Parser, SourceInfo};
use crate::component::{
    Component, ComponentKind, FormatKind, Icon, IconKind, Launchable, LaunchableKind, Provide,
    ProvideKind,
};
use tracing::debug;

const DESKTOP_GROUP: &str = "Desktop Entry";

/// Categories that only make sense inside a settings shell
const VETO_CATEGORIES: &[&str] = &["X-GNOME-Settings-Panel", "X-Unity-Settings-Panel"];

/// Toolkit and desktop categories that say nothing about the application
const IGNORED_CATEGORIES: &[&str] = &["GTK", "Qt", "KDE", "GNOME"];

/// Parser for desktop entry files
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopParser;

/// Split `Key[locale]` into key and locale
fn split_key(key: &str) -> (&str, Option<&str>) {
    match key.split_once('[') {
        Some((base, rest)) => (base, rest.strip_suffix(']').filter(|l| !l.is_empty())),
        None => (key, None),
    }
}

/// Values of a `;`-separated list key
fn list(value: &str) -> impl Iterator<Item = &str> {
    value.split(';').map(str::trim).filter(|v| !v.is_empty())
}

fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

impl Parser for DesktopParser {
    fn parse(&self, bytes: &[u8], source: &SourceInfo) -> Result<Vec<Component>, ParseError> {
        let text = utf8(bytes)?;
        let id = source.basename().ok_or(ParseError::MissingId)?;
        let id = id.strip_suffix(".in").unwrap_or(id);

        let mut c = Component::new(id);
        c.set_kind(ComponentKind::Desktop);

        let mut in_group = false;
        let mut seen_group = false;
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(group) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_group = group == DESKTOP_GROUP;
                seen_group |= in_group;
                continue;
            }
            if !in_group {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ParseError::Desktop(format!(
                    "line {}: expected key=value",
                    lineno + 1
                )));
            };
            let (key, locale) = split_key(key.trim());
            let value = value.trim();

            match key {
                "Type" => {
                    if value != "Application" {
                        debug!("skipping {}: type {} is not an application", id, value);
                        return Ok(Vec::new());
                    }
                }
                "Name" | "_Name" => c.set_name(locale, value),
                "Comment" | "_Comment" => c.set_comment(locale, value),
                "Keywords" => {
                    for keyword in list(value).flat_map(|k| k.split(',')) {
                        if !keyword.is_empty() {
                            c.add_keyword(locale, keyword);
                        }
                    }
                }
                "Categories" => {
                    for category in list(value) {
                        if VETO_CATEGORIES.contains(&category) {
                            c.add_veto(&format!("Has category {}", category));
                        }
                        if !IGNORED_CATEGORIES.contains(&category) {
                            c.add_category(category);
                        }
                    }
                }
                "MimeType" => {
                    for mimetype in list(value) {
                        c.add_mimetype(mimetype);
                    }
                }
                "Icon" if !value.is_empty() => {
                    let kind = if value.starts_with('/') {
                        IconKind::Local
                    } else {
                        IconKind::Stock
                    };
                    let mut icon = Icon::new(kind, value);
                    if kind == IconKind::Local {
                        icon.url = icon.name.clone();
                    }
                    c.add_icon(icon);
                }
                "NoDisplay" if is_true(value) => c.add_veto("NoDisplay=true"),
                "Hidden" if is_true(value) => c.add_veto("Hidden=true"),
                "OnlyShowIn" => {
                    let desktops: Vec<&str> = list(value).collect();
                    match desktops.as_slice() {
                        [] => c.add_veto("Empty OnlyShowIn"),
                        [single] => c.set_project_group(Some(*single)),
                        _ => {}
                    }
                }
                "X-Flatpak-RenamedFrom" => {
                    for old in list(value) {
                        c.add_provide(Provide::new(ProvideKind::Id, old));
                    }
                }
                "X-AppInstall-Package" if !value.is_empty() => c.add_pkgname(value),
                _ if key.starts_with("X-") && locale.is_none() => c.add_metadata(key, value),
                _ => {}
            }
        }

        if !seen_group {
            return Err(ParseError::Desktop("no [Desktop Entry] group".to_string()));
        }

        c.add_launchable(Launchable::new(LaunchableKind::DesktopId, id));
        source.stamp(&mut c, FormatKind::Desktop);
        Ok(vec![c])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::State;

    const ENTRY: &str = "\
[Desktop Entry]
Type=Application
Name=Text Editor
Name[de]=Texteditor
Comment=Edit text files
Keywords=text;plaintext;write;
Categories=GNOME;GTK;Utility;TextEditor;
MimeType=text/plain;
Icon=org.gnome.gedit
X-GNOME-UsesNotifications=true

[Desktop Action new-window]
Name=New Window
";

    #[test]
    fn test_parse_entry() {
        let source = SourceInfo::new("/usr/share/applications/org.gnome.gedit.desktop");
        let parsed = DesktopParser.parse(ENTRY.as_bytes(), &source).unwrap();
        let c = &parsed[0];
        assert_eq!(c.id(), Some("org.gnome.gedit.desktop"));
        assert_eq!(c.kind(), ComponentKind::Desktop);
        assert_eq!(c.name(None), Some("Text Editor"));
        assert_eq!(c.name(Some("de")), Some("Texteditor"));
        assert_eq!(c.keywords(None).len(), 3);
        assert_eq!(c.categories().len(), 2);
        assert_eq!(c.mimetypes().len(), 1);
        assert_eq!(c.icons()[0].kind, IconKind::Stock);
        assert_eq!(c.metadata_item("X-GNOME-UsesNotifications"), Some("true"));
        assert_eq!(
            c.launchable(LaunchableKind::DesktopId).map(|l| &*l.value),
            Some("org.gnome.gedit.desktop")
        );
        assert_eq!(c.state(), State::Installed);
        assert!(c.vetoes().is_empty());
    }

    #[test]
    fn test_no_display_vetoes() {
        let entry = "[Desktop Entry]\nType=Application\nName=Hidden\nNoDisplay=True\n";
        let parsed = DesktopParser
            .parse(entry.as_bytes(), &SourceInfo::new("hidden.desktop"))
            .unwrap();
        assert_eq!(parsed[0].vetoes()[0].as_ref(), "NoDisplay=true");
    }

    #[test]
    fn test_non_application_skipped() {
        let entry = "[Desktop Entry]\nType=Link\nName=Docs\n";
        let parsed = DesktopParser
            .parse(entry.as_bytes(), &SourceInfo::new("docs.desktop"))
            .unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_missing_group_is_error() {
        let err = DesktopParser
            .parse(b"Name=Foo\n", &SourceInfo::new("foo.desktop"))
            .unwrap_err();
        assert!(matches!(err, ParseError::Desktop(_)));
    }

    #[test]
    fn test_needs_filename() {
        let err = DesktopParser
            .parse(b"[Desktop Entry]\n", &SourceInfo::default())
            .unwrap_err();
        assert_eq!(err, ParseError::MissingId);
    }
}

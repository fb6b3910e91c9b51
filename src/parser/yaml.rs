// src/parser/yaml.rs

//! DEP-11 YAML catalogs
//!
//! A DEP-11 file is a stream of YAML documents. The first is a header
//! (`File: DEP-11`, `Origin`, optional `MediaBaseUrl` and `Priority`); each
//! following document describes one component.

use super::{utf8, ParseError, Parser, SourceInfo};
use crate::component::{
    Bundle, BundleKind, Component, ComponentKind, ContentRating, FormatKind, Icon, IconKind,
    Image, ImageKind, Launchable, LaunchableKind, MergeKind, Provide, ProvideKind, RatingValue,
    Release, ReleaseKind, Screenshot, ScreenshotKind, Suggest, SuggestKind, Urgency,
};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Parser for DEP-11 YAML
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlParser;

#[derive(Debug, Default)]
struct Header {
    origin: Option<String>,
    media_base_url: Option<String>,
    priority: Option<i32>,
}

fn str_of<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn u32_of(value: &Value, key: &str) -> u32 {
    value
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

fn strings(value: Option<&Value>) -> impl Iterator<Item = &str> {
    value
        .and_then(Value::as_sequence)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

fn mapping(value: Option<&Value>) -> impl Iterator<Item = (&str, &Value)> {
    value
        .and_then(Value::as_mapping)
        .into_iter()
        .flat_map(Mapping::iter)
        .filter_map(|(k, v)| k.as_str().map(|k| (k, v)))
}

/// Locale-keyed text; `C` maps to the untranslated value
fn localized(value: Option<&Value>) -> impl Iterator<Item = (Option<&str>, &str)> {
    mapping(value).filter_map(|(locale, text)| {
        let locale = (locale != "C").then_some(locale);
        text.as_str().map(|t| (locale, t))
    })
}

impl YamlParser {
    fn header(doc: &Value) -> Option<Header> {
        if str_of(doc, "File") != Some("DEP-11") {
            return None;
        }
        Some(Header {
            origin: str_of(doc, "Origin").map(str::to_string),
            media_base_url: str_of(doc, "MediaBaseUrl").map(str::to_string),
            priority: doc
                .get("Priority")
                .and_then(Value::as_i64)
                .and_then(|p| i32::try_from(p).ok()),
        })
    }
}

impl Parser for YamlParser {
    fn parse(&self, bytes: &[u8], source: &SourceInfo) -> Result<Vec<Component>, ParseError> {
        let text = utf8(bytes)?;
        let mut header: Option<Header> = None;
        let mut components = Vec::new();

        for document in serde_yaml::Deserializer::from_str(text) {
            let doc = Value::deserialize(document).map_err(|e| ParseError::Yaml(e.to_string()))?;
            if doc.is_null() {
                continue;
            }
            let Some(header) = header.as_ref() else {
                header = Some(
                    Self::header(&doc)
                        .ok_or_else(|| ParseError::Yaml("missing DEP-11 header".to_string()))?,
                );
                continue;
            };
            let Some(mut component) = parse_component(&doc, header) else {
                warn!(
                    "skipping DEP-11 document without ID in {}",
                    source.filename.as_deref().unwrap_or("<memory>")
                );
                continue;
            };
            source.stamp(&mut component, FormatKind::AppStream);
            components.push(component);
        }

        debug!(
            "parsed {} component(s) from {}",
            components.len(),
            source.filename.as_deref().unwrap_or("<memory>")
        );
        Ok(components)
    }
}

fn media_url(header: &Header, url: &str) -> String {
    match header.media_base_url.as_deref() {
        Some(base) if !url.contains("://") => {
            format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
        }
        _ => url.to_string(),
    }
}

/// `None` when the document has no `ID`
fn parse_component(doc: &Value, header: &Header) -> Option<Component> {
    let id = str_of(doc, "ID")?;
    let mut c = Component::new(id);

    if let Some(kind) = str_of(doc, "Type").and_then(ComponentKind::parse) {
        c.set_kind(kind);
    }
    c.set_origin(header.origin.as_deref());
    if let Some(priority) = doc
        .get("Priority")
        .and_then(Value::as_i64)
        .and_then(|p| i32::try_from(p).ok())
        .or(header.priority)
    {
        c.set_priority(priority);
    }
    if let Some(merge) = str_of(doc, "Merge").and_then(MergeKind::parse) {
        c.set_merge_kind(merge);
    }
    if let Some(package) = str_of(doc, "Package") {
        c.add_pkgname(package);
    }
    c.set_source_pkgname(str_of(doc, "SourcePackage"));
    c.set_project_license(str_of(doc, "ProjectLicense"));
    c.set_project_group(str_of(doc, "ProjectGroup"));

    for (locale, text) in localized(doc.get("Name")) {
        c.set_name(locale, text);
    }
    for (locale, text) in localized(doc.get("Summary")) {
        c.set_comment(locale, text);
    }
    for (locale, text) in localized(doc.get("Description")) {
        c.set_description(locale, text.trim());
    }
    for (locale, text) in localized(doc.get("DeveloperName")) {
        c.set_developer_name(locale, text);
    }
    for (locale, words) in mapping(doc.get("Keywords")) {
        let locale = (locale != "C").then_some(locale);
        for word in strings(Some(words)) {
            c.add_keyword(locale, word);
        }
    }

    for category in strings(doc.get("Categories")) {
        c.add_category(category);
    }
    for extends in strings(doc.get("Extends")) {
        c.add_extends(extends);
    }
    for (kind, url) in mapping(doc.get("Url")) {
        if let Some(url) = url.as_str() {
            c.add_url(kind, url);
        }
    }
    for (key, value) in mapping(doc.get("Custom")) {
        c.add_metadata(key, value.as_str().unwrap_or_default());
    }

    parse_icons(&mut c, doc.get("Icon"), header);

    for (kind, values) in mapping(doc.get("Launchable")) {
        let kind = LaunchableKind::parse(kind).unwrap_or_default();
        for value in strings(Some(values)) {
            c.add_launchable(Launchable::new(kind, value));
        }
    }

    for (kind, values) in mapping(doc.get("Provides")) {
        match kind {
            "mediatypes" | "mimetypes" => {
                for value in strings(Some(values)) {
                    c.add_provide(Provide::new(ProvideKind::MediaType, value));
                    c.add_mimetype(value);
                }
            }
            "binaries" | "libraries" | "modaliases" | "python2" | "python3" | "ids" => {
                let kind = match kind {
                    "binaries" => ProvideKind::Binary,
                    "libraries" => ProvideKind::Library,
                    "modaliases" => ProvideKind::Modalias,
                    "python2" => ProvideKind::Python2,
                    "python3" => ProvideKind::Python3,
                    _ => ProvideKind::Id,
                };
                for value in strings(Some(values)) {
                    c.add_provide(Provide::new(kind, value));
                }
            }
            "fonts" => {
                for font in values.as_sequence().into_iter().flatten() {
                    if let Some(name) = str_of(font, "name") {
                        c.add_provide(Provide::new(ProvideKind::Font, name));
                    }
                }
            }
            "dbus" => {
                for service in values.as_sequence().into_iter().flatten() {
                    let kind = match str_of(service, "type") {
                        Some("system") => ProvideKind::DbusSystem,
                        _ => ProvideKind::DbusSession,
                    };
                    if let Some(name) = str_of(service, "service") {
                        c.add_provide(Provide::new(kind, name));
                    }
                }
            }
            "firmware" => {
                for fw in values.as_sequence().into_iter().flatten() {
                    let kind = match str_of(fw, "type") {
                        Some("flashed") => ProvideKind::FirmwareFlashed,
                        _ => ProvideKind::FirmwareRuntime,
                    };
                    if let Some(value) = str_of(fw, "guid").or_else(|| str_of(fw, "file")) {
                        c.add_provide(Provide::new(kind, value));
                    }
                }
            }
            _ => {}
        }
    }

    for entry in doc.get("Releases").and_then(Value::as_sequence).into_iter().flatten() {
        let mut release = Release {
            version: str_of(entry, "version").map(Arc::from),
            timestamp: entry.get("unix-timestamp").and_then(Value::as_u64).unwrap_or(0),
            kind: str_of(entry, "type").and_then(ReleaseKind::parse).unwrap_or_default(),
            urgency: str_of(entry, "urgency").and_then(Urgency::parse).unwrap_or_default(),
            ..Default::default()
        };
        for (locale, text) in localized(entry.get("description")) {
            release = release.with_description(locale, text.trim());
        }
        c.add_source_release(release);
    }

    for entry in doc.get("Screenshots").and_then(Value::as_sequence).into_iter().flatten() {
        let kind = if entry.get("default").and_then(Value::as_bool).unwrap_or(false) {
            ScreenshotKind::Default
        } else {
            ScreenshotKind::Normal
        };
        let mut screenshot = Screenshot::new(kind);
        for (locale, text) in localized(entry.get("caption")) {
            screenshot = screenshot.with_caption(locale, text);
        }
        if let Some(image) = entry.get("source-image")
            && let Some(url) = str_of(image, "url")
        {
            screenshot = screenshot.with_image(
                Image::new(ImageKind::Source, &media_url(header, url))
                    .with_size(u32_of(image, "width"), u32_of(image, "height")),
            );
        }
        for thumb in entry.get("thumbnails").and_then(Value::as_sequence).into_iter().flatten() {
            if let Some(url) = str_of(thumb, "url") {
                screenshot = screenshot.with_image(
                    Image::new(ImageKind::Thumbnail, &media_url(header, url))
                        .with_size(u32_of(thumb, "width"), u32_of(thumb, "height")),
                );
            }
        }
        c.add_source_screenshot(screenshot);
    }

    for (kind, attributes) in mapping(doc.get("ContentRating")) {
        let mut rating = ContentRating::new(kind);
        for (id, value) in mapping(Some(attributes)) {
            let value = value.as_str().and_then(RatingValue::parse).unwrap_or_default();
            rating = rating.with_attribute(id, value);
        }
        c.add_source_content_rating(rating);
    }

    for entry in doc.get("Bundles").and_then(Value::as_sequence).into_iter().flatten() {
        let kind = str_of(entry, "type").and_then(BundleKind::parse).unwrap_or_default();
        if let Some(id) = str_of(entry, "id") {
            let mut bundle = Bundle::new(kind, id);
            bundle.runtime = str_of(entry, "runtime").map(Arc::from);
            bundle.sdk = str_of(entry, "sdk").map(Arc::from);
            c.add_bundle(bundle);
        }
    }

    for entry in doc.get("Suggests").and_then(Value::as_sequence).into_iter().flatten() {
        let kind = str_of(entry, "type")
            .and_then(SuggestKind::parse)
            .unwrap_or(SuggestKind::Upstream);
        let mut suggest = Suggest::new(kind);
        for id in strings(entry.get("ids")) {
            suggest = suggest.with_id(id);
        }
        c.add_suggest(suggest);
    }

    Some(c)
}

fn parse_icons(c: &mut Component, icons: Option<&Value>, header: &Header) {
    for (kind, value) in mapping(icons) {
        match kind {
            "stock" => {
                if let Some(name) = value.as_str() {
                    c.add_icon(Icon::new(IconKind::Stock, name));
                }
            }
            "cached" | "remote" | "local" => {
                let kind = IconKind::parse(kind).unwrap_or_default();
                for entry in value.as_sequence().into_iter().flatten() {
                    let Some(name) = str_of(entry, "name").or_else(|| str_of(entry, "url")) else {
                        continue;
                    };
                    let mut icon = Icon::new(kind, name)
                        .with_size(u32_of(entry, "width"), u32_of(entry, "height"));
                    icon.scale = u32_of(entry, "scale").max(1);
                    if kind == IconKind::Remote {
                        icon.url = Some(Arc::from(media_url(header, name).as_str()));
                    }
                    c.add_icon(icon);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::State;

    const CATALOG: &str = r#"---
File: DEP-11
Version: '0.12'
Origin: debian-main
MediaBaseUrl: https://appstream.debian.org/media
---
Type: desktop-application
ID: org.gnome.Maps.desktop
Package: gnome-maps
Name:
  C: Maps
  de: Karten
Summary:
  C: Find places around the world
Description:
  C: <p>Maps gives you quick access.</p>
Categories:
  - Utility
Keywords:
  C:
    - navigation
Icon:
  stock: org.gnome.Maps
  remote:
    - url: icons/64x64/maps.png
      width: 64
      height: 64
Launchable:
  desktop-id:
    - org.gnome.Maps.desktop
Provides:
  mediatypes:
    - x-scheme-handler/geo
Releases:
  - version: '3.30'
    unix-timestamp: 1536105600
Screenshots:
  - default: true
    source-image:
      url: shots/maps.png
      width: 1024
      height: 768
ContentRating:
  oars-1.1:
    social-location: moderate
---
Type: addon
ID: org.gnome.Maps.plugin
Extends:
  - org.gnome.Maps.desktop
Merge: append
"#;

    #[test]
    fn test_parse_catalog() {
        let parsed = YamlParser
            .parse(CATALOG.as_bytes(), &SourceInfo::new("debian-main.yml"))
            .unwrap();
        assert_eq!(parsed.len(), 2);

        let maps = &parsed[0];
        assert_eq!(maps.id(), Some("org.gnome.Maps.desktop"));
        assert_eq!(maps.kind(), ComponentKind::Desktop);
        assert_eq!(maps.origin(), Some("debian-main"));
        assert_eq!(maps.name(Some("de")), Some("Karten"));
        assert_eq!(maps.keywords(None)[0].as_ref(), "navigation");
        assert_eq!(maps.mimetypes().len(), 1);
        assert_eq!(maps.icons().len(), 2);
        assert_eq!(
            maps.icon(IconKind::Remote).and_then(|i| i.url.as_deref()),
            Some("https://appstream.debian.org/media/icons/64x64/maps.png")
        );
        assert_eq!(
            maps.screenshots()[0].source_image().map(|i| &*i.url),
            Some("https://appstream.debian.org/media/shots/maps.png")
        );
        assert_eq!(maps.releases()[0].timestamp, 1536105600);
        assert_eq!(maps.state(), State::Available);

        let addon = &parsed[1];
        assert_eq!(addon.merge_kind(), MergeKind::Append);
        assert_eq!(addon.extends().len(), 1);
    }

    #[test]
    fn test_missing_header() {
        let err = YamlParser
            .parse(b"ID: foo\n", &SourceInfo::new("broken.yml"))
            .unwrap_err();
        assert!(matches!(err, ParseError::Yaml(_)));
    }

    #[test]
    fn test_document_without_id_skipped() {
        let yaml = "File: DEP-11\nOrigin: x\n---\nType: generic\n---\nType: generic\nID: kept\n";
        let parsed = YamlParser.parse(yaml.as_bytes(), &SourceInfo::new("x.yml")).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id(), Some("kept"));
    }
}

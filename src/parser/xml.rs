// src/parser/xml.rs

//! AppStream XML
//!
//! Reads both collection files (`<components origin="...">` holding many
//! `<component>` elements) and single upstream AppData/MetaInfo documents.
//! Collection-level `origin` is copied onto every component unless the
//! component sets its own.

use super::node::{NodeId, NodeTree};
use super::{utf8, ParseError, Parser, SourceInfo};
use crate::component::{
    Agreement, AgreementKind, AgreementSection, Bundle, BundleKind, Component, ComponentKind,
    ContentRating, FormatKind, Icon, IconKind, Image, ImageKind, Launchable, LaunchableKind,
    MergeKind, ProblemFlags, Provide, ProvideKind, Quirks, RatingValue, Release, ReleaseKind,
    Require, RequireCompare, RequireKind, Review, Screenshot, ScreenshotKind, Suggest,
    SuggestKind, Translation, TranslationKind, Urgency,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Parser for AppStream, AppData and MetaInfo XML
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlParser;

impl Parser for XmlParser {
    fn parse(&self, bytes: &[u8], source: &SourceInfo) -> Result<Vec<Component>, ParseError> {
        let tree = NodeTree::parse(utf8(bytes)?)?;
        let root = tree
            .document_element()
            .ok_or_else(|| ParseError::Xml("document is empty".to_string()))?;

        let guessed = source.format_kind();
        let (nodes, origin, format_kind): (Vec<NodeId>, Option<&str>, FormatKind) =
            match tree.name(root) {
                "components" => (
                    tree.children_named(root, "component").collect(),
                    tree.attr(root, "origin"),
                    FormatKind::AppStream,
                ),
                "component" | "application" => {
                    let kind = match guessed {
                        FormatKind::AppData | FormatKind::MetaInfo => guessed,
                        _ => FormatKind::MetaInfo,
                    };
                    (vec![root], None, kind)
                }
                other => {
                    return Err(ParseError::Xml(format!("unexpected root element <{}>", other)));
                }
            };

        let collection = format_kind == FormatKind::AppStream;
        let mut components = Vec::with_capacity(nodes.len());
        for node in nodes {
            let mut component = parse_component(&tree, node);
            if component.id().is_none() {
                if !collection {
                    return Err(ParseError::MissingId);
                }
                warn!(
                    "skipping component without <id> in {}",
                    source.filename.as_deref().unwrap_or("<memory>")
                );
                continue;
            }
            if component.origin().is_none() && origin.is_some() {
                component.set_origin(origin);
            }
            if !tree.has_declaration() {
                component.add_problem(ProblemFlags::NO_XML_HEADER);
            }
            source.stamp(&mut component, format_kind);
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

fn parse_u32(value: Option<&str>) -> u32 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

fn parse_component(tree: &NodeTree, node: NodeId) -> Component {
    let mut c = Component::default();

    if let Some(kind) = tree.attr(node, "type").and_then(ComponentKind::parse) {
        c.set_kind(kind);
    }
    if let Some(priority) = tree.attr(node, "priority").and_then(|p| p.parse().ok()) {
        c.set_priority(priority);
    }
    if let Some(merge) = tree.attr(node, "merge").and_then(MergeKind::parse) {
        c.set_merge_kind(merge);
    }

    for child in tree.children(node) {
        let text = tree.text(child);
        let lang = tree.lang(child);
        match tree.name(child) {
            "id" => {
                if lang.is_some() {
                    c.add_problem(ProblemFlags::TRANSLATED_ID);
                } else if let Some(id) = text {
                    c.set_id(id);
                }
            }
            "name" => {
                if let Some(v) = text {
                    c.set_name(lang, v);
                }
            }
            "summary" => {
                if let Some(v) = text {
                    c.set_comment(lang, v);
                }
            }
            "developer_name" => {
                if let Some(v) = text {
                    c.set_developer_name(lang, v);
                }
            }
            "description" => {
                let markup = tree.markup(child);
                if !markup.is_empty() {
                    c.set_description(lang, &markup);
                }
            }
            "pkgname" => {
                if let Some(v) = text {
                    c.add_pkgname(v);
                }
            }
            "source_pkgname" => c.set_source_pkgname(text),
            "project_license" => c.set_project_license(text),
            "metadata_license" => c.set_metadata_license(text),
            "project_group" => c.set_project_group(text),
            "origin" => c.set_origin(text),
            "branch" => c.set_branch(text),
            "url" => {
                if let Some(v) = text {
                    c.add_url(tree.attr(child, "type").unwrap_or("homepage"), v);
                }
            }
            "compulsory_for_desktop" => c.add_quirk(Quirks::COMPULSORY),
            "categories" => {
                for item in tree.children_named(child, "category") {
                    if let Some(v) = tree.text(item) {
                        c.add_category(v);
                    }
                }
            }
            "keywords" => {
                for item in tree.children_named(child, "keyword") {
                    if let Some(v) = tree.text(item) {
                        c.add_keyword(tree.lang(item).or(lang), v);
                    }
                }
            }
            "kudos" => {
                for item in tree.children_named(child, "kudo") {
                    if let Some(v) = tree.text(item) {
                        c.add_kudo(v);
                    }
                }
            }
            "permissions" => {
                for item in tree.children_named(child, "permission") {
                    if let Some(v) = tree.text(item) {
                        c.add_permission(v);
                    }
                }
            }
            "mimetypes" => {
                for item in tree.children_named(child, "mimetype") {
                    if let Some(v) = tree.text(item) {
                        c.add_mimetype(v);
                    }
                }
            }
            "architectures" => {
                for item in tree.children_named(child, "arch") {
                    if let Some(v) = tree.text(item) {
                        c.add_architecture(v);
                    }
                }
            }
            "extends" => {
                if let Some(v) = text {
                    c.add_extends(v);
                }
            }
            "vetos" => {
                for item in tree.children_named(child, "veto") {
                    if let Some(v) = tree.text(item) {
                        c.add_veto(v);
                    }
                }
            }
            "icon" => {
                if let Some(icon) = parse_icon(tree, child) {
                    c.add_icon(icon);
                }
            }
            "launchable" => {
                let kind = tree
                    .attr(child, "type")
                    .and_then(LaunchableKind::parse)
                    .unwrap_or_default();
                if let Some(v) = text {
                    c.add_launchable(Launchable::new(kind, v));
                }
            }
            "bundle" => {
                let kind = tree
                    .attr(child, "type")
                    .and_then(BundleKind::parse)
                    .unwrap_or_default();
                if let Some(v) = text {
                    let mut bundle = Bundle::new(kind, v);
                    bundle.runtime = tree.attr(child, "runtime").map(Arc::from);
                    bundle.sdk = tree.attr(child, "sdk").map(Arc::from);
                    c.add_bundle(bundle);
                }
            }
            "translation" => {
                let kind = tree
                    .attr(child, "type")
                    .and_then(TranslationKind::parse)
                    .unwrap_or_default();
                if let Some(v) = text {
                    c.add_translation(Translation::new(kind, v));
                }
            }
            "provides" => {
                for item in tree.children(child) {
                    if let Some(provide) = parse_provide(tree, item) {
                        c.add_provide(provide);
                    }
                }
            }
            "requires" => {
                for item in tree.children(child) {
                    c.add_require(parse_require(tree, item));
                }
            }
            "suggests" => {
                let kind = tree
                    .attr(child, "type")
                    .and_then(SuggestKind::parse)
                    .unwrap_or(SuggestKind::Upstream);
                let mut suggest = Suggest::new(kind);
                for item in tree.children_named(child, "id") {
                    if let Some(v) = tree.text(item) {
                        suggest = suggest.with_id(v);
                    }
                }
                c.add_suggest(suggest);
            }
            "releases" => {
                for item in tree.children_named(child, "release") {
                    c.add_source_release(parse_release(tree, item));
                }
            }
            "screenshots" => {
                for item in tree.children_named(child, "screenshot") {
                    c.add_source_screenshot(parse_screenshot(tree, item));
                }
            }
            "content_rating" => {
                let mut rating = ContentRating::new(tree.attr(child, "type").unwrap_or("oars-1.0"));
                for item in tree.children_named(child, "content_attribute") {
                    if let Some(id) = tree.attr(item, "id") {
                        let value = tree
                            .text(item)
                            .and_then(RatingValue::parse)
                            .unwrap_or_default();
                        rating = rating.with_attribute(id, value);
                    }
                }
                c.add_source_content_rating(rating);
            }
            "agreement" => c.add_agreement(parse_agreement(tree, child)),
            "reviews" => {
                for item in tree.children_named(child, "review") {
                    c.add_review(parse_review(tree, item));
                }
            }
            "metadata" | "custom" => {
                for item in tree.children_named(child, "value") {
                    if let Some(key) = tree.attr(item, "key") {
                        c.add_metadata(key, tree.text(item).unwrap_or_default());
                    }
                }
            }
            _ => {}
        }
    }

    c
}

fn parse_icon(tree: &NodeTree, node: NodeId) -> Option<Icon> {
    let value = tree.text(node)?;
    let kind = tree
        .attr(node, "type")
        .and_then(IconKind::parse)
        .unwrap_or(IconKind::Stock);
    let mut icon = Icon::new(kind, value).with_size(
        parse_u32(tree.attr(node, "width")),
        parse_u32(tree.attr(node, "height")),
    );
    icon.scale = parse_u32(tree.attr(node, "scale")).max(1);
    if matches!(kind, IconKind::Remote | IconKind::Local) {
        icon.url = Some(Arc::from(value));
    }
    Some(icon)
}

fn parse_provide(tree: &NodeTree, node: NodeId) -> Option<Provide> {
    let value = tree.text(node)?;
    let kind = match (tree.name(node), tree.attr(node, "type")) {
        ("firmware", Some("flashed")) => ProvideKind::FirmwareFlashed,
        ("firmware", _) => ProvideKind::FirmwareRuntime,
        ("dbus", Some("system")) => ProvideKind::DbusSystem,
        ("dbus", _) => ProvideKind::DbusSession,
        (name, _) => ProvideKind::parse(name).unwrap_or_default(),
    };
    Some(Provide::new(kind, value))
}

fn parse_require(tree: &NodeTree, node: NodeId) -> Require {
    Require {
        kind: RequireKind::parse(tree.name(node)).unwrap_or_default(),
        compare: tree
            .attr(node, "compare")
            .and_then(RequireCompare::parse)
            .unwrap_or_default(),
        value: tree.text(node).map(Arc::from),
        version: tree.attr(node, "version").map(Arc::from),
    }
}

fn parse_release(tree: &NodeTree, node: NodeId) -> Release {
    let mut release = Release {
        version: tree.attr(node, "version").map(Arc::from),
        timestamp: tree
            .attr(node, "timestamp")
            .and_then(|t| t.parse().ok())
            .unwrap_or(0),
        kind: tree
            .attr(node, "type")
            .and_then(ReleaseKind::parse)
            .unwrap_or_default(),
        urgency: tree
            .attr(node, "urgency")
            .and_then(Urgency::parse)
            .unwrap_or_default(),
        ..Default::default()
    };
    for child in tree.children(node) {
        match tree.name(child) {
            "description" => {
                let markup = tree.markup(child);
                if !markup.is_empty() {
                    release = release.with_description(tree.lang(child), &markup);
                }
            }
            "location" => {
                if let Some(v) = tree.text(child) {
                    release.locations.push(Arc::from(v));
                }
            }
            _ => {}
        }
    }
    release
}

fn parse_screenshot(tree: &NodeTree, node: NodeId) -> Screenshot {
    let kind = tree
        .attr(node, "type")
        .and_then(ScreenshotKind::parse)
        .unwrap_or_default();
    let mut screenshot = Screenshot::new(kind);
    screenshot.priority = tree
        .attr(node, "priority")
        .and_then(|p| p.parse().ok())
        .unwrap_or(0);

    for child in tree.children(node) {
        match tree.name(child) {
            "caption" => {
                if let Some(v) = tree.text(child) {
                    screenshot = screenshot.with_caption(tree.lang(child), v);
                }
            }
            "image" => {
                if let Some(url) = tree.text(child) {
                    let kind = tree
                        .attr(child, "type")
                        .and_then(ImageKind::parse)
                        .unwrap_or(ImageKind::Source);
                    screenshot = screenshot.with_image(Image::new(kind, url).with_size(
                        parse_u32(tree.attr(child, "width")),
                        parse_u32(tree.attr(child, "height")),
                    ));
                }
            }
            _ => {}
        }
    }

    // old-style <screenshot>url</screenshot>
    if screenshot.images.is_empty()
        && let Some(url) = tree.text(node)
    {
        screenshot = screenshot.with_image(Image::new(ImageKind::Source, url));
    }
    screenshot
}

fn parse_agreement(tree: &NodeTree, node: NodeId) -> Agreement {
    let mut agreement = Agreement {
        kind: tree
            .attr(node, "type")
            .and_then(AgreementKind::parse)
            .unwrap_or_default(),
        version_id: tree.attr(node, "version_id").map(Arc::from),
        sections: Vec::new(),
    };
    for section_node in tree.children_named(node, "agreement_section") {
        let mut section = AgreementSection {
            kind: tree.attr(section_node, "type").map(Arc::from),
            ..Default::default()
        };
        for child in tree.children(section_node) {
            let locale: Arc<str> = Arc::from(tree.lang(child).unwrap_or("C"));
            match tree.name(child) {
                "name" => {
                    if let Some(v) = tree.text(child) {
                        section.name.insert(locale, Arc::from(v));
                    }
                }
                "description" => {
                    let markup = tree.markup(child);
                    if !markup.is_empty() {
                        section.description.insert(locale, Arc::from(markup.as_str()));
                    }
                }
                _ => {}
            }
        }
        agreement.sections.push(section);
    }
    agreement
}

fn parse_review(tree: &NodeTree, node: NodeId) -> Review {
    let text = |name: &str| -> Option<Arc<str>> {
        tree.child(node, name)
            .and_then(|c| tree.text(c))
            .map(Arc::from)
    };
    Review {
        id: tree.attr(node, "id").map(Arc::from),
        rating: tree
            .attr(node, "rating")
            .and_then(|r| r.parse().ok())
            .unwrap_or(0),
        date: tree
            .attr(node, "date")
            .and_then(|d| d.parse().ok())
            .unwrap_or(0),
        summary: text("summary"),
        description: tree
            .child(node, "description")
            .map(|d| Arc::from(tree.markup(d).as_str())),
        reviewer_name: text("reviewer_name"),
        locale: text("lang"),
        version: text("version"),
    }
}

// tests/common/mod.rs

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use appcatalog::{Component, Format, FormatKind, Store, StoreConfig, StoreEvent};
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;

/// A store with stemming off and only untranslated text indexed, so search
/// expectations do not depend on the host locale.
pub fn test_store(config: StoreConfig) -> Store {
    let mut config = config.with_locales(["C"]);
    config.search.stemming = false;
    Store::new(config)
}

/// A component with one format of the given kind and a priority
pub fn component(id: &str, kind: FormatKind, priority: i32) -> Component {
    let mut c = Component::new(id);
    c.add_format(Format::new(kind));
    c.set_priority(priority);
    c
}

/// A single-component MetaInfo document
pub fn metainfo(id: &str, name: &str, summary: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<component type="desktop-application">
  <id>{id}</id>
  <metadata_license>CC0-1.0</metadata_license>
  <name>{name}</name>
  <summary>{summary}</summary>
</component>
"#
    )
}

/// An AppStream collection with the given origin wrapping component bodies
pub fn collection(origin: &str, components: &[&str]) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<components version=\"0.14\" origin=\"{}\">\n",
        origin
    );
    for body in components {
        xml.push_str(body);
        xml.push('\n');
    }
    xml.push_str("</components>\n");
    xml
}

/// A minimal desktop entry
pub fn desktop_entry(name: &str, comment: &str) -> String {
    format!("[Desktop Entry]\nType=Application\nName={name}\nComment={comment}\nExec=true\n")
}

/// Write a fixture file, creating parent directories
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Everything queued on a receiver
pub fn drain(rx: &mut broadcast::Receiver<StoreEvent>) -> Vec<StoreEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Install a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

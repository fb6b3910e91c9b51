// tests/load.rs

//! Loading from disk: directories, invalid files, cancellation and
//! filesystem events.

mod common;

use appcatalog::component::State;
use appcatalog::{CancelToken, Error, FormatKind, FsEvent, Scope, StoreConfig};
use common::{collection, desktop_entry, init_tracing, metainfo, test_store, write_file};
use tempfile::TempDir;

#[test]
fn test_load_directory_records_watches() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let a = write_file(dir.path(), "org.example.A.metainfo.xml", &metainfo("org.example.A", "A", "First"));
    let b = write_file(dir.path(), "org.example.B.metainfo.xml", &metainfo("org.example.B", "B", "Second"));
    write_file(dir.path(), "notes.txt", "not a source");

    let mut store = test_store(StoreConfig::default());
    let count = store
        .load_from_path(dir.path(), Scope::System, Some("x86_64"), &CancelToken::new())
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(store.len(), 2);

    let c = store.get_by_id("org.example.A")[0];
    assert_eq!(c.scope(), Scope::System);
    assert_eq!(c.state(), State::Installed);
    assert_eq!(c.format_default().map(|f| f.kind()), Some(FormatKind::MetaInfo));
    assert_eq!(c.architectures()[0].as_ref(), "x86_64");

    assert!(store.watches().contains(dir.path()));
    assert!(store.watches().contains(&a));
    assert!(store.watches().contains(&b));
}

#[test]
fn test_load_collection_file() {
    let dir = TempDir::new().unwrap();
    let xml = collection(
        "fedora",
        &[
            r#"<component type="desktop-application"><id>org.gnome.Maps.desktop</id><name>Maps</name><pkgname>gnome-maps</pkgname></component>"#,
            r#"<component type="font"><id>org.example.Sans</id><name>Sans</name></component>"#,
        ],
    );
    let path = write_file(dir.path(), "fedora.xml", &xml);

    let mut store = test_store(StoreConfig::default());
    let count = store
        .load_from_path(&path, Scope::System, None, &CancelToken::new())
        .unwrap();
    assert_eq!(count, 2);

    let maps = store.get_by_pkgname("gnome-maps").unwrap();
    assert_eq!(maps.origin(), Some("fedora"));
    assert_eq!(maps.state(), State::Available);
    assert_eq!(
        maps.unique_id(),
        "system/package/fedora/desktop/org.gnome.Maps.desktop/*"
    );
}

#[test]
fn test_invalid_file_aborts_unless_ignored() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "broken.metainfo.xml", "<component><id>broken</id>");
    write_file(dir.path(), "good.metainfo.xml", &metainfo("good", "Good", "Works"));

    let mut strict = test_store(StoreConfig::default());
    let err = strict
        .load_from_path(dir.path(), Scope::User, None, &CancelToken::new())
        .unwrap_err();
    match err {
        Error::ParseError { path, .. } => assert!(path.ends_with("broken.metainfo.xml")),
        other => panic!("unexpected error: {other}"),
    }

    let mut config = StoreConfig::default();
    config.load.ignore_invalid = true;
    let mut lenient = test_store(config);
    let count = lenient
        .load_from_path(dir.path(), Scope::User, None, &CancelToken::new())
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(lenient.get_by_id("good").len(), 1);
}

#[test]
fn test_cancelled_load_stops() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.metainfo.xml", &metainfo("a", "A", "First"));

    let token = CancelToken::new();
    token.cancel();
    let mut store = test_store(StoreConfig::default());
    let err = store
        .load_from_path(dir.path(), Scope::System, None, &token)
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert!(store.is_empty());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let mut store = test_store(StoreConfig::default());
    let err = store
        .load_from_path(&dir.path().join("absent.xml"), Scope::System, None, &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, Error::IoError(_)));
}

#[test]
fn test_fs_events_reingest() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "app.metainfo.xml", &metainfo("app", "Old Name", "Summary"));

    let mut store = test_store(StoreConfig::default());
    store
        .load_from_path(dir.path(), Scope::User, None, &CancelToken::new())
        .unwrap();
    assert_eq!(store.get_by_id("app")[0].name(None), Some("Old Name"));

    write_file(dir.path(), "app.metainfo.xml", &metainfo("app", "New Name", "Summary"));
    store.handle_fs_event(&FsEvent::Changed(path.clone())).unwrap();
    assert_eq!(store.len(), 1);
    let c = store.get_by_id("app")[0];
    assert_eq!(c.name(None), Some("New Name"));
    assert_eq!(c.scope(), Scope::User);

    // a new file in a watched directory picks up the directory's scope
    let added = write_file(dir.path(), "other.metainfo.xml", &metainfo("other", "Other", "More"));
    assert_eq!(store.handle_fs_event(&FsEvent::Added(added.clone())).unwrap(), 1);
    assert_eq!(store.get_by_id("other")[0].scope(), Scope::User);
    assert!(store.watches().contains(&added));

    std::fs::remove_file(&path).unwrap();
    store.handle_fs_event(&FsEvent::Removed(path)).unwrap();
    assert!(store.get_by_id("app").is_empty());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_fs_event_for_unwatched_path_ignored() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "x.metainfo.xml", &metainfo("x", "X", "Y"));
    let mut store = test_store(StoreConfig::default());
    assert_eq!(store.handle_fs_event(&FsEvent::Added(path)).unwrap(), 0);
    assert!(store.is_empty());
}

#[test]
fn test_removing_one_source_keeps_the_other() {
    let dir = TempDir::new().unwrap();
    let desktop = write_file(
        dir.path(),
        "applications/org.example.Editor.desktop",
        &desktop_entry("Editor", "Edit text"),
    );
    write_file(
        dir.path(),
        "metainfo/org.example.Editor.metainfo.xml",
        &metainfo("org.example.Editor.desktop", "Editor", "Edit text files"),
    );

    let mut store = test_store(StoreConfig::default());
    let token = CancelToken::new();
    store
        .load_from_path(&dir.path().join("applications"), Scope::System, None, &token)
        .unwrap();
    store
        .load_from_path(&dir.path().join("metainfo"), Scope::System, None, &token)
        .unwrap();

    let found = store.get_by_id("org.example.Editor.desktop");
    assert_eq!(found.len(), 1);
    assert!(found[0].has_format_kind(FormatKind::Desktop));
    assert!(found[0].has_format_kind(FormatKind::MetaInfo));

    store.handle_fs_event(&FsEvent::Removed(desktop)).unwrap();
    let found = store.get_by_id("org.example.Editor.desktop");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].formats().len(), 1);
    assert!(found[0].has_format_kind(FormatKind::MetaInfo));
}

#[test]
fn test_load_from_bytes_attaches_addons() {
    let xml = collection(
        "flathub",
        &[
            r#"<component type="desktop-application"><id>org.example.App</id><name>App</name></component>"#,
            r#"<component type="addon"><id>org.example.App.Plugin</id><name>Plugin</name><extends>org.example.App</extends></component>"#,
        ],
    );
    let mut store = test_store(StoreConfig::default());
    let count = store
        .load_from_bytes(xml.as_bytes(), "flathub.xml", Scope::User, None)
        .unwrap();
    assert_eq!(count, 2);

    let app = store.get_by_id("org.example.App")[0];
    assert_eq!(app.addons().len(), 1);

    // searching the parent matches addon text
    let hits = store.search("plugin");
    assert!(hits.iter().any(|h| &*h.unique_id == app.unique_id()));

    assert_eq!(store.remove_by_source_file("flathub.xml"), 2);
    assert!(store.is_empty());
}

#[test]
fn test_collection_keeps_components_beside_one_without_id() {
    let xml = collection(
        "fedora",
        &[
            r#"<component type="desktop-application"><id>good.desktop</id><name>Good</name></component>"#,
            r#"<component type="desktop-application"><name>No ID</name></component>"#,
        ],
    );
    let mut store = test_store(StoreConfig::default());
    let count = store
        .load_from_bytes(xml.as_bytes(), "fedora.xml", Scope::System, None)
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get_by_id("good.desktop").len(), 1);
}

#[test]
fn test_load_from_bytes_parse_error_names_source() {
    let mut store = test_store(StoreConfig::default());
    let err = store
        .load_from_bytes(b"<component><name>Nameless</name></component>", "bad.metainfo.xml", Scope::System, None)
        .unwrap_err();
    match err {
        Error::ParseError { path, .. } => assert_eq!(path, "bad.metainfo.xml"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_only_native_languages() {
    let xml = r#"<?xml version="1.0"?>
<component type="desktop-application">
  <id>org.example.Maps</id>
  <name>Maps</name>
  <name xml:lang="de">Karten</name>
  <name xml:lang="fr">Cartes</name>
</component>"#;
    let mut config = StoreConfig::default().with_locales(["de", "C"]);
    config.load.only_native_languages = true;
    let mut store = appcatalog::Store::new(config);
    store
        .load_from_bytes(xml.as_bytes(), "maps.metainfo.xml", Scope::System, None)
        .unwrap();

    let c = store.get_by_id("org.example.Maps")[0];
    assert_eq!(c.names().len(), 2);
    assert_eq!(c.name(Some("de")), Some("Karten"));
    assert_eq!(c.name(Some("fr")), Some("Maps"));
}

#[test]
fn test_load_yaml_catalog() {
    let yaml = "\
---
File: DEP-11
Version: '0.12'
Origin: debian-main
---
Type: desktop-application
ID: org.gnome.Maps.desktop
Package: gnome-maps
Name:
  C: Maps
Summary:
  C: Find places around the world
";
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "debian.yml", yaml);
    let mut store = test_store(StoreConfig::default());
    store
        .load_from_path(&path, Scope::System, None, &CancelToken::new())
        .unwrap();

    let maps = store.get_by_pkgname("gnome-maps").unwrap();
    assert_eq!(maps.origin(), Some("debian-main"));
    assert_eq!(maps.format_default().map(|f| f.kind()), Some(FormatKind::AppStream));
}

// tests/store.rs

//! Store behaviour: identity, precedence, merge components, addons, removal
//! and change notification.

mod common;

use appcatalog::component::{
    Bundle, BundleKind, LaunchableKind, Launchable, Provide, ProvideKind, Release,
};
use appcatalog::{
    Component, ComponentKind, DuplicateDataValidator, FormatKind, MergeKind, Scope, StoreConfig,
    StoreEvent, ValidateFlags,
};
use common::{component, drain, test_store};

#[test]
fn test_identity_equal_reflexive_and_wildcard_query() {
    let mut stored = Component::new("org.gnome.Maps.desktop");
    stored.set_scope(Scope::User);
    stored.set_origin(Some("flathub"));
    stored.set_branch(Some("stable"));
    stored.add_bundle(Bundle::new(BundleKind::Flatpak, "app/org.gnome.Maps/x86_64/stable"));
    assert!(stored.identity_equal(&stored));

    let query = Component::new("org.gnome.Maps.desktop");
    assert!(query.identity_equal(&stored));

    let parsed = Component::from_unique_id("*/*/*/*/org.gnome.Maps.desktop/*").unwrap();
    assert!(parsed.identity_equal(&stored));
}

#[test]
fn test_priority_resolution_is_order_independent() {
    let build = |first_desktop: bool| {
        let mut store = test_store(StoreConfig::default());
        let a = component("foo.desktop", FormatKind::Desktop, 0);
        let b = component("foo.desktop", FormatKind::AppStream, 5);
        if first_desktop {
            store.add(a);
            store.add(b);
        } else {
            store.add(b);
            store.add(a);
        }
        store
    };

    for store in [build(true), build(false)] {
        let found = store.get_by_id("foo.desktop");
        assert_eq!(found.len(), 1);
        let mut kinds: Vec<FormatKind> = found[0].formats().iter().map(|f| f.kind()).collect();
        kinds.sort_by_key(|k| k.as_str());
        assert_eq!(kinds, vec![FormatKind::AppStream, FormatKind::Desktop]);
    }
}

#[test]
fn test_equal_priority_merge_is_symmetric() {
    let a = || {
        let mut c = Component::new("foo");
        c.set_name(None, "Foo");
        c.add_category("Game");
        c.set_project_license(Some("GPL-3.0+"));
        c
    };
    let b = || {
        let mut c = Component::new("foo");
        c.set_comment(None, "A game about foo");
        c.add_category("Education");
        c.add_release(Release::new("1.2"));
        c
    };

    let mut forward = test_store(StoreConfig::default());
    forward.add(a());
    forward.add(b());
    let mut reverse = test_store(StoreConfig::default());
    reverse.add(b());
    reverse.add(a());
    // adding the same record again changes nothing
    reverse.add(a());

    for store in [&forward, &reverse] {
        assert_eq!(store.len(), 1);
        let c = store.get_by_id("foo")[0];
        assert_eq!(c.name(None), Some("Foo"));
        assert_eq!(c.comment(None), Some("A game about foo"));
        assert_eq!(c.project_license(), Some("GPL-3.0+"));
        assert_eq!(c.categories().len(), 2);
        assert!(c.has_category("Game") && c.has_category("Education"));
        assert_eq!(c.releases().len(), 1);
    }
}

#[test]
fn test_merge_component_order_independent() {
    let patch = || {
        let mut c = Component::new("foo.desktop");
        c.set_merge_kind(MergeKind::Append);
        c.add_keyword(None, "bar");
        c
    };

    let mut patch_first = test_store(StoreConfig::default());
    patch_first.add(patch());
    assert!(patch_first.get_by_id("foo.desktop").is_empty());
    assert_eq!(patch_first.pending_merge_ids().len(), 1);
    patch_first.add(Component::new("foo.desktop"));

    let mut patch_last = test_store(StoreConfig::default());
    patch_last.add(Component::new("foo.desktop"));
    patch_last.add(patch());

    for store in [&patch_first, &patch_last] {
        let c = store.get_by_id("foo.desktop")[0];
        let keywords: Vec<&str> = c.keywords(None).iter().map(|k| &**k).collect();
        assert_eq!(keywords, vec!["bar"]);
        assert_eq!(store.len(), 1);
    }
}

#[test]
fn test_replace_merge_component_clears_collections() {
    let mut store = test_store(StoreConfig::default());
    let mut app = Component::new("foo.desktop");
    app.add_category("Old");
    store.add(app);

    let mut patch = Component::new("foo.desktop");
    patch.set_merge_kind(MergeKind::Replace);
    patch.add_category("New");
    store.add(patch);

    let c = store.get_by_id("foo.desktop")[0];
    assert!(c.has_category("New"));
    assert!(!c.has_category("Old"));
}

#[test]
fn test_merge_component_emits_changed() {
    let mut store = test_store(StoreConfig::default());
    store.add(Component::new("foo.desktop"));
    let mut rx = store.subscribe();

    let mut patch = Component::new("foo.desktop");
    patch.set_merge_kind(MergeKind::Append);
    patch.add_category("Utility");
    store.add(patch);

    let events = drain(&mut rx);
    assert!(events.contains(&StoreEvent::ComponentChanged("*/*/*/*/foo.desktop/*".into())));
}

#[test]
fn test_no_overwrite_keeps_authored_values() {
    let mut store = test_store(StoreConfig::default());
    let mut first = Component::new("foo");
    first.set_name(None, "Original");
    first.set_origin(Some("fedora"));
    store.add(first);

    let mut second = Component::new("foo");
    second.set_name(None, "Other");
    second.set_origin(Some("flathub"));
    store.add(second);

    let c = store.get_by_id("foo")[0];
    assert_eq!(c.name(None), Some("Original"));
    assert_eq!(c.origin(), Some("fedora"));
}

#[test]
fn test_removal_is_total() {
    let mut store = test_store(StoreConfig::default().with_unique_id());
    let mut system = Component::new("x");
    system.set_scope(Scope::System);
    let mut user = Component::new("x");
    user.set_scope(Scope::User);
    let uids = [system.unique_id().to_string(), user.unique_id().to_string()];
    store.add_many([system, user]);
    assert_eq!(store.len(), 2);

    assert_eq!(store.remove_by_id("x"), 2);
    assert!(store.get_by_id("x").is_empty());
    for uid in &uids {
        assert!(store.get_by_unique_id(uid).is_none());
    }
    assert!(store.is_empty());
}

#[test]
fn test_remove_by_unique_id_wildcard() {
    let mut store = test_store(StoreConfig::default().with_unique_id());
    for (id, scope) in [("a", Scope::System), ("a", Scope::User), ("b", Scope::User)] {
        let mut c = Component::new(id);
        c.set_scope(scope);
        store.add(c);
    }
    assert_eq!(store.remove_by_unique_id("user/*/*/*/*/*"), 2);
    assert_eq!(store.len(), 1);
    assert!(store.get_by_unique_id("system/*/*/*/a/*").is_some());
}

#[test]
fn test_remove_keeps_pending_merges() {
    let mut store = test_store(StoreConfig::default());
    let mut patch = Component::new("foo");
    patch.set_merge_kind(MergeKind::Append);
    patch.add_kudo("HiDpiIcon");
    store.add(patch);
    store.add(Component::new("foo"));
    store.remove_by_id("foo");

    store.add(Component::new("foo"));
    assert_eq!(store.get_by_id("foo")[0].kudos().len(), 1);

    store.remove_all();
    assert!(store.pending_merge_ids().is_empty());
}

#[test]
fn test_addon_attachment_scope_constrained() {
    let mut store = test_store(StoreConfig::default().with_unique_id());
    let mut user_app = Component::new("app.desktop");
    user_app.set_scope(Scope::User);
    let mut system_app = Component::new("app.desktop");
    system_app.set_scope(Scope::System);

    let mut addon = Component::new("app.spellcheck");
    addon.set_kind(ComponentKind::Addon);
    addon.set_scope(Scope::User);
    addon.add_extends("app.desktop");
    store.add_many([addon, user_app, system_app]);
    store.attach_addons();

    let user = store.get_by_unique_id("user/*/*/*/app.desktop/*").unwrap();
    assert_eq!(user.addons().len(), 1);
    assert_eq!(&*user.addons()[0], "user/*/*/addon/app.spellcheck/*");
    let system = store.get_by_unique_id("system/*/*/*/app.desktop/*").unwrap();
    assert!(system.addons().is_empty());
}

#[test]
fn test_addon_attachment_bundle_constrained() {
    let mut store = test_store(StoreConfig::default().with_unique_id());
    let mut packaged = Component::new("app.desktop");
    packaged.add_pkgname("app");
    let mut flatpak_addon = Component::new("app.plugin");
    flatpak_addon.set_kind(ComponentKind::Addon);
    flatpak_addon.add_bundle(Bundle::new(BundleKind::Flatpak, "runtime/app.plugin"));
    flatpak_addon.add_extends("app.desktop");
    store.add_many([packaged, flatpak_addon]);

    assert_eq!(store.attach_addons(), 0);
}

#[test]
fn test_lookup_queries() {
    let mut store = test_store(StoreConfig::default());
    let mut c = Component::new("org.gnome.Maps");
    c.set_kind(ComponentKind::Desktop);
    c.add_pkgname("gnome-maps");
    c.add_provide(Provide::new(ProvideKind::Binary, "gnome-maps"));
    c.add_launchable(Launchable::new(LaunchableKind::DesktopId, "org.gnome.Maps.desktop"));
    c.add_metadata("GnomeSoftware::popular", "true");
    store.add(c);
    store.add(Component::new("org.example.Font"));

    assert!(store.get_by_pkgname("gnome-maps").is_some());
    assert!(store.get_by_provide(ProvideKind::Binary, "gnome-maps").is_some());
    assert!(store.get_by_provide(ProvideKind::Library, "gnome-maps").is_none());
    assert!(
        store
            .get_by_launchable(LaunchableKind::DesktopId, "org.gnome.Maps.desktop")
            .is_some()
    );
    assert_eq!(store.get_by_metadata("GnomeSoftware::popular", "true").len(), 1);
    assert!(store.get_by_metadata("GnomeSoftware::popular", "false").is_empty());

    let ids = store.get_ids_by_kind(ComponentKind::Desktop);
    assert_eq!(ids.len(), 1);
    assert_eq!(&*ids[0], "org.gnome.Maps");
}

#[test]
fn test_inhibit_batches_change_notification() {
    let mut store = test_store(StoreConfig::default());
    let mut rx = store.subscribe();
    {
        let _outer = store.inhibit();
        store.add(Component::new("a"));
        {
            let _inner = store.inhibit();
            store.add(Component::new("b"));
        }
        store.remove_by_id("a");
        assert!(!drain(&mut rx).contains(&StoreEvent::Changed));
    }
    let events = drain(&mut rx);
    assert_eq!(
        events.iter().filter(|e| **e == StoreEvent::Changed).count(),
        1
    );
}

#[test]
fn test_uninhibited_add_notifies_immediately() {
    let mut store = test_store(StoreConfig::default());
    let mut rx = store.subscribe();
    store.add(Component::new("a"));
    assert_eq!(
        drain(&mut rx),
        vec![
            StoreEvent::ComponentAdded("*/*/*/*/a/*".into()),
            StoreEvent::Changed
        ]
    );
}

#[test]
fn test_component_without_id_is_rejected() {
    let mut store = test_store(StoreConfig::default());
    let mut rx = store.subscribe();
    let mut c = Component::default();
    c.set_name(None, "Nameless");
    store.add(c);
    assert!(store.is_empty());
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_strings_are_pooled() {
    let mut store = test_store(StoreConfig::default());
    for id in ["a", "b", "c"] {
        let mut c = Component::new(id);
        c.set_origin(Some("fedora"));
        c.add_category("Utility");
        store.add(c);
    }
    let stats = store.pool_stats();
    // ids a, b, c plus "fedora" and "Utility"
    assert_eq!(stats.strings, 5);

    store.remove_all();
    assert_eq!(store.pool_stats().strings, 0);
}

#[test]
fn test_removal_releases_unshared_strings() {
    let mut store = test_store(StoreConfig::default());
    for id in ["a", "b"] {
        let mut c = Component::new(id);
        c.add_category("Utility");
        store.add(c);
    }
    let mut lone = Component::new("x");
    lone.add_category("Lonely");
    store.add(lone);
    assert_eq!(store.pool_stats().strings, 5);

    assert_eq!(store.remove_by_id("x"), 1);
    // "x" and "Lonely" go, "Utility" is still shared
    assert_eq!(store.pool_stats().strings, 3);

    assert_eq!(store.remove_by_id("a"), 1);
    let stats = store.pool_stats();
    assert_eq!(stats.strings, 2);
    assert_eq!(stats.shared, 2);
}

#[test]
fn test_validate_all_reports_problem_components() {
    let mut store = test_store(StoreConfig::default());
    let mut good = Component::new("good");
    good.set_name(None, "Good");
    good.set_comment(None, "Fine");
    store.add(good);
    store.add(Component::new("bad"));

    let report = store.validate_all(&DuplicateDataValidator, ValidateFlags::empty());
    assert_eq!(report.len(), 1);
    assert_eq!(&*report[0].0, "*/*/*/*/bad/*");
    assert_eq!(report[0].1.len(), 2);
}

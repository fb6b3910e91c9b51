// tests/search.rs

//! Full-text search through the store.

mod common;

use appcatalog::search::{SearchContext, TokenCache};
use appcatalog::{Component, SearchMatch, StoreConfig};
use common::test_store;

fn app(id: &str, name: &str, summary: &str) -> Component {
    let mut c = Component::new(id);
    c.set_name(None, name);
    c.set_comment(None, summary);
    c
}

#[test]
fn test_name_outranks_keyword() {
    let mut store = test_store(StoreConfig::default());
    let mut by_keyword = app("org.example.Draw", "Draw", "Vector drawing");
    by_keyword.add_keyword(None, "editor");
    store.add(by_keyword);
    store.add(app("org.example.Editor", "Editor", "Edit text"));

    let hits = store.search("editor");
    assert_eq!(hits.len(), 2);
    assert_eq!(&*hits[0].unique_id, "*/*/*/*/org.example.Editor/*");
    assert!(hits[0].score > hits[1].score);
}

#[test]
fn test_every_query_word_must_match() {
    let mut store = test_store(StoreConfig::default());
    store.add(app("org.example.Chess", "Chess", "Play board games"));
    store.add(app("org.example.Cards", "Cards", "Play card games"));

    assert_eq!(store.search("play games").len(), 2);
    let hits = store.search("board games");
    assert_eq!(hits.len(), 1);
    assert_eq!(&*hits[0].unique_id, "*/*/*/*/org.example.Chess/*");
    assert!(store.search("board spreadsheet").is_empty());
}

#[test]
fn test_exact_beats_prefix() {
    let mut store = test_store(StoreConfig::default());
    store.add(app("org.example.Edit", "Edit", "Simple"));
    store.add(app("org.example.Editor", "Editor", "Advanced"));

    let hits = store.search("edit");
    assert_eq!(hits.len(), 2);
    assert_eq!(&*hits[0].unique_id, "*/*/*/*/org.example.Edit/*");
}

#[test]
fn test_hyphenated_words_index_parts() {
    let mut store = test_store(StoreConfig::default());
    store.add(app("org.x.Plane", "X-Plane", "Flight simulator"));
    assert_eq!(store.search("x-plane").len(), 1);
    assert_eq!(store.search("plane").len(), 1);
}

#[test]
fn test_stop_words_and_short_queries_match_nothing() {
    let mut store = test_store(StoreConfig::default());
    store.add(app("org.example.App", "The App", "For you"));
    assert!(store.search("the").is_empty());
    assert!(store.search("a").is_empty());
    assert!(store.search("").is_empty());
}

#[test]
fn test_full_id_finds_component_first() {
    let mut store = test_store(StoreConfig::default());
    store.add(app("org.gnome.Maps.desktop", "Maps", "Find places"));
    store.add(app("org.example.Atlas", "Atlas", "Gnome maps desktop companion"));

    let hits = store.search("org.gnome.Maps.desktop");
    assert_eq!(hits.len(), 1);
    assert_eq!(&*hits[0].unique_id, "*/*/*/*/org.gnome.Maps.desktop/*");
    assert!(hits[0].score >= u32::from(SearchMatch::ID.bits()) << 2);

    // the reverse-DNS parts are searchable on their own
    assert_eq!(store.search("gnome maps")[0].unique_id, hits[0].unique_id);
}

#[test]
fn test_pkgname_and_origin_indexed_whole() {
    let mut store = test_store(StoreConfig::default());
    let mut c = app("org.gnome.Maps", "Maps", "World maps");
    c.add_pkgname("gnome-maps");
    c.set_origin(Some("flathub"));
    store.add(c);
    assert_eq!(store.search("gnome-maps").len(), 1);
    assert_eq!(store.search("flathub").len(), 1);
}

fn tools(config: StoreConfig) -> appcatalog::Store {
    let mut store = test_store(config);
    for i in 0..20 {
        store.add(app(&format!("org.example.App{}", i), &format!("Tool {}", i), "Useful tool"));
    }
    store
}

#[test]
fn test_parallel_build_matches_lazy() {
    let lazy = tools(StoreConfig::default());
    let expected = lazy.search("tool");
    assert_eq!(expected.len(), 20);

    let mut config = StoreConfig::default();
    config.search.workers = 2;
    let built = tools(config);
    assert!(built.components().all(|c| c.token_cache().is_none()));
    assert_eq!(built.build_search_caches().unwrap(), 20);
    assert!(built.components().all(|c| c.token_cache().is_some()));
    assert_eq!(built.search("tool"), expected);
}

#[test]
fn test_cache_reset_when_component_changes() {
    let mut store = test_store(StoreConfig::default());
    store.add(app("org.example.App", "Viewer", "Shows pictures"));
    assert!(store.search("gallery").is_empty());

    let mut update = Component::new("org.example.App");
    update.add_keyword(None, "gallery");
    store.add(update);
    assert_eq!(store.search("gallery").len(), 1);
}

#[test]
fn test_full_token_never_scores_below_prefix() {
    let mut config = StoreConfig::default().with_locales(["C"]).search;
    config.stemming = false;
    let ctx = SearchContext::new(&config);
    let cache = TokenCache::build(&app("org.example.Atlas", "Maps", "Mapping"), &[], &ctx);

    let prefix = cache.score("map");
    let full = cache.score("maps");
    assert!(prefix > 0);
    assert!(full >= prefix);
    assert_eq!(full, u32::from(SearchMatch::NAME.bits()) << 2);
}

#[cfg(feature = "stemming")]
#[test]
fn test_stemmed_plural_matches() {
    let mut config = StoreConfig::default().with_locales(["C"]);
    config.search.stemming = true;
    let mut store = appcatalog::Store::new(config);
    store.add(app("org.example.Photos", "Photos", "Organize pictures"));
    assert_eq!(store.search("photo").len(), 1);
    assert_eq!(store.search("picture").len(), 1);
}

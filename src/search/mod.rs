// src/search/mod.rs

//! Full-text search over components
//!
//! Each component carries a lazily built [`TokenCache`]: a map from stemmed
//! token to the OR of the [`SearchMatch`] weights of every field the token
//! was seen in. A query token scores against a cache as follows:
//!
//! - exact token hit: that token's weight bits shifted left by 2
//! - otherwise: the OR of the weights of every token the query prefixes
//!
//! A multi-token query scores only when every token scores, and the result
//! is the OR of the per-token scores.
//!
//! Caches are built once per component (a `OnceLock` on the component) and
//! can be built for the whole store in parallel, see
//! `Store::build_search_caches`.

mod stemmer;
mod tokenize;

pub use stemmer::{default_stemmer, NoopStemmer, Stemmer};
#[cfg(feature = "stemming")]
pub use stemmer::SnowballStemmer;
pub use tokenize::{split_words, strip_markup, STOP_WORDS};

use crate::component::Component;
use crate::config::SearchConfig;
use bitflags::bitflags;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

bitflags! {
    /// Which field a token came from; higher bits rank higher
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SearchMatch: u16 {
        const ORIGIN = 1 << 0;
        const PKGNAME = 1 << 1;
        const MIMETYPE = 1 << 2;
        const KEYWORD = 1 << 3;
        const DESCRIPTION = 1 << 4;
        const COMMENT = 1 << 5;
        const NAME = 1 << 6;
        const ID = 1 << 7;
    }
}

/// Tokenizer settings shared by index builds and queries
#[derive(Clone)]
pub struct SearchContext {
    locales: Vec<String>,
    min_token_length: usize,
    stemmer: Arc<dyn Stemmer>,
}

impl SearchContext {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            locales: config.locales.clone(),
            min_token_length: config.min_token_length,
            stemmer: default_stemmer(config.stemming),
        }
    }

    /// Replace the stemmer
    pub fn with_stemmer(mut self, stemmer: Arc<dyn Stemmer>) -> Self {
        self.stemmer = stemmer;
        self
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// Normalize one word into a token, or reject it
    fn token(&self, word: &str) -> Option<String> {
        if !tokenize::is_indexable(word, self.min_token_length) || tokenize::is_stop_word(word) {
            return None;
        }
        let stemmed = self.stemmer.stem(word);
        if stemmed.is_empty() || tokenize::is_stop_word(&stemmed) {
            return None;
        }
        Some(stemmed)
    }

    /// Normalize a value indexed as one unsplit token
    fn whole_token(&self, value: &str) -> Option<String> {
        let lower = value.to_lowercase();
        if lower.is_empty() {
            return None;
        }
        let token = self.stemmer.stem(&lower);
        Some(if token.is_empty() { lower } else { token })
    }

    /// Tokens of a user query, in query order and without repeats
    ///
    /// A word with inner punctuation (a reverse-DNS ID, a MIME type) is also
    /// kept whole, so it can hit the unsplit ID, pkgname and mimetype tokens.
    pub fn query_tokens(&self, query: &str) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();
        let mut push = |token: String| {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        };
        for raw in query.split_whitespace() {
            let word = raw.trim_matches(|c: char| c.is_ascii_punctuation());
            if word.contains(|c: char| c.is_ascii_punctuation() && c != '-')
                && let Some(token) = self.whole_token(word)
            {
                push(token);
            }
            for part in split_words(word) {
                if let Some(token) = self.token(&part) {
                    push(token);
                }
            }
        }
        tokens
    }
}

impl fmt::Debug for SearchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchContext")
            .field("locales", &self.locales)
            .field("min_token_length", &self.min_token_length)
            .finish_non_exhaustive()
    }
}

/// Per-component map from token to accumulated match weights
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    tokens: HashMap<String, SearchMatch>,
}

impl TokenCache {
    /// Tokenize a component and the addons attached to it
    pub fn build(component: &Component, addons: &[&Component], ctx: &SearchContext) -> Self {
        let mut cache = Self::default();
        cache.add_component(component, ctx);
        for addon in addons {
            cache.add_component(addon, ctx);
        }
        cache
    }

    fn add_component(&mut self, component: &Component, ctx: &SearchContext) {
        if let Some(id) = component.id() {
            self.add_whole(id, SearchMatch::ID, ctx);
            self.add_text(id, SearchMatch::ID, ctx);
        }

        for locale in &ctx.locales {
            let locale = locale.as_str();
            if let Some(name) = component.names().get(locale) {
                self.add_text(name, SearchMatch::NAME, ctx);
            }
            if let Some(comment) = component.comments().get(locale) {
                self.add_text(comment, SearchMatch::COMMENT, ctx);
            }
            if let Some(description) = component.descriptions().get(locale) {
                self.add_text(&strip_markup(description), SearchMatch::DESCRIPTION, ctx);
            }
            for keyword in component.keywords(Some(locale)) {
                self.add_text(keyword, SearchMatch::KEYWORD, ctx);
            }
        }

        for mimetype in component.mimetypes() {
            self.add_whole(mimetype, SearchMatch::MIMETYPE, ctx);
        }
        for pkgname in component.pkgnames() {
            self.add_whole(pkgname, SearchMatch::PKGNAME, ctx);
        }
        if let Some(origin) = component.origin() {
            self.add_whole(origin, SearchMatch::ORIGIN, ctx);
        }
    }

    /// Index a value as a single unsplit token
    fn add_whole(&mut self, value: &str, weight: SearchMatch, ctx: &SearchContext) {
        if let Some(token) = ctx.whole_token(value) {
            self.insert(token, weight);
        }
    }

    fn add_text(&mut self, text: &str, weight: SearchMatch, ctx: &SearchContext) {
        for word in split_words(text) {
            if let Some(token) = ctx.token(&word) {
                self.insert(token, weight);
            }
        }
    }

    fn insert(&mut self, token: String, weight: SearchMatch) {
        *self.tokens.entry(token).or_default() |= weight;
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Weights recorded for an exact token
    pub fn get(&self, token: &str) -> Option<SearchMatch> {
        self.tokens.get(token).copied()
    }

    /// Score one normalized query token
    pub fn score(&self, token: &str) -> u32 {
        if let Some(weight) = self.tokens.get(token) {
            return u32::from(weight.bits()) << 2;
        }
        let prefixed = self
            .tokens
            .iter()
            .filter(|(candidate, _)| candidate.starts_with(token))
            .fold(SearchMatch::empty(), |acc, (_, weight)| acc | *weight);
        u32::from(prefixed.bits())
    }

    /// Score a whole query; zero unless every token scores
    pub fn score_all(&self, tokens: &[String]) -> u32 {
        if tokens.is_empty() {
            return 0;
        }
        let mut total = 0;
        for token in tokens {
            let score = self.score(token);
            if score == 0 {
                return 0;
            }
            total |= score;
        }
        total
    }
}

/// One ranked search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub score: u32,
    pub unique_id: Arc<str>,
}

/// Rank hits by score, highest first, then by unique ID
pub fn rank(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.unique_id.cmp(&b.unique_id))
    });
}

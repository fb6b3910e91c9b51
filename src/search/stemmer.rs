// src/search/stemmer.rs

//! Pluggable token stemmers
//!
//! Index and query tokens go through the same stemmer, so "editing" in a
//! description and "edit" in a query meet at one token.

use std::sync::Arc;

/// Reduces a lowercase token to its stem
pub trait Stemmer: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// Leaves tokens untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStemmer;

impl Stemmer for NoopStemmer {
    fn stem(&self, token: &str) -> String {
        token.to_string()
    }
}

#[cfg(feature = "stemming")]
pub use snowball::SnowballStemmer;

#[cfg(feature = "stemming")]
mod snowball {
    use super::Stemmer;
    use std::cell::RefCell;
    use tantivy::tokenizer::{
        Language, LowerCaser, RawTokenizer, Stemmer as EnglishStemmer, TextAnalyzer, TokenStream,
    };

    thread_local! {
        // token_stream needs &mut, so each worker thread keeps its own chain
        static ANALYZER: RefCell<TextAnalyzer> = RefCell::new(
            TextAnalyzer::builder(RawTokenizer::default())
                .filter(LowerCaser)
                .filter(EnglishStemmer::new(Language::English))
                .build(),
        );
    }

    /// English Snowball stemmer backed by tantivy's analyzer chain
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SnowballStemmer;

    impl SnowballStemmer {
        pub fn new() -> Self {
            Self
        }
    }

    impl Stemmer for SnowballStemmer {
        fn stem(&self, token: &str) -> String {
            ANALYZER.with(|analyzer| {
                let mut analyzer = analyzer.borrow_mut();
                let mut stream = analyzer.token_stream(token);
                let mut stemmed = None;
                while stream.advance() {
                    stemmed = Some(stream.token().text.clone());
                }
                stemmed.unwrap_or_else(|| token.to_string())
            })
        }
    }
}

/// The stemmer for a configuration: Snowball when enabled and compiled in
pub fn default_stemmer(enabled: bool) -> Arc<dyn Stemmer> {
    #[cfg(feature = "stemming")]
    if enabled {
        return Arc::new(SnowballStemmer::new());
    }
    #[cfg(not(feature = "stemming"))]
    if enabled {
        tracing::debug!("stemming requested but not compiled in");
    }
    Arc::new(NoopStemmer)
}

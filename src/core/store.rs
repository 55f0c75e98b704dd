//! Document Store
//!
//! Ownership container for every tracked document, keyed by URI.

use std::collections::BTreeMap;

use tower_lsp::lsp_types::Url;

use super::document::Document;

/// Owns all known documents.
///
/// The map is ordered so that enumeration is deterministic for a fixed
/// state; root resolution relies on this for its tie-break.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: BTreeMap<Url, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by URI. The store never holds two documents with
    /// the same identifier.
    pub fn add(&mut self, document: Document) {
        self.documents.insert(document.uri.clone(), document);
    }

    pub fn get(&self, uri: &Url) -> Option<&Document> {
        self.documents.get(uri)
    }

    pub fn get_mut(&mut self, uri: &Url) -> Option<&mut Document> {
        self.documents.get_mut(uri)
    }

    pub fn remove(&mut self, uri: &Url) -> Option<Document> {
        self.documents.remove(uri)
    }

    pub fn contains(&self, uri: &Url) -> bool {
        self.documents.contains_key(uri)
    }

    /// Restartable sequence over all documents, in URI order. Snapshot
    /// semantics: callers must not assume later mutations are reflected.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

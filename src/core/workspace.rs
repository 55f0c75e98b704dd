//! Workspace
//!
//! The shared document set, the directory scan that populates it, and the
//! relation resolution that picks a build root for any tracked document.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tower_lsp::lsp_types::Url;

use crate::syntax::latex::{IncludeKind, IncludeLink};

use super::document::{Document, Language};
use super::store::DocumentStore;

/// Process-wide document set.
///
/// Shared behind a single mutex; every read and write happens with the lock
/// held. The initialization scan keeps the lock for its whole walk.
#[derive(Debug, Default)]
pub struct Workspace {
    store: DocumentStore,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.store
    }

    /// Insert or replace a document from an open notification.
    pub fn open(&mut self, uri: Url, language: Language, text: String) {
        self.store.add(Document::new(uri, language, text));
    }

    /// Replace a tracked document's text, re-analyzing synchronously.
    /// Returns false when the URI is not tracked.
    pub fn update(&mut self, uri: &Url, text: String) -> bool {
        match self.store.get_mut(uri) {
            Some(document) => {
                document.update_text(text);
                true
            }
            None => false,
        }
    }

    /// Recursively load every file with a known extension under `root`.
    ///
    /// Unreadable directories, entries, and files are logged and skipped;
    /// the walk continues.
    pub fn load_directory(&mut self, root: &Path) {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("cannot read directory {}: {}", root.display(), err);
                return;
            }
        };

        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(err) => {
                    log::warn!("cannot read entry in {}: {}", root.display(), err);
                    continue;
                }
            };

            if path.is_dir() {
                self.load_directory(&path);
            } else if let Some(language) = Language::by_path(&path) {
                self.load_file(&path, language);
            }
        }
    }

    fn load_file(&mut self, path: &Path, language: Language) {
        // Canonicalize so two spellings of the same file share one identifier.
        let path = match fs::canonicalize(path) {
            Ok(path) => path,
            Err(err) => {
                log::warn!("cannot resolve {}: {}", path.display(), err);
                return;
            }
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("cannot read {}: {}", path.display(), err);
                return;
            }
        };

        let uri = match Url::from_file_path(&path) {
            Ok(uri) => uri,
            Err(()) => {
                log::warn!("not a valid file URI: {}", path.display());
                return;
            }
        };

        self.store.add(Document::new(uri, language, text));
    }

    /// Every document reachable from `uri` over inclusion edges, followed in
    /// both directions: a document is related to the files it includes and
    /// to the files that include it.
    pub fn related_documents(&self, uri: &Url) -> Vec<&Document> {
        let mut related = Vec::new();
        let mut visited: HashSet<Url> = HashSet::new();
        let mut queue = vec![uri.clone()];

        while let Some(current) = queue.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            let Some(document) = self.store.get(&current) else {
                continue;
            };
            related.push(document);

            for neighbor in self.neighbors(document) {
                if !visited.contains(&neighbor) {
                    queue.push(neighbor);
                }
            }
        }

        related
    }

    /// Resolve the build root for `uri`: the first standalone primary-markup
    /// document among its relatives (store enumeration order breaks ties),
    /// falling back to the document itself. `None` when `uri` is untracked.
    pub fn resolve_root(&self, uri: &Url) -> Option<&Document> {
        let target = self.store.get(uri)?;

        let related: HashSet<&Url> = self
            .related_documents(uri)
            .into_iter()
            .map(|document| &document.uri)
            .collect();

        self.store
            .iter()
            .filter(|document| related.contains(&document.uri))
            .find(|document| document.is_standalone())
            .or(Some(target))
    }

    fn neighbors(&self, document: &Document) -> Vec<Url> {
        let mut neighbors = Vec::new();

        if let Some(tree) = document.inclusion_tree() {
            for link in &tree.links {
                if let Some(resolved) = self.resolve_link(&document.uri, link) {
                    neighbors.push(resolved);
                }
            }
        }

        for other in self.store.iter() {
            if other.uri == document.uri {
                continue;
            }
            if let Some(tree) = other.inclusion_tree() {
                let includes_document = tree.links.iter().any(|link| {
                    self.resolve_link(&other.uri, link).as_ref() == Some(&document.uri)
                });
                if includes_document {
                    neighbors.push(other.uri.clone());
                }
            }
        }

        neighbors
    }

    /// Resolve a link target against its parent document. Targets written
    /// without an extension get the extension their command implies.
    fn resolve_link(&self, parent: &Url, link: &IncludeLink) -> Option<Url> {
        let mut candidates = vec![link.target.clone()];
        if Path::new(&link.target).extension().is_none() {
            let extension = match link.kind {
                IncludeKind::Document => "tex",
                IncludeKind::Bibliography => "bib",
            };
            candidates.push(format!("{}.{}", link.target, extension));
        }

        for candidate in candidates {
            if let Ok(resolved) = parent.join(&candidate) {
                if self.store.contains(&resolved) {
                    return Some(resolved);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(name: &str) -> Url {
        Url::parse(&format!("file:///project/{name}")).expect("valid URI")
    }

    fn workspace(files: &[(&str, &str)]) -> Workspace {
        let mut workspace = Workspace::new();
        for (name, text) in files {
            let language = Language::by_path(Path::new(name)).expect("known extension");
            workspace.open(uri(name), language, text.to_string());
        }
        workspace
    }

    #[test]
    fn root_of_included_chapter_is_the_including_document() {
        let workspace = workspace(&[
            ("main.tex", "\\documentclass{article}\n\\include{chapter}\n"),
            ("chapter.tex", "\\section{One}\n"),
        ]);

        let root = workspace
            .resolve_root(&uri("chapter.tex"))
            .expect("chapter is tracked");
        assert_eq!(root.uri, uri("main.tex"));
    }

    #[test]
    fn root_of_orphan_document_is_itself() {
        let workspace = workspace(&[("notes.tex", "\\section{Ideas}\n")]);

        let root = workspace
            .resolve_root(&uri("notes.tex"))
            .expect("notes is tracked");
        assert_eq!(root.uri, uri("notes.tex"));
    }

    #[test]
    fn unknown_target_resolves_to_none() {
        let workspace = workspace(&[("main.tex", "\\documentclass{article}\n")]);
        assert!(workspace.resolve_root(&uri("ghost.tex")).is_none());
    }

    #[test]
    fn document_without_edges_is_its_own_root() {
        let workspace = workspace(&[
            ("a.tex", "\\documentclass{article}\n"),
            ("b.tex", "\\section{Unrelated}\n"),
        ]);

        let root = workspace.resolve_root(&uri("b.tex")).expect("tracked");
        assert_eq!(root.uri, uri("b.tex"));
    }

    #[test]
    fn transitive_inclusion_reaches_the_root() {
        let workspace = workspace(&[
            ("main.tex", "\\documentclass{book}\n\\include{part}\n"),
            ("part.tex", "\\include{chapter}\n"),
            ("chapter.tex", "\\section{Deep}\n"),
        ]);

        let root = workspace
            .resolve_root(&uri("chapter.tex"))
            .expect("tracked");
        assert_eq!(root.uri, uri("main.tex"));
    }

    #[test]
    fn bibliography_is_related_to_the_citing_document() {
        let workspace = workspace(&[
            ("main.tex", "\\documentclass{article}\n\\addbibresource{refs.bib}\n"),
            ("refs.bib", "@book{knuth, title={TeX}}\n"),
        ]);

        let root = workspace.resolve_root(&uri("refs.bib")).expect("tracked");
        assert_eq!(root.uri, uri("main.tex"));
    }

    #[test]
    fn extensionless_bibliography_target_defaults_to_bib() {
        let workspace = workspace(&[
            ("main.tex", "\\documentclass{article}\n\\bibliography{refs}\n"),
            ("refs.bib", "@book{knuth, title={TeX}}\n"),
        ]);

        let related = workspace.related_documents(&uri("main.tex"));
        assert_eq!(related.len(), 2);
    }

    #[test]
    fn tie_break_is_store_enumeration_order() {
        // Both roots include the same chapter; the first URI in store order
        // must win, on every call.
        let workspace = workspace(&[
            ("b.tex", "\\documentclass{article}\n\\include{chapter}\n"),
            ("a.tex", "\\documentclass{article}\n\\include{chapter}\n"),
            ("chapter.tex", "\\section{Shared}\n"),
        ]);

        for _ in 0..3 {
            let root = workspace
                .resolve_root(&uri("chapter.tex"))
                .expect("tracked");
            assert_eq!(root.uri, uri("a.tex"));
        }
    }

    #[test]
    fn non_markup_fallback_root_is_the_target_itself() {
        let workspace = workspace(&[("orphan.bib", "@misc{x}\n")]);

        let root = workspace.resolve_root(&uri("orphan.bib")).expect("tracked");
        assert_eq!(root.uri, uri("orphan.bib"));
    }

    #[test]
    fn update_replaces_text_and_edges() {
        let mut workspace = workspace(&[
            ("main.tex", "\\documentclass{article}\n\\include{chapter}\n"),
            ("chapter.tex", "\\section{One}\n"),
        ]);

        assert!(workspace.update(&uri("main.tex"), "\\documentclass{article}\n".to_string()));

        // The edge is gone, so the chapter falls back to itself.
        let root = workspace
            .resolve_root(&uri("chapter.tex"))
            .expect("tracked");
        assert_eq!(root.uri, uri("chapter.tex"));

        assert!(!workspace.update(&uri("ghost.tex"), String::new()));
    }
}

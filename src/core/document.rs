//! Document Management
//!
//! One `Document` per loaded source file, with its language-specific
//! analysis recomputed synchronously on every text replacement.

use std::path::Path;

use tower_lsp::lsp_types::Url;

use crate::syntax::latex::{self, LatexAnalysis};

/// Kind of a tracked source file, derived from its extension.
///
/// Files with any other extension are never loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// Primary markup (`.tex`)
    Tex,
    /// Style file (`.sty`)
    Sty,
    /// Class file (`.cls`)
    Cls,
    /// Bibliography (`.bib`)
    Bib,
}

impl Language {
    pub fn by_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "tex" => Some(Self::Tex),
            "sty" => Some(Self::Sty),
            "cls" => Some(Self::Cls),
            "bib" => Some(Self::Bib),
            _ => None,
        }
    }

    pub fn by_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|extension| extension.to_str())
            .and_then(Self::by_extension)
    }
}

/// Language-specific analysis of a document's text.
///
/// Only primary markup carries an inclusion tree; the other kinds live in
/// the workspace but never take part in root resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    Tex(LatexAnalysis),
    Sty,
    Cls,
    Bib,
}

/// One loaded source file.
#[derive(Debug, Clone)]
pub struct Document {
    pub uri: Url,
    pub language: Language,
    pub text: String,
    pub analysis: Analysis,
}

impl Document {
    /// Create a document and analyze its text immediately.
    pub fn new(uri: Url, language: Language, text: String) -> Self {
        let analysis = Self::analyze(language, &text);
        Self {
            uri,
            language,
            text,
            analysis,
        }
    }

    /// Replace the text wholesale. The analysis is recomputed before the
    /// document can be observed again.
    pub fn update_text(&mut self, text: String) {
        self.analysis = Self::analyze(self.language, &text);
        self.text = text;
    }

    fn analyze(language: Language, text: &str) -> Analysis {
        match language {
            Language::Tex => Analysis::Tex(latex::analyze(text)),
            Language::Sty => Analysis::Sty,
            Language::Cls => Analysis::Cls,
            Language::Bib => Analysis::Bib,
        }
    }

    /// The inclusion tree, for documents that have one.
    pub fn inclusion_tree(&self) -> Option<&LatexAnalysis> {
        match &self.analysis {
            Analysis::Tex(tree) => Some(tree),
            _ => None,
        }
    }

    /// Whether this document can be compiled on its own.
    pub fn is_standalone(&self) -> bool {
        self.inclusion_tree().is_some_and(|tree| tree.standalone)
    }
}

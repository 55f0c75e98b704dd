//! LaTeX Analysis
//!
//! Scans primary-markup text for the two facts the workspace cares about:
//! whether the file is a standalone (compilable) document, and which other
//! files it pulls in.

use std::sync::OnceLock;

use regex::Regex;

/// What a link points at, which decides the implied file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeKind {
    Document,
    Bibliography,
}

/// A single inclusion command found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeLink {
    /// The raw target as written, extension optional.
    pub target: String,
    pub kind: IncludeKind,
}

/// Inclusion tree of one LaTeX document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatexAnalysis {
    /// Whether the document can be compiled directly.
    pub standalone: bool,
    /// Outgoing inclusion edges, in source order.
    pub links: Vec<IncludeLink>,
}

fn standalone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\(documentclass|documentstyle)\b").unwrap())
}

fn include_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\\(include|input|subfile|addbibresource|bibliography)\s*\{([^}]*)\}").unwrap()
    })
}

/// Analyze the full text of a primary-markup document.
///
/// Comments are stripped per line before matching, so commented-out inclusion
/// commands produce no edges.
pub fn analyze(text: &str) -> LatexAnalysis {
    let mut analysis = LatexAnalysis::default();

    for line in text.lines() {
        let line = strip_comment(line);

        if standalone_regex().is_match(line) {
            analysis.standalone = true;
        }

        for caps in include_regex().captures_iter(line) {
            let kind = match &caps[1] {
                "addbibresource" | "bibliography" => IncludeKind::Bibliography,
                _ => IncludeKind::Document,
            };

            // \bibliography accepts a comma-separated list of targets
            for target in caps[2].split(',') {
                let target = target.trim();
                if !target.is_empty() {
                    analysis.links.push(IncludeLink {
                        target: target.to_string(),
                        kind,
                    });
                }
            }
        }
    }

    analysis
}

/// Cut the line at the first unescaped `%`.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (idx, &byte) in bytes.iter().enumerate() {
        if byte == b'%' && (idx == 0 || bytes[idx - 1] != b'\\') {
            return &line[..idx];
        }
    }
    line
}

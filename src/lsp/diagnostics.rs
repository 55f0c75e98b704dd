//! Diagnostics Publishing
//!
//! Publishing is a two-phase protocol: every tracked document gets an empty
//! set first, then each location with fresh errors gets its group. The
//! grouping and conversion here are pure; the emit loop lives with the
//! request handler.

use std::collections::BTreeMap;

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range, Url};

use crate::build::{BuildError, BuildErrorKind};

/// Group error records by location, in deterministic order.
pub fn group_by_uri(errors: Vec<BuildError>) -> Vec<(Url, Vec<Diagnostic>)> {
    let mut groups: BTreeMap<Url, Vec<Diagnostic>> = BTreeMap::new();
    for error in errors {
        let diagnostic = to_diagnostic(&error);
        groups.entry(error.uri).or_default().push(diagnostic);
    }
    groups.into_iter().collect()
}

/// Convert one compiler error record into an LSP diagnostic.
pub fn to_diagnostic(error: &BuildError) -> Diagnostic {
    let severity = match error.kind {
        BuildErrorKind::Error => DiagnosticSeverity::ERROR,
        BuildErrorKind::Warning => DiagnosticSeverity::WARNING,
    };

    // The log reports 1-based lines; records without one land on line 0.
    let line = error.line.unwrap_or(1).saturating_sub(1) as u32;

    Diagnostic {
        range: Range::new(Position::new(line, 0), Position::new(line, 0)),
        severity: Some(severity),
        source: Some("latex-ls".to_string()),
        message: error.message.clone(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(name: &str) -> Url {
        Url::parse(&format!("file:///{name}")).expect("valid URI")
    }

    fn error(name: &str, kind: BuildErrorKind, message: &str, line: Option<u64>) -> BuildError {
        BuildError {
            uri: uri(name),
            kind,
            message: message.to_string(),
            line,
        }
    }

    #[test]
    fn groups_preserve_counts_per_location() {
        let errors = vec![
            error("main.tex", BuildErrorKind::Error, "Missing $", Some(3)),
            error("chapter.tex", BuildErrorKind::Error, "Undefined", Some(9)),
            error("main.tex", BuildErrorKind::Warning, "Overfull box", Some(12)),
        ];

        let groups = group_by_uri(errors);

        assert_eq!(groups.len(), 2);
        let main = groups
            .iter()
            .find(|(location, _)| *location == uri("main.tex"))
            .expect("main group");
        assert_eq!(main.1.len(), 2);
        let chapter = groups
            .iter()
            .find(|(location, _)| *location == uri("chapter.tex"))
            .expect("chapter group");
        assert_eq!(chapter.1.len(), 1);
    }

    #[test]
    fn no_errors_means_no_groups() {
        assert!(group_by_uri(Vec::new()).is_empty());
    }

    #[test]
    fn severity_and_line_are_mapped() {
        let diagnostic = to_diagnostic(&error(
            "main.tex",
            BuildErrorKind::Error,
            "Missing $ inserted.",
            Some(3),
        ));

        assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(diagnostic.range.start.line, 2);
        assert_eq!(diagnostic.message, "Missing $ inserted.");
        assert_eq!(diagnostic.source.as_deref(), Some("latex-ls"));

        let diagnostic = to_diagnostic(&error(
            "main.tex",
            BuildErrorKind::Warning,
            "Citation undefined",
            None,
        ));
        assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(diagnostic.range.start.line, 0);
    }
}

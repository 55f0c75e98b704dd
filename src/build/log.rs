//! TeX Log Parsing
//!
//! Normalizes the engine's log output into structured error records, each
//! attributed to the file the engine was processing when it reported.

use std::sync::OnceLock;

use regex::Regex;
use tower_lsp::lsp_types::Url;

/// Severity reported by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildErrorKind {
    Error,
    Warning,
}

/// One problem reported by the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError {
    pub uri: Url,
    pub kind: BuildErrorKind,
    pub message: String,
    /// 1-based source line, when the log names one.
    pub line: Option<u64>,
}

fn warning_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:LaTeX|Package\s+\w+)\s+Warning:\s*(?P<msg>.*?)(?:\s+on input line\s+(?P<line>\d+))?\.?\s*$",
        )
        .unwrap()
    })
}

fn error_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^l\.(\d+)").unwrap())
}

/// Parse a TeX engine log into error records. Records that cannot be tied to
/// a specific file are attributed to `root`.
pub fn parse_log(root: &Url, log: &str) -> Vec<BuildError> {
    let mut parser = LogParser::new(root);
    for line in log.lines() {
        parser.consume(line);
    }
    parser.finish()
}

struct LogParser<'a> {
    root: &'a Url,
    // One entry per open paren group; only groups that opened with a file
    // path carry a URI.
    file_stack: Vec<Option<Url>>,
    pending_error: Option<BuildError>,
    errors: Vec<BuildError>,
}

impl<'a> LogParser<'a> {
    fn new(root: &'a Url) -> Self {
        Self {
            root,
            file_stack: Vec::new(),
            pending_error: None,
            errors: Vec::new(),
        }
    }

    fn consume(&mut self, line: &str) {
        // "! <message>" opens an error; the line number follows on a later
        // "l.<n>" line, if the engine knows one.
        if let Some(message) = line.strip_prefix("! ") {
            self.flush_pending();
            self.pending_error = Some(BuildError {
                uri: self.current_file(),
                kind: BuildErrorKind::Error,
                message: message.trim().to_string(),
                line: None,
            });
            return;
        }

        if self.pending_error.is_some() {
            if let Some(caps) = error_line_regex().captures(line) {
                if let Some(pending) = self.pending_error.as_mut() {
                    pending.line = caps[1].parse().ok();
                }
                self.flush_pending();
                return;
            }
        }

        if let Some(caps) = warning_regex().captures(line) {
            self.errors.push(BuildError {
                uri: self.current_file(),
                kind: BuildErrorKind::Warning,
                message: caps["msg"].trim().to_string(),
                line: caps.name("line").and_then(|m| m.as_str().parse().ok()),
            });
            return;
        }

        self.track_files(line);
    }

    /// Maintain the engine's paren file-stack: `(` followed by a path opens
    /// a file group, any other `(` opens an anonymous group, `)` closes the
    /// innermost one.
    fn track_files(&mut self, line: &str) {
        let mut rest = line;
        while let Some(pos) = rest.find(['(', ')']) {
            let delimiter = rest.as_bytes()[pos];
            rest = &rest[pos + 1..];

            if delimiter == b')' {
                self.file_stack.pop();
                continue;
            }

            let token: String = rest
                .chars()
                .take_while(|c| !c.is_whitespace() && *c != '(' && *c != ')')
                .collect();
            self.file_stack.push(self.resolve_log_path(&token));
            rest = &rest[token.len()..];
        }
    }

    fn resolve_log_path(&self, token: &str) -> Option<Url> {
        // File tokens carry an extension; everything else in parens is
        // engine chatter.
        if !token.contains('.') {
            return None;
        }
        self.root.join(token).ok()
    }

    fn current_file(&self) -> Url {
        self.file_stack
            .iter()
            .rev()
            .flatten()
            .next()
            .cloned()
            .unwrap_or_else(|| self.root.clone())
    }

    fn flush_pending(&mut self) {
        if let Some(error) = self.pending_error.take() {
            self.errors.push(error);
        }
    }

    fn finish(mut self) -> Vec<BuildError> {
        self.flush_pending();
        self.errors
    }
}

//! Phase 1: Line scanner.
//!
//! The scanner classifies each physical line of an inventory document:
//! section headers (`[name]`, `[name:vars]`, `[name:children]`), content
//! lines (hosts, assignments, children names), comments, and blanks. It
//! also normalizes the spaced assignment form `key = value` to `key=value`,
//! which the quote handling in the lexer requires.

/// How a physical line participates in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `[name]`: host list for a group.
    GroupHosts(String),
    /// `[name:vars]`: variable block for a group.
    GroupVars(String),
    /// `[name:children]`: subgroup list for a group.
    GroupChildren(String),
    /// Anything else: a host line, an assignment, or a child group name.
    Content(String),
}

/// Classify one physical line. Returns `None` for blanks and comments.
pub fn scan_line(raw: &str) -> Option<LineKind> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
        return None;
    }
    if let Some(rest) = line.strip_prefix('[') {
        // The section name runs to the first ']'; trailing text after the
        // bracket is tolerated and ignored. A missing ']' takes the rest
        // of the line as the name.
        let inner = match rest.find(']') {
            Some(pos) => &rest[..pos],
            None => rest,
        };
        if let Some(name) = inner.strip_suffix(":vars") {
            return Some(LineKind::GroupVars(name.to_string()));
        }
        if let Some(name) = inner.strip_suffix(":children") {
            return Some(LineKind::GroupChildren(name.to_string()));
        }
        return Some(LineKind::GroupHosts(inner.to_string()));
    }
    Some(LineKind::Content(normalize_assignment(line)))
}

/// Normalize `key ␣*=␣* value` to `key=value` around the first `=`.
///
/// The format tolerates spaces around `=`, but the lexer's quote detection
/// works on unspaced `key=` prefixes. Normalization only fires when the
/// text before the `=` is a single unquoted word; a quote before the `=`
/// means the `=` sits inside an open value and must stay untouched.
pub fn normalize_assignment(line: &str) -> String {
    let eq = match line.find('=') {
        Some(pos) => pos,
        None => return line.to_string(),
    };
    let before = &line[..eq];
    let key = before.trim_end();
    if key.chars().any(char::is_whitespace) || key.contains('"') || key.contains('\'') {
        return line.to_string();
    }
    let value = line[eq + 1..].trim_start();
    format!("{}={}", key, value)
}

//! Phase 2: Assignment lexer.
//!
//! Splits a content line on the delimiter set `{space, tab, CR, LF, FF}`
//! with delimiters retained, then merges raw tokens back into logical
//! assignment tokens. A `key="..."` or `key='...'` opening keeps
//! accumulating tokens (whitespace re-inserted) until one ends in the
//! matching quote; inside a vars block a bare `key=...` accumulates to the
//! end of the line. Rule precedence is double quote, single quote, then
//! bare. An unterminated quote takes everything up to end of input.

/// The delimiter characters tokens are split on.
fn is_delim(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0c')
}

/// True for a raw token that is a single delimiter character.
fn is_separator(token: &str) -> bool {
    token.len() == 1 && token.chars().all(is_delim)
}

/// Split a line into raw tokens, returning delimiters as their own tokens.
fn raw_tokens(line: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (pos, c) in line.char_indices() {
        if is_delim(c) {
            if pos > start {
                out.push(&line[start..pos]);
            }
            out.push(&line[pos..pos + c.len_utf8()]);
            start = pos + c.len_utf8();
        }
    }
    if start < line.len() {
        out.push(&line[start..]);
    }
    out
}

/// What ends a multi-token value opened by an assignment.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Quote(char),
    EndOfLine,
}

/// Check whether a token of the form `key=value` opens a value that may
/// span whitespace, and with which terminator.
fn opens_value(token: &str, vars_block: bool) -> Option<Terminator> {
    let eq = token.find('=')?;
    let value = &token[eq + 1..];
    if value.starts_with('"') {
        Some(Terminator::Quote('"'))
    } else if value.starts_with('\'') {
        Some(Terminator::Quote('\''))
    } else if vars_block {
        // no quotes required inside a vars block; the value runs to the
        // end of the line
        Some(Terminator::EndOfLine)
    } else {
        None
    }
}

/// True when the token closes the accumulating value.
fn closes_value(token: &str, terminator: Terminator) -> bool {
    match terminator {
        Terminator::Quote(q) => token.ends_with(q),
        Terminator::EndOfLine => false,
    }
}

/// Split a content line into logical tokens: host names, child group
/// names, and whole `key=value` assignments with their quoting intact.
pub fn split_vars(line: &str, vars_block: bool) -> Vec<String> {
    let tokens = raw_tokens(line);
    let mut out = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if is_separator(token) {
            i += 1;
            continue;
        }
        // a '#' or ';' starting a token outside an open value comments out
        // the rest of the line; inside a value it is literal
        if token.starts_with('#') || token.starts_with(';') {
            break;
        }
        if let Some(terminator) = opens_value(token, vars_block) {
            if !closes_value(token, terminator) {
                let mut acc = String::from(token);
                i += 1;
                while i < tokens.len() {
                    acc.push_str(tokens[i]);
                    if !is_separator(tokens[i]) && closes_value(tokens[i], terminator) {
                        break;
                    }
                    i += 1;
                }
                out.push(acc);
                i += 1;
                continue;
            }
        }
        out.push(token.to_string());
        i += 1;
    }
    out
}

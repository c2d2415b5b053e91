//! Phase 3: Block classifier and model builder.
//!
//! Lines are first batched into per-group section bodies (host blocks,
//! children blocks, vars blocks), keyed by group name in document order.
//! The batches are then applied in three passes: host blocks, children
//! wiring, and finally vars propagation. Ordering in the source text is
//! therefore irrelevant: a `[g:vars]` block declared before `[g:children]`
//! still reaches the hosts added through that children block, because
//! propagation only runs once membership and wiring are complete.

use crate::lexer::split_vars;
use crate::model::{GroupId, Inventory, VarValue, UNGROUPED};
use crate::scanner::{scan_line, LineKind};

/// The parsing mode set by the most recent section header. The document
/// starts in the default scope, whose hosts land in `ungrouped`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    DefaultScope,
    GroupHosts(String),
    GroupVars(String),
    GroupChildren(String),
}

/// Section bodies batched per group name, in document order. Repeated
/// sections for one name extend the earlier body.
#[derive(Default)]
struct Blocks {
    hosts: Vec<(String, Vec<String>)>,
    children: Vec<(String, Vec<String>)>,
    vars: Vec<(String, Vec<String>)>,
}

fn push_block_line(blocks: &mut Vec<(String, Vec<String>)>, name: &str, line: String) {
    if let Some((_, lines)) = blocks.iter_mut().find(|(n, _)| n == name) {
        lines.push(line);
    } else {
        blocks.push((name.to_string(), vec![line]));
    }
}

/// Record a section header so its group exists even with an empty body.
fn ensure_block(blocks: &mut Vec<(String, Vec<String>)>, name: &str) {
    if !blocks.iter().any(|(n, _)| n == name) {
        blocks.push((name.to_string(), Vec::new()));
    }
}

/// Parse an inventory from an ordered sequence of lines.
pub fn parse_lines<I, S>(lines: I) -> Inventory
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut mode = Mode::DefaultScope;
    let mut blocks = Blocks::default();

    for line in lines {
        match scan_line(line.as_ref()) {
            None => {}
            Some(LineKind::GroupHosts(name)) => {
                ensure_block(&mut blocks.hosts, &name);
                mode = Mode::GroupHosts(name);
            }
            Some(LineKind::GroupVars(name)) => {
                ensure_block(&mut blocks.vars, &name);
                mode = Mode::GroupVars(name);
            }
            Some(LineKind::GroupChildren(name)) => {
                ensure_block(&mut blocks.children, &name);
                mode = Mode::GroupChildren(name);
            }
            Some(LineKind::Content(text)) => match &mode {
                Mode::DefaultScope => push_block_line(&mut blocks.hosts, UNGROUPED, text),
                Mode::GroupHosts(name) => push_block_line(&mut blocks.hosts, name, text),
                Mode::GroupChildren(name) => push_block_line(&mut blocks.children, name, text),
                Mode::GroupVars(name) => push_block_line(&mut blocks.vars, name, text),
            },
        }
    }

    build(blocks)
}

/// Apply the batched section bodies to a fresh inventory.
fn build(blocks: Blocks) -> Inventory {
    let mut inv = Inventory::new();

    for (name, lines) in &blocks.hosts {
        let group = inv.get_or_add_group(name);
        for line in lines {
            add_host_line(&mut inv, group, line);
        }
    }

    // Children referenced before (or instead of) their own section are
    // auto-created as empty groups.
    for (name, lines) in &blocks.children {
        let group = inv.get_or_add_group(name);
        for line in lines {
            for token in line.split_whitespace() {
                let child = inv.get_or_add_group(token);
                inv.add_subgroup(group, child);
            }
        }
    }

    // A vars block for a group never declared elsewhere still creates it.
    for (name, lines) in &blocks.vars {
        let group = inv.get_or_add_group(name);
        for line in lines {
            for token in split_vars(line, true) {
                if let Some((var, value)) = split_assignment(&token) {
                    inv.propagate_group_var(group, &var, VarValue::Scalar(value));
                }
            }
        }
    }

    inv
}

/// Process one host-block line: the first token names the host, the rest
/// are variable assignments on it.
fn add_host_line(inv: &mut Inventory, group: GroupId, line: &str) {
    let (name, rest) = match line.split_once([' ', '\t']) {
        Some((name, rest)) => (name, Some(rest)),
        None => (line, None),
    };
    let host = inv.get_or_add_host(name);
    inv.add_host_to_group(host, group);
    if let Some(rest) = rest {
        for token in split_vars(rest, false) {
            if let Some((var, value)) = split_assignment(&token) {
                inv.host_by_id_mut(host).set_var(&var, VarValue::Scalar(value));
            }
        }
    }
}

/// Split an assignment token into name and raw value on the first `=`
/// only, so further `=` characters stay in the value verbatim. Doubled
/// backslashes collapse to single ones, the inverse of the writer's
/// escaping. Tokens without `=` are not assignments.
fn split_assignment(token: &str) -> Option<(String, String)> {
    let eq = token.find('=')?;
    let name = token[..eq].to_string();
    let value = token[eq + 1..].replace("\\\\", "\\");
    Some((name, value))
}

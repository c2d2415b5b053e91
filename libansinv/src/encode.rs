//! Serializer: canonical inventory text, the inverse of parsing.
//!
//! Hosts in no user-defined group come first, one per line with their
//! variables. Each user-defined group then gets its `:children` block, its
//! host block, and its `:vars` block, in inventory iteration order. A group
//! with none of the three keeps a bare `[name]` header. The builtin `all`
//! and `ungrouped` memberships are implicit and never emitted as host
//! blocks, but variables or children attached to them are kept.

use crate::model::{Group, Host, Inventory, VarValue, UNGROUPED};
use std::io::{self, Write};

/// Serialize an inventory to canonical text.
pub fn serialize(inv: &Inventory) -> String {
    let mut buf = Vec::new();
    write(inv, &mut buf).expect("infallible write to Vec");
    String::from_utf8_lossy(&buf).into_owned()
}

/// Write an inventory incrementally to a byte sink.
pub fn write<W: Write>(inv: &Inventory, out: &mut W) -> io::Result<()> {
    if let Some(ungrouped) = inv.group(UNGROUPED) {
        for host in inv.hosts_of(ungrouped) {
            write_host_line(host, out)?;
        }
    }
    for group in inv.groups() {
        let builtin = inv
            .group_id(group.name())
            .map(|id| inv.is_builtin(id))
            .unwrap_or(false);
        if !group.subgroup_ids().is_empty() {
            writeln!(out, "[{}:children]", group.name())?;
            for sub in inv.subgroups_of(group) {
                writeln!(out, "{}", sub.name())?;
            }
        }
        if !builtin && !group.host_ids().is_empty() {
            writeln!(out, "[{}]", group.name())?;
            for host in inv.hosts_of(group) {
                write_host_line(host, out)?;
            }
        }
        if !group.variables().is_empty() {
            write_vars_block(group, out)?;
        }
        // a group with no hosts, children, or vars still exists; a bare
        // header keeps it across a round trip
        if !builtin
            && group.host_ids().is_empty()
            && group.subgroup_ids().is_empty()
            && group.variables().is_empty()
        {
            writeln!(out, "[{}]", group.name())?;
        }
    }
    Ok(())
}

fn write_host_line<W: Write>(host: &Host, out: &mut W) -> io::Result<()> {
    out.write_all(host.name().as_bytes())?;
    for var in host.variables() {
        write!(out, " {}={}", var.name, render_value(&var.value))?;
    }
    out.write_all(b"\n")
}

fn write_vars_block<W: Write>(group: &Group, out: &mut W) -> io::Result<()> {
    writeln!(out, "[{}:vars]", group.name())?;
    for var in group.variables() {
        writeln!(out, "{}={}", var.name, render_value(&var.value))?;
    }
    Ok(())
}

/// Render a variable value to its inventory text form.
///
/// Scalars double their backslashes, escape embedded double quotes, and
/// are wrapped in double quotes when they contain a space. Lists and maps
/// render to one-way string forms: a re-parse sees them as plain strings.
pub fn render_value(value: &VarValue) -> String {
    match value {
        VarValue::Scalar(s) => {
            let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
            if escaped.contains(' ') {
                format!("\"{}\"", escaped)
            } else {
                escaped
            }
        }
        VarValue::List(items) => {
            let parts: Vec<String> = items.iter().map(render_element).collect();
            format!("'[{}]'", parts.join(", "))
        }
        VarValue::Map(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let parts: Vec<String> = keys
                .iter()
                .map(|k| format!("'{}': {}", k, render_map_value(&map[*k])))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}

/// List elements quote plain scalars with double quotes.
fn render_element(value: &VarValue) -> String {
    match value {
        VarValue::Scalar(s) => format!("\"{}\"", s),
        other => render_value(other),
    }
}

/// Map values quote plain scalars with single quotes.
fn render_map_value(value: &VarValue) -> String {
    match value {
        VarValue::Scalar(s) => format!("'{}'", s),
        other => render_value(other),
    }
}

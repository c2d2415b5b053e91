//! Directory-mode loading and side-file merging.
//!
//! An inventory path may be a plain file or a directory. In directory mode
//! the primary document is `<dir>/hosts`, and the optional `group_vars/`
//! and `host_vars/` subdirectories hold one YAML file per group or host
//! name. Merging happens in a fixed order (primary inventory, then group
//! vars, then host vars) so results are deterministic.
//!
//! Side files are mappings of variable name to value. Only string values
//! are merged; complex or non-string values are logged at warn level and
//! dropped. A missing side file is skipped, an unreadable one surfaces an
//! I/O error.

use crate::error::{InventoryError, Result};
use crate::model::{GroupId, Inventory, VarValue};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Read an inventory from a file, or from a directory containing `hosts`
/// plus optional `group_vars/` and `host_vars/` side files.
pub fn read_path(path: &Path) -> Result<Inventory> {
    if path.is_dir() {
        let mut inv = read_file(&path.join("hosts"))?;
        merge_group_vars_dir(&mut inv, &path.join("group_vars"))?;
        merge_host_vars_dir(&mut inv, &path.join("host_vars"))?;
        Ok(inv)
    } else {
        read_file(path)
    }
}

fn read_file(path: &Path) -> Result<Inventory> {
    let text = fs::read_to_string(path).map_err(|source| InventoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(crate::parse(&text))
}

fn merge_group_vars_dir(inv: &mut Inventory, dir: &Path) -> Result<()> {
    let names: Vec<String> = inv.groups().map(|g| g.name().to_string()).collect();
    for name in names {
        let file = dir.join(&name);
        if !file.exists() {
            continue;
        }
        let vars = load_var_file(&file, &name, "group")?;
        merge_group_vars(inv, &name, vars);
    }
    Ok(())
}

fn merge_host_vars_dir(inv: &mut Inventory, dir: &Path) -> Result<()> {
    let names: Vec<String> = inv.hosts().map(|h| h.name().to_string()).collect();
    for name in names {
        let file = dir.join(&name);
        if !file.exists() {
            continue;
        }
        let vars = load_var_file(&file, &name, "host")?;
        merge_host_vars(inv, &name, vars);
    }
    Ok(())
}

/// Load one YAML side file into string variables, dropping anything that
/// is not a string-to-string entry.
fn load_var_file(path: &Path, owner: &str, kind: &str) -> Result<Vec<(String, String)>> {
    let text = fs::read_to_string(path).map_err(|source| InventoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: serde_yaml::Value =
        serde_yaml::from_str(&text).map_err(|source| InventoryError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
    let mut vars = Vec::new();
    match doc {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let key = match key {
                    serde_yaml::Value::String(s) => s,
                    other => {
                        log::warn!(
                            "ignoring non-string key {:?} in vars file for {} '{}'",
                            other,
                            kind,
                            owner
                        );
                        continue;
                    }
                };
                match value {
                    serde_yaml::Value::String(s) => vars.push((key, s)),
                    _ => log::warn!(
                        "cannot add complex value with key '{}' to {} '{}'",
                        key,
                        kind,
                        owner
                    ),
                }
            }
        }
        serde_yaml::Value::Null => {}
        _ => log::warn!(
            "vars file for {} '{}' is not a mapping, ignoring",
            kind,
            owner
        ),
    }
    Ok(vars)
}

/// Merge externally loaded variables into a group, distributing each one
/// down the subgroup graph. The target group's own binding is replaced;
/// everything below only receives the variable where the name is unbound,
/// so more specific scopes keep their values. Unknown group names are
/// ignored.
pub fn merge_group_vars<I>(inv: &mut Inventory, group: &str, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    let id = match inv.group_id(group) {
        Some(id) => id,
        None => return,
    };
    for (name, value) in vars {
        // subgroup graphs may contain cycles; track visited groups
        let mut visited = HashSet::new();
        distribute(inv, id, &name, &VarValue::Scalar(value), &mut visited, true);
    }
}

fn distribute(
    inv: &mut Inventory,
    group: GroupId,
    name: &str,
    value: &VarValue,
    visited: &mut HashSet<GroupId>,
    root: bool,
) {
    if !visited.insert(group) {
        return;
    }
    if root {
        inv.group_by_id_mut(group).set_var(name, value.clone());
    } else {
        inv.group_by_id_mut(group)
            .set_var_if_absent(name, value.clone());
    }
    let members = inv.group_by_id(group).host_ids().to_vec();
    for host in members {
        inv.host_by_id_mut(host).set_var_if_absent(name, value.clone());
    }
    let subs = inv.group_by_id(group).subgroup_ids().to_vec();
    for sub in subs {
        distribute(inv, sub, name, value, visited, false);
    }
}

/// Merge externally loaded variables into a host's own scope, replacing
/// same-named bindings. Unknown host names are ignored.
pub fn merge_host_vars<I>(inv: &mut Inventory, host: &str, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    if let Some(host) = inv.host_mut(host) {
        for (name, value) in vars {
            host.set_var(&name, VarValue::Scalar(value));
        }
    }
}

//! Inventory model: hosts, groups, and variables.
//!
//! Hosts and groups live in arenas owned by [`Inventory`] and refer to each
//! other through [`HostId`] / [`GroupId`] indices. Subgroup relations are
//! id references, never embedded copies, so a host may belong to any number
//! of groups and a group may appear as a child of several parents.

use std::collections::HashMap;

/// Name of the builtin group that contains every host.
pub const ALL: &str = "all";

/// Name of the builtin group for hosts that belong to no user-defined group.
pub const UNGROUPED: &str = "ungrouped";

/// Index of a host in the inventory arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostId(pub(crate) usize);

/// Index of a group in the inventory arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) usize);

/// A variable value.
///
/// Parsing only ever produces `Scalar`; quoting is resolved by the lexer and
/// the remaining text is opaque. `List` and `Map` exist for callers that set
/// structured values programmatically before writing, and render to the
/// one-way string forms described in [`crate::render_value`].
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    /// Plain string value.
    Scalar(String),
    /// Ordered collection, rendered as a single-quoted bracketed list.
    List(Vec<VarValue>),
    /// Key-value mapping, rendered as a brace-delimited pair list.
    Map(HashMap<String, VarValue>),
}

impl VarValue {
    /// Returns the string if this is a `Scalar`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            VarValue::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        VarValue::Scalar(s.to_string())
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        VarValue::Scalar(s)
    }
}

/// A named variable attached to a host or group scope.
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub value: VarValue,
}

/// Two variables are the same variable when their names match; the value is
/// not part of the identity.
impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Variable {}

/// Set a variable in a scope, replacing any existing value of the same name.
fn upsert_var(vars: &mut Vec<Variable>, name: &str, value: VarValue) {
    if let Some(var) = vars.iter_mut().find(|v| v.name == name) {
        var.value = value;
    } else {
        vars.push(Variable {
            name: name.to_string(),
            value,
        });
    }
}

/// Set a variable in a scope only if the name is not already bound.
fn insert_var_if_absent(vars: &mut Vec<Variable>, name: &str, value: VarValue) {
    if !vars.iter().any(|v| v.name == name) {
        vars.push(Variable {
            name: name.to_string(),
            value,
        });
    }
}

/// A named endpoint with its own variable scope.
#[derive(Debug, Clone)]
pub struct Host {
    name: String,
    vars: Vec<Variable>,
}

impl Host {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vars: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variables in insertion order.
    pub fn variables(&self) -> &[Variable] {
        &self.vars
    }

    pub fn var(&self, name: &str) -> Option<&VarValue> {
        self.vars.iter().find(|v| v.name == name).map(|v| &v.value)
    }

    /// Set a variable, replacing an existing one of the same name.
    pub fn set_var(&mut self, name: &str, value: VarValue) {
        upsert_var(&mut self.vars, name, value);
    }

    /// Set a variable unless the host already defines it. Propagated group
    /// variables use this so a host-level value is never clobbered.
    pub fn set_var_if_absent(&mut self, name: &str, value: VarValue) {
        insert_var_if_absent(&mut self.vars, name, value);
    }
}

/// A named collection of hosts and subgroups with its own variable scope.
#[derive(Debug, Clone)]
pub struct Group {
    name: String,
    vars: Vec<Variable>,
    hosts: Vec<HostId>,
    subgroups: Vec<GroupId>,
}

impl Group {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vars: Vec::new(),
            hosts: Vec::new(),
            subgroups: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variables in insertion order.
    pub fn variables(&self) -> &[Variable] {
        &self.vars
    }

    pub fn var(&self, name: &str) -> Option<&VarValue> {
        self.vars.iter().find(|v| v.name == name).map(|v| &v.value)
    }

    pub fn set_var(&mut self, name: &str, value: VarValue) {
        upsert_var(&mut self.vars, name, value);
    }

    pub fn set_var_if_absent(&mut self, name: &str, value: VarValue) {
        insert_var_if_absent(&mut self.vars, name, value);
    }

    /// Member hosts in the order they were added.
    pub fn host_ids(&self) -> &[HostId] {
        &self.hosts
    }

    /// Subgroup references in the order they were wired.
    pub fn subgroup_ids(&self) -> &[GroupId] {
        &self.subgroups
    }
}

/// The full parsed model of hosts, groups, and variables.
///
/// Always contains the builtin groups [`ALL`] (every host ever added) and
/// [`UNGROUPED`] (hosts that are members of no user-defined group).
#[derive(Debug, Clone)]
pub struct Inventory {
    hosts: Vec<Host>,
    groups: Vec<Group>,
    host_index: HashMap<String, HostId>,
    group_index: HashMap<String, GroupId>,
}

impl Inventory {
    // "all" and "ungrouped" are created first, so their ids are fixed.
    const ALL_ID: GroupId = GroupId(0);
    const UNGROUPED_ID: GroupId = GroupId(1);

    pub fn new() -> Self {
        let mut inv = Self {
            hosts: Vec::new(),
            groups: Vec::new(),
            host_index: HashMap::new(),
            group_index: HashMap::new(),
        };
        inv.get_or_add_group(ALL);
        inv.get_or_add_group(UNGROUPED);
        inv
    }

    /// Look up a host id by name, creating the host when unknown. New hosts
    /// are registered in the builtin `all` group.
    pub fn get_or_add_host(&mut self, name: &str) -> HostId {
        if let Some(&id) = self.host_index.get(name) {
            return id;
        }
        let id = HostId(self.hosts.len());
        self.hosts.push(Host::new(name));
        self.host_index.insert(name.to_string(), id);
        self.groups[Self::ALL_ID.0].hosts.push(id);
        id
    }

    /// Look up a group id by name, creating an empty group when unknown.
    pub fn get_or_add_group(&mut self, name: &str) -> GroupId {
        if let Some(&id) = self.group_index.get(name) {
            return id;
        }
        let id = GroupId(self.groups.len());
        self.groups.push(Group::new(name));
        self.group_index.insert(name.to_string(), id);
        id
    }

    /// True when the group is one of the builtin `all` / `ungrouped` groups.
    pub fn is_builtin(&self, group: GroupId) -> bool {
        group == Self::ALL_ID || group == Self::UNGROUPED_ID
    }

    /// True when the host belongs to at least one user-defined group.
    fn in_user_group(&self, host: HostId) -> bool {
        self.groups
            .iter()
            .skip(2)
            .any(|g| g.hosts.contains(&host))
    }

    /// Add a host to a group, maintaining the `ungrouped` invariant: the
    /// builtin group holds exactly the hosts in no user-defined group.
    pub fn add_host_to_group(&mut self, host: HostId, group: GroupId) {
        if group == Self::UNGROUPED_ID {
            if !self.in_user_group(host) {
                let members = &mut self.groups[Self::UNGROUPED_ID.0].hosts;
                if !members.contains(&host) {
                    members.push(host);
                }
            }
            return;
        }
        let members = &mut self.groups[group.0].hosts;
        if !members.contains(&host) {
            members.push(host);
        }
        if group != Self::ALL_ID {
            self.groups[Self::UNGROUPED_ID.0]
                .hosts
                .retain(|h| *h != host);
        }
    }

    /// Wire `child` as a subgroup of `parent`. A group is never made a
    /// subgroup of itself; that degenerate cycle is dropped silently.
    pub fn add_subgroup(&mut self, parent: GroupId, child: GroupId) {
        if parent == child {
            return;
        }
        let subs = &mut self.groups[parent.0].subgroups;
        if !subs.contains(&child) {
            subs.push(child);
        }
    }

    /// Set a variable in a group's vars scope and distribute it per the
    /// propagation contract: overwrite on the group itself, non-clobbering
    /// on its member hosts, and one level into each subgroup (its hosts
    /// non-clobbering, the subgroup scope only when the name is unbound).
    pub fn propagate_group_var(&mut self, group: GroupId, name: &str, value: VarValue) {
        self.groups[group.0].set_var(name, value.clone());
        let members = self.groups[group.0].hosts.clone();
        for host in members {
            self.hosts[host.0].set_var_if_absent(name, value.clone());
        }
        let subs = self.groups[group.0].subgroups.clone();
        for sub in subs {
            let members = self.groups[sub.0].hosts.clone();
            for host in members {
                self.hosts[host.0].set_var_if_absent(name, value.clone());
            }
            self.groups[sub.0].set_var_if_absent(name, value.clone());
        }
    }

    pub fn host_id(&self, name: &str) -> Option<HostId> {
        self.host_index.get(name).copied()
    }

    pub fn group_id(&self, name: &str) -> Option<GroupId> {
        self.group_index.get(name).copied()
    }

    pub fn host(&self, name: &str) -> Option<&Host> {
        self.host_id(name).map(|id| &self.hosts[id.0])
    }

    pub fn host_mut(&mut self, name: &str) -> Option<&mut Host> {
        let id = self.host_id(name)?;
        Some(&mut self.hosts[id.0])
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.group_id(name).map(|id| &self.groups[id.0])
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut Group> {
        let id = self.group_id(name)?;
        Some(&mut self.groups[id.0])
    }

    pub fn host_by_id(&self, id: HostId) -> &Host {
        &self.hosts[id.0]
    }

    pub(crate) fn host_by_id_mut(&mut self, id: HostId) -> &mut Host {
        &mut self.hosts[id.0]
    }

    pub fn group_by_id(&self, id: GroupId) -> &Group {
        &self.groups[id.0]
    }

    pub(crate) fn group_by_id_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.groups[id.0]
    }

    /// All hosts in creation order.
    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.hosts.iter()
    }

    /// All groups in creation order, builtins first.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// User-defined groups in creation order.
    pub fn user_groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().skip(2)
    }

    /// Member hosts of a group.
    pub fn hosts_of<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = &'a Host> {
        group.hosts.iter().map(|id| &self.hosts[id.0])
    }

    /// Subgroups of a group.
    pub fn subgroups_of<'a>(&'a self, group: &'a Group) -> impl Iterator<Item = &'a Group> {
        group.subgroups.iter().map(|id| &self.groups[id.0])
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

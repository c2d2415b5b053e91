//! Test harness for the inventory parser against fixture files.
//!
//! Reads all .ini files from the test/inventories/ directory, parses each
//! one, serializes the model back to text, re-parses the output, and checks
//! that the two models describe the same inventory. Also exercises directory
//! mode (hosts + group_vars/ + host_vars/) against a temporary tree.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use libansinv::{parse, read_path, serialize, Group, Host, Inventory, VarValue};

/// Root fixture directory.
fn test_root() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("test")
}

/// Get all .ini files from test/inventories/.
fn get_inventory_files() -> Vec<String> {
    let dir = test_root().join("inventories");
    let mut files: Vec<String> = Vec::new();
    if let Ok(entries) = fs::read_dir(&dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "ini").unwrap_or(false) {
                files.push(path.to_string_lossy().to_string());
            }
        }
    }
    files.sort();
    files
}

fn var_map(vars: &[libansinv::Variable]) -> BTreeMap<String, VarValue> {
    vars.iter()
        .map(|v| (v.name.clone(), v.value.clone()))
        .collect()
}

fn host_summary(host: &Host) -> (String, BTreeMap<String, VarValue>) {
    (host.name().to_string(), var_map(host.variables()))
}

fn group_summary(
    inv: &Inventory,
    group: &Group,
) -> (
    String,
    BTreeSet<String>,
    BTreeSet<String>,
    BTreeMap<String, VarValue>,
) {
    let hosts: BTreeSet<String> = inv
        .hosts_of(group)
        .map(|h| h.name().to_string())
        .collect();
    let children: BTreeSet<String> = inv
        .subgroups_of(group)
        .map(|g| g.name().to_string())
        .collect();
    (
        group.name().to_string(),
        hosts,
        children,
        var_map(group.variables()),
    )
}

/// Compare two inventories structurally: same hosts with the same variables,
/// same groups with the same membership, children, and variables.
fn inventories_equal(a: &Inventory, b: &Inventory) -> Result<(), String> {
    let mut hosts_a: Vec<_> = a.hosts().map(host_summary).collect();
    let mut hosts_b: Vec<_> = b.hosts().map(host_summary).collect();
    hosts_a.sort_by(|x, y| x.0.cmp(&y.0));
    hosts_b.sort_by(|x, y| x.0.cmp(&y.0));
    if hosts_a != hosts_b {
        return Err(format!(
            "host mismatch\n    left:  {:?}\n    right: {:?}",
            hosts_a, hosts_b
        ));
    }

    let mut groups_a: Vec<_> = a.groups().map(|g| group_summary(a, g)).collect();
    let mut groups_b: Vec<_> = b.groups().map(|g| group_summary(b, g)).collect();
    groups_a.sort_by(|x, y| x.0.cmp(&y.0));
    groups_b.sort_by(|x, y| x.0.cmp(&y.0));
    if groups_a != groups_b {
        return Err(format!(
            "group mismatch\n    left:  {:?}\n    right: {:?}",
            groups_a, groups_b
        ));
    }

    Ok(())
}

/// Run a single .ini fixture: parse, serialize, re-parse, compare models.
fn run_roundtrip_test(path: &str) -> Result<(), String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;

    let filename = Path::new(path)
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();

    let first = parse(&content);
    let text = serialize(&first);
    let second = parse(&text);

    inventories_equal(&first, &second).map_err(|e| {
        format!(
            "{}: round-trip mismatch: {}\n  Serialized:\n{}",
            filename,
            e,
            text.lines()
                .map(|l| format!("    {}", l))
                .collect::<Vec<_>>()
                .join("\n")
        )
    })?;

    println!(
        "  {} => {} hosts, {} groups",
        filename,
        first.hosts().count(),
        first.groups().count()
    );
    Ok(())
}

#[test]
fn test_all_inventory_fixtures() {
    let files = get_inventory_files();

    if files.is_empty() {
        println!("No .ini fixture files found!");
        return;
    }

    println!("\nRunning {} inventory fixtures:", files.len());

    let mut passed = 0;
    let mut failed = 0;
    let mut errors: Vec<String> = Vec::new();

    for file in &files {
        match run_roundtrip_test(file) {
            Ok(()) => passed += 1,
            Err(e) => {
                failed += 1;
                errors.push(e);
            }
        }
    }

    println!("\nResults: {} passed, {} failed", passed, failed);

    if !errors.is_empty() {
        println!("\nErrors:");
        for error in &errors {
            println!("  - {}", error);
        }
    }

    assert!(failed == 0, "{} fixture tests failed", failed);
}

// Individual checks against specific fixtures

#[test]
fn test_basic_fixture_model() {
    let path = test_root().join("inventories").join("basic.ini");
    let content = fs::read_to_string(&path).unwrap();
    let inv = parse(&content);

    let ungrouped = inv.group("ungrouped").unwrap();
    let names: BTreeSet<String> = inv
        .hosts_of(ungrouped)
        .map(|h| h.name().to_string())
        .collect();
    assert!(names.contains("mail.example.com"));
    assert!(names.contains("ftp.example.com"));
    assert!(!names.contains("foo.example.com"));

    let ftp = inv.host("ftp.example.com").unwrap();
    assert_eq!(ftp.var("ansible_port"), Some(&"21".into()));

    let web = inv.group("webservers").unwrap();
    assert_eq!(inv.hosts_of(web).count(), 2);
    let bar = inv.host("bar.example.com").unwrap();
    assert_eq!(bar.var("http_port"), Some(&"8080".into()));
}

#[test]
fn test_hierarchy_fixture_propagation() {
    let path = test_root().join("inventories").join("hierarchy.ini");
    let content = fs::read_to_string(&path).unwrap();
    let inv = parse(&content);

    // southeast's vars land on its subgroups and on its subgroups' hosts
    let atlanta = inv.group("atlanta").unwrap();
    assert_eq!(
        atlanta.var("some_server"),
        Some(&"foo.southeast.example.com".into())
    );
    let host1 = inv.host("host1").unwrap();
    assert_eq!(host1.var("escape_pods"), Some(&"2".into()));

    // host2 is in both atlanta and raleigh
    let raleigh = inv.group("raleigh").unwrap();
    let in_raleigh: BTreeSet<String> = inv
        .hosts_of(raleigh)
        .map(|h| h.name().to_string())
        .collect();
    assert!(in_raleigh.contains("host2"));

    // usa's children include groups that only ever appear as children
    let usa = inv.group("usa").unwrap();
    assert_eq!(inv.subgroups_of(usa).count(), 4);
    assert!(inv.group("northwest").is_some());
}

#[test]
fn test_vars_fixture_non_clobber_and_backslash() {
    let path = test_root().join("inventories").join("vars.ini");
    let content = fs::read_to_string(&path).unwrap();
    let inv = parse(&content);

    // db1 declared its own ansible_user on the host line; the group value
    // must not replace it, while db2 picks up the group value.
    let db1 = inv.host("db1.example.com").unwrap();
    assert_eq!(db1.var("ansible_user"), Some(&"postgres".into()));
    let db2 = inv.host("db2.example.com").unwrap();
    assert_eq!(db2.var("ansible_user"), Some(&"admin".into()));

    // doubled backslashes collapse on the way in
    let db = inv.group("db").unwrap();
    assert_eq!(db.var("backup_share"), Some(&"\\backup\\nightly".into()));
}

#[test]
fn test_sparse_fixture_repeated_sections() {
    let path = test_root().join("inventories").join("sparse.ini");
    let content = fs::read_to_string(&path).unwrap();
    let inv = parse(&content);

    // the two [prod] sections merge into one group
    let prod = inv.group("prod").unwrap();
    let names: BTreeSet<String> = inv
        .hosts_of(prod)
        .map(|h| h.name().to_string())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains("prod1"));
    assert!(names.contains("prod2"));

    // empty group exists with no hosts
    let staging = inv.group("staging").unwrap();
    assert_eq!(inv.hosts_of(staging).count(), 0);

    // a :vars section alone is enough to create a group
    let lazy = inv.group("empty_for_now").unwrap();
    assert_eq!(lazy.var("placeholder"), Some(&"yes".into()));
}

// Directory mode

#[test]
fn test_directory_mode_merge() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::write(
        root.join("hosts"),
        "[web]\nweb1 role=frontend\nweb2\n\n[db]\ndb1\n\n[site:children]\nweb\ndb\n",
    )
    .unwrap();

    fs::create_dir(root.join("group_vars")).unwrap();
    fs::write(
        root.join("group_vars").join("site"),
        "dns: 10.0.0.53\nntp: 10.0.0.123\n",
    )
    .unwrap();
    fs::write(
        root.join("group_vars").join("web"),
        "role: server\nextras:\n  - one\n  - two\n",
    )
    .unwrap();

    fs::create_dir(root.join("host_vars")).unwrap();
    fs::write(root.join("host_vars").join("db1"), "pgdata: /srv/pg\n").unwrap();

    let inv = read_path(root).unwrap();

    // group_vars for a parent reach hosts of its children
    let db1 = inv.host("db1").unwrap();
    assert_eq!(db1.var("dns"), Some(&"10.0.0.53".into()));
    assert_eq!(db1.var("pgdata"), Some(&"/srv/pg".into()));

    // host-line value survives the group_vars merge, others receive it
    let web1 = inv.host("web1").unwrap();
    assert_eq!(web1.var("role"), Some(&"frontend".into()));
    let web2 = inv.host("web2").unwrap();
    assert_eq!(web2.var("role"), Some(&"server".into()));

    // the non-scalar entry in group_vars/web is dropped, not modeled
    let web = inv.group("web").unwrap();
    assert!(web.var("extras").is_none());
}

#[test]
fn test_directory_mode_missing_side_dirs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("hosts"), "alpha\nbeta x=1\n").unwrap();

    let inv = read_path(dir.path()).unwrap();
    assert!(inv.host("alpha").is_some());
    assert_eq!(inv.host("beta").unwrap().var("x"), Some(&"1".into()));
}

#[test]
fn test_file_path_reads_single_document() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("inventory.ini");
    fs::write(&file, "[app]\napp1 port=9000\n").unwrap();

    let inv = read_path(&file).unwrap();
    assert_eq!(inv.host("app1").unwrap().var("port"), Some(&"9000".into()));
}

#[test]
fn test_missing_path_is_an_error() {
    let result = read_path(Path::new("/nonexistent/inventory/path"));
    assert!(result.is_err());
}

//! Walk the fixture inventories and print what the parser builds.

use libansinv::parse;
use std::fs;
use std::path::Path;

fn main() {
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("test")
        .join("inventories");

    let mut files: Vec<_> = fs::read_dir(&fixtures)
        .unwrap()
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().map(|e| e == "ini").unwrap_or(false))
        .collect();
    files.sort();

    for path in files {
        let content = fs::read_to_string(&path).unwrap();
        let inv = parse(&content);

        println!("{}:", path.file_name().unwrap().to_string_lossy());
        for group in inv.user_groups() {
            let hosts: Vec<&str> = inv.hosts_of(group).map(|h| h.name()).collect();
            let children: Vec<&str> = inv.subgroups_of(group).map(|g| g.name()).collect();
            println!(
                "  [{}] hosts={:?} children={:?} vars={}",
                group.name(),
                hosts,
                children,
                group.variables().len()
            );
        }
        println!();
    }
}

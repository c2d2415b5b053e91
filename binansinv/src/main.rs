//! Command-line tool for parsing, normalizing, and transcoding Ansible
//! static inventories.
//!
//! Usage: ansinv [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   -t, --to <FORMAT>      Output format (ini, json, yaml) [default: ini]
//!   -o, --output <FILE>    Write output to specified file
//!       --check            Check that the input loads (exit 0 if it does)
//!   -h, --help             Print help
//!   -V, --version          Print version
//!
//! With a file argument the inventory is parsed from that file; with a
//! directory argument the primary document is `<dir>/hosts` and the
//! `group_vars/`/`host_vars/` side files are merged in. Without an
//! argument (or with `-`) the document is read from stdin.

use libansinv::{parse, read_path, serialize, Inventory, VarValue};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;

/// Check whether a string is a recognized format name for -t.
fn is_format_name(s: &str) -> bool {
    matches!(s, "ini" | "json" | "yaml" | "yml")
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    let mut to_format: Option<&str> = None;
    let mut output_file: Option<&str> = None;
    let mut check_only = false;
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("ansinv {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-t" | "--to" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -t requires a format argument");
                    process::exit(1);
                }
                if !is_format_name(&args[i]) {
                    eprintln!("Error: Unknown format: {}", args[i]);
                    process::exit(1);
                }
                to_format = Some(args[i].as_str());
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires an argument");
                    process::exit(1);
                }
                output_file = Some(args[i].as_str());
            }
            "--check" => {
                check_only = true;
            }
            "-" => {
                // explicit stdin; input_path stays None
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                input_path = Some(args[i].as_str());
            }
        }
        i += 1;
    }

    let inventory = match input_path {
        Some(path) => match read_path(Path::new(path)) {
            Ok(inv) => inv,
            Err(e) => {
                eprintln!("{}: {}", path, e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading stdin: {}", e);
                process::exit(1);
            }
            parse(&buffer)
        }
    };

    if check_only {
        println!("{}: ok", input_path.unwrap_or("-"));
        return;
    }

    let output = match to_format.unwrap_or("ini") {
        "ini" => serialize(&inventory),
        "json" => {
            let value = model_to_json(&inventory);
            match serde_json::to_string_pretty(&value) {
                Ok(mut s) => {
                    s.push('\n');
                    s
                }
                Err(e) => {
                    eprintln!("Error: JSON encode failed: {}", e);
                    process::exit(1);
                }
            }
        }
        "yaml" | "yml" => match serde_yaml::to_string(&model_to_json(&inventory)) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error: YAML encode failed: {}", e);
                process::exit(1);
            }
        },
        other => {
            eprintln!("Error: Unknown format: {}", other);
            process::exit(1);
        }
    };

    match output_file {
        Some(path) => {
            if let Err(e) = fs::write(path, output) {
                eprintln!("Error writing {}: {}", path, e);
                process::exit(1);
            }
        }
        None => {
            if let Err(e) = io::stdout().write_all(output.as_bytes()) {
                eprintln!("Error writing stdout: {}", e);
                process::exit(1);
            }
        }
    }
}

/// Dump the model as a JSON value: hosts with their variables, groups
/// with membership, children, and variables.
fn model_to_json(inv: &Inventory) -> serde_json::Value {
    let mut hosts = serde_json::Map::new();
    for host in inv.hosts() {
        hosts.insert(host.name().to_string(), vars_to_json(host.variables()));
    }

    let mut groups = serde_json::Map::new();
    for group in inv.groups() {
        let mut entry = serde_json::Map::new();
        entry.insert(
            "hosts".to_string(),
            inv.hosts_of(group)
                .map(|h| serde_json::Value::String(h.name().to_string()))
                .collect::<Vec<_>>()
                .into(),
        );
        entry.insert(
            "children".to_string(),
            inv.subgroups_of(group)
                .map(|g| serde_json::Value::String(g.name().to_string()))
                .collect::<Vec<_>>()
                .into(),
        );
        entry.insert("vars".to_string(), vars_to_json(group.variables()));
        groups.insert(group.name().to_string(), serde_json::Value::Object(entry));
    }

    let mut root = serde_json::Map::new();
    root.insert("hosts".to_string(), serde_json::Value::Object(hosts));
    root.insert("groups".to_string(), serde_json::Value::Object(groups));
    serde_json::Value::Object(root)
}

fn vars_to_json(vars: &[libansinv::Variable]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for var in vars {
        map.insert(var.name.clone(), value_to_json(&var.value));
    }
    serde_json::Value::Object(map)
}

fn value_to_json(value: &VarValue) -> serde_json::Value {
    match value {
        VarValue::Scalar(s) => serde_json::Value::String(s.clone()),
        VarValue::List(items) => items.iter().map(value_to_json).collect::<Vec<_>>().into(),
        VarValue::Map(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = serde_json::Map::new();
            for k in keys {
                out.insert(k.clone(), value_to_json(&map[k]));
            }
            serde_json::Value::Object(out)
        }
    }
}

fn print_help() {
    println!("ansinv - parse, normalize, and transcode Ansible static inventories");
    println!();
    println!("Usage: ansinv [OPTIONS] [FILE|DIR]");
    println!();
    println!("Arguments:");
    println!("  [FILE|DIR]  Inventory file, or directory containing 'hosts' plus");
    println!("              optional group_vars/ and host_vars/ (stdin when omitted)");
    println!();
    println!("Options:");
    println!("  -t, --to <FORMAT>    Output format: ini, json, yaml [default: ini]");
    println!("  -o, --output <FILE>  Write output to the specified file");
    println!("      --check          Check that the input loads; print 'ok'");
    println!("  -h, --help           Print help");
    println!("  -V, --version        Print version");
}

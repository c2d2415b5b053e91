//! Parser and writer for the Ansible static inventory format.
//!
//! The static inventory format is an INI-like dialect describing hosts,
//! groups, group hierarchies, and per-host/per-group variables. It has no
//! formal grammar, so parsing is best-effort and never fails: malformed
//! input degrades to whatever model can still be built.
//!
//! # Parsing Pipeline
//!
//! The parser operates in three phases:
//!
//! 1. **Scanner**: Classifies physical lines (section headers, content,
//!    comments, blanks) and normalizes spaced `key = value` assignments.
//!
//! 2. **Lexer**: Splits content lines into logical tokens, merging
//!    quote-enclosed and vars-block whitespace values back together.
//!
//! 3. **Parser**: Batches section bodies per group, then builds the model
//!    in three passes (host blocks, then children wiring, then vars
//!    propagation) so forward references and out-of-order sections
//!    resolve correctly.
//!
//! The [`serialize`]/[`write`] functions are the inverse: they emit the
//! canonical text form of a model. [`read_path`] adds directory mode,
//! merging `group_vars/` and `host_vars/` YAML side files into the model.

mod encode;
mod error;
mod lexer;
mod merge;
mod model;
mod parser;
mod scanner;

pub use encode::{render_value, serialize, write};
pub use error::{InventoryError, Result};
pub use merge::{merge_group_vars, merge_host_vars, read_path};
pub use model::{Group, GroupId, Host, HostId, Inventory, VarValue, Variable, ALL, UNGROUPED};
pub use parser::parse_lines;

/// Parse an inventory document from a string.
///
/// # Example
///
/// ```
/// use libansinv::parse;
///
/// let inv = parse("[web]\nweb1 ansible_port=22\n");
/// assert!(inv.host("web1").is_some());
/// ```
pub fn parse(input: &str) -> Inventory {
    parser::parse_lines(input.split('\n'))
}

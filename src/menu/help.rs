//! Text rendering of the whole command tree

use super::tree::{ActionMap, Branch, Node};
use crate::config::ReservedKeys;

const INDENT: &str = "  ";

/// Render `map` as help text
///
/// Reserved keys come first, then the tree depth first in key order. Each
/// level is indented two more spaces; a description sits on its own line
/// under the label it belongs to.
#[must_use]
pub fn render(map: &ActionMap, keys: &ReservedKeys) -> String {
    let mut lines = vec![
        "Keyboard-based menu:".to_string(),
        format!("{INDENT}{}: stop the started action", keys.execute),
        format!("{INDENT}{}: abort the started action or go up", keys.navigate_up),
    ];
    render_branch(map.root(), INDENT, &mut lines);
    lines.join("\n")
}

fn render_branch(branch: &Branch, indent: &str, lines: &mut Vec<String>) {
    for (key, node) in branch.iter() {
        match node {
            Node::Branch(child) => {
                lines.push(format!("{indent}{key}:"));
                render_branch(child, &format!("{indent}{INDENT}"), lines);
            }
            Node::Leaf(action) => {
                lines.push(format!("{indent}{key}: {}", action.label()));
                let description = action.description();
                if !description.is_empty() {
                    // label starts after "<key>: "
                    let pad = " ".repeat(key.len_utf8() + 2);
                    lines.push(format!("{indent}{pad}{description}"));
                }
            }
        }
    }
}

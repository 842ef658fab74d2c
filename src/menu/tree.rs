//! The command tree: single keys mapped to sub-menus or actions

use crate::action::Action;
use crate::config::ReservedKeys;
use thiserror::Error;

/// Problems found while building a command tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Keys must be given in lower case
    #[error("key '{key}' at {path} is not lower case")]
    NotLowerCase {
        /// The rejected key
        key: char,
        /// Keys leading to the branch
        path: String,
    },
    /// The same key appears twice in one branch
    #[error("key '{key}' is bound twice at {path}")]
    DuplicateKey {
        /// The repeated key
        key: char,
        /// Keys leading to the branch
        path: String,
    },
    /// A tree key equals the execute or navigate-up key
    #[error("key '{key}' at {path} shadows a reserved key")]
    ReservedKey {
        /// The colliding key
        key: char,
        /// Keys leading to the branch
        path: String,
    },
    /// A branch without entries would be a dead end
    #[error("branch at {path} is empty")]
    EmptyBranch {
        /// Keys leading to the branch
        path: String,
    },
}

/// A node of the command tree
#[derive(Debug)]
pub enum Node {
    /// A nested menu
    Branch(Branch),
    /// An action
    Leaf(Action),
}

impl Node {
    /// The branch, if this node is one
    #[must_use]
    pub const fn as_branch(&self) -> Option<&Branch> {
        match self {
            Self::Branch(branch) => Some(branch),
            Self::Leaf(_) => None,
        }
    }

    /// The action, if this node is a leaf
    #[must_use]
    pub const fn as_action(&self) -> Option<&Action> {
        match self {
            Self::Leaf(action) => Some(action),
            Self::Branch(_) => None,
        }
    }
}

impl From<Branch> for Node {
    fn from(branch: Branch) -> Self {
        Self::Branch(branch)
    }
}

impl From<Action> for Node {
    fn from(action: Action) -> Self {
        Self::Leaf(action)
    }
}

/// A menu level: keys mapped to nodes
#[derive(Debug, Default)]
pub struct Branch {
    entries: Vec<(char, Node)>,
}

impl Branch {
    /// An empty branch
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Bind `key` to `node`
    #[must_use]
    pub fn entry(mut self, key: char, node: impl Into<Node>) -> Self {
        self.entries.push((key, node.into()));
        self
    }

    /// Bind `key` to `node` in place
    pub fn insert(&mut self, key: char, node: impl Into<Node>) {
        self.entries.push((key, node.into()));
    }

    /// Whether `key` is bound here
    #[must_use]
    pub fn contains(&self, key: char) -> bool {
        self.entries.iter().any(|(bound, _)| *bound == key)
    }

    /// The node bound to `key`
    #[must_use]
    pub fn get(&self, key: char) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, node)| node)
    }

    /// The node bound to `key`, mutably
    pub fn get_mut(&mut self, key: char) -> Option<&mut Node> {
        self.entries
            .iter_mut()
            .find(|(bound, _)| *bound == key)
            .map(|(_, node)| node)
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (char, &Node)> {
        self.entries.iter().map(|(key, node)| (*key, node))
    }

    /// Number of entries
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the branch has no entries
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// What each key of this branch leads to
    ///
    /// Sub-menus show as `"..."`, actions as their label.
    #[must_use]
    pub fn options(&self) -> Vec<(char, String)> {
        self.iter()
            .map(|(key, node)| {
                let label = match node {
                    Node::Branch(_) => "...".to_string(),
                    Node::Leaf(action) => action.label(),
                };
                (key, label)
            })
            .collect()
    }

    fn validate(&mut self, keys: &ReservedKeys, path: &str) -> Result<(), TreeError> {
        if self.entries.is_empty() {
            return Err(TreeError::EmptyBranch {
                path: display_path(path),
            });
        }

        self.entries.sort_by_key(|(key, _)| *key);

        for pair in self.entries.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(TreeError::DuplicateKey {
                    key: pair[0].0,
                    path: display_path(path),
                });
            }
        }

        for (key, node) in &mut self.entries {
            let key = *key;
            if key.is_uppercase() {
                return Err(TreeError::NotLowerCase {
                    key,
                    path: display_path(path),
                });
            }
            if keys.collides(key) {
                return Err(TreeError::ReservedKey {
                    key,
                    path: display_path(path),
                });
            }
            if let Node::Branch(child) = node {
                child.validate(keys, &format!("{path}{key}"))?;
            }
        }
        Ok(())
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "the root".to_string()
    } else {
        format!("'{path}'")
    }
}

/// A validated, immutable command tree
///
/// Keys are lower case and unique per branch, none shadows a reserved key,
/// no branch is empty, and siblings are ordered by key.
#[derive(Debug)]
pub struct ActionMap {
    root: Branch,
}

impl ActionMap {
    /// Validate `root` against `keys`
    ///
    /// # Errors
    ///
    /// Returns the first problem found, depth first in key order
    pub fn new(mut root: Branch, keys: &ReservedKeys) -> Result<Self, TreeError> {
        root.validate(keys, "")?;
        Ok(Self { root })
    }

    /// The top-level branch
    #[must_use]
    pub const fn root(&self) -> &Branch {
        &self.root
    }

    /// Walk `path` from the root
    ///
    /// Descends while the current node is a branch; a leaf ends the walk
    /// even if keys remain. `None` if a key is not bound.
    #[must_use]
    pub fn resolve(&self, path: &[char]) -> Option<Resolved<'_>> {
        let mut branch = &self.root;
        for key in path {
            match branch.get(*key)? {
                Node::Branch(child) => branch = child,
                Node::Leaf(action) => return Some(Resolved::Leaf(action)),
            }
        }
        Some(Resolved::Branch(branch))
    }

    /// Walk `path` from the root, mutably
    pub fn resolve_mut(&mut self, path: &[char]) -> Option<ResolvedMut<'_>> {
        let mut branch = &mut self.root;
        for key in path {
            match branch.get_mut(*key)? {
                Node::Branch(child) => branch = child,
                Node::Leaf(action) => return Some(ResolvedMut::Leaf(action)),
            }
        }
        Some(ResolvedMut::Branch(branch))
    }

    /// Labels of every modal action currently started, anywhere in the tree
    #[must_use]
    pub fn started_modals(&self) -> Vec<String> {
        let mut labels = Vec::new();
        collect_started(&self.root, &mut labels);
        labels
    }
}

fn collect_started(branch: &Branch, labels: &mut Vec<String>) {
    for (_, node) in branch.iter() {
        match node {
            Node::Branch(child) => collect_started(child, labels),
            Node::Leaf(action) if action.is_started_modal() => labels.push(action.label()),
            Node::Leaf(_) => {}
        }
    }
}

/// Where a path ends
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// At a menu level
    Branch(&'a Branch),
    /// At an action
    Leaf(&'a Action),
}

/// Where a path ends, mutably
#[derive(Debug)]
pub enum ResolvedMut<'a> {
    /// At a menu level
    Branch(&'a mut Branch),
    /// At an action
    Leaf(&'a mut Action),
}

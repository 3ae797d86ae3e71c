use std::path::{Path, PathBuf};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Directory,
    File,
}

/// One entry of the scanned script tree.
///
/// Nodes are only built by [`scan`](super::scan) and never change afterwards. Children
/// are kept in byte-wise file name order and each child's path lives under its
/// parent's path. File nodes have no children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptNode {
    path: PathBuf,
    name: String,
    kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<ScriptNode>,
}

impl ScriptNode {
    pub(crate) fn directory(path: PathBuf, name: String) -> Self {
        Self {
            path,
            name,
            kind: NodeKind::Directory,
            children: Vec::new(),
        }
    }

    pub(crate) fn file(path: PathBuf, name: String) -> Self {
        Self {
            path,
            name,
            kind: NodeKind::File,
            children: Vec::new(),
        }
    }

    pub(crate) fn push_child(&mut self, child: ScriptNode) {
        debug_assert_eq!(self.kind, NodeKind::Directory);
        self.children.push(child);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn children(&self) -> &[ScriptNode] {
        &self.children
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Locate the node for `path` in this subtree.
    pub fn find(&self, path: &Path) -> Option<&ScriptNode> {
        if self.path == path {
            return Some(self);
        }
        if !path.starts_with(&self.path) {
            return None;
        }
        self.children
            .iter()
            .filter(|child| path.starts_with(&child.path))
            .find_map(|child| child.find(path))
    }

    /// Pre-order traversal of this node and all descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// File nodes of this subtree in catalog order. A file node yields itself.
    pub fn files(&self) -> impl Iterator<Item = &ScriptNode> {
        self.walk().filter(|node| node.kind == NodeKind::File)
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a ScriptNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a ScriptNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

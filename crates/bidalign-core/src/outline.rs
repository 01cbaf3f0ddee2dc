//! Outline tree traversal: pre-order flatten, keyed mutable walk and
//! boundary validation.
//!
//! Nodes without a usable `id` are keyed by their 1-based position path
//! (`#2.1` is the first child of the second root). When an explicit id
//! already spells that key, more `#` are prepended until it is free.
//! Flatten and walk derive the same key for the same node, so such nodes
//! can still be aligned and merged.
use std::collections::HashSet;

use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{FlatNode, NodeId, OutlineDocument, OutlineNode};

fn explicit_id(node: &OutlineNode) -> Option<&str> {
    node.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
}

fn explicit_ids(nodes: &[OutlineNode], out: &mut HashSet<String>) {
    for node in nodes {
        if let Some(id) = explicit_id(node) {
            out.insert(id.to_string());
        }
        explicit_ids(node.children(), out);
    }
}

/// Alignment key for `node` at `path`; `taken` holds every explicit id of
/// the outline.
fn node_key(node: &OutlineNode, path: &[usize], taken: &HashSet<String>) -> NodeId {
    match explicit_id(node) {
        Some(id) => id.to_string(),
        None => synthetic_key(path, taken),
    }
}

fn synthetic_key(path: &[usize], taken: &HashSet<String>) -> NodeId {
    let parts: Vec<String> = path.iter().map(ToString::to_string).collect();
    let mut key = format!("#{}", parts.join("."));
    while taken.contains(&key) {
        key.insert(0, '#');
    }
    key
}

/// Pre-order flatten: parents before children, siblings in order.
pub fn flatten(outline: &OutlineDocument) -> Vec<FlatNode> {
    let mut taken = HashSet::new();
    explicit_ids(&outline.outline, &mut taken);
    let mut flat = Vec::new();
    let mut path = Vec::new();
    flatten_into(&outline.outline, &taken, &mut path, &mut flat);
    flat
}

fn flatten_into(nodes: &[OutlineNode], taken: &HashSet<String>, path: &mut Vec<usize>, out: &mut Vec<FlatNode>) {
    for (position, node) in nodes.iter().enumerate() {
        path.push(position + 1);
        let id = node_key(node, path, taken);
        if explicit_id(node).is_none() {
            warn!(key = %id, title = %node.title, "outline node has no id; using positional key");
        }
        out.push(FlatNode {
            id,
            title: node.title.clone(),
            description: node.description().to_string(),
        });
        flatten_into(node.children(), taken, path, out);
        path.pop();
    }
}

/// Visit every node in pre-order with its alignment key.
pub fn walk_mut<F>(outline: &mut OutlineDocument, f: &mut F)
where
    F: FnMut(&NodeId, &mut OutlineNode),
{
    let mut taken = HashSet::new();
    explicit_ids(&outline.outline, &mut taken);
    let mut path = Vec::new();
    walk_nodes_mut(&mut outline.outline, &taken, &mut path, f);
}

fn walk_nodes_mut<F>(nodes: &mut [OutlineNode], taken: &HashSet<String>, path: &mut Vec<usize>, f: &mut F)
where
    F: FnMut(&NodeId, &mut OutlineNode),
{
    for (position, node) in nodes.iter_mut().enumerate() {
        path.push(position + 1);
        let key = node_key(node, path, taken);
        f(&key, node);
        if let Some(children) = node.children.as_deref_mut() {
            walk_nodes_mut(children, taken, path, f);
        }
        path.pop();
    }
}

impl OutlineDocument {
    pub fn new(outline: Vec<OutlineNode>) -> Self { Self { outline } }

    pub fn node_count(&self) -> usize {
        fn count(nodes: &[OutlineNode]) -> usize {
            nodes.iter().map(|n| 1 + count(n.children())).sum()
        }
        count(&self.outline)
    }

    /// Reject outlines whose explicit ids collide. Missing ids are allowed
    /// and fall back to positional keys.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for node in flatten(self) {
            if !seen.insert(node.id.clone()) {
                return Err(Error::InvalidOutline(format!("duplicate node id '{}'", node.id)));
            }
        }
        Ok(())
    }
}

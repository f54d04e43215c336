//! Parent/child lookups derived from the flat path list.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::ItemPath;

/// Tree shape of `data`, computed once.
#[derive(Debug, Clone)]
pub(crate) struct TreeIndex {
    pub by_path: HashMap<ItemPath, usize>,
    pub parents: Vec<Option<usize>>,
    pub children: Vec<Vec<usize>>,
    pub roots: Vec<usize>,
}

impl TreeIndex {
    pub fn new(data: &[ItemPath]) -> Self {
        let mut by_path = HashMap::with_capacity(data.len());
        for (idx, path) in data.iter().enumerate() {
            // First occurrence wins for duplicated paths.
            by_path.entry(path.clone()).or_insert(idx);
        }

        let mut parents = vec![None; data.len()];
        let mut children = vec![Vec::new(); data.len()];
        let mut roots = Vec::new();
        for (idx, path) in data.iter().enumerate() {
            match path.len() {
                0 => {}
                1 => roots.push(idx),
                n => {
                    if let Some(&parent) = by_path.get(&path[..n - 1]) {
                        parents[idx] = Some(parent);
                        children[parent].push(idx);
                    }
                }
            }
        }

        Self {
            by_path,
            parents,
            children,
            roots,
        }
    }
}

/// Lazily built [`TreeIndex`]. Not part of the document: it never
/// serializes and never affects equality.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tree(OnceLock<TreeIndex>);

impl Tree {
    pub fn with(index: TreeIndex) -> Self {
        Self(OnceLock::from(index))
    }

    pub fn get(&self, data: &[ItemPath]) -> &TreeIndex {
        self.0.get_or_init(|| TreeIndex::new(data))
    }
}

impl PartialEq for Tree {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Eq for Tree {}

//! Navigation index over the definition paths of an analyzed crate.
//!
//! The index is a flat list of item paths (`data`), two lookup maps between
//! qualified names and path indices, and one menu ([`NaviItem`]) per path.
//! A menu lists the children of its path grouped by kind; for a path without
//! children it lists the path's siblings instead, so selecting a leaf keeps
//! its level visible.
//!
//! # Module Structure
//!
//! - `builder` - Building the index from raw item paths
//! - `error` - Decode and validation errors
//! - `tree` - Parent/child lookups, built once per document
//!
//! Indices are stable for the lifetime of one loaded document. There are no
//! incremental updates; a reload replaces the whole value.

mod builder;
mod error;
mod tree;

pub use error::NavigationError;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::topbar::{DefPathKind, Kind};

use tree::Tree;

/// Schema version written by [`Navigation::build`].
pub const SCHEMA_VERSION: u32 = 1;

/// Separator between segments of a qualified name.
pub const PATH_SEPARATOR: &str = "::";

// =============================================================================
// Wire Types
// =============================================================================

/// One segment of an item path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DefPath {
    pub kind: Kind,
    pub name: String,
}

impl DefPath {
    pub fn new(kind: impl Into<Kind>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// Breadcrumb from the crate root to an item.
pub type ItemPath = Vec<DefPath>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubNaviItem {
    /// Index into [`Navigation::data`].
    pub idx: usize,
    pub name: String,
    pub kind: Kind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaviItem {
    pub subitems: Vec<SubNaviItem>,
    /// The key is a kind name, and each number in the value points to an
    /// element in `subitems`.
    pub groups: BTreeMap<String, Vec<usize>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    /// Absent in documents from producers that predate versioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    pub data: Vec<ItemPath>,
    pub navi: BTreeMap<usize, NaviItem>,
    pub name_to_path: BTreeMap<String, usize>,
    pub path_to_name: BTreeMap<usize, String>,
    #[serde(skip)]
    tree: Tree,
}

/// Subitems of one kind, ready for a menu section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group<'a> {
    pub kind: Kind,
    pub icon: &'static str,
    pub color: &'static str,
    pub items: Vec<&'a SubNaviItem>,
}

/// Qualified name of a path, e.g. `crate::SecretRegion::from`.
pub fn qualified_name(path: &[DefPath]) -> String {
    path.iter()
        .map(|seg| seg.name.as_str())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

// =============================================================================
// Decoding and Validation
// =============================================================================

impl Navigation {
    /// Decode a navigation document and check its invariants.
    pub fn from_json(json: &str) -> Result<Self, NavigationError> {
        let navi: Navigation = serde_json::from_str(json)?;
        navi.validate()?;
        Ok(navi)
    }

    /// Check the invariants the viewer relies on.
    pub fn validate(&self) -> Result<(), NavigationError> {
        if let Some(found) = self.version {
            if found != SCHEMA_VERSION {
                return Err(NavigationError::UnsupportedVersion {
                    found,
                    expected: SCHEMA_VERSION,
                });
            }
        }

        let len = self.data.len();
        let check = |context: &'static str, idx: usize| {
            if idx < len {
                Ok(())
            } else {
                Err(NavigationError::DanglingIndex { context, idx, len })
            }
        };

        for (name, &idx) in &self.name_to_path {
            check("name_to_path", idx)?;
            if self.path_to_name.get(&idx) != Some(name) {
                return Err(NavigationError::NotInverse {
                    name: name.clone(),
                    idx,
                });
            }
        }
        for (&idx, name) in &self.path_to_name {
            check("path_to_name", idx)?;
            if self.name_to_path.get(name) != Some(&idx) {
                return Err(NavigationError::NotInverse {
                    name: name.clone(),
                    idx,
                });
            }
        }

        for (&item_idx, item) in &self.navi {
            check("navi", item_idx)?;
            for sub in &item.subitems {
                check("subitems", sub.idx)?;
            }
            for (kind, members) in &item.groups {
                for &idx in members {
                    if idx >= item.subitems.len() {
                        return Err(NavigationError::InvalidGroupIndex {
                            item: item_idx,
                            kind: kind.clone(),
                            idx,
                            len: item.subitems.len(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

// =============================================================================
// Queries
// =============================================================================

impl Navigation {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn path(&self, idx: usize) -> Option<&ItemPath> {
        self.data.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_path.get(name).copied()
    }

    pub fn name_of(&self, idx: usize) -> Option<&str> {
        self.path_to_name.get(&idx).map(String::as_str)
    }

    pub fn item(&self, idx: usize) -> Option<&NaviItem> {
        self.navi.get(&idx)
    }

    /// Index of an exact path.
    pub fn index_of_path(&self, path: &[DefPath]) -> Option<usize> {
        self.tree.get(&self.data).by_path.get(path).copied()
    }

    /// Kind of the last segment of a path.
    pub fn kind_of(&self, idx: usize) -> Option<&Kind> {
        self.path(idx).and_then(|p| p.last()).map(|seg| &seg.kind)
    }

    /// Whether the path at `idx` names a function.
    pub fn is_fn(&self, idx: usize) -> bool {
        self.kind_of(idx)
            .and_then(Kind::known)
            .is_some_and(|k| k.is_fn())
    }

    /// Indices of single-segment paths.
    pub fn roots(&self) -> Vec<usize> {
        self.tree.get(&self.data).roots.clone()
    }

    /// Indices of the paths one segment below `idx`.
    pub fn children(&self, idx: usize) -> Vec<usize> {
        self.tree
            .get(&self.data)
            .children
            .get(idx)
            .cloned()
            .unwrap_or_default()
    }

    pub fn parent(&self, idx: usize) -> Option<usize> {
        self.tree.get(&self.data).parents.get(idx).copied().flatten()
    }

    /// Crumbs from the root to `idx`, one per prefix that is itself an
    /// indexed path.
    pub fn breadcrumb(&self, idx: usize) -> Vec<(usize, &DefPath)> {
        let Some(path) = self.path(idx) else {
            return Vec::new();
        };
        let by_path = &self.tree.get(&self.data).by_path;
        (1..=path.len())
            .filter_map(|n| by_path.get(&path[..n]).map(|&i| (i, &path[n - 1])))
            .collect()
    }

    /// Menu of `idx` with groups in kind declaration order, followed by
    /// kinds this version does not know, by name.
    pub fn grouped(&self, idx: usize) -> Vec<Group<'_>> {
        let Some(item) = self.item(idx) else {
            return Vec::new();
        };

        let mut keys: Vec<(Kind, &Vec<usize>)> = item
            .groups
            .iter()
            .map(|(kind, members)| (Kind::from(kind.as_str()), members))
            .collect();
        keys.sort_by(|(a, _), (b, _)| a.cmp(b));

        keys.into_iter()
            .map(|(kind, members)| Group {
                icon: kind.icon(),
                color: kind.color_class(),
                items: members
                    .iter()
                    .filter_map(|&i| item.subitems.get(i))
                    .collect(),
                kind,
            })
            .collect()
    }

    /// Qualified names containing `query`, case-insensitively, in index order.
    pub fn search(&self, query: &str) -> Vec<(usize, &str)> {
        let query = query.to_lowercase();
        self.path_to_name
            .iter()
            .filter(|(_, name)| name.to_lowercase().contains(&query))
            .map(|(&idx, name)| (idx, name.as_str()))
            .collect()
    }

    /// Paths whose last segment has the given kind.
    pub fn of_kind(&self, kind: DefPathKind) -> Vec<usize> {
        (0..self.data.len())
            .filter(|&idx| self.kind_of(idx).and_then(Kind::known) == Some(kind))
            .collect()
    }
}

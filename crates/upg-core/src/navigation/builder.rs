//! Building a navigation index from raw item paths.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::tree::{Tree, TreeIndex};
use super::{qualified_name, DefPath, ItemPath, NaviItem, Navigation, SubNaviItem, SCHEMA_VERSION};

impl Navigation {
    /// Build the index from the item paths emitted by the analyzer.
    ///
    /// Paths are sorted and deduplicated, and every missing ancestor is
    /// added, so each path of two or more segments has a parent in `data`.
    /// Indices follow the sorted order.
    ///
    /// Qualified names are `::`-joined segment names. Rust lets a module and
    /// a function share a name, so when a name is already taken the later
    /// path gets its kind appended, e.g. `krate::io (Fn)`.
    pub fn build(paths: impl IntoIterator<Item = ItemPath>) -> Self {
        let mut all = BTreeSet::new();
        for path in paths {
            if path.is_empty() {
                continue;
            }
            for n in 1..path.len() {
                all.insert(path[..n].to_vec());
            }
            all.insert(path);
        }
        let data: Vec<ItemPath> = all.into_iter().collect();
        let tree = TreeIndex::new(&data);

        let mut name_to_path = BTreeMap::new();
        let mut path_to_name = BTreeMap::new();
        for (idx, path) in data.iter().enumerate() {
            let name = unique_name(path, idx, &name_to_path);
            name_to_path.insert(name.clone(), idx);
            path_to_name.insert(idx, name);
        }

        let navi = (0..data.len())
            .map(|idx| {
                let members = if !tree.children[idx].is_empty() {
                    &tree.children[idx]
                } else {
                    match tree.parents[idx] {
                        Some(parent) => &tree.children[parent],
                        None => &tree.roots,
                    }
                };
                (idx, menu(&data, members))
            })
            .collect();

        debug!(paths = data.len(), roots = tree.roots.len(), "built navigation index");

        let navi = Navigation {
            version: Some(SCHEMA_VERSION),
            data,
            navi,
            name_to_path,
            path_to_name,
            tree: Tree::with(tree),
        };
        debug_assert!(navi.validate().is_ok());
        navi
    }
}

fn unique_name(path: &[DefPath], idx: usize, taken: &BTreeMap<String, usize>) -> String {
    let name = qualified_name(path);
    if !taken.contains_key(&name) {
        return name;
    }
    let kind = path.last().map(|seg| seg.kind.as_str()).unwrap_or_default();
    let with_kind = format!("{name} ({kind})");
    if !taken.contains_key(&with_kind) {
        return with_kind;
    }
    let mut n = idx;
    loop {
        let numbered = format!("{with_kind} #{n}");
        if !taken.contains_key(&numbered) {
            return numbered;
        }
        n += 1;
    }
}

fn menu(data: &[ItemPath], members: &[usize]) -> NaviItem {
    let mut item = NaviItem::default();
    for &idx in members {
        let Some(last) = data[idx].last() else {
            continue;
        };
        item.groups
            .entry(last.kind.as_str().to_string())
            .or_default()
            .push(item.subitems.len());
        item.subitems.push(SubNaviItem {
            idx,
            name: last.name.clone(),
            kind: last.kind.clone(),
        });
    }
    item
}

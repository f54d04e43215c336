//! Graph building logic for the viewer server.
//!
//! Turns one function record into the star-shaped neighbourhood drawn by the
//! page: the function in the middle, its callees or ADTs around it.

use std::collections::HashSet;

use upg_core::navigation::PATH_SEPARATOR;
use upg_core::{DefPathKind, Function, Kind, Navigation, ViewType};

use super::models::{GraphData, GraphEdge, GraphNode};

/// Builder for the neighbourhood graph of one function.
pub struct GraphBuilder<'a> {
    navi: &'a Navigation,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    seen_keys: HashSet<String>,
    seen_edges: HashSet<(String, String)>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(navi: &'a Navigation) -> Self {
        Self {
            navi,
            nodes: Vec::new(),
            edges: Vec::new(),
            seen_keys: HashSet::new(),
            seen_edges: HashSet::new(),
        }
    }

    /// Build the graph of `func`, stored under the qualified `name`.
    pub fn build(mut self, name: &str, func: &Function, view: ViewType) -> GraphData {
        let center = self.add_function(name);

        match view {
            ViewType::Callees => {
                for callee in &func.callees {
                    let key = self.add_function(callee);
                    self.add_edge(&center, key, Vec::new());
                }
            }
            ViewType::Adts => {
                for (adt, access) in &func.adts {
                    let key = self.add_adt(adt);
                    self.add_edge(&center, key, access.clone());
                }
            }
        }

        GraphData {
            view: view.to_string(),
            nodes: self.nodes,
            edges: self.edges,
        }
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    /// Find the navigation index for a name as printed by the analyzer,
    /// which may omit leading modules or carry generic arguments.
    fn resolve(&self, name: &str) -> Option<usize> {
        let bare = name.split('<').next().unwrap_or(name).trim();
        if let Some(idx) = self.navi.index_of(bare) {
            return Some(idx);
        }

        let suffix = format!("{PATH_SEPARATOR}{bare}");
        let mut matches = self
            .navi
            .name_to_path
            .iter()
            .filter(|(qualified, _)| qualified.ends_with(&suffix))
            .map(|(_, &idx)| idx);
        match (matches.next(), matches.next()) {
            (Some(idx), None) => Some(idx),
            _ => None,
        }
    }

    fn add_function(&mut self, name: &str) -> String {
        let key = format!("fn:{name}");
        let idx = self.resolve(name);
        self.add_node(key.clone(), name, "function", DefPathKind::Fn.color_class(), idx);
        key
    }

    fn add_adt(&mut self, name: &str) -> String {
        let key = format!("adt:{name}");
        let idx = self.resolve(name);
        let color = idx
            .and_then(|i| self.navi.kind_of(i))
            .map(Kind::color_class)
            .unwrap_or_else(|| DefPathKind::Struct.color_class());
        self.add_node(key.clone(), name, "adt", color, idx);
        key
    }

    /// Add a node if not already present.
    fn add_node(
        &mut self,
        key: String,
        label: &str,
        category: &'static str,
        color: &'static str,
        idx: Option<usize>,
    ) {
        if self.seen_keys.insert(key.clone()) {
            self.nodes.push(GraphNode {
                key,
                label: label.to_string(),
                category,
                color,
                idx,
            });
        }
    }

    fn add_edge(&mut self, source: &str, target: String, labels: Vec<String>) {
        if self.seen_edges.insert((source.to_string(), target.clone())) {
            self.edges.push(GraphEdge {
                source: source.to_string(),
                target,
                labels,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upg_core::DefPath;

    fn navi() -> Navigation {
        use DefPathKind::*;
        Navigation::build(vec![
            vec![DefPath::new(Mod, "poc"), DefPath::new(Fn, "f")],
            vec![
                DefPath::new(Mod, "poc"),
                DefPath::new(Struct, "SecretRegion"),
                DefPath::new(AssocFn, "from"),
            ],
        ])
    }

    fn func() -> Function {
        let mut func = Function::empty();
        func.name = "f".to_string();
        func.callees = vec![
            "SecretRegion::from".to_string(),
            "SecretRegion::from".to_string(),
            "std::vec::Vec::<u32>::into_raw_parts".to_string(),
        ];
        func.adts.insert(
            "SecretRegion".to_string(),
            vec!["Plain".to_string(), "MutRef".to_string()],
        );
        func
    }

    #[test]
    fn test_callee_graph() {
        let navi = navi();
        let graph = GraphBuilder::new(&navi).build("poc::f", &func(), ViewType::Callees);

        assert_eq!(graph.view, "Callees");
        assert_eq!(graph.nodes.len(), 3);
        // Duplicate callees collapse into one edge.
        assert_eq!(graph.edges.len(), 2);

        let from = graph.nodes.iter().find(|n| n.key == "fn:SecretRegion::from").unwrap();
        assert_eq!(from.idx, navi.index_of("poc::SecretRegion::from"));

        let external = graph.nodes.iter().find(|n| n.label.contains("into_raw_parts")).unwrap();
        assert_eq!(external.idx, None);
    }

    #[test]
    fn test_adt_graph() {
        let navi = navi();
        let graph = GraphBuilder::new(&navi).build("poc::f", &func(), ViewType::Adts);

        assert_eq!(graph.nodes.len(), 2);
        let adt = &graph.nodes[1];
        assert_eq!(adt.category, "adt");
        assert_eq!(adt.color, "def-struct");
        assert_eq!(graph.edges[0].labels, vec!["Plain", "MutRef"]);
    }
}

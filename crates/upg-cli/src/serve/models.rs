//! API response models for the viewer server.
//!
//! These are Data Transfer Objects (DTOs) that define the shape of
//! JSON responses sent to the frontend. Raw documents (`Navigation`,
//! `Function`) are served as-is; the types here add the lookups the page
//! would otherwise repeat (icons, colours, breadcrumbs, rendered tags).

use serde::{Deserialize, Serialize};
use upg_core::tags::RenderedTag;
use upg_core::{Function, Kind};

// =============================================================================
// Menu Models (for `/api/item/{idx}`)
// =============================================================================

/// A path segment or menu entry with its presentation keys.
#[derive(Debug, Serialize)]
pub struct Entry {
    pub idx: usize,
    pub name: String,
    pub kind: String,
    pub icon: &'static str,
    pub color: &'static str,
    /// Whether selecting this entry loads a function.
    pub is_fn: bool,
}

impl Entry {
    pub fn new(idx: usize, name: &str, kind: &Kind, is_fn: bool) -> Self {
        Self {
            idx,
            name: name.to_string(),
            kind: kind.as_str().to_string(),
            icon: kind.icon(),
            color: kind.color_class(),
            is_fn,
        }
    }
}

/// One section of the menu.
#[derive(Debug, Serialize)]
pub struct MenuGroup {
    pub kind: String,
    pub icon: &'static str,
    pub color: &'static str,
    pub items: Vec<Entry>,
}

/// Everything the page needs after selecting a path.
#[derive(Debug, Serialize)]
pub struct ItemView {
    pub item: Entry,
    /// Qualified name, the key for `/api/fn/{name}`.
    pub qualified_name: String,
    pub breadcrumb: Vec<Entry>,
    pub groups: Vec<MenuGroup>,
}

// =============================================================================
// Function Models (for `/api/fn/{name}`)
// =============================================================================

#[derive(Debug, Serialize)]
pub struct PanelTab {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FunctionView {
    pub function: Function,
    pub tags: Vec<RenderedTag>,
    pub panels: Vec<PanelTab>,
}

/// Query parameters for `/api/panel/{name}`.
#[derive(Debug, Deserialize)]
pub struct PanelQuery {
    #[serde(default = "default_panel")]
    pub panel: String,
}

fn default_panel() -> String {
    "src".to_string()
}

#[derive(Debug, Serialize)]
pub struct PanelText {
    pub panel: &'static str,
    pub label: &'static str,
    pub text: String,
}

// =============================================================================
// Graph Models (for `/api/graph/{name}`)
// =============================================================================

/// Query parameters for the graph endpoint.
#[derive(Debug, Deserialize)]
pub struct GraphQuery {
    #[serde(default)]
    pub view: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GraphData {
    pub view: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Serialize)]
pub struct GraphNode {
    /// Unique identifier for the node.
    pub key: String,
    pub label: String,
    /// `function` or `adt`.
    pub category: &'static str,
    pub color: &'static str,
    /// Navigation index when the node resolves to a known path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idx: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    /// ADT access kinds for the `Adts` view.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

// =============================================================================
// Search and Meta Models
// =============================================================================

/// Query parameters for search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query string.
    pub q: String,
    /// Maximum number of results.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

/// Static lookups for the page: tabs, views and the icon bundle.
#[derive(Debug, Serialize)]
pub struct Meta {
    pub source: String,
    pub panels: Vec<PanelTab>,
    pub views: Vec<&'static str>,
    pub icons: &'static [&'static str],
    pub roots: Vec<Entry>,
}

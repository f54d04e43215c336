//! Per-function record produced by the analyzer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tags::Tags;
use crate::topbar::ViewType;

/// One analyzed function.
///
/// Every field except `doc` and `tags` is required on the wire; older
/// producer revisions omit those two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    /// False for `unsafe fn`.
    pub safe: bool,
    /// Direct callees in MIR visiting order.
    pub callees: Vec<String>,
    /// ADT name to the ways this function accesses it.
    pub adts: BTreeMap<String, Vec<String>>,
    /// Source location, `file:line:col: line:col`.
    pub span: String,
    pub src: String,
    pub mir: String,
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub tags: Option<Tags>,
}

impl Default for Function {
    fn default() -> Self {
        Self::empty()
    }
}

impl Function {
    /// Placeholder shown before any function has been loaded.
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            safe: true,
            callees: Vec::new(),
            adts: BTreeMap::new(),
            span: String::new(),
            src: String::new(),
            mir: String::new(),
            doc: String::new(),
            tags: Some(Tags::default()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// Neighbours of this function in the graph for the given view.
    pub fn related(&self, view: ViewType) -> Vec<&str> {
        match view {
            ViewType::Callees => self.callees.iter().map(String::as_str).collect(),
            ViewType::Adts => self.adts.keys().map(String::as_str).collect(),
        }
    }

    /// Tags of this function, empty when the producer sent none.
    pub fn tags(&self) -> Tags {
        self.tags.clone().unwrap_or_default()
    }
}

//! Display panels for a selected function.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::function::Function;
use crate::topbar::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Panel {
    Src,
    Mir,
    Doc,
    Raw,
}

/// Tab order.
pub const PANELS: [Panel; 4] = [Panel::Src, Panel::Mir, Panel::Doc, Panel::Raw];

impl Panel {
    pub fn label(&self) -> &'static str {
        match self {
            Panel::Src => "Source Code",
            Panel::Mir => "MIR",
            Panel::Doc => "Documentation",
            Panel::Raw => "Raw JSON",
        }
    }

    /// Short id used in URLs and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Panel::Src => "src",
            Panel::Mir => "mir",
            Panel::Doc => "doc",
            Panel::Raw => "raw",
        }
    }

    /// Text shown in this panel for `func`.
    pub fn render(&self, func: &Function) -> Result<String, serde_json::Error> {
        match self {
            Panel::Src => Ok(func.src.clone()),
            Panel::Mir => Ok(func.mir.clone()),
            Panel::Doc => Ok(func.doc.clone()),
            Panel::Raw => serde_json::to_string_pretty(func),
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Panel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PANELS
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(s) || p.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_order_and_labels() {
        let labels: Vec<_> = PANELS.iter().map(Panel::label).collect();
        assert_eq!(labels, ["Source Code", "MIR", "Documentation", "Raw JSON"]);
    }

    #[test]
    fn test_parse() {
        assert_eq!("MIR".parse::<Panel>().unwrap(), Panel::Mir);
        assert_eq!("raw".parse::<Panel>().unwrap(), Panel::Raw);
        assert_eq!("Source Code".parse::<Panel>().unwrap(), Panel::Src);
        assert!("asm".parse::<Panel>().is_err());
    }

    #[test]
    fn test_render() {
        let mut func = Function::empty();
        func.name = "f".to_string();
        func.mir = "fn f() -> () {\n    bb0: { return; }\n}".to_string();

        assert_eq!(Panel::Mir.render(&func).unwrap(), func.mir);
        assert_eq!(Panel::Src.render(&func).unwrap(), "");

        let raw = Panel::Raw.render(&func).unwrap();
        let back: Function = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, func);
    }
}

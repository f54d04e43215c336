//! View modes and definition kinds shown in the top bar and navigation menu.
//!
//! Icon and colour lookups are total: every declared [`DefPathKind`] has an
//! entry, and anything the producer emits that this version does not know
//! about falls back to [`FALLBACK_ICON`] / [`FALLBACK_COLOR`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Icon used for kinds this version does not recognize.
pub const FALLBACK_ICON: &str = "tabler:alert-circle";

/// Colour class used for kinds this version does not recognize.
pub const FALLBACK_COLOR: &str = "gray";

// =============================================================================
// View Types
// =============================================================================

/// The way to view UPG.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewType {
    #[default]
    Callees,
    Adts,
}

pub const ALL_VIEW_TYPES: [ViewType; 2] = [ViewType::Callees, ViewType::Adts];

impl ViewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Callees => "Callees",
            ViewType::Adts => "Adts",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_VIEW_TYPES
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// A string that names no variant of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: {0}")]
pub struct UnknownVariant(pub String);

// =============================================================================
// Definition Path Kinds
// =============================================================================

/// Syntactic category of one segment in an item path.
///
/// Paths produced by the analyzer look like:
/// * `[Mod, Fn]` for a free function.
/// * `[Mod, Struct, AssocFn]` for an inherent function.
/// * `[Mod, Struct, ImplTrait, AssocFn]` for a trait function.
/// * `[Mod, TraitDecl, AssocFn]` for a trait function definition.
/// * `[SelfTy, AssocFn]` for an associated function on a non-ADT self type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DefPathKind {
    Mod,
    Fn,
    AssocFn,
    Struct,
    Enum,
    Union,
    TraitDecl,
    SelfTy,
    ImplTrait,
}

impl DefPathKind {
    /// All kinds in declaration order. Menu groups are rendered in this order.
    pub const ALL: [DefPathKind; 9] = [
        DefPathKind::Mod,
        DefPathKind::Fn,
        DefPathKind::AssocFn,
        DefPathKind::Struct,
        DefPathKind::Enum,
        DefPathKind::Union,
        DefPathKind::TraitDecl,
        DefPathKind::SelfTy,
        DefPathKind::ImplTrait,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DefPathKind::Mod => "Mod",
            DefPathKind::Fn => "Fn",
            DefPathKind::AssocFn => "AssocFn",
            DefPathKind::Struct => "Struct",
            DefPathKind::Enum => "Enum",
            DefPathKind::Union => "Union",
            DefPathKind::TraitDecl => "TraitDecl",
            DefPathKind::SelfTy => "SelfTy",
            DefPathKind::ImplTrait => "ImplTrait",
        }
    }

    /// Icon identifier. Every value returned here must be listed in
    /// [`crate::icons::ICON_BUNDLE`].
    pub fn icon(&self) -> &'static str {
        match self {
            DefPathKind::Mod => "tabler:letter-m",
            DefPathKind::Fn => "tabler:square-letter-f",
            DefPathKind::AssocFn => "tabler:square-letter-f",
            DefPathKind::Struct => "tabler:letter-s",
            DefPathKind::Enum => "tabler:letter-e",
            DefPathKind::Union => "tabler:letter-u",
            DefPathKind::TraitDecl => "tabler:letter-t",
            DefPathKind::SelfTy => "tabler:letter-t-small",
            DefPathKind::ImplTrait => "tabler:letter-t",
        }
    }

    /// CSS colour class.
    pub fn color_class(&self) -> &'static str {
        match self {
            DefPathKind::Mod => "def-mod",
            DefPathKind::Fn => "def-fn",
            DefPathKind::AssocFn => "def-fn",
            DefPathKind::Struct => "def-struct",
            DefPathKind::Enum => "def-enum",
            DefPathKind::Union => "def-union",
            DefPathKind::TraitDecl => "def-trait",
            DefPathKind::SelfTy => "def-ty",
            DefPathKind::ImplTrait => "def-trait",
        }
    }

    /// Whether a path ending in this kind names a function with a body.
    pub fn is_fn(&self) -> bool {
        matches!(self, DefPathKind::Fn | DefPathKind::AssocFn)
    }
}

impl fmt::Display for DefPathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefPathKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DefPathKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// A kind as it appears on the wire.
///
/// Newer producers may emit kinds this version has never heard of; those
/// deserialize into [`Kind::Unrecognized`] instead of failing the whole
/// document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Kind {
    Known(DefPathKind),
    Unrecognized(String),
}

impl Kind {
    pub fn known(&self) -> Option<DefPathKind> {
        match self {
            Kind::Known(kind) => Some(*kind),
            Kind::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Kind::Known(kind) => kind.as_str(),
            Kind::Unrecognized(name) => name,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Kind::Known(kind) => kind.icon(),
            Kind::Unrecognized(_) => FALLBACK_ICON,
        }
    }

    pub fn color_class(&self) -> &'static str {
        match self {
            Kind::Known(kind) => kind.color_class(),
            Kind::Unrecognized(_) => FALLBACK_COLOR,
        }
    }
}

impl From<DefPathKind> for Kind {
    fn from(kind: DefPathKind) -> Self {
        Kind::Known(kind)
    }
}

impl From<&str> for Kind {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(kind) => Kind::Known(kind),
            Err(_) => Kind::Unrecognized(s.to_string()),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Icon for a kind given by name, e.g. a `groups` key.
pub fn icon(kind: &str) -> &'static str {
    Kind::from(kind).icon()
}

/// Colour class for a kind given by name.
pub fn color_class(kind: &str) -> &'static str {
    Kind::from(kind).color_class()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_real_icon_and_color() {
        for kind in DefPathKind::ALL {
            assert!(!kind.icon().is_empty());
            assert_ne!(kind.icon(), FALLBACK_ICON);
            assert!(!kind.color_class().is_empty());
            assert_ne!(kind.color_class(), FALLBACK_COLOR);
            assert_eq!(icon(kind.as_str()), kind.icon());
            assert_eq!(color_class(kind.as_str()), kind.color_class());
        }
    }

    #[test]
    fn test_unknown_kind_falls_back() {
        assert_eq!(icon("Macro"), FALLBACK_ICON);
        assert_eq!(color_class("Macro"), FALLBACK_COLOR);
        assert_eq!(icon(""), FALLBACK_ICON);
        // Lookup is case sensitive, like the wire format.
        assert_eq!(icon("mod"), FALLBACK_ICON);
    }

    #[test]
    fn test_kind_wire_format() {
        let known: Kind = serde_json::from_str("\"AssocFn\"").unwrap();
        assert_eq!(known, Kind::Known(DefPathKind::AssocFn));

        let unknown: Kind = serde_json::from_str("\"ExternCrate\"").unwrap();
        assert_eq!(unknown, Kind::Unrecognized("ExternCrate".to_string()));
        assert_eq!(unknown.icon(), FALLBACK_ICON);
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"ExternCrate\"");
    }

    #[test]
    fn test_view_type_parse() {
        assert_eq!("adts".parse::<ViewType>().unwrap(), ViewType::Adts);
        assert_eq!("Callees".parse::<ViewType>().unwrap(), ViewType::Callees);
        assert!("graph".parse::<ViewType>().is_err());
    }
}

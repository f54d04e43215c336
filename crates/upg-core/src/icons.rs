//! Icons the viewer page ships with.
//!
//! The page only renders icons that are bundled, so every icon returned by
//! [`DefPathKind::icon`] has to appear in [`ICON_BUNDLE`]. Adding a kind
//! without bundling its icon leaves a blank in the menu.

use crate::topbar::{DefPathKind, FALLBACK_ICON};

/// Icon collection served in full.
pub const ICON_COLLECTIONS: &[&str] = &["codicon"];

/// Individually bundled icons.
pub const ICON_BUNDLE: &[&str] = &[
    // https://icones.js.org/collection/codicon
    "codicon:symbol-structure",
    "codicon:symbol-method",
    "codicon:symbol-class",
    // https://icones.js.org/collection/tabler
    "tabler:letter-m",
    "tabler:square-letter-f",
    "tabler:letter-s",
    "tabler:letter-e",
    "tabler:letter-u",
    "tabler:letter-t",
    "tabler:letter-t-small",
    FALLBACK_ICON,
];

pub fn is_bundled(icon: &str) -> bool {
    ICON_BUNDLE.contains(&icon)
        || icon
            .split_once(':')
            .is_some_and(|(collection, _)| ICON_COLLECTIONS.contains(&collection))
}

/// Kind icons missing from the bundle.
pub fn unbundled_icons() -> Vec<(DefPathKind, &'static str)> {
    DefPathKind::ALL
        .into_iter()
        .map(|kind| (kind, kind.icon()))
        .filter(|(_, icon)| !is_bundled(icon))
        .collect()
}

//! Default values for UPG configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Data Defaults
// ============================================================================

/// Base URL of the published analysis data.
pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/os-checker/unsafety-propagation-graph-data/refs/heads/main/test/poc";

/// Navigation document, relative to the data root.
pub const DEFAULT_NAVI_PATH: &str = "navi/navi.json";

/// Directory holding one JSON document per function, relative to the data root.
pub const DEFAULT_FUNCTION_DIR: &str = "function";

/// Full URL of the default navigation document.
pub const NAVI_URL: &str =
    "https://raw.githubusercontent.com/os-checker/unsafety-propagation-graph-data/refs/heads/main/test/poc/navi/navi.json";

/// Per-request timeout for remote fetches, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Server Defaults
// ============================================================================

/// Default port of the viewer server.
pub const DEFAULT_PORT: u16 = 3333;

/// Default bind address of the viewer server.
pub const DEFAULT_HOST: &str = "127.0.0.1";

// ============================================================================
// Config File Defaults
// ============================================================================

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "upg.toml";

/// Directory under the user config dir.
pub const USER_CONFIG_DIR: &str = "upg";

/// File name under [`USER_CONFIG_DIR`].
pub const USER_CONFIG_FILE: &str = "config.toml";

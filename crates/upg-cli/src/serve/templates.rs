//! HTML template rendering for the viewer page.
//!
//! Templates are stored as separate files for maintainability:
//! - `templates/index.html` - HTML structure
//! - `templates/styles.css` - CSS styles, including the `def-*` kind colours
//! - `templates/app.js` - JavaScript application code
//!
//! Files are embedded at compile time using `include_str!`.

use upg_core::icons::ICON_COLLECTIONS;

const HTML_TEMPLATE: &str = include_str!("templates/index.html");
const STYLES: &str = include_str!("templates/styles.css");
const SCRIPT: &str = include_str!("templates/app.js");

/// Render the viewer page.
///
/// Substitutes `{{SOURCE}}`, `{{ICON_COLLECTIONS}}`, `{{STYLES}}` and
/// `{{SCRIPT}}` in the template.
pub fn render_page(source: &str) -> String {
    HTML_TEMPLATE
        .replace("{{SOURCE}}", &html_escape(source))
        .replace("{{ICON_COLLECTIONS}}", &ICON_COLLECTIONS.join(","))
        .replace("{{STYLES}}", STYLES)
        .replace("{{SCRIPT}}", SCRIPT)
}

/// Escape HTML special characters to prevent XSS.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

//! XML text escaping shared by the GPX and AML writers.

/// Escape the five XML special characters. The ampersand goes first so
/// already-escaped output is not double-escaped on a second pass.
pub fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

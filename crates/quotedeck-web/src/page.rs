const INDEX: &str = include_str!("../static/index.html");
const LAST_SEARCHED: &str = "{{ last_searched_symbol }}";

/// The search page, with the input pre-filled by the session's last symbol.
pub fn render_index(last_searched_symbol: &str) -> String {
    INDEX.replace(LAST_SEARCHED, &escape_html(last_searched_symbol))
}

/// Escape text for use inside an HTML attribute or element.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

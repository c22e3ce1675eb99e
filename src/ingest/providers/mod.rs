// src/ingest/providers/mod.rs
pub mod feed_rss;

/// Canonicalize a feed title for classification: entity decode, strip tags,
/// normalize curly quotes, collapse whitespace. The raw title is kept
/// untouched as the dedup key; only `normalized_title` goes through this.
pub fn normalize_title(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_title_decodes_and_collapses() {
        let s = "  Breaking:&nbsp;&nbsp;<b>markets</b> “rally”  ";
        assert_eq!(normalize_title(s), "Breaking: markets \"rally\"");
    }

    #[test]
    fn normalize_title_keeps_plain_text_untouched() {
        assert_eq!(normalize_title("Plain title"), "Plain title");
    }
}

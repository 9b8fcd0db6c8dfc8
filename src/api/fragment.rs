use crate::core::geo::GeoId;
use regex::Regex;
use std::sync::LazyLock;

static ID_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bid\s*=\s*["']?\s*(\d+)\s*["']?"#).expect("valid id regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

static REMOVAL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*>.*?</a>").expect("valid link regex"));

/// The numeric `id` attribute of the first element carrying one.
pub fn fragment_id(markup: &str) -> Option<GeoId> {
    ID_ATTR
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1))
        .find_map(|raw| raw.as_str().parse::<GeoId>().ok())
}

/// Text content of a list item fragment, without its removal link.
pub fn fragment_label(markup: &str) -> String {
    let without_link = REMOVAL_LINK.replace_all(markup, " ");
    let text = TAG.replace_all(&without_link, " ");
    let text = decode_entities(&text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Escapes text for inclusion in an HTML fragment.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// List item markup in the shape the registration endpoint returns.
pub fn render_list_item(id: GeoId, label: &str) -> String {
    format!(
        r##"<li class="selected-state" id="{id}">{} <a href="#">remove</a></li>"##,
        escape_html(label)
    )
}

#[cfg(test)]
mod tests {
    use super::{fragment_id, fragment_label, render_list_item};
    use crate::core::geo::GeoId;

    #[test]
    fn reads_id_attribute() {
        let markup = r##"<li class="selected-state" id="14">Ohio <a href="#">x</a></li>"##;
        assert_eq!(fragment_id(markup).map(GeoId::get), Some(14));
        assert_eq!(fragment_id("<li id='3'>Utah</li>").map(GeoId::get), Some(3));
        assert_eq!(fragment_id("<li>Utah</li>"), None);
    }

    #[test]
    fn non_numeric_ids_are_skipped() {
        assert_eq!(fragment_id(r#"<li id="row"><span id="0">x</span></li>"#), None);
    }

    #[test]
    fn label_drops_tags_and_link() {
        let markup = r##"<li class="selected-state" id="2">
            Kent &amp; Sussex, Delaware <a href="#">remove</a>
        </li>"##;
        assert_eq!(fragment_label(markup), "Kent & Sussex, Delaware");
    }

    #[test]
    fn rendered_item_round_trips_through_parsers() {
        let id = GeoId::new(9).expect("id");
        let markup = render_list_item(id, "Kent, Delaware");
        assert_eq!(fragment_id(&markup), Some(id));
        assert_eq!(fragment_label(&markup), "Kent, Delaware");
    }
}

/// Sanitize HTML detail content collected from supplier pages before it is
/// stored or forwarded to a marketplace. Strips scripts, event handlers and
/// other markup marketplaces reject.
pub fn sanitize_detail_html(raw: &str) -> String {
    ammonia::Builder::default()
        .add_generic_attributes(&["style"])
        .clean(raw)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_script_tags() {
        let cleaned = sanitize_detail_html("<p>ok</p><script>alert(1)</script>");
        assert!(cleaned.contains("<p>ok</p>"));
        assert!(!cleaned.contains("script"));
    }

    #[test]
    fn keeps_images_and_styles() {
        let cleaned =
            sanitize_detail_html(r#"<img src="https://cdn.example.com/a.jpg"><b style="color:red">sale</b>"#);
        assert!(cleaned.contains("img"));
        assert!(cleaned.contains("style"));
    }

    #[test]
    fn drops_event_handlers() {
        let cleaned = sanitize_detail_html(r#"<div onclick="steal()">x</div>"#);
        assert!(!cleaned.contains("onclick"));
    }
}

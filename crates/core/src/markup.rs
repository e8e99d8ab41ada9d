use regex::Regex;

/// One element occurrence inside a document. `raw` includes the opening tag
/// (attribute lookups need it), `inner` is the text between the tags.
#[derive(Debug, Clone, Copy)]
pub struct ElementBlock<'t> {
    pub raw: &'t str,
    pub inner: &'t str,
}

/// Every `<tag ...>...</tag>` occurrence in document order.
pub fn element_blocks<'t>(document: &'t str, tag: &str) -> Vec<ElementBlock<'t>> {
    let pattern = format!(r"(?s)<{0}\b[^>]*>(.*?)</{0}>", regex::escape(tag));
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };

    re.captures_iter(document)
        .filter_map(|caps| {
            let raw = caps.get(0)?.as_str();
            let inner = caps.get(1)?.as_str();
            Some(ElementBlock { raw, inner })
        })
        .collect()
}

/// Inner text of the first `<tag>...</tag>` span, verbatim (no entity
/// decoding). Empty string when the tag is absent or malformed; upstream
/// documents vary in which optional fields are present, so absence is never
/// an error.
pub fn first_tag_value(block: &str, tag: &str) -> String {
    let pattern = format!(r"(?s)<{0}>(.*?)</{0}>", regex::escape(tag));
    let Ok(re) = Regex::new(&pattern) else {
        return String::new();
    };

    re.captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Value of the first `name="value"` pair, or empty string when absent.
pub fn attribute(element_text: &str, name: &str) -> String {
    let pattern = format!(r#"\b{}="([^"]*)""#, regex::escape(name));
    let Ok(re) = Regex::new(&pattern) else {
        return String::new();
    };

    re.captures(element_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_first_tag_value() {
        let block = "<CharCode>USD</CharCode><Nominal>5</Nominal>";
        assert_eq!(first_tag_value(block, "Nominal"), "5");
        assert_eq!(first_tag_value(block, "CharCode"), "USD");
    }

    #[test]
    fn absent_tag_is_empty_string() {
        let block = "<CharCode>USD</CharCode>";
        assert_eq!(first_tag_value(block, "Nominal"), "");
    }

    #[test]
    fn empty_and_unterminated_tags_are_tolerated() {
        assert_eq!(first_tag_value("<Name></Name>", "Name"), "");
        assert_eq!(first_tag_value("<Name>Доллар", "Name"), "");
    }

    #[test]
    fn first_of_several_occurrences_wins() {
        let block = "<Name>first</Name><Name>second</Name>";
        assert_eq!(first_tag_value(block, "Name"), "first");
    }

    #[test]
    fn inner_text_is_verbatim_without_entity_decoding() {
        let block = "<Name>Procter &amp; Gamble</Name>";
        assert_eq!(first_tag_value(block, "Name"), "Procter &amp; Gamble");
    }

    #[test]
    fn attribute_lookup() {
        let tag = r#"<Item ID="R01235" Extra="x">"#;
        assert_eq!(attribute(tag, "ID"), "R01235");
        assert_eq!(attribute(tag, "Date"), "");
        assert_eq!(attribute(r#"<Item ID="">"#, "ID"), "");
    }

    #[test]
    fn element_blocks_walk_in_document_order() {
        let doc = concat!(
            r#"<Valuta><Item ID="R01235"><CharCode>USD</CharCode></Item>"#,
            r#"<Item ID="R01239"><CharCode>EUR</CharCode></Item></Valuta>"#,
        );

        let items = element_blocks(doc, "Item");
        assert_eq!(items.len(), 2);
        assert_eq!(attribute(items[0].raw, "ID"), "R01235");
        assert_eq!(first_tag_value(items[1].inner, "CharCode"), "EUR");
    }

    #[test]
    fn element_blocks_span_newlines() {
        let doc = "<Item ID=\"R1\">\n  <Nominal>1</Nominal>\n</Item>";
        let items = element_blocks(doc, "Item");
        assert_eq!(items.len(), 1);
        assert_eq!(first_tag_value(items[0].inner, "Nominal"), "1");
    }
}

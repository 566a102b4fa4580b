use crate::parsers::ParseResult;

/// Parses a plain-text body: whitespace collapsed, lowercased, no links
pub fn parse(text: &str) -> ParseResult {
    ParseResult::content_only(normalize_whitespace(text).to_lowercase())
}

/// Collapse every whitespace run (including newlines) into a single space
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_only() {
        let result = parse("   \n   \t   \r\n   ");
        assert_eq!(result.content, "");
        assert!(result.links.is_empty());
    }

    #[test]
    fn test_mixed_whitespace() {
        let result = parse("  Iced  \n\n  Matcha  \t\r\n  Latte  ");
        assert_eq!(result.content, "iced matcha latte");
    }

    #[test]
    fn test_urls_in_text_are_not_links() {
        let result = parse("Menu at https://example.test/menu");
        assert_eq!(result.content, "menu at https://example.test/menu");
        assert!(result.links.is_empty());
    }
}

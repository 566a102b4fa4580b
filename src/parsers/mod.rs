pub mod html;
pub mod text;

/// Enum to represent different types of content parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserType {
    /// HTML parser (text and links)
    Html,
    /// Plain text parser (text only)
    Text,
    /// Binary or unsupported content, skipped
    Other,
}

impl ParserType {
    /// Determines the parser type from a response `Content-Type` header,
    /// falling back to the URL when the header is absent
    pub fn detect(content_type: Option<&str>, url: &str) -> Self {
        match content_type {
            Some(ct) => Self::from_content_type(ct),
            None => Self::from_url(url),
        }
    }

    pub fn from_content_type(content_type: &str) -> Self {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        match mime.as_str() {
            "text/html" | "application/xhtml+xml" => ParserType::Html,
            "text/plain" => ParserType::Text,
            _ => ParserType::Other,
        }
    }

    pub fn from_url(url: &str) -> Self {
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .to_ascii_lowercase();
        if path.ends_with(".txt") {
            ParserType::Text
        } else if [
            ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".css", ".js", ".ico",
            ".woff", ".woff2", ".mp4", ".zip",
        ]
        .iter()
        .any(|ext| path.ends_with(ext))
        {
            ParserType::Other
        } else {
            ParserType::Html
        }
    }

    /// Returns if the parser should extract links
    pub fn should_extract_links(&self) -> bool {
        matches!(self, ParserType::Html)
    }
}

/// Anchor found in a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Raw `href` attribute, unresolved
    pub href: String,
    /// Visible link text, whitespace-normalized and lowercased
    pub text: String,
}

/// Result of parsing content
#[derive(Debug, Default)]
pub struct ParseResult {
    /// Extracted visible text, lowercased
    pub content: String,
    /// Extracted anchors (if applicable)
    pub links: Vec<Anchor>,
}

impl ParseResult {
    pub fn new(content: String, links: Vec<Anchor>) -> Self {
        Self { content, links }
    }

    pub fn content_only(content: String) -> Self {
        Self {
            content,
            links: Vec::new(),
        }
    }
}

/// Parse a response body with the parser for its type
pub fn parse(body: &str, parser_type: ParserType) -> ParseResult {
    match parser_type {
        ParserType::Html => html::parse(body),
        ParserType::Text => text::parse(body),
        ParserType::Other => ParseResult::default(),
    }
}

use crate::config::{CrawlerConfig, PatternSet};
use regex::RegexSet;

/// Drink, base, temperature and quality forms
const CORE_PATTERNS: &[&str] = &[
    r"matcha\s*(?:latte|tea|drink|coffee|frappuccino|smoothie|shake)",
    r"matcha\s*(?:green\s*tea|powder)",
    r"(?:iced|hot)\s*matcha",
    r"ceremonial\s*matcha",
];

/// Confections and flavor pairings
const EXTENDED_PATTERNS: &[&str] = &[
    r"matcha\s*(?:cake|cheesecake|cookie|croissant|donut|doughnut|muffin|brownie|tiramisu|mochi|macaron|ice\s*cream|pastry|roll)",
    r"(?:strawberry|coconut|oat|vanilla|honey|lavender|yuzu|mango|white\s*chocolate|hojicha)\s*matcha",
    r"matcha\s*(?:with|and|&)\s*(?:oat|almond|coconut|soy)\s*milk",
    r"matcha\s*(?:cream|cold\s*foam|affogato)",
];

/// Compiled set of matcha menu phrases.
///
/// Matching is case-insensitive and purely lexical: any text containing one of
/// the phrases matches, whatever the surrounding context.
#[derive(Debug, Clone)]
pub struct MatchaPatterns {
    sources: Vec<String>,
    set: RegexSet,
}

impl MatchaPatterns {
    /// Build a matcher from raw regex sources
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sources: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let set = RegexSet::new(sources.iter().map(|p| format!("(?i){}", p)))?;
        Ok(Self { sources, set })
    }

    pub fn core() -> Self {
        Self::new(CORE_PATTERNS.iter().copied()).expect("built-in patterns are valid")
    }

    pub fn extended() -> Self {
        Self::new(CORE_PATTERNS.iter().chain(EXTENDED_PATTERNS).copied())
            .expect("built-in patterns are valid")
    }

    /// Built-in set selected by the config plus any extra patterns
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, regex::Error> {
        let builtin = match config.pattern_set {
            PatternSet::Core => CORE_PATTERNS.to_vec(),
            PatternSet::Extended => [CORE_PATTERNS, EXTENDED_PATTERNS].concat(),
        };
        let patterns = builtin
            .into_iter()
            .map(str::to_string)
            .chain(config.extra_patterns.iter().cloned());
        Self::new(patterns)
    }

    /// First pattern (in declaration order) that matches the text
    pub fn find(&self, text: &str) -> Option<&str> {
        self.set
            .matches(text)
            .iter()
            .next()
            .map(|idx| self.sources[idx].as_str())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.set.is_match(text)
    }

    pub fn patterns(&self) -> &[String] {
        &self.sources
    }
}

impl Default for MatchaPatterns {
    fn default() -> Self {
        Self::core()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drink_forms() {
        let m = MatchaPatterns::core();
        assert!(m.is_match("our famous matcha latte"));
        assert!(m.is_match("matchalatte"));
        assert!(m.is_match("matcha frappuccino, venti"));
        assert!(m.is_match("matcha   smoothie"));
        assert!(m.is_match("pure matcha green tea"));
        assert!(m.is_match("matcha powder 30g tin"));
    }

    #[test]
    fn test_qualifiers() {
        let m = MatchaPatterns::core();
        assert_eq!(m.find("iced matcha $5"), Some(CORE_PATTERNS[2]));
        assert_eq!(m.find("hot matcha"), Some(CORE_PATTERNS[2]));
        assert_eq!(m.find("uji ceremonial matcha"), Some(CORE_PATTERNS[3]));
    }

    #[test]
    fn test_case_insensitive() {
        let m = MatchaPatterns::core();
        assert!(m.is_match("Iced Matcha Latte — $5"));
        assert!(m.is_match("MATCHA TEA"));
    }

    #[test]
    fn test_no_match() {
        let m = MatchaPatterns::core();
        assert!(!m.is_match("espresso, flat white, cortado"));
        assert!(!m.is_match("matcha"));
        assert!(!m.is_match(""));
        assert_eq!(m.find("chai latte"), None);
    }

    #[test]
    fn test_first_pattern_reported() {
        let m = MatchaPatterns::core();
        // Both the drink and temperature forms match; declaration order wins.
        assert_eq!(m.find("iced matcha latte"), Some(CORE_PATTERNS[0]));
    }

    #[test]
    fn test_extended_confections() {
        let core = MatchaPatterns::core();
        let extended = MatchaPatterns::extended();
        for text in ["matcha cheesecake", "strawberry matcha", "matcha ice cream"] {
            assert!(!core.is_match(text), "core should not match {text}");
            assert!(extended.is_match(text), "extended should match {text}");
        }
        assert!(extended.is_match("matcha latte"));
    }

    #[test]
    fn test_from_config_with_extra_patterns() {
        let config = CrawlerConfig {
            extra_patterns: vec![r"usucha".to_string()],
            ..CrawlerConfig::default()
        };
        let m = MatchaPatterns::from_config(&config).unwrap();
        assert_eq!(m.patterns().len(), CORE_PATTERNS.len() + 1);
        assert_eq!(m.find("koicha and usucha"), Some("usucha"));
    }

    #[test]
    fn test_invalid_extra_pattern() {
        let config = CrawlerConfig {
            extra_patterns: vec![r"matcha(".to_string()],
            ..CrawlerConfig::default()
        };
        assert!(MatchaPatterns::from_config(&config).is_err());
    }
}

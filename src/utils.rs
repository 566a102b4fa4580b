/// First `max_chars` characters of `text`, for log lines
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Default results file for a location, e.g. `"London, UK"` → `london_uk_matcha_cafes.json`
pub fn output_filename(location: &str) -> String {
    let slug = location
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    // Limit filename length
    let slug: String = slug.chars().take(100).collect();
    if slug.is_empty() {
        "matcha_cafes.json".to_string()
    } else {
        format!("{}_matcha_cafes.json", slug)
    }
}

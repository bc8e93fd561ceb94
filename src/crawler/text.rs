//! Text helpers shared by the extractor and the sub-link follower

use scraper::ElementRef;

/// Elements whose text never counts as visible page content
const HIDDEN_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Collects the visible text below `element`
///
/// Text nodes are split on whitespace and re-joined with single spaces, so
/// words from adjacent elements never run together.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut words: Vec<&str> = Vec::new();

    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| HIDDEN_TAGS.contains(&e.name()))
        });

        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}

/// Keeps the first `max_chars` characters of `text`
///
/// Counts characters, not bytes, and may cut a word in half.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Returns true if the element's class attribute contains `keyword`,
/// ignoring case
pub fn class_contains(element: ElementRef<'_>, keyword: &str) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|class| class.to_lowercase().contains(&keyword.to_lowercase()))
}

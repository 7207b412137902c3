use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use super::Error;

/// Collapses whitespace runs to single spaces and trims the ends.
pub fn normalize_whitespace(s: &str) -> Cow<'_, str> {
    static RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("regex should be valid"));
    RE.replace_all(s.trim(), " ")
}

/// Normalized text of `element` and all of its descendants.
///
/// Borrows from the document when the element holds a single text node;
/// multi-node subtrees are joined into an owned string first.
pub fn collect_text(element: ElementRef<'_>) -> Cow<'_, str> {
    let mut parts = element.text();
    let Some(first) = parts.next() else {
        return Cow::Borrowed("");
    };
    match parts.next() {
        None => normalize_whitespace(first),
        Some(second) => {
            let mut joined = String::with_capacity(first.len() + second.len());
            joined.push_str(first);
            joined.push_str(second);
            for part in parts {
                joined.push_str(part);
            }
            Cow::Owned(normalize_whitespace(&joined).into_owned())
        }
    }
}

/// Normalized text of the first `selector` match under `element`.
///
/// The labels identify which part of the page was malformed when the match
/// is missing.
pub fn text_from_selection<'a>(
    selector: &Selector,
    element: ElementRef<'a>,
    parent_label: &str,
    child_label: &str,
) -> Result<Cow<'a, str>, Error> {
    let child = element.select(selector).next().ok_or_else(|| {
        Error::html_parse_error(format!("every {parent_label} should have a {child_label}"))
    })?;
    Ok(collect_text(child))
}

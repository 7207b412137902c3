use std::borrow::Cow;

use scraper::ElementRef;
use serde::Serialize;

use super::note_legend::NoteLegend;
use crate::parse::text::collect_text;
use crate::parse::Error;
use crate::static_selector;

/// A single menu entry: title, dietary notes, optional description.
///
/// Notes hold either a legend code or, when the legend has no entry for an
/// icon's description, the raw description itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoodItem<'a> {
    title: Cow<'a, str>,
    notes: Vec<Cow<'a, str>>,
    details: Cow<'a, str>,
}

impl<'a> FoodItem<'a> {
    /// Builds an item from its `div.site-panel__daypart-item-container`.
    pub fn from_container(
        container: ElementRef<'a>,
        legend: &NoteLegend<'a>,
    ) -> Result<Self, Error> {
        static_selector!(TITLE_SELECTOR <- "button.site-panel__daypart-item-title");
        static_selector!(DESCRIPTION_SELECTOR <- "div.site-panel__daypart-item-description");

        let button = container.select(&TITLE_SELECTOR).next().ok_or_else(|| {
            Error::html_parse_error("every food item should have a title button")
        })?;
        let details = container
            .select(&DESCRIPTION_SELECTOR)
            .next()
            .map_or(Cow::Borrowed(""), collect_text);
        Ok(Self {
            title: title_of(button)?,
            notes: resolve_notes(&raw_notes(container), legend),
            details,
        })
    }

    /// Builds an item from a bare title button, as the ungrouped bucket
    /// holds them. There is no surrounding container to carry a description.
    pub fn from_title_element(
        button: ElementRef<'a>,
        legend: &NoteLegend<'a>,
    ) -> Result<Self, Error> {
        Ok(Self {
            title: title_of(button)?,
            notes: resolve_notes(&raw_notes(button), legend),
            details: Cow::Borrowed(""),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn notes(&self) -> &[Cow<'a, str>] {
        &self.notes
    }

    pub fn details(&self) -> &str {
        &self.details
    }
}

fn title_of(button: ElementRef<'_>) -> Result<Cow<'_, str>, Error> {
    let title = collect_text(button);
    if title.is_empty() {
        return Err(Error::html_parse_error("food item has an empty title"));
    }
    Ok(title)
}

/// Walks the run of note icons: the first `img` under `scope`, then each
/// following sibling `img`. Bare whitespace between icons is skipped; any
/// other sibling ends the run. An icon without a `title` attribute carries
/// no note and is dropped.
fn raw_notes(scope: ElementRef<'_>) -> Vec<&str> {
    static_selector!(ICON_SELECTOR <- "img");

    let Some(first) = scope.select(&ICON_SELECTOR).next() else {
        return Vec::new();
    };
    let mut notes = Vec::new();
    push_icon_title(first, &mut notes);
    for node in first.next_siblings() {
        match ElementRef::wrap(node) {
            Some(element) if element.value().name() == "img" => {
                push_icon_title(element, &mut notes);
            }
            Some(_) => break,
            None => {
                if node.value().as_text().map_or(true, |t| !t.trim().is_empty()) {
                    break;
                }
            }
        }
    }
    notes
}

fn push_icon_title<'a>(icon: ElementRef<'a>, notes: &mut Vec<&'a str>) {
    if let Some(title) = icon.value().attr("title") {
        let title = title.trim();
        if !title.is_empty() {
            notes.push(title);
        }
    }
}

/// Swaps raw descriptions for legend codes where the legend knows them.
/// Unknown descriptions pass through whole, as a single note each; the
/// legend is a convenience, not a completeness guarantee.
fn resolve_notes<'a>(raw: &[&'a str], legend: &NoteLegend<'a>) -> Vec<Cow<'a, str>> {
    raw.iter()
        .map(|&note| {
            legend
                .resolve(note)
                .map_or(Cow::Borrowed(note), |code| Cow::Owned(code.to_owned()))
        })
        .collect()
}

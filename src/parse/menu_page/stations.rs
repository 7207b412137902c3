use std::borrow::Cow;

use scraper::ElementRef;

use super::food_item::FoodItem;
use super::note_legend::NoteLegend;
use crate::parse::text::text_from_selection;
use crate::parse::Error;
use crate::static_selector;

// The page does not nest items inside station containers in any reliable
// way: station blocks and loose items sit side by side in one sibling
// stream, told apart only by class token. The `pannel` spelling is the
// site's own.
const STANDALONE_ITEM_CLASS: &str = "site-pannel__daypart-item";
const STATION_BLOCK_CLASS: &str = "station-title-inline-block";

/// One classified sibling from a meal's offerings stream.
#[derive(Debug, Clone)]
pub enum OfferingToken<'a> {
    /// A station block; every item inside it belongs to the named station.
    StationStart(Cow<'a, str>, ElementRef<'a>),
    /// A loose item outside any station block.
    Item(ElementRef<'a>),
}

/// First pass over the offerings subtree: classify each direct child.
///
/// Non-element children (bare whitespace between blocks) are skipped, and so
/// is any element carrying neither marker class. The walk records boundaries
/// only; it never descends into a station's children, so it stays linear in
/// the number of siblings no matter how many items each station holds.
pub fn tokenize_offerings(offerings: ElementRef<'_>) -> Result<Vec<OfferingToken<'_>>, Error> {
    static_selector!(STATION_NAME_SELECTOR <- "h3");

    let mut tokens = Vec::new();
    for node in offerings.children() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        if element.value().classes().any(|c| c == STANDALONE_ITEM_CLASS) {
            tokens.push(OfferingToken::Item(element));
        } else if element.value().classes().any(|c| c == STATION_BLOCK_CLASS) {
            let name =
                text_from_selection(&STATION_NAME_SELECTOR, element, "station block", "header")?;
            tokens.push(OfferingToken::StationStart(name, element));
        }
    }
    Ok(tokens)
}

/// A meal's offerings split into station boundaries plus the ungrouped
/// bucket of loose items, each held as its title button.
#[derive(Debug, Clone, Default)]
pub struct Offerings<'a> {
    stations: Vec<(Cow<'a, str>, ElementRef<'a>)>,
    ungrouped: Vec<ElementRef<'a>>,
}

impl<'a> Offerings<'a> {
    pub fn from_html_element(offerings: ElementRef<'a>) -> Result<Self, Error> {
        Self::from_tokens(tokenize_offerings(offerings)?)
    }

    /// Second pass: fold the token stream into the station mapping.
    ///
    /// Duplicate station names do not happen on real pages; if one appears
    /// anyway the later block replaces the earlier one, keeping the earlier
    /// position.
    pub fn from_tokens(tokens: Vec<OfferingToken<'a>>) -> Result<Self, Error> {
        static_selector!(TITLE_BUTTON_SELECTOR <- "button.site-panel__daypart-item-title");

        let mut stations: Vec<(Cow<'a, str>, ElementRef<'a>)> = Vec::new();
        let mut ungrouped = Vec::new();
        for token in tokens {
            match token {
                OfferingToken::StationStart(name, block) => {
                    if let Some(slot) = stations.iter_mut().find(|(n, _)| *n == name) {
                        slot.1 = block;
                    } else {
                        stations.push((name, block));
                    }
                }
                OfferingToken::Item(container) => {
                    let button =
                        container
                            .select(&TITLE_BUTTON_SELECTOR)
                            .next()
                            .ok_or_else(|| {
                                Error::html_parse_error(
                                    "every standalone item should have a title button",
                                )
                            })?;
                    ungrouped.push(button);
                }
            }
        }
        Ok(Self { stations, ungrouped })
    }

    pub fn stations(&self) -> &[(Cow<'a, str>, ElementRef<'a>)] {
        &self.stations
    }

    pub fn ungrouped(&self) -> &[ElementRef<'a>] {
        &self.ungrouped
    }
}

/// A named group of food items, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station<'a> {
    name: Cow<'a, str>,
    items: Vec<FoodItem<'a>>,
}

impl<'a> Station<'a> {
    /// Extracts every food item under a station block.
    pub fn from_html_element(
        name: Cow<'a, str>,
        block: ElementRef<'a>,
        legend: &NoteLegend<'a>,
    ) -> Result<Self, Error> {
        static_selector!(ITEM_CONTAINER_SELECTOR <- "div.site-panel__daypart-item-container");

        let items = block
            .select(&ITEM_CONTAINER_SELECTOR)
            .map(|container| FoodItem::from_container(container, legend))
            .collect::<Result<_, Error>>()?;
        Ok(Self { name, items })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[FoodItem<'a>] {
        &self.items
    }
}

use std::borrow::Cow;

use chrono::NaiveTime;
use scraper::ElementRef;
use serde::ser::{SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};

use super::food_item::FoodItem;
use super::note_legend::NoteLegend;
use super::stations::{Offerings, Station};
use crate::parse::text::text_from_selection;
use crate::parse::Error;
use crate::static_selector;

const HOURS_SEPARATOR: &str = " - ";
const CLOCK_FORMAT: &str = "%I:%M %p";

/// A meal's serving window, e.g. `7:30 am - 9:30 am`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealHours {
    open: NaiveTime,
    close: NaiveTime,
}

impl MealHours {
    /// Parses the raw window string from the page. The separator is the
    /// literal ` - ` and each side is a 12-hour clock time; the meridiem
    /// marker matches either case.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let (open, close) = raw.split_once(HOURS_SEPARATOR).ok_or_else(|| {
            Error::hours_parse_error(format!("missing `{HOURS_SEPARATOR}` separator in {raw:?}"))
        })?;
        Ok(Self {
            open: parse_clock(open)?,
            close: parse_clock(close)?,
        })
    }

    pub const fn open(&self) -> NaiveTime {
        self.open
    }

    pub const fn close(&self) -> NaiveTime {
        self.close
    }
}

fn parse_clock(s: &str) -> Result<NaiveTime, Error> {
    NaiveTime::parse_from_str(s.trim(), CLOCK_FORMAT)
        .map_err(|e| Error::hours_parse_error(format!("bad clock time {s:?}: {e}")))
}

impl Serialize for MealHours {
    /// `["HH:MM", "HH:MM"]`, 24-hour.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.open.format("%H:%M").to_string())?;
        seq.serialize_element(&self.close.format("%H:%M").to_string())?;
        seq.end()
    }
}

/// One serving period and everything offered during it.
#[derive(Debug, Clone)]
pub struct Meal<'a> {
    name: Cow<'a, str>,
    hours: MealHours,
    stations: Vec<Station<'a>>,
    ungrouped: Vec<FoodItem<'a>>,
}

impl<'a> Meal<'a> {
    /// Builds a meal from its `section.site-panel--daypart` element.
    ///
    /// A section missing its name, serving window or offerings container is
    /// a hard error for this meal; once the name is known it is attached to
    /// whatever error follows.
    pub fn from_html_element(
        element: ElementRef<'a>,
        legend: &NoteLegend<'a>,
    ) -> Result<Self, Error> {
        static_selector!(NAME_SELECTOR <- "h2.site-panel__daypart-panel-title");

        let name = text_from_selection(&NAME_SELECTOR, element, "meal", "name")?;
        match Self::extract_offerings(element, legend) {
            Ok((hours, stations, ungrouped)) => Ok(Self {
                name,
                hours,
                stations,
                ungrouped,
            }),
            Err(e) => Err(e.for_meal(&name)),
        }
    }

    #[allow(clippy::type_complexity)]
    fn extract_offerings(
        element: ElementRef<'a>,
        legend: &NoteLegend<'a>,
    ) -> Result<(MealHours, Vec<Station<'a>>, Vec<FoodItem<'a>>), Error> {
        static_selector!(HOURS_SELECTOR <- "div.site-panel__daypart-time");
        // the specials tab is listed first, so the first match is the right
        // one without inspecting tab identity
        static_selector!(OFFERINGS_SELECTOR <- "div.site-panel__daypart-tab-content-inner");

        let hours_raw = text_from_selection(&HOURS_SELECTOR, element, "meal", "serving window")?;
        let hours = MealHours::parse(&hours_raw)?;
        let offerings = element.select(&OFFERINGS_SELECTOR).next().ok_or_else(|| {
            Error::html_parse_error("every meal should have a tab with its offerings")
        })?;
        let split = Offerings::from_html_element(offerings)?;
        let stations = split
            .stations()
            .iter()
            .map(|(name, block)| Station::from_html_element(name.clone(), *block, legend))
            .collect::<Result<_, Error>>()?;
        let ungrouped = split
            .ungrouped()
            .iter()
            .map(|button| FoodItem::from_title_element(*button, legend))
            .collect::<Result<_, Error>>()?;
        Ok((hours, stations, ungrouped))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn hours(&self) -> MealHours {
        self.hours
    }

    pub fn stations(&self) -> &[Station<'a>] {
        &self.stations
    }

    /// Looks a station up by name.
    pub fn station(&self, name: &str) -> Option<&Station<'a>> {
        self.stations.iter().find(|station| station.name() == name)
    }

    /// Items that appeared in the offerings without a preceding station
    /// header. A dedicated field rather than a reserved station name, so it
    /// can never collide with a real station.
    pub fn ungrouped(&self) -> &[FoodItem<'a>] {
        &self.ungrouped
    }
}

impl Serialize for Meal<'_> {
    /// `{hours, stations: {name: [items]}, other?: [items]}`; the meal name
    /// is the caller's map key. The ungrouped bucket only appears when it
    /// has items, under `other`, outside the stations map.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct StationMap<'m, 'a>(&'m [Station<'a>]);

        impl Serialize for StationMap<'_, '_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for station in self.0 {
                    map.serialize_entry(station.name(), station.items())?;
                }
                map.end()
            }
        }

        let fields = if self.ungrouped.is_empty() { 2 } else { 3 };
        let mut state = serializer.serialize_struct("Meal", fields)?;
        state.serialize_field("hours", &self.hours)?;
        state.serialize_field("stations", &StationMap(&self.stations))?;
        if !self.ungrouped.is_empty() {
            state.serialize_field("other", &self.ungrouped)?;
        }
        state.end()
    }
}

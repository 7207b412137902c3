use scraper::ElementRef;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::meal::Meal;
use super::note_legend::NoteLegend;
use crate::parse::Error;
use crate::static_selector;

/// Whether one meal's parse failure aborts the whole page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParsePolicy {
    /// The first meal-level error fails the document.
    Strict,
    /// Failing meals are recorded and the rest of the page still parses.
    #[default]
    BestEffort,
}

/// A meal that could not be parsed, kept alongside the meals that could.
#[derive(Debug)]
pub struct MealFailure {
    meal: Option<String>,
    error: Error,
}

impl MealFailure {
    /// The failed meal's name, when the page got far enough to reveal it.
    pub fn meal(&self) -> Option<&str> {
        self.meal.as_deref()
    }

    pub const fn error(&self) -> &Error {
        &self.error
    }
}

/// Every meal served on one day at one hall, in document order.
#[derive(Debug, Default)]
pub struct DailyMenu<'a> {
    meals: Vec<Meal<'a>>,
    failures: Vec<MealFailure>,
}

impl<'a> DailyMenu<'a> {
    /// Parses a whole menu page.
    ///
    /// The note legend is built first so that item extraction can resolve
    /// icon descriptions into short codes; each meal section is then
    /// extracted in document order.
    pub fn from_html_element(element: ElementRef<'a>, policy: ParsePolicy) -> Result<Self, Error> {
        static_selector!(MEAL_SECTION_SELECTOR <- "section.site-panel--daypart");

        let legend = NoteLegend::from_html_element(element);
        let mut meals = Vec::new();
        let mut failures = Vec::new();
        for section in element.select(&MEAL_SECTION_SELECTOR) {
            match Meal::from_html_element(section, &legend) {
                Ok(meal) => meals.push(meal),
                Err(error) if policy == ParsePolicy::Strict => return Err(error),
                Err(error) => failures.push(MealFailure {
                    meal: error.meal_name().map(str::to_owned),
                    error,
                }),
            }
        }
        Ok(Self { meals, failures })
    }

    pub fn meals(&self) -> &[Meal<'a>] {
        &self.meals
    }

    /// Looks a meal up by its display name.
    pub fn meal(&self, name: &str) -> Option<&Meal<'a>> {
        self.meals.iter().find(|meal| meal.name() == name)
    }

    /// Meals skipped under [`ParsePolicy::BestEffort`].
    pub fn failures(&self) -> &[MealFailure] {
        &self.failures
    }
}

impl Serialize for DailyMenu<'_> {
    /// `{mealName: {hours, stations, other?}}` in document order. Failures
    /// are diagnostics, not menu data, and are not serialized.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.meals.len()))?;
        for meal in &self.meals {
            map.serialize_entry(meal.name(), meal)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn parse(html: &str) -> scraper::Html {
        scraper::Html::parse_document(html)
    }

    #[test]
    fn test_from_html_element() {
        let html =
            fs::read_to_string("./src/parse/html_examples/menu_page/daily_menu.html").unwrap();
        let document = parse(&html);
        let menu = DailyMenu::from_html_element(document.root_element(), ParsePolicy::Strict)
            .expect("the example html should be valid");
        // one meal per section, in document order
        let names: Vec<&str> = menu.meals().iter().map(Meal::name).collect();
        assert_eq!(names, ["Breakfast", "Lunch", "Dinner"]);
        assert!(menu.failures().is_empty());

        let lunch = menu.meal("Lunch").unwrap();
        assert_eq!(
            serde_json::to_value(lunch.hours()).unwrap(),
            json!(["11:00", "13:30"])
        );
        let grill = lunch.station("Grill").unwrap();
        assert_eq!(grill.items()[0].title(), "Smash Burger");
        // the legend resolves the icon description into its short code
        assert_eq!(grill.items()[0].notes(), ["H"]);
        // only the first (specials) tab is parsed
        assert!(lunch.station("Everything Else").is_none());
        let salad = lunch.station("Salad Bar").unwrap();
        assert_eq!(
            salad.items()[0].notes(),
            ["VG", "Made Without Gluten-Containing Ingredients"]
        );
    }

    #[test]
    fn test_round_trip() {
        let document = parse(
            r#"
            <html><body>
            <div class="site-panel__diet-pref-row">
                <span class="site-panel__diet-pref-header-inner">V</span>
                <div class="site-panel__diet-pref-acc-content">Vegetarian</div>
            </div>
            <section class="site-panel site-panel--daypart" id="lunch">
                <h2 class="site-panel__daypart-panel-title">Lunch</h2>
                <div class="site-panel__daypart-time">11:00 am - 2:00 pm</div>
                <div class="site-panel__daypart-tab-content-inner">
                    <div class="station-title-inline-block">
                        <h3 class="site-panel__daypart-station-title">Grill</h3>
                        <div class="site-panel__daypart-item-container">
                            <button class="h4 site-panel__daypart-item-title">Burger
                                <img src="/icons/veg.png" title="Vegetarian" alt="">
                            </button>
                            <div class="site-panel__daypart-item-description">with fries</div>
                        </div>
                    </div>
                </div>
            </section>
            </body></html>
            "#,
        );
        let menu = DailyMenu::from_html_element(document.root_element(), ParsePolicy::Strict)
            .expect("the synthetic document should be valid");
        assert_eq!(
            serde_json::to_value(&menu).unwrap(),
            json!({
                "Lunch": {
                    "hours": ["11:00", "14:00"],
                    "stations": {
                        "Grill": [
                            {"title": "Burger", "notes": ["V"], "details": "with fries"}
                        ]
                    }
                }
            })
        );
    }

    #[test]
    fn test_ungrouped_items_serialize_outside_the_stations_map() {
        let document = parse(
            r#"
            <section class="site-panel--daypart">
                <h2 class="site-panel__daypart-panel-title">Dinner</h2>
                <div class="site-panel__daypart-time">5:00 pm - 7:30 pm</div>
                <div class="site-panel__daypart-tab-content-inner">
                    <div class="site-pannel__daypart-item">
                        <button class="site-panel__daypart-item-title">Fortune Cookies</button>
                    </div>
                </div>
            </section>
            "#,
        );
        let menu = DailyMenu::from_html_element(document.root_element(), ParsePolicy::Strict)
            .expect("the synthetic document should be valid");
        assert_eq!(
            serde_json::to_value(&menu).unwrap(),
            json!({
                "Dinner": {
                    "hours": ["17:00", "19:30"],
                    "stations": {},
                    "other": [
                        {"title": "Fortune Cookies", "notes": [], "details": ""}
                    ]
                }
            })
        );
    }

    const ONE_BAD_MEAL: &str = r#"
        <section class="site-panel--daypart">
            <h2 class="site-panel__daypart-panel-title">Breakfast</h2>
            <div class="site-panel__daypart-time">open til late</div>
            <div class="site-panel__daypart-tab-content-inner"></div>
        </section>
        <section class="site-panel--daypart">
            <h2 class="site-panel__daypart-panel-title">Lunch</h2>
            <div class="site-panel__daypart-time">11:00 am - 2:00 pm</div>
            <div class="site-panel__daypart-tab-content-inner"></div>
        </section>
    "#;

    #[test]
    fn test_best_effort_keeps_the_good_meals() {
        let document = parse(ONE_BAD_MEAL);
        let menu = DailyMenu::from_html_element(document.root_element(), ParsePolicy::BestEffort)
            .expect("best effort should not abort");
        assert_eq!(menu.meals().len(), 1);
        assert!(menu.meal("Lunch").is_some());
        assert_eq!(menu.failures().len(), 1);
        assert_eq!(menu.failures()[0].meal(), Some("Breakfast"));
        assert!(matches!(
            menu.failures()[0].error(),
            Error::Meal { source, .. } if matches!(**source, Error::HoursParse(_))
        ));
    }

    #[test]
    fn test_strict_aborts_on_the_first_bad_meal() {
        let document = parse(ONE_BAD_MEAL);
        let err = DailyMenu::from_html_element(document.root_element(), ParsePolicy::Strict)
            .expect_err("strict mode should abort");
        assert_eq!(err.meal_name(), Some("Breakfast"));
    }
}

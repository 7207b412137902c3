#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod error;
pub mod fetch;
pub mod parse;

use chrono::NaiveDate;
use scraper::Html;

pub use error::{Error, Result};

/// Fetches one hall's menu page and parses it into the structured menu
/// record, serialized as JSON.
///
/// The parsed tree borrows from the page text, so the record is returned as
/// an owned JSON value. Under [`parse::ParsePolicy::BestEffort`], meals that
/// fail to parse are logged and left out of the result.
pub async fn scrape_menu(
    client: &reqwest::Client,
    hall: &fetch::Hall,
    date: Option<NaiveDate>,
    policy: parse::ParsePolicy,
) -> Result<serde_json::Value> {
    let page = fetch::menu_page(client, hall, date).await?;
    let html = Html::parse_document(&page);
    let menu = parse::DailyMenu::from_html_element(html.root_element(), policy)?;
    for failure in menu.failures() {
        log::warn!(
            "skipped meal {} at {}: {}",
            failure.meal().unwrap_or("(unnamed)"),
            hall.name(),
            failure.error()
        );
    }
    Ok(serde_json::to_value(&menu)?)
}

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use std::env;

use chrono::NaiveDate;
use collins_menu::fetch::{self, Hall};
use collins_menu::parse::ParsePolicy;
use collins_menu::scrape_menu;

#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let hall = match env::var("HALL_URL") {
        Ok(url) => Hall::new(
            env::var("HALL_NAME").unwrap_or_else(|_| "hall".to_string()),
            url.parse()?,
        ),
        Err(_) => {
            log::info!("env var HALL_URL not set, using the Collins cafe page");
            Hall::collins()
        }
    };
    let date = match env::var("MENU_DATE") {
        Ok(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d")?),
        Err(_) => None,
    };
    let policy = if env::var("STRICT").is_ok() {
        ParsePolicy::Strict
    } else {
        ParsePolicy::BestEffort
    };

    let client = fetch::make_client();
    let menu = scrape_menu(&client, &hall, date, policy).await?;
    println!("{}", serde_json::to_string_pretty(&menu)?);
    Ok(())
}

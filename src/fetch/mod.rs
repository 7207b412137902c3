use std::{num::NonZeroU32, sync::OnceLock, time::Duration};

use governor::{
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::InMemoryState,
};
use reqwest::{Client, Error as RequestError};
use tracing::{instrument, Level};
use url::Url;

static COLLINS_URL: &str = "https://collins-cmc.cafebonappetit.com/cafe/collins/";

/// A dining hall and the cafe page its menus are published on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hall {
    name: String,
    url: Url,
}

impl Hall {
    pub const fn new(name: String, url: Url) -> Self {
        Self { name, url }
    }

    /// Collins at Claremont McKenna, the hall this crate was written for.
    pub fn collins() -> Self {
        Self {
            name: "Collins".to_string(),
            url: COLLINS_URL.parse().expect("the Collins url should be valid"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Page url for a specific day. The cafe serves today's menu at the
    /// undated base url.
    pub fn menu_url(&self, date: Option<chrono::NaiveDate>) -> Url {
        date.map_or_else(
            || self.url.clone(),
            |date| {
                self.url
                    .join(&format!("{}/", date.format("%Y-%m-%d")))
                    .expect("a date path segment should always join")
            },
        )
    }
}

pub fn make_client() -> Client {
    Client::builder()
        .gzip(true)
        .build()
        .expect("client creation should succeed")
}

static RATE_LIMIT: u32 = 4;
static DELAY_JITTER: u64 = 2;
static RATE_LIMITER: OnceLock<
    governor::RateLimiter<
        governor::state::NotKeyed,
        InMemoryState,
        QuantaClock,
        NoOpMiddleware<QuantaInstant>,
    >,
> = OnceLock::new();

/// Fetches one hall's menu page, rate limited across concurrent callers.
#[instrument(skip(client, hall, date), fields(
    hall = %hall.name(),
    date = %date.map_or_else(|| "today".to_string(), |d| d.format("%Y-%m-%d").to_string()),
), level = Level::TRACE)]
pub async fn menu_page(
    client: &Client,
    hall: &Hall,
    date: Option<chrono::NaiveDate>,
) -> Result<String, RequestError> {
    let rate_limiter = RATE_LIMITER.get_or_init(|| {
        governor::RateLimiter::direct(governor::Quota::per_second(
            NonZeroU32::new(RATE_LIMIT).expect("rate limit should be nonzero"),
        ))
    });
    let retry_jitter = governor::Jitter::new(Duration::ZERO, Duration::from_secs(DELAY_JITTER));
    rate_limiter.until_ready_with_jitter(retry_jitter).await;
    let res = client.get(hall.menu_url(date)).send().await?;
    let start = std::time::Instant::now();
    let text = res.text().await?;
    log::trace!("got menu page for {} in {:?}", hall.name(), start.elapsed());
    Ok(text)
}

/// Fetches several halls' pages for the same day concurrently.
pub async fn menus_on_date(
    client: &Client,
    halls: &[Hall],
    date: Option<chrono::NaiveDate>,
) -> Result<Vec<String>, RequestError> {
    futures::future::try_join_all(halls.iter().map(|hall| menu_page(client, hall, date))).await
}

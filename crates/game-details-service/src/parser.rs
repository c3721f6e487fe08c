//! Store page parsing
//!
//! Extracts a [`GameRecord`] from the HTML of a store app page. Only an
//! undecodable byte stream is an error; every missing or malformed field
//! degrades to an empty value or a sentinel.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use scraper::{ElementRef, Html, Selector};
use steamfilter_common::models::{icon_url, store_url, UNKNOWN_RATING};
use steamfilter_common::{Error, GameRecord, Result};
use tracing::debug;

/// Parser for store app pages, with its selectors compiled once
pub struct GameParser {
    name: Selector,
    features: Selector,
    genre_labels: Selector,
    labels: Selector,
    date: Selector,
    review_summary: Selector,
}

impl GameParser {
    /// Compile the selectors used for extraction
    pub fn new() -> Result<Self> {
        Ok(Self {
            name: selector(".apphub_AppName")?,
            features: selector("#category_block .game_area_details_specs:not(.learning_about)")?,
            genre_labels: selector(".block_content .details_block b")?,
            labels: selector("b")?,
            date: selector(".date")?,
            review_summary: selector(".user_reviews_summary_row")?,
        })
    }

    /// Parse a store page body into a record for `app_id`
    pub fn parse(&self, app_id: u32, body: &[u8]) -> Result<GameRecord> {
        let html = std::str::from_utf8(body)
            .map_err(|e| Error::Parse(format!("store page for {} is not valid UTF-8: {}", app_id, e)))?;
        let doc = Html::parse_document(html);

        let name = doc
            .select(&self.name)
            .next()
            .map(text_of)
            .unwrap_or_default();

        let features = doc.select(&self.features).map(text_of).collect();

        let genres = doc
            .select(&self.genre_labels)
            .filter(|label| text_of(*label).contains("Genre"))
            .flat_map(siblings_until_break)
            .map(text_of)
            .collect();

        let release_date = doc
            .select(&self.date)
            .next()
            .map(|el| parse_release_date(&text_of(el)))
            .unwrap_or_default();

        let developer = self.labelled_value(&doc, "Developer");
        let publisher = self.labelled_value(&doc, "Publisher");

        let tooltip = doc
            .select(&self.review_summary)
            .last()
            .and_then(|el| el.value().attr("data-tooltip-html"));
        let rating = parse_rating(tooltip);

        debug!("Parsed store page for {}: {:?}", app_id, name);

        Ok(GameRecord {
            app_id,
            name,
            icon: icon_url(app_id),
            features,
            genres,
            release_date,
            developer,
            publisher,
            rating,
            store_link: store_url(app_id),
        })
    }

    /// Text of the element following the first `<b>` label containing `label`
    fn labelled_value(&self, doc: &Html, label: &str) -> String {
        doc.select(&self.labels)
            .filter(|el| text_of(*el).contains(label))
            .find_map(next_element)
            .map(text_of)
            .unwrap_or_default()
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Parse(format!("invalid selector {}: {:?}", css, e)))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn next_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

/// Sibling elements after `el`, up to the next `<br>`
fn siblings_until_break(el: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|sibling| sibling.value().name() != "br")
}

/// Parse release date text
///
/// Four characters are read as a bare year, anything else as `7 Jun, 2013`.
/// Unparsable text yields the Unix epoch.
pub fn parse_release_date(text: &str) -> DateTime<Utc> {
    let text = text.trim();

    let date = if text.len() == 4 {
        text.parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
    } else {
        NaiveDate::parse_from_str(text, "%d %b, %Y").ok()
    };

    date.and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
        .unwrap_or_default()
}

/// Parse the percentage leading a review summary tooltip
pub fn parse_rating(tooltip: Option<&str>) -> i32 {
    tooltip
        .and_then(|text| text.find('%').map(|end| &text[..end]))
        .and_then(|percent| percent.trim().parse().ok())
        .unwrap_or(UNKNOWN_RATING)
}

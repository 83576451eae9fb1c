//! Price scraping from the public quote page
//!
//! Reads `<fin-streamer data-field="regularMarketPrice">` from
//! https://finance.yahoo.com/quote/<symbol>/

use anyhow::{anyhow, Result};
use reqwest::Client;
use scraper::{Html, Selector};

use super::validate_symbol;
use super::yahoo::USER_AGENT;

pub const YAHOO_QUOTE_PAGE: &str = "https://finance.yahoo.com/quote";

/// Scrape the current price of one symbol
pub async fn scrape_price(client: &Client, symbol: &str) -> Result<f64> {
    let symbol = validate_symbol(symbol)?;
    let url = format!("{}/{}/", YAHOO_QUOTE_PAGE, symbol);
    log::info!("Scraping price page {}", url);

    let response = client
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!("Failed to fetch quote page: {}", response.status()));
    }

    let text = response.text().await?;
    parse_price_html(&text)
}

/// Extract the market price from the page HTML
pub fn parse_price_html(html: &str) -> Result<f64> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"fin-streamer[data-field="regularMarketPrice"]"#)
        .map_err(|e| anyhow!("Invalid selector: {:?}", e))?;

    let text = document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .map(|t| t.trim().to_string())
        .find(|t| !t.is_empty())
        .ok_or_else(|| anyhow!("Price element not found in page"))?;

    // thousands separators
    let cleaned = text.replace(',', "");
    cleaned
        .parse::<f64>()
        .map_err(|_| anyhow!("Unparseable price: {}", text))
}

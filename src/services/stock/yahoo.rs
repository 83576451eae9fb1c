//! Yahoo Finance provider
//!
//! Chart API for prices and closing history: https://query1.finance.yahoo.com/v8/finance/chart
//! quoteSummary API for fundamentals (needs the cookie + crumb handshake).

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use url::Url;

use super::QuoteProvider;
use crate::config::AppConfig;
use crate::models::{FundamentalField, Fundamentals, Quote};

/// Chart API (prices + history)
pub const YAHOO_CHART_API: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";
/// quoteSummary API (fundamentals)
pub const YAHOO_SUMMARY_API: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary/";
/// Sets the session cookie needed for the crumb
pub const YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";
pub const YAHOO_CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const SUMMARY_MODULES: &str = "summaryDetail,defaultKeyStatistics,financialData";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    indicators: Option<ChartIndicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    symbol: Option<String>,
    currency: Option<String>,
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    regular_market_volume: Option<f64>,
    long_name: Option<String>,
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartSeries>,
}

#[derive(Debug, Deserialize)]
struct ChartSeries {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Yahoo Finance quote provider
pub struct YahooProvider {
    /// HTTP client with a cookie jar
    client: Client,
    /// Closing history window (`1y`, `6mo`, ...)
    range: String,
    /// Crumb for the quoteSummary API
    crumb: RwLock<Option<String>>,
}

impl YahooProvider {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .gzip(true)
            .timeout(config.api.timeout())
            .connect_timeout(config.api.connect_timeout())
            .build()?;

        Ok(Self {
            client,
            range: config.fetcher.history_range.clone(),
            crumb: RwLock::new(None),
        })
    }

    fn chart_url(&self, symbol: &str) -> Result<Url> {
        let mut url = Url::parse(YAHOO_CHART_API)?.join(symbol)?;
        url.query_pairs_mut()
            .append_pair("range", &self.range)
            .append_pair("interval", "1d");
        Ok(url)
    }

    /// Current price, name and closing history
    async fn fetch_chart(&self, symbol: &str) -> Result<Quote> {
        let url = self.chart_url(symbol)?;
        log::debug!("Requesting chart {}", url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Chart request for {} failed: {}", symbol, response.status()));
        }

        let text = response.text().await?;
        parse_chart(&text, symbol)
    }

    async fn ensure_crumb(&self) -> Result<String> {
        if let Some(crumb) = self.crumb.read().await.as_ref() {
            return Ok(crumb.clone());
        }

        // The cookie endpoint answers 404 but still sets the session cookie
        let _ = self.client.get(YAHOO_COOKIE_URL).send().await?;

        let response = self.client.get(YAHOO_CRUMB_URL).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("Crumb request failed: {}", response.status()));
        }
        let crumb = response.text().await?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            return Err(anyhow!("Invalid crumb returned"));
        }

        *self.crumb.write().await = Some(crumb.clone());
        Ok(crumb)
    }

    /// Fundamental indicators from quoteSummary
    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        let crumb = self.ensure_crumb().await?;

        let mut url = Url::parse(YAHOO_SUMMARY_API)?.join(symbol)?;
        url.query_pairs_mut()
            .append_pair("modules", SUMMARY_MODULES)
            .append_pair("crumb", &crumb);

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            *self.crumb.write().await = None;
            return Err(anyhow!("Yahoo authentication expired"));
        }
        if !response.status().is_success() {
            return Err(anyhow!("quoteSummary for {} failed: {}", symbol, response.status()));
        }

        let json: Value = response.json().await?;
        parse_fundamentals(&json)
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        let mut quote = self.fetch_chart(symbol).await?;

        // Fundamentals are best effort; the chart alone is a valid quote
        match self.fetch_fundamentals(symbol).await {
            Ok(fundamentals) => {
                let volume = quote.fundamentals.get(FundamentalField::Volume);
                quote.fundamentals = fundamentals;
                if quote.fundamentals.get(FundamentalField::Volume).is_none() {
                    quote.fundamentals.set(FundamentalField::Volume, volume);
                }
            }
            Err(e) => log::warn!("Fundamentals unavailable for {}: {}", symbol, e),
        }

        Ok(quote)
    }
}

/// Parse a chart API response body
fn parse_chart(body: &str, symbol: &str) -> Result<Quote> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.chart.error.filter(|e| !e.is_null()) {
        return Err(anyhow!("Provider error for {}: {}", symbol, error));
    }

    let result = envelope
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| anyhow!("No chart data for {}", symbol))?;

    let closes: Vec<f64> = result
        .indicators
        .and_then(|mut i| if i.quote.is_empty() { None } else { Some(i.quote.remove(0)) })
        .map(|series| series.close.into_iter().flatten().filter(|c| c.is_finite()).collect())
        .unwrap_or_default();

    let meta = result.meta;
    let current_price = meta
        .regular_market_price
        .or_else(|| closes.last().copied())
        .ok_or_else(|| anyhow!("No price for {}", symbol))?;

    let previous_close = meta
        .previous_close
        .or_else(|| closes.len().checked_sub(2).map(|i| closes[i]));

    let resolved = meta.symbol.unwrap_or_else(|| symbol.to_string());
    let name = meta
        .long_name
        .or(meta.short_name)
        .unwrap_or_else(|| resolved.clone());

    let mut fundamentals = Fundamentals::new();
    fundamentals.set(FundamentalField::Volume, meta.regular_market_volume);

    Ok(Quote {
        symbol: resolved,
        name,
        currency: meta.currency,
        current_price,
        previous_close,
        closes,
        fundamentals,
        fetched_at: Utc::now(),
    })
}

/// `{"raw": 1.23, "fmt": "1.23"}` -> 1.23
fn raw_value(module: &Value, key: &str) -> Option<f64> {
    module.get(key).and_then(|v| v.get("raw")).and_then(Value::as_f64)
}

/// Parse a quoteSummary response body
fn parse_fundamentals(json: &Value) -> Result<Fundamentals> {
    let result = json["quoteSummary"]["result"]
        .get(0)
        .ok_or_else(|| anyhow!("Empty quoteSummary result"))?;

    let detail = &result["summaryDetail"];
    let stats = &result["defaultKeyStatistics"];
    let financial = &result["financialData"];

    let mut fundamentals = Fundamentals::new();
    fundamentals.set(FundamentalField::MarketCap, raw_value(detail, "marketCap"));
    fundamentals.set(FundamentalField::PriceToBook, raw_value(stats, "priceToBook"));
    fundamentals.set(
        FundamentalField::Beta,
        raw_value(detail, "beta").or_else(|| raw_value(stats, "beta")),
    );
    fundamentals.set(FundamentalField::DividendYield, raw_value(detail, "dividendYield"));
    fundamentals.set(FundamentalField::Revenue, raw_value(financial, "totalRevenue"));
    fundamentals.set(FundamentalField::ProfitMargin, raw_value(financial, "profitMargins"));
    fundamentals.set(FundamentalField::Volume, raw_value(detail, "volume"));

    Ok(fundamentals)
}

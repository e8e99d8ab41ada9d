use crate::config::Settings;
use crate::ingest::provider::RatesProvider;
use crate::ingest::types::{CurrencyRecord, RateObservation};
use crate::markup;
use anyhow::{Context, Result};
use encoding_rs::WINDOWS_1251;

#[derive(Debug)]
pub struct CbrClient {
    http: reqwest::Client,
    directory_url: String,
    daily_url: String,
}

impl CbrClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .context("failed to build CBR http client")?;

        Ok(Self {
            http,
            directory_url: settings.directory_url.clone(),
            daily_url: settings.daily_url.clone(),
        })
    }

    async fn fetch_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .context("CBR request failed")?;

        let status = res.status();
        let bytes = res.bytes().await.context("failed to read CBR response")?;
        if !status.is_success() {
            anyhow::bail!("CBR HTTP {status} for {url}");
        }

        Ok(decode_body(&bytes))
    }
}

#[async_trait::async_trait]
impl RatesProvider for CbrClient {
    fn provider_name(&self) -> &'static str {
        "cbr_xml"
    }

    async fn fetch_directory(&self) -> Result<String> {
        self.fetch_text(&self.directory_url, &[])
            .await
            .context("currency directory request failed")
    }

    async fn fetch_daily(&self, date_req: &str) -> Result<String> {
        self.fetch_text(&self.daily_url, &[("date_req", date_req)])
            .await
            .with_context(|| format!("daily rates request failed for {date_req}"))
    }
}

// The upstream declares windows-1251 in the XML prolog; anything else is
// treated as UTF-8.
fn decode_body(bytes: &[u8]) -> String {
    let head_len = bytes.len().min(128);
    let head = String::from_utf8_lossy(&bytes[..head_len]).to_ascii_lowercase();
    if head.contains("windows-1251") {
        let (text, _, _) = WINDOWS_1251.decode(bytes);
        return text.into_owned();
    }
    String::from_utf8_lossy(bytes).into_owned()
}

/// One record per `<Item>` element, in document order, no deduplication.
/// Missing optional fields come back empty rather than failing the run.
pub fn extract_currency_directory(document: &str) -> Vec<CurrencyRecord> {
    let mut out = Vec::new();
    for item in markup::element_blocks(document, "Item") {
        out.push(CurrencyRecord {
            id: markup::attribute(item.raw, "ID"),
            code: markup::first_tag_value(item.inner, "CharCode"),
            name: markup::first_tag_value(item.inner, "Name"),
            eng_name: markup::first_tag_value(item.inner, "EngName"),
            nominal: parse_nominal(&markup::first_tag_value(item.inner, "Nominal")),
            parent_code: markup::first_tag_value(item.inner, "ParentCode"),
            flag_history: false,
        });
    }
    out
}

/// One observation per `<Valute>` element. Unparseable decimals become NaN
/// and the row is kept; dropping it would erase the audit trail for that
/// (date, currency) pair.
pub fn extract_daily_rates(document: &str, requested_date: &str) -> Vec<RateObservation> {
    let date = authoritative_date(document).unwrap_or_else(|| requested_date.to_string());

    let mut out = Vec::new();
    for valute in markup::element_blocks(document, "Valute") {
        out.push(RateObservation {
            date: date.clone(),
            currency_code: markup::first_tag_value(valute.inner, "CharCode"),
            nominal: parse_nominal(&markup::first_tag_value(valute.inner, "Nominal")),
            value: parse_decimal(&markup::first_tag_value(valute.inner, "Value")),
            vunit_rate: parse_decimal(&markup::first_tag_value(valute.inner, "VunitRate")),
        });
    }
    out
}

// Non-trading days redirect to the prior trading day's document; the Date
// attribute on the root element names the day the quotes actually belong to
// and wins over the requested date.
fn authoritative_date(document: &str) -> Option<String> {
    let root = markup::element_blocks(document, "ValCurs").into_iter().next()?;
    let date = markup::attribute(root.raw, "Date");
    if date.is_empty() {
        None
    } else {
        Some(date)
    }
}

fn parse_nominal(s: &str) -> i64 {
    let t = s.trim();
    if t.is_empty() {
        return 1;
    }
    t.parse::<i64>().unwrap_or(1)
}

// Upstream emits localized decimal commas ("78,5123").
fn parse_decimal(s: &str) -> f64 {
    let t = s.trim().replace(',', ".");
    if t.is_empty() {
        return f64::NAN;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}

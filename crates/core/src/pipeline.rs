use crate::config::Settings;
use crate::export;
use crate::ingest::cbr;
use crate::ingest::provider::RatesProvider;
use crate::ingest::types::RateObservation;
use crate::time::window;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

/// Byte sink for the produced artifacts. Overwrite semantics, no append.
pub trait ArtifactSink: Send + Sync {
    fn write_all(&self, path: &Path, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl ArtifactSink for FsSink {
    fn write_all(&self, path: &Path, text: &str) -> Result<()> {
        std::fs::write(path, text).with_context(|| format!("write {} failed", path.display()))
    }
}

/// Dry-run sink: reports what would be written and discards it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ArtifactSink for LogSink {
    fn write_all(&self, path: &Path, text: &str) -> Result<()> {
        tracing::info!(
            path = %path.display(),
            bytes = text.len(),
            "dry run; skipping artifact write"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DateFailure {
    pub date_req: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub currencies: usize,
    pub observations: usize,
    pub window_days: usize,
    pub failed_dates: Vec<DateFailure>,
}

/// One full collection run: directory first, then every window date in
/// order, strictly sequential.
///
/// A directory or artifact-write failure aborts the run. A single date's
/// fetch failure is recorded and skipped; every remaining date is still
/// attempted, and the run counts as succeeded with that date missing.
pub async fn collect<P, S>(
    provider: &P,
    sink: &S,
    settings: &Settings,
    reference: NaiveDate,
) -> Result<RunSummary>
where
    P: RatesProvider + ?Sized,
    S: ArtifactSink + ?Sized,
{
    let directory_xml = provider
        .fetch_directory()
        .await
        .context("currency directory fetch failed")?;

    let mut currencies = cbr::extract_currency_directory(&directory_xml);
    for currency in &mut currencies {
        currency.flag_history = settings.watch_list.iter().any(|code| code == &currency.code);
    }

    let currencies_csv = export::currencies_csv(&currencies)?;
    sink.write_all(&settings.currencies_out, &currencies_csv)
        .context("write currency dictionary failed")?;
    tracing::info!(
        currencies = currencies.len(),
        path = %settings.currencies_out.display(),
        "currency dictionary written"
    );

    let entries = window::trailing_window(reference, settings.window_days);
    let mut observations: Vec<RateObservation> = Vec::new();
    let mut failed_dates: Vec<DateFailure> = Vec::new();

    for (idx, entry) in entries.iter().enumerate() {
        // Pacing between attempts, never before the first one. The upstream
        // rate-limits aggressively; do not parallelize this loop.
        if idx != 0 {
            tokio::time::sleep(settings.req_delay).await;
        }

        match provider.fetch_daily(&entry.date_req).await {
            Ok(xml) => {
                let day = cbr::extract_daily_rates(&xml, &entry.date_req);
                let before = observations.len();
                observations.extend(
                    day.into_iter()
                        .filter(|obs| settings.watch_list.iter().any(|c| c == &obs.currency_code)),
                );
                tracing::info!(
                    date_req = %entry.date_req,
                    kept = observations.len() - before,
                    "daily rates fetched"
                );
            }
            Err(err) => {
                tracing::warn!(
                    date_req = %entry.date_req,
                    error = %err,
                    "daily rates fetch failed; skipping date"
                );
                failed_dates.push(DateFailure {
                    date_req: entry.date_req.clone(),
                    error: format!("{err:#}"),
                });
            }
        }
    }

    let rates_csv = export::rates_csv(&observations)?;
    sink.write_all(&settings.rates_out, &rates_csv)
        .context("write rate series failed")?;
    tracing::info!(
        observations = observations.len(),
        failed_dates = failed_dates.len(),
        path = %settings.rates_out.display(),
        "rate series written"
    );

    Ok(RunSummary {
        currencies: currencies.len(),
        observations: observations.len(),
        window_days: entries.len(),
        failed_dates,
    })
}

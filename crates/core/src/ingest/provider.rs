use anyhow::Result;

/// Transport seam for the two upstream resources. Implementations resolve
/// with the full decoded document text or fail with a transport error; they
/// do not interpret the markup.
#[async_trait::async_trait]
pub trait RatesProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// The directory resource enumerating all known currencies.
    async fn fetch_directory(&self) -> Result<String>;

    /// One day's quotations, addressed by the DD/MM/YYYY wire date.
    async fn fetch_daily(&self, date_req: &str) -> Result<String>;
}

pub mod export;
pub mod ingest;
pub mod markup;
pub mod pipeline;
pub mod time;

pub mod config {
    use std::path::PathBuf;
    use std::time::Duration;

    const DEFAULT_WATCH_LIST: &str = "USD,EUR,GBP,CNY,JPY";
    const DEFAULT_DIRECTORY_URL: &str = "https://www.cbr.ru/scripts/XML_valFull.asp";
    const DEFAULT_DAILY_URL: &str = "https://www.cbr.ru/scripts/XML_daily.asp";

    #[derive(Debug, Clone)]
    pub struct Settings {
        /// Currency codes whose rate history is collected.
        pub watch_list: Vec<String>,
        pub currencies_out: PathBuf,
        pub rates_out: PathBuf,
        pub directory_url: String,
        pub daily_url: String,

        /// Pacing interval between consecutive daily-rate requests.
        pub req_delay: Duration,
        pub request_timeout: Duration,
        pub window_days: usize,
        pub sentry_dsn: Option<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                watch_list: parse_watch_list(DEFAULT_WATCH_LIST),
                currencies_out: PathBuf::from("currencies.csv"),
                rates_out: PathBuf::from("currency_rates.csv"),
                directory_url: DEFAULT_DIRECTORY_URL.to_string(),
                daily_url: DEFAULT_DAILY_URL.to_string(),
                req_delay: Duration::from_millis(500),
                request_timeout: Duration::from_secs(30),
                window_days: 30,
                sentry_dsn: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let mut out = Self::default();

            if let Ok(s) = std::env::var("CURRENCY_CODES") {
                let list = parse_watch_list(&s);
                if !list.is_empty() {
                    out.watch_list = list;
                }
            }

            if let Ok(s) = std::env::var("CURRENCIES_OUT") {
                if !s.trim().is_empty() {
                    out.currencies_out = PathBuf::from(s);
                }
            }

            if let Ok(s) = std::env::var("RATES_OUT") {
                if !s.trim().is_empty() {
                    out.rates_out = PathBuf::from(s);
                }
            }

            if let Ok(s) = std::env::var("CBR_DIRECTORY_URL") {
                if !s.trim().is_empty() {
                    out.directory_url = s;
                }
            }

            if let Ok(s) = std::env::var("CBR_DAILY_URL") {
                if !s.trim().is_empty() {
                    out.daily_url = s;
                }
            }

            if let Some(ms) = parse_env_u64("CBR_REQ_DELAY_MS") {
                out.req_delay = Duration::from_millis(ms);
            }

            if let Some(secs) = parse_env_u64("CBR_TIMEOUT_SECS") {
                out.request_timeout = Duration::from_secs(secs);
            }

            if let Some(days) = parse_env_u64("HISTORY_WINDOW_DAYS") {
                anyhow::ensure!(
                    (1..=366).contains(&days),
                    "HISTORY_WINDOW_DAYS must be 1..=366 (got {days})"
                );
                out.window_days = days as usize;
            }

            out.sentry_dsn = std::env::var("SENTRY_DSN").ok();

            Ok(out)
        }
    }

    fn parse_env_u64(key: &str) -> Option<u64> {
        std::env::var(key).ok().and_then(|s| s.parse::<u64>().ok())
    }

    fn parse_watch_list(s: &str) -> Vec<String> {
        s.split(',')
            .map(|part| part.trim().to_ascii_uppercase())
            .filter(|part| !part.is_empty())
            .collect()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn watch_list_splits_trims_and_uppercases() {
            let list = parse_watch_list(" usd, EUR ,,gbp ");
            assert_eq!(list, vec!["USD", "EUR", "GBP"]);
        }

        #[test]
        fn defaults_cover_the_reference_configuration() {
            let s = Settings::default();
            assert_eq!(s.watch_list, vec!["USD", "EUR", "GBP", "CNY", "JPY"]);
            assert_eq!(s.window_days, 30);
            assert_eq!(s.req_delay, Duration::from_millis(500));
        }
    }
}

use chrono::{Duration, NaiveDate};

/// One day of the trailing window together with its wire-format date.
#[derive(Debug, Clone)]
pub struct WindowEntry {
    pub date: NaiveDate,
    pub date_req: String,
}

/// Zero-padded DD/MM/YYYY, the `date_req` query format the upstream expects.
pub fn format_date_req(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// The reference date and the `days - 1` preceding calendar days, newest
/// first. Weekends and holidays are NOT skipped; non-trading days are
/// resolved by the upstream redirecting to the prior trading day's document.
pub fn trailing_window(reference: NaiveDate, days: usize) -> Vec<WindowEntry> {
    let mut out = Vec::with_capacity(days);
    for i in 0..days {
        let date = reference - Duration::days(i as i64);
        out.push(WindowEntry {
            date,
            date_req: format_date_req(date),
        });
    }
    out
}

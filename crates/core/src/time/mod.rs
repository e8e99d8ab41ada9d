pub mod window;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};

// The publisher quotes rates on Moscow civil time.
const MSK_OFFSET_SECS: i32 = 3 * 3600;

pub fn resolve_reference_date(
    as_of_date_arg: Option<&str>,
    now_utc: DateTime<Utc>,
) -> anyhow::Result<NaiveDate> {
    if let Some(s) = as_of_date_arg {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid --as-of-date {s:?}, expected YYYY-MM-DD"));
    }

    let msk = chrono::FixedOffset::east_opt(MSK_OFFSET_SECS).context("invalid MSK offset")?;
    Ok(now_utc.with_timezone(&msk).date_naive())
}

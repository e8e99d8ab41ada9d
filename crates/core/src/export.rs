use crate::ingest::types::{CurrencyRecord, RateObservation};
use anyhow::{Context, Result};

pub const CURRENCIES_HEADER: [&str; 7] = [
    "ID",
    "Code",
    "Name",
    "EngName",
    "Nominal",
    "ParentCode",
    "FlagHistory",
];

pub const RATES_HEADER: [&str; 5] = ["Date", "CurrencyCode", "Nominal", "Value", "VunitRate"];

/// Dictionary artifact. The header row is always present, even for an empty
/// directory. Fields containing commas or quotes are quoted with embedded
/// quotes doubled.
pub fn currencies_csv(records: &[CurrencyRecord]) -> Result<String> {
    let mut wtr = writer();
    wtr.write_record(CURRENCIES_HEADER)
        .context("write currencies header failed")?;

    for r in records {
        let nominal = r.nominal.to_string();
        let flag = if r.flag_history { "1" } else { "0" };
        wtr.write_record([
            r.id.as_str(),
            r.code.as_str(),
            r.name.as_str(),
            r.eng_name.as_str(),
            nominal.as_str(),
            r.parent_code.as_str(),
            flag,
        ])
        .context("write currency row failed")?;
    }

    into_string(wtr)
}

/// Rate-series artifact, rows in accumulator order.
pub fn rates_csv(observations: &[RateObservation]) -> Result<String> {
    let mut wtr = writer();
    wtr.write_record(RATES_HEADER)
        .context("write rates header failed")?;

    for o in observations {
        let nominal = o.nominal.to_string();
        let value = format_decimal(o.value);
        let vunit_rate = format_decimal(o.vunit_rate);
        wtr.write_record([
            o.date.as_str(),
            o.currency_code.as_str(),
            nominal.as_str(),
            value.as_str(),
            vunit_rate.as_str(),
        ])
        .context("write rate row failed")?;
    }

    into_string(wtr)
}

/// Locale-invariant rendering: period separator, no grouping. Parse failures
/// stay visible as literal NaN rather than silently vanishing.
pub fn format_decimal(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v}")
    }
}

fn writer() -> csv::Writer<Vec<u8>> {
    csv::Writer::from_writer(Vec::new())
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr.into_inner().context("flush csv writer failed")?;
    String::from_utf8(bytes).context("csv output was not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn currency(code: &str, name: &str, tracked: bool) -> CurrencyRecord {
        CurrencyRecord {
            id: format!("R_{code}"),
            code: code.to_string(),
            name: name.to_string(),
            eng_name: format!("{code} name"),
            nominal: 1,
            parent_code: String::new(),
            flag_history: tracked,
        }
    }

    #[test]
    fn header_is_written_even_without_records() {
        let text = rates_csv(&[]).unwrap();
        assert_eq!(text, "Date,CurrencyCode,Nominal,Value,VunitRate\n");
    }

    #[test]
    fn flag_history_renders_as_one_or_zero() {
        let text = currencies_csv(&[
            currency("USD", "Доллар США", true),
            currency("AMD", "Армянских драмов", false),
        ])
        .unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ID,Code,Name,EngName,Nominal,ParentCode,FlagHistory");
        assert!(lines[1].ends_with(",1"));
        assert!(lines[2].ends_with(",0"));
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let text = currencies_csv(&[currency("XCD", "Доллар, восточнокарибский", false)]).unwrap();
        assert!(text.contains("\"Доллар, восточнокарибский\""));

        // Splitting on unescaped commas must still yield one field per column.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(text.as_bytes());
        for record in rdr.records() {
            assert_eq!(record.unwrap().len(), CURRENCIES_HEADER.len());
        }
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let text = currencies_csv(&[currency("GBP", "Фунт \"стерлингов\"", false)]).unwrap();
        assert!(text.contains("\"Фунт \"\"стерлингов\"\"\""));
    }

    #[test]
    fn rate_rows_render_decimals_with_periods() {
        let obs = RateObservation {
            date: "02.03.2026".to_string(),
            currency_code: "USD".to_string(),
            nominal: 1,
            value: 90.1234,
            vunit_rate: 90.1234,
        };

        let text = rates_csv(&[obs]).unwrap();
        assert_eq!(
            text,
            "Date,CurrencyCode,Nominal,Value,VunitRate\n02.03.2026,USD,1,90.1234,90.1234\n"
        );
    }

    #[test]
    fn nan_values_stay_visible() {
        assert_eq!(format_decimal(f64::NAN), "NaN");
        assert_eq!(format_decimal(78.5123), "78.5123");
        assert_eq!(format_decimal(10.0), "10");
    }
}

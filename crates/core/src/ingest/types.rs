use serde::{Deserialize, Serialize};

/// One currency entry from the directory document. Built fresh per run and
/// written once to the dictionary artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyRecord {
    /// Registry ID attribute, an opaque key (e.g. "R01235").
    pub id: String,
    pub code: String,
    pub name: String,
    pub eng_name: String,

    /// Unit count the quoted value applies to; 1 when the field is blank.
    pub nominal: i64,

    /// Empty when the currency has no parent linkage.
    pub parent_code: String,

    /// True iff `code` is on the configured watch-list.
    pub flag_history: bool,
}

/// One (date, currency) quotation from a daily-rates document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateObservation {
    /// Textual date, verbatim from the document's own Date attribute when
    /// present, otherwise the requested wire date.
    pub date: String,
    pub currency_code: String,
    pub nominal: i64,

    /// Quoted rate for `nominal` units; NaN when the source text failed to
    /// parse after decimal-separator normalization.
    pub value: f64,

    /// Rate normalized to a single unit, as quoted by the source.
    pub vunit_rate: f64,
}

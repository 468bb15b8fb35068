use chrono::{NaiveDate, NaiveDateTime};

use crate::parse::parse_timestamp;

/// A time-stamped journal entry with named numeric fields.
///
/// Timestamps stay as entered; consumers parse them on use and skip
/// records whose timestamp does not parse.
pub trait SeriesRecord {
    /// Raw timestamp: `YYYY-MM-DD` or date plus time.
    fn timestamp(&self) -> &str;

    /// Named numeric field, `None` when absent or unknown.
    fn numeric_field(&self, field: &str) -> Option<f64>;

    fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        parse_timestamp(self.timestamp())
    }

    fn date(&self) -> Option<NaiveDate> {
        self.parsed_timestamp().map(|dt| dt.date())
    }
}

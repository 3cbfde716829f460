use chrono::NaiveDate;
pub mod aggregate;
pub mod chart;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod filter;
pub mod logging;
pub mod page;
pub mod render;
pub mod serve;
pub mod store;
pub mod web;

pub use dashboard::{Controls, Tab};
pub use data::{DailyRecord, Dataset, HourlyRecord, Table};
pub use error::{DashboardError, DashboardResult};
pub use filter::DateRange;
pub use store::DataStore;

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

pub const DAY_FILE: &str = "day_cleaned.csv";
pub const HOUR_FILE: &str = "hour_cleaned.csv";

/// Format of the date control values and of the date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Alternative date column format, as written when the date was saved with a time part.
pub const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Hourly day-type labels as they appear in `tipe_hari`.
pub const WORKDAY: &str = "Hari Kerja";
pub const WEEKEND: &str = "Akhir Pekan";

/// Rider categories of the long-form hourly aggregate.
pub const CASUAL: &str = "casual";
pub const REGISTERED: &str = "registered";

/// Parses a date column or date control value, accepting a trailing time part.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(s, DT_FORMAT)
                .ok()
                .map(|dt| dt.date())
        })
}

/// Smallest and largest element, `None` for an empty slice.
pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(s: &[T]) -> Option<(T, T)> {
    let mut s_iter = s.iter();
    let (mut min, mut max) = match s_iter.next() {
        Some(v) => (*v, *v),
        None => return None,
    };
    for es in s_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_both_formats() {
        let d = NaiveDate::from_ymd_opt(2012, 6, 1).unwrap();
        assert_eq!(parse_date("2012-06-01"), Some(d));
        assert_eq!(parse_date("2012-06-01 00:00:00"), Some(d));
        assert_eq!(parse_date(" 2012-06-01 "), Some(d));
        assert_eq!(parse_date("06/01/2012"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn min_and_max_of_slice() {
        assert_eq!(min_and_max(&[3, 1, 4, 1, 5]), Some((1, 5)));
        assert_eq!(min_and_max(&[2.5]), Some((2.5, 2.5)));
        assert_eq!(min_and_max::<i32>(&[]), None);
    }
}

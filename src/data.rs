//! Daily and hourly rental tables and the all-or-nothing loader.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::error::{DashboardError, DashboardResult};
use crate::{min_and_max, parse_date, DAY_FILE, HOUR_FILE};

/// Rows that carry a calendar date, the key of the date-range filter.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// One row of `day_cleaned.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyRecord {
    #[serde(rename = "dteday", deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    pub season_label: String,
    /// Always text, so it matches the keys of the year palette.
    pub year_label: String,
    pub cnt: u32,
}

/// One row of `hour_cleaned.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourlyRecord {
    #[serde(rename = "dteday", deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "deserialize_hour")]
    pub hr: u8,
    #[serde(rename = "tipe_hari")]
    pub day_type: String,
    pub casual: u32,
    pub registered: u32,
    pub cnt: u32,
}

impl Dated for DailyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for HourlyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_date(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s)))
}

fn deserialize_hour<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let hr = u8::deserialize(deserializer)?;
    if hr > 23 {
        return Err(serde::de::Error::custom(format!("hour {} is outside 0-23", hr)));
    }
    Ok(hr)
}

/// A loaded CSV table: the typed records plus, row by row, the raw text of
/// every column for the raw-table display.
#[derive(Debug, Clone)]
pub struct Table<R> {
    pub headers: StringRecord,
    pub records: Vec<R>,
    pub raw: Vec<StringRecord>,
}

impl<R: DeserializeOwned> Table<R> {
    /// Parses a headed CSV; columns the record type does not name are kept
    /// only in `raw`. Fails on the first malformed row.
    pub fn from_reader<T: Read>(rdr: T) -> DashboardResult<Table<R>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(rdr);
        let headers = reader.headers()?.clone();
        let mut records = Vec::new();
        let mut raw = Vec::new();
        for row in reader.records() {
            let row = row?;
            let record: R = row.deserialize(Some(&headers))?;
            records.push(record);
            raw.push(row);
        }
        Ok(Table {
            headers,
            records,
            raw,
        })
    }

    pub fn from_path(path: &Path) -> DashboardResult<Table<R>> {
        let file = File::open(path)?;
        let table = Self::from_reader(BufReader::new(file))?;
        debug!(path = %path.display(), rows = table.len(), "parsed table");
        Ok(table)
    }
}

impl<R> Table<R> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Both tables, immutable once loaded.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub day: Table<DailyRecord>,
    pub hour: Table<HourlyRecord>,
}

impl Dataset {
    /// Loads `day_cleaned.csv` and `hour_cleaned.csv` from `dir`.
    /// Both files are checked for existence before anything is parsed.
    pub fn load(dir: &Path) -> DashboardResult<Dataset> {
        let day_path = dir.join(DAY_FILE);
        let hour_path = dir.join(HOUR_FILE);
        if !day_path.is_file() || !hour_path.is_file() {
            return Err(DashboardError::MissingInput {
                day: day_path,
                hour: hour_path,
            });
        }
        let day = Table::from_path(&day_path)?;
        let hour = Table::from_path(&hour_path)?;
        info!(
            daily_rows = day.len(),
            hourly_rows = hour.len(),
            dir = %dir.display(),
            "loaded rental data"
        );
        Ok(Dataset { day, hour })
    }

    /// First and last date of the daily table, the default of the date control.
    pub fn day_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates: Vec<NaiveDate> = self.day.records.iter().map(|r| r.date).collect();
        min_and_max(&dates[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_CSV: &str = "\
instant,dteday,season,yr,cnt,season_label,year_label,temp
1,2011-01-01,1,0,985,Spring,2011,0.34
2,2011-01-02,1,0,801,Spring,2011,0.36
3,2012-07-01 00:00:00,3,1,5531,Fall,2012,0.8
";

    const HOUR_CSV: &str = "\
dteday,hr,tipe_hari,casual,registered,cnt
2011-01-01,0,Akhir Pekan,3,13,16
2011-01-03,8,Hari Kerja,1,93,94
";

    #[test]
    fn daily_table_keeps_typed_and_raw_columns() {
        let t: Table<DailyRecord> = Table::from_reader(DAY_CSV.as_bytes()).unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.headers.len(), 8);
        assert_eq!(t.raw[0].get(7), Some("0.34"));
        assert_eq!(t.records[0].year_label, "2011");
        assert_eq!(t.records[0].season_label, "Spring");
        assert_eq!(t.records[2].date, NaiveDate::from_ymd_opt(2012, 7, 1).unwrap());
        assert_eq!(t.records[2].cnt, 5531);
    }

    #[test]
    fn hourly_table_maps_day_type_column() {
        let t: Table<HourlyRecord> = Table::from_reader(HOUR_CSV.as_bytes()).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.records[1].day_type, "Hari Kerja");
        assert_eq!(t.records[1].hr, 8);
        assert_eq!(t.records[1].registered, 93);
    }

    #[test]
    fn malformed_row_fails_the_table() {
        let bad = "dteday,hr,tipe_hari,casual,registered,cnt\n2011-01-01,x,Hari Kerja,1,2,3\n";
        let t: DashboardResult<Table<HourlyRecord>> = Table::from_reader(bad.as_bytes());
        assert!(matches!(t, Err(DashboardError::Csv(_))));
    }

    #[test]
    fn hour_past_23_fails_the_table() {
        let bad = "dteday,hr,tipe_hari,casual,registered,cnt\n2011-01-01,30,Hari Kerja,1,2,3\n";
        let t: DashboardResult<Table<HourlyRecord>> = Table::from_reader(bad.as_bytes());
        match t {
            Err(DashboardError::Csv(e)) => assert!(e.to_string().contains("outside 0-23")),
            other => panic!("expected a csv error, got {:?}", other.map(|t| t.len())),
        }
        let last = "dteday,hr,tipe_hari,casual,registered,cnt\n2011-01-01,23,Hari Kerja,1,2,3\n";
        let t: Table<HourlyRecord> = Table::from_reader(last.as_bytes()).unwrap();
        assert_eq!(t.records[0].hr, 23);
    }

    #[test]
    fn bad_date_fails_the_table() {
        let bad = "dteday,season_label,year_label,cnt\n01/01/2011,Spring,2011,3\n";
        let t: DashboardResult<Table<DailyRecord>> = Table::from_reader(bad.as_bytes());
        assert!(t.is_err());
    }

    #[test]
    fn day_span_of_table() {
        let ds = Dataset {
            day: Table::from_reader(DAY_CSV.as_bytes()).unwrap(),
            hour: Table::from_reader(HOUR_CSV.as_bytes()).unwrap(),
        };
        let (first, last) = ds.day_span().unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2012, 7, 1).unwrap());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = std::env::temp_dir().join("bikeshare_dash_no_such_dir");
        match Dataset::load(&dir) {
            Err(DashboardError::MissingInput { day, hour }) => {
                assert!(day.ends_with(DAY_FILE));
                assert!(hour.ends_with(HOUR_FILE));
            }
            other => panic!("expected MissingInput, got {:?}", other.map(|_| ())),
        }
    }
}

//! Inclusive date-range filtering of the loaded tables.

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::debug;

use crate::data::{DailyRecord, Dataset, Dated, HourlyRecord, Table};

/// Inclusive `[start, end]` interval. `start > end` is accepted and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange { start, end }
    }

    /// A range only when the date control produced both endpoints.
    /// A one-sided selection gives `None`, and callers fall back to the full tables.
    pub fn from_endpoints(endpoints: &[NaiveDate]) -> Option<DateRange> {
        match endpoints {
            [start, end] => Some(DateRange::new(*start, *end)),
            _ => None,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Row subset of a table, borrowing the table.
#[derive(Debug, Clone)]
pub struct TableView<'a, R> {
    pub table: &'a Table<R>,
    pub rows: Vec<usize>,
}

impl<'a, R> TableView<'a, R> {
    pub fn all(table: &'a Table<R>) -> TableView<'a, R> {
        TableView {
            table,
            rows: (0..table.len()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a R> + '_ {
        let table = self.table;
        self.rows.iter().map(move |&i| &table.records[i])
    }

    pub fn raw(&self) -> impl Iterator<Item = &'a StringRecord> + '_ {
        let table = self.table;
        self.rows.iter().map(move |&i| &table.raw[i])
    }
}

/// Keeps the rows whose date lies in `range`, in table order.
pub fn filter_table<'a, R: Dated>(table: &'a Table<R>, range: &DateRange) -> TableView<'a, R> {
    let rows = table
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| range.contains(r.date()))
        .map(|(i, _)| i)
        .collect();
    TableView { table, rows }
}

/// The filtered daily and hourly tables of one dashboard run.
#[derive(Debug, Clone)]
pub struct DatasetView<'a> {
    pub day: TableView<'a, DailyRecord>,
    pub hour: TableView<'a, HourlyRecord>,
}

impl Dataset {
    /// Filters both tables with `range`, or returns them whole for `None`.
    pub fn view(&self, range: Option<&DateRange>) -> DatasetView<'_> {
        match range {
            Some(range) => {
                let view = DatasetView {
                    day: filter_table(&self.day, range),
                    hour: filter_table(&self.hour, range),
                };
                debug!(
                    %range,
                    daily_rows = view.day.len(),
                    hourly_rows = view.hour.len(),
                    "filtered tables"
                );
                view
            }
            None => DatasetView {
                day: TableView::all(&self.day),
                hour: TableView::all(&self.hour),
            },
        }
    }
}

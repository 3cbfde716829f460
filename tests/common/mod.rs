//! Synthetic 2011-2012 rental data written to a temporary folder.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use bikeshare_dash::{Dataset, DAY_FILE, HOUR_FILE};
use chrono::{Datelike, NaiveDate, Weekday};
use tempfile::TempDir;

/// Hours present for every date of the hourly table.
pub const HOURS: [u8; 4] = [0, 8, 12, 17];

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn season_of(date: NaiveDate) -> &'static str {
    match date.month() {
        12 | 1 | 2 => "Winter",
        3..=5 => "Spring",
        6..=8 => "Summer",
        _ => "Fall",
    }
}

fn day_type_of(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => "Akhir Pekan",
        _ => "Hari Kerja",
    }
}

/// Every date from 2011-01-01 to 2012-12-31.
pub fn dates() -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut d = ymd(2011, 1, 1);
    while d <= ymd(2012, 12, 31) {
        out.push(d);
        d = d.succ_opt().unwrap();
    }
    out
}

pub fn day_csv() -> String {
    let mut s = String::from(
        "instant,dteday,season,yr,mnth,workingday,temp,cnt,season_label,year_label\n",
    );
    for (i, d) in dates().iter().enumerate() {
        let yr = d.year() - 2011;
        let cnt = 1000 + i as u32 * 3 + (d.month() * 50);
        writeln!(
            s,
            "{},{},{},{},{},{},0.{},{},{},{}",
            i + 1,
            d,
            d.month() % 4 + 1,
            yr,
            d.month(),
            (day_type_of(*d) == "Hari Kerja") as u8,
            d.day(),
            cnt,
            season_of(*d),
            d.year()
        )
        .unwrap();
    }
    s
}

pub fn hour_csv() -> String {
    let mut s = String::from("dteday,hr,tipe_hari,casual,registered,cnt\n");
    for (i, d) in dates().iter().enumerate() {
        for hr in HOURS.iter() {
            let casual = (i as u32 % 7) * 3 + *hr as u32;
            let registered = (i as u32 % 11) * 10 + *hr as u32 * 5;
            writeln!(
                s,
                "{},{},{},{},{},{}",
                d,
                hr,
                day_type_of(*d),
                casual,
                registered,
                casual + registered
            )
            .unwrap();
        }
    }
    s
}

pub fn write_dataset(dir: &Path) {
    fs::write(dir.join(DAY_FILE), day_csv()).unwrap();
    fs::write(dir.join(HOUR_FILE), hour_csv()).unwrap();
}

/// A temporary folder with both files, and the dataset loaded from it.
pub fn dataset() -> (TempDir, Dataset) {
    let tmp = tempfile::tempdir().unwrap();
    write_dataset(tmp.path());
    let ds = Dataset::load(tmp.path()).unwrap();
    (tmp, ds)
}

//! Group-by-mean aggregates behind the three charts.

use std::collections::{BTreeMap, HashMap};

use crate::data::{DailyRecord, HourlyRecord};
use crate::{CASUAL, REGISTERED};

/// Running arithmetic mean.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    sum: f64,
    n: usize,
}

impl Mean {
    pub fn push(&mut self, v: f64) {
        self.sum += v;
        self.n += 1;
    }

    /// NAN when nothing was pushed.
    pub fn value(&self) -> f64 {
        if self.n == 0 {
            f64::NAN
        } else {
            self.sum / self.n as f64
        }
    }

    pub fn count(&self) -> usize {
        self.n
    }
}

/// Mean daily count of one (season, year) group.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonYearMean {
    pub season: String,
    pub year: String,
    pub mean_cnt: f64,
}

/// Mean `cnt` per season and year. Groups come out in order of first
/// appearance of the season, then of the year.
pub fn season_year_means<'a, I>(days: I) -> Vec<SeasonYearMean>
where
    I: IntoIterator<Item = &'a DailyRecord>,
{
    let mut seasons: Vec<&str> = Vec::new();
    let mut years: Vec<&str> = Vec::new();
    let mut groups: HashMap<(&str, &str), Mean> = HashMap::new();
    for d in days {
        if !seasons.contains(&d.season_label.as_str()) {
            seasons.push(&d.season_label);
        }
        if !years.contains(&d.year_label.as_str()) {
            years.push(&d.year_label);
        }
        groups
            .entry((d.season_label.as_str(), d.year_label.as_str()))
            .or_default()
            .push(d.cnt as f64);
    }
    let mut out = Vec::with_capacity(groups.len());
    for s in &seasons {
        for y in &years {
            if let Some(m) = groups.get(&(*s, *y)) {
                out.push(SeasonYearMean {
                    season: s.to_string(),
                    year: y.to_string(),
                    mean_cnt: m.value(),
                });
            }
        }
    }
    out
}

/// One point of an hourly line chart: the value of `series` at hour `hr`.
/// This is also the long form of the per-hour user aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct HourPoint {
    pub hr: u8,
    pub series: String,
    pub value: f64,
}

/// Mean `cnt` per day type and hour, sorted by day type then hour.
pub fn hourly_means_by_day_type<'a, I>(hours: I) -> Vec<HourPoint>
where
    I: IntoIterator<Item = &'a HourlyRecord>,
{
    let mut groups: BTreeMap<(&str, u8), Mean> = BTreeMap::new();
    for h in hours {
        groups
            .entry((h.day_type.as_str(), h.hr))
            .or_default()
            .push(h.cnt as f64);
    }
    groups
        .into_iter()
        .map(|((series, hr), m)| HourPoint {
            hr,
            series: series.to_string(),
            value: m.value(),
        })
        .collect()
}

/// Wide per-hour aggregate: mean casual and mean registered count.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyUsage {
    pub hr: u8,
    pub casual: f64,
    pub registered: f64,
}

/// Groups by hour and averages the two rider counts.
/// At most 24 rows, one per hour present, sorted by hour.
pub fn hourly_user_usage<'a, I>(hours: I) -> Vec<HourlyUsage>
where
    I: IntoIterator<Item = &'a HourlyRecord>,
{
    let mut groups: BTreeMap<u8, (Mean, Mean)> = BTreeMap::new();
    for h in hours {
        let (casual, registered) = groups.entry(h.hr).or_default();
        casual.push(h.casual as f64);
        registered.push(h.registered as f64);
    }
    groups
        .into_iter()
        .map(|(hr, (casual, registered))| HourlyUsage {
            hr,
            casual: casual.value(),
            registered: registered.value(),
        })
        .collect()
}

/// Reshapes the wide aggregate into long form: all casual rows, then all
/// registered rows, so `melt(w).len() == 2 * w.len()`.
pub fn melt(wide: &[HourlyUsage]) -> Vec<HourPoint> {
    let casual = wide.iter().map(|u| HourPoint {
        hr: u.hr,
        series: CASUAL.to_string(),
        value: u.casual,
    });
    let registered = wide.iter().map(|u| HourPoint {
        hr: u.hr,
        series: REGISTERED.to_string(),
        value: u.registered,
    });
    casual.chain(registered).collect()
}

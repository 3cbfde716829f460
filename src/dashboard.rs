//! One top-to-bottom run of the dashboard: controls in, filtered view and
//! charts out. Runs share the loaded dataset read-only.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use crate::aggregate::{hourly_means_by_day_type, hourly_user_usage, melt, season_year_means};
use crate::chart::{hourly_line_chart, season_bar_chart, DAY_TYPE_CHART, USER_CHART};
use crate::data::Dataset;
use crate::error::{DashboardError, DashboardResult};
use crate::filter::{DatasetView, DateRange};
use crate::parse_date;

/// The two hourly analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// Q1, workday vs weekend.
    #[default]
    Workday,
    /// Q2, casual vs registered users.
    Users,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Workday, Tab::Users];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Workday => "workday",
            Tab::Users => "users",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Workday => "Q1 answer: workday vs weekend pattern",
            Tab::Users => "Q2 answer: casual vs registered user pattern",
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workday" => Ok(Tab::Workday),
            "users" => Ok(Tab::Users),
            other => Err(format!("unknown tab '{}', expected workday or users", other)),
        }
    }
}

/// State of the interactive controls for one run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Controls {
    /// Endpoints picked in the date control, zero to two of them.
    pub endpoints: Vec<NaiveDate>,
    pub tab: Tab,
    pub show_raw: bool,
}

impl Controls {
    /// Controls of a fresh page: the date control covers `span`.
    pub fn initial(span: Option<(NaiveDate, NaiveDate)>) -> Controls {
        Controls {
            endpoints: default_endpoints(span),
            ..Controls::default()
        }
    }

    pub fn range(&self) -> Option<DateRange> {
        DateRange::from_endpoints(&self.endpoints)
    }
}

fn default_endpoints(span: Option<(NaiveDate, NaiveDate)>) -> Vec<NaiveDate> {
    match span {
        Some((first, last)) => vec![first, last],
        None => Vec::new(),
    }
}

/// Reads the two raw date-control values. Blank values count as not picked;
/// when neither is given the control shows its default, the full `span`.
pub fn resolve_endpoints(
    start: Option<&str>,
    end: Option<&str>,
    span: Option<(NaiveDate, NaiveDate)>,
) -> DashboardResult<Vec<NaiveDate>> {
    if start.is_none() && end.is_none() {
        return Ok(default_endpoints(span));
    }
    let picked: Vec<&str> = [start, end]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    picked
        .into_iter()
        .map(|s| parse_date(s).ok_or_else(|| DashboardError::InvalidDate(s.to_string())))
        .collect()
}

pub fn season_chart(view: &DatasetView<'_>) -> DashboardResult<String> {
    season_bar_chart(&season_year_means(view.day.records()))
}

pub fn workday_chart(view: &DatasetView<'_>) -> DashboardResult<String> {
    hourly_line_chart(&hourly_means_by_day_type(view.hour.records()), &DAY_TYPE_CHART)
}

pub fn users_chart(view: &DatasetView<'_>) -> DashboardResult<String> {
    // re-aggregated from the filtered rows on every run
    let wide = hourly_user_usage(view.hour.records());
    let long = melt(&wide);
    debug!(hours = wide.len(), rows = long.len(), "reshaped hourly user usage");
    hourly_line_chart(&long, &USER_CHART)
}

/// Output of one run, ready for the page.
#[derive(Debug, Clone)]
pub struct DashboardRun<'a> {
    pub controls: Controls,
    /// Bounds of the date control.
    pub span: Option<(NaiveDate, NaiveDate)>,
    /// `None` when the filter was skipped.
    pub range: Option<DateRange>,
    pub view: DatasetView<'a>,
    pub season_chart: String,
    /// Both hourly analyses are drawn whichever tab is selected.
    pub workday_chart: String,
    pub users_chart: String,
}

impl DashboardRun<'_> {
    pub fn hourly_chart(&self, tab: Tab) -> &str {
        match tab {
            Tab::Workday => &self.workday_chart,
            Tab::Users => &self.users_chart,
        }
    }
}

/// Filters, aggregates and draws for the given controls.
pub fn run<'a>(dataset: &'a Dataset, controls: &Controls) -> DashboardResult<DashboardRun<'a>> {
    let span = dataset.day_span();
    let range = controls.range();
    let view = dataset.view(range.as_ref());
    info!(
        range = %range.map_or_else(|| "all".to_string(), |r| r.to_string()),
        tab = controls.tab.as_str(),
        daily_rows = view.day.len(),
        hourly_rows = view.hour.len(),
        "dashboard run"
    );
    let season_chart = season_chart(&view)?;
    let workday_chart = workday_chart(&view)?;
    let users_chart = users_chart(&view)?;
    Ok(DashboardRun {
        controls: controls.clone(),
        span,
        range,
        view,
        season_chart,
        workday_chart,
        users_chart,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn span() -> Option<(NaiveDate, NaiveDate)> {
        Some((ymd(2011, 1, 1), ymd(2012, 12, 31)))
    }

    #[test]
    fn no_values_means_default_span() {
        let e = resolve_endpoints(None, None, span()).unwrap();
        assert_eq!(e, vec![ymd(2011, 1, 1), ymd(2012, 12, 31)]);
    }

    #[test]
    fn blank_values_mean_nothing_picked() {
        let e = resolve_endpoints(Some(""), Some(" "), span()).unwrap();
        assert!(e.is_empty());
    }

    #[test]
    fn one_sided_selection_keeps_one_endpoint() {
        let e = resolve_endpoints(Some("2012-06-01"), Some(""), span()).unwrap();
        assert_eq!(e, vec![ymd(2012, 6, 1)]);
        let c = Controls {
            endpoints: e,
            ..Controls::default()
        };
        assert_eq!(c.range(), None);
    }

    #[test]
    fn bad_date_is_reported() {
        assert!(matches!(
            resolve_endpoints(Some("2012-13-01"), Some("2012-06-30"), span()),
            Err(DashboardError::InvalidDate(_))
        ));
    }

    #[test]
    fn tab_parses_from_text() {
        assert_eq!("users".parse::<Tab>(), Ok(Tab::Users));
        assert_eq!("workday".parse::<Tab>(), Ok(Tab::Workday));
        assert!("other".parse::<Tab>().is_err());
        assert_eq!(Tab::default(), Tab::Workday);
    }

    #[test]
    fn initial_controls_cover_span() {
        let c = Controls::initial(span());
        assert_eq!(c.range(), Some(DateRange::new(ymd(2011, 1, 1), ymd(2012, 12, 31))));
        assert!(!c.show_raw);
        assert!(Controls::initial(None).endpoints.is_empty());
    }
}

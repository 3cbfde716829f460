//! HTML page of a dashboard run.
//!
//! The page is the title, the season chart, one panel per hourly analysis
//! (chart plus insight, only the selected tab visible when served), the
//! controls and, when the raw checkbox is on, the two filtered tables in full.

use std::fmt;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::dashboard::{Controls, DashboardRun, Tab};
use crate::filter::TableView;
use crate::{DATE_FORMAT, DAY_FILE, HOUR_FILE};

pub const PAGE_TITLE: &str = "Bike Sharing Rental Analysis Dashboard (2011-2012)";
pub const CAPTION: &str = "Data Analysis Project - bike sharing dashboard";

const INTRO: &str =
    "This dashboard shows the bike sharing analysis that answers the business questions.";
const SEASON_HEADER: &str = "Business growth and seasonal pattern";
const SEASON_TEXT: &str = "Average daily rentals by season and year, for the selected date range.";
const HOURLY_HEADER: &str = "Hourly rental patterns";
const RAW_LABEL: &str = "Show raw data (filtered)";

const WORKDAY_QUESTION: &str = "Q1: How do rentals differ between workdays and weekends?";
const WORKDAY_INSIGHT: &[&str] = &[
    "Workday (commuter pattern): two clear peaks at 8 am and at 5-6 pm, \
     matching the trips to and from the office.",
    "Weekend (leisure pattern): one broad peak around midday (10 am - 4 pm), \
     matching leisure hours.",
];
const USERS_QUESTION: &str = "Q2: How do casual and registered users behave differently?";
const USERS_INSIGHT: &[&str] = &[
    "Registered users (commuters): their pattern matches the commuter pattern, \
     confirming they are commuters.",
    "Casual users (leisure): their pattern matches the leisure pattern, \
     confirming they ride for leisure.",
];

const STYLE: &str = "\
body{font-family:sans-serif;margin:0;display:flex}\
aside{width:260px;padding:16px;background:#f0f2f6;min-height:100vh}\
main{flex:1;padding:16px 32px}\
nav a{display:inline-block;padding:8px 16px;margin-right:4px;border-bottom:3px solid transparent}\
nav .active{border-bottom-color:#ff4b4b;font-weight:bold}\
figure{margin:0}figure svg{width:100%;height:auto}\
table{border-collapse:collapse;font-size:12px}td,th{border:1px solid #ddd;padding:2px 6px}\
.error{color:#b00020}";

/// Whether the page carries working controls (served) or is a static snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    Interactive,
    Static,
}

/// HTML-escaped text.
pub struct Escaped<'s>(pub &'s str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                c => write!(f, "{}", c)?,
            }
        }
        Ok(())
    }
}

fn fmt_date(d: Option<&NaiveDate>) -> String {
    d.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Query string that reproduces `controls` with `tab` selected.
pub fn query_string(controls: &Controls, tab: Tab) -> String {
    let mut q = format!(
        "start={}&end={}&tab={}",
        fmt_date(controls.endpoints.first()),
        fmt_date(controls.endpoints.get(1)),
        tab.as_str()
    );
    if controls.show_raw {
        q.push_str("&raw=on");
    }
    q
}

pub struct Page<'r, 'a> {
    pub run: &'r DashboardRun<'a>,
    pub mode: PageMode,
}

impl<'r, 'a> Page<'r, 'a> {
    pub fn new(run: &'r DashboardRun<'a>, mode: PageMode) -> Page<'r, 'a> {
        Page { run, mode }
    }

    fn write_controls(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.run.controls;
        let (min, max) = match self.run.span {
            Some((first, last)) => (fmt_date(Some(&first)), fmt_date(Some(&last))),
            None => (String::new(), String::new()),
        };
        writeln!(f, "<aside><h2>Filter data</h2>")?;
        if self.mode == PageMode::Static {
            match self.run.range {
                Some(r) => writeln!(f, "<p>Date range: {} to {}</p>", r.start, r.end)?,
                None => writeln!(f, "<p>Date range: all data</p>")?,
            }
            return writeln!(f, "</aside>");
        }
        writeln!(f, "<form method=\"get\" action=\"/\">")?;
        writeln!(f, "<p>Pick a date range:</p>")?;
        for (name, value) in [("start", c.endpoints.first()), ("end", c.endpoints.get(1))] {
            writeln!(
                f,
                "<p><input type=\"date\" name=\"{}\" value=\"{}\" min=\"{}\" max=\"{}\"></p>",
                name,
                fmt_date(value),
                min,
                max
            )?;
        }
        writeln!(
            f,
            "<input type=\"hidden\" name=\"tab\" value=\"{}\">",
            c.tab.as_str()
        )?;
        writeln!(
            f,
            "<p><label><input type=\"checkbox\" name=\"raw\"{}> {}</label></p>",
            if c.show_raw { " checked" } else { "" },
            RAW_LABEL
        )?;
        writeln!(f, "<p><button type=\"submit\">Apply</button></p></form>")?;
        writeln!(
            f,
            "<form method=\"post\" action=\"/reload\"><button type=\"submit\">Reload data</button></form>"
        )?;
        writeln!(f, "</aside>")
    }

    fn write_tabs(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.run.controls;
        if self.mode == PageMode::Interactive {
            write!(f, "<nav>")?;
            for tab in Tab::ALL {
                let class = if tab == c.tab { " class=\"active\"" } else { "" };
                write!(
                    f,
                    "<a href=\"/?{}\"{}>{}</a>",
                    Escaped(&query_string(c, tab)),
                    class,
                    tab.title()
                )?;
            }
            writeln!(f, "</nav>")?;
        }
        // a snapshot has no working tab strip, so it shows both panels
        for tab in Tab::ALL {
            let hidden = self.mode == PageMode::Interactive && tab != c.tab;
            writeln!(
                f,
                "<section id=\"tab-{}\"{}>",
                tab.as_str(),
                if hidden { " hidden" } else { "" }
            )?;
            let (question, insight) = match tab {
                Tab::Workday => (WORKDAY_QUESTION, WORKDAY_INSIGHT),
                Tab::Users => (USERS_QUESTION, USERS_INSIGHT),
            };
            writeln!(f, "<h3>{}</h3>", question)?;
            writeln!(f, "<figure>{}</figure>", self.run.hourly_chart(tab))?;
            writeln!(
                f,
                "<div class=\"insight\"><p><strong>Insight ({}):</strong></p><ul>",
                tab.title()
            )?;
            for line in insight {
                writeln!(f, "<li>{}</li>", line)?;
            }
            writeln!(f, "</ul></div></section>")?;
        }
        Ok(())
    }
}

fn write_table<R>(f: &mut fmt::Formatter<'_>, title: &str, view: &TableView<'_, R>) -> fmt::Result {
    writeln!(f, "<h3>{} ({} rows)</h3>", Escaped(title), view.len())?;
    writeln!(f, "<table><thead>")?;
    write_row(f, "th", &view.table.headers)?;
    writeln!(f, "</thead><tbody>")?;
    for row in view.raw() {
        write_row(f, "td", row)?;
    }
    writeln!(f, "</tbody></table>")
}

fn write_row(f: &mut fmt::Formatter<'_>, cell: &str, row: &StringRecord) -> fmt::Result {
    write!(f, "<tr>")?;
    for v in row.iter() {
        write!(f, "<{0}>{1}</{0}>", cell, Escaped(v))?;
    }
    writeln!(f, "</tr>")
}

impl fmt::Display for Page<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"en\"><head><meta charset=\"utf-8\">")?;
        writeln!(f, "<title>{}</title><style>{}</style></head><body>", PAGE_TITLE, STYLE)?;
        self.write_controls(f)?;
        writeln!(f, "<main>")?;
        writeln!(f, "<h1>&#128690; {}</h1>", PAGE_TITLE)?;
        writeln!(f, "<p>{}</p><hr>", INTRO)?;
        writeln!(f, "<h2>{}</h2><p>{}</p>", SEASON_HEADER, SEASON_TEXT)?;
        writeln!(f, "<figure>{}</figure><hr>", self.run.season_chart)?;
        writeln!(f, "<h2>{}</h2>", HOURLY_HEADER)?;
        self.write_tabs(f)?;
        writeln!(f, "<hr>")?;
        if self.run.controls.show_raw {
            write_table(f, &format!("Daily data ({})", DAY_FILE), &self.run.view.day)?;
            write_table(f, &format!("Hourly data ({})", HOUR_FILE), &self.run.view.hour)?;
        }
        writeln!(f, "<p><small>{}</small></p>", CAPTION)?;
        writeln!(f, "</main></body></html>")
    }
}

/// Page shown instead of the dashboard when a run cannot be rendered.
pub fn error_page(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title>\
         <style>{}</style></head><body><main><h1>{}</h1><p class=\"error\">{}</p></main></body></html>\n",
        PAGE_TITLE,
        STYLE,
        PAGE_TITLE,
        Escaped(message)
    )
}

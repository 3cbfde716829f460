//! SVG charts drawn with plotters into in-memory strings.
//!
//! Every chart is a pure function of its aggregate. Category values are
//! colored through a fixed palette, and a value missing from the palette
//! fails the render. An empty aggregate still gives a chart, with axes and
//! no series.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use crate::aggregate::{HourPoint, SeasonYearMean};
use crate::error::{DashboardError, DashboardResult};
use crate::{CASUAL, REGISTERED, WEEKEND, WORKDAY};

pub const CHART_SIZE: (u32, u32) = (1400, 700);

const FONT: &str = "sans-serif";

/// Fixed label-to-color mapping of one chart, with the legend title.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub name: &'static str,
    pub legend_title: &'static str,
    pub entries: &'static [(&'static str, RGBColor)],
}

impl Palette {
    pub fn color(&self, label: &str) -> DashboardResult<RGBColor> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, c)| *c)
            .ok_or_else(|| DashboardError::UnmappedCategory {
                label: label.to_string(),
                palette: self.name,
            })
    }
}

const BLUE_C0: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
const ORANGE_C1: RGBColor = RGBColor(0xff, 0x7f, 0x0e);
const GREEN_C2: RGBColor = RGBColor(0x2c, 0xa0, 0x2c);
const PURPLE_C4: RGBColor = RGBColor(0x94, 0x67, 0xbd);

pub const YEAR_PALETTE: Palette = Palette {
    name: "year",
    legend_title: "Year",
    entries: &[("2011", BLUE_C0), ("2012", ORANGE_C1)],
};

pub const DAY_TYPE_PALETTE: Palette = Palette {
    name: "day type",
    legend_title: "Day type",
    entries: &[(WORKDAY, BLUE_C0), (WEEKEND, ORANGE_C1)],
};

pub const USER_PALETTE: Palette = Palette {
    name: "user type",
    legend_title: "User type",
    entries: &[(CASUAL, GREEN_C2), (REGISTERED, PURPLE_C4)],
};

/// Fixed texts of an hourly line chart.
#[derive(Debug, Clone, Copy)]
pub struct LineChartSpec {
    pub title: &'static str,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
    pub palette: Palette,
}

pub const DAY_TYPE_CHART: LineChartSpec = LineChartSpec {
    title: "Hourly rentals: \"commuter pattern\" vs \"leisure pattern\"",
    x_desc: "Hour of day (hr)",
    y_desc: "Average number of rentals",
    palette: DAY_TYPE_PALETTE,
};

pub const USER_CHART: LineChartSpec = LineChartSpec {
    title: "\"Registered\" (commuter) vs \"casual\" (leisure) users",
    x_desc: "Hour of day (hr)",
    y_desc: "Average number of rentals",
    palette: USER_PALETTE,
};

pub const SEASON_TITLE: &str = "Average daily rentals per season";
pub const SEASON_X_DESC: &str = "Season";
pub const SEASON_Y_DESC: &str = "Average daily rentals (cnt)";

/// Upper bound of the y axis: 10% headroom, at least 1 so an empty chart keeps a valid axis.
fn y_upper<I: Iterator<Item = f64>>(values: I) -> f64 {
    let max = values.filter(|v| v.is_finite()).fold(0f64, f64::max);
    if max > 0. {
        max * 1.1
    } else {
        1.
    }
}

fn push_unique<'a>(v: &mut Vec<&'a str>, s: &'a str) {
    if !v.contains(&s) {
        v.push(s);
    }
}

/// Grouped bar chart of the mean daily count: one group per season,
/// one bar per year inside each group.
pub fn season_bar_chart(groups: &[SeasonYearMean]) -> DashboardResult<String> {
    let mut seasons: Vec<&str> = Vec::new();
    let mut years: Vec<&str> = Vec::new();
    for g in groups {
        push_unique(&mut seasons, &g.season);
        push_unique(&mut years, &g.year);
    }
    let colors = years
        .iter()
        .map(|y| Ok((*y, YEAR_PALETTE.color(y)?)))
        .collect::<DashboardResult<Vec<(&str, RGBColor)>>>()?;

    let xmax = seasons.len().max(1) as f64;
    let ymax = y_upper(groups.iter().map(|g| g.mean_cnt));
    let bar_width = 0.8 / years.len().max(1) as f64;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(SEASON_TITLE, (FONT, 28))
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(100)
            .build_cartesian_2d(0f64..xmax, 0f64..ymax)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(&TRANSPARENT)
            .bold_line_style(RGBColor(150, 150, 150).stroke_width(1))
            .label_style((FONT, 18))
            .x_label_formatter(&|_: &f64| String::new())
            .y_label_formatter(&|y: &f64| format!("{:.0}", y))
            .x_desc(SEASON_X_DESC)
            .y_desc(SEASON_Y_DESC)
            .draw()?;

        // seasons are categories, so their labels sit under the group centers
        let label_style =
            TextStyle::from((FONT, 18).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
        for (i, season) in seasons.iter().enumerate() {
            let (px, py) = chart.backend_coord(&(i as f64 + 0.5, 0.));
            root.draw(&Text::new(season.to_string(), (px, py + 8), label_style.clone()))?;
        }

        chart
            .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())?
            .label(YEAR_PALETTE.legend_title);
        for (j, (year, color)) in colors.iter().enumerate() {
            let color = *color;
            let bars = groups.iter().filter(|g| g.year == *year).filter_map(|g| {
                let i = seasons.iter().position(|s| *s == g.season)?;
                let x0 = i as f64 + 0.1 + j as f64 * bar_width;
                Some(Rectangle::new(
                    [(x0, 0.), (x0 + bar_width, g.mean_cnt)],
                    color.filled(),
                ))
            });
            chart
                .draw_series(bars)?
                .label(*year)
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font((FONT, 18))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        root.present()?;
    }
    debug!(groups = groups.len(), "drew season bar chart");
    Ok(svg)
}

/// Line chart over the 24 hours of the day, one line per series in palette order.
pub fn hourly_line_chart(points: &[HourPoint], spec: &LineChartSpec) -> DashboardResult<String> {
    let mut labels: Vec<&str> = Vec::new();
    for p in points {
        push_unique(&mut labels, &p.series);
    }
    for l in &labels {
        spec.palette.color(l)?;
    }
    let ymax = y_upper(points.iter().map(|p| p.value));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        let mut chart = ChartBuilder::on(&root)
            .caption(spec.title, (FONT, 28))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(100)
            .build_cartesian_2d(0i32..23i32, 0f64..ymax)?;
        chart
            .configure_mesh()
            .light_line_style(&TRANSPARENT)
            .bold_line_style(RGBColor(150, 150, 150).stroke_width(1))
            .label_style((FONT, 18))
            .x_labels(24)
            .y_label_formatter(&|y: &f64| format!("{:.0}", y))
            .x_desc(spec.x_desc)
            .y_desc(spec.y_desc)
            .draw()?;

        chart
            .draw_series(std::iter::empty::<Circle<(i32, f64), i32>>())?
            .label(spec.palette.legend_title);
        for (label, color) in spec.palette.entries {
            if !labels.contains(label) {
                continue;
            }
            let color = *color;
            let mut series: Vec<(i32, f64)> = points
                .iter()
                .filter(|p| p.series == *label && p.value.is_finite())
                .map(|p| (p.hr as i32, p.value))
                .collect();
            series.sort_by_key(|(hr, _)| *hr);
            chart
                .draw_series(LineSeries::new(series.iter().copied(), color.stroke_width(3)))?
                .label(*label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
                });
            chart.draw_series(
                series
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 4, color.filled())),
            )?;
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font((FONT, 18))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        root.present()?;
    }
    debug!(title = spec.title, points = points.len(), "drew hourly line chart");
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(hr: u8, series: &str, value: f64) -> HourPoint {
        HourPoint {
            hr,
            series: series.to_string(),
            value,
        }
    }

    #[test]
    fn palette_lookup() {
        assert_eq!(YEAR_PALETTE.color("2012").unwrap(), RGBColor(0xff, 0x7f, 0x0e));
        assert_eq!(USER_PALETTE.color("casual").unwrap(), RGBColor(0x2c, 0xa0, 0x2c));
        assert!(matches!(
            DAY_TYPE_PALETTE.color("Holiday"),
            Err(DashboardError::UnmappedCategory { .. })
        ));
    }

    #[test]
    fn y_upper_has_headroom_and_a_floor() {
        assert!((y_upper(vec![10., 20.].into_iter()) - 22.).abs() < 1e-9);
        assert_eq!(y_upper(Vec::new().into_iter()), 1.);
        assert_eq!(y_upper(vec![f64::NAN].into_iter()), 1.);
    }

    #[test]
    fn bar_chart_is_svg_with_labels() {
        let groups = vec![
            SeasonYearMean {
                season: "Spring".to_string(),
                year: "2011".to_string(),
                mean_cnt: 1200.,
            },
            SeasonYearMean {
                season: "Spring".to_string(),
                year: "2012".to_string(),
                mean_cnt: 2400.,
            },
        ];
        let svg = season_bar_chart(&groups).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Spring"));
        assert!(svg.contains("2011"));
        assert!(svg.contains(SEASON_TITLE));
    }

    #[test]
    fn bar_chart_rejects_year_without_color() {
        let groups = vec![SeasonYearMean {
            season: "Spring".to_string(),
            year: "2013".to_string(),
            mean_cnt: 1.,
        }];
        assert!(matches!(
            season_bar_chart(&groups),
            Err(DashboardError::UnmappedCategory { .. })
        ));
    }

    #[test]
    fn empty_charts_render_without_error() {
        assert!(season_bar_chart(&[]).unwrap().contains("<svg"));
        assert!(hourly_line_chart(&[], &USER_CHART).unwrap().contains("<svg"));
    }

    #[test]
    fn line_chart_draws_known_series() {
        let pts = vec![
            point(7, CASUAL, 3.),
            point(8, CASUAL, 5.),
            point(7, REGISTERED, 30.),
            point(8, REGISTERED, 55.),
        ];
        let svg = hourly_line_chart(&pts, &USER_CHART).unwrap();
        assert!(svg.contains("registered"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn line_chart_rejects_unknown_series() {
        let pts = vec![point(7, "Libur", 3.)];
        assert!(hourly_line_chart(&pts, &DAY_TYPE_CHART).is_err());
    }
}

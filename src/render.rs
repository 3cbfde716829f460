use super::VERSION;
use crate::dashboard::{self, resolve_endpoints, Controls, Tab};
use crate::data::Dataset;
use crate::error::DashboardResult;
use crate::page::{Page, PageMode};
use clap::{value_t, App, Arg, ArgMatches};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub const DATA_DIR_ENV: &str = "BIKESHARE_DATA_DIR";

/// Settings of a one-shot render of the dashboard page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderArgs {
    pub data_dir: PathBuf,
    pub html_out: PathBuf,
    pub svg_dir: Option<PathBuf>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub tab: Tab,
    pub raw: bool,
    pub verbose: bool,
}

/// The data directory argument, shared with the server app.
pub fn arg_data_dir<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("data_dir")
        .help("folder holding day_cleaned.csv and hour_cleaned.csv")
        .short("d")
        .long("datadir")
        .takes_value(true)
        .env(DATA_DIR_ENV)
        .default_value(".")
}

pub fn arg_verbose<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("verbose")
        .help("print debug information")
        .short("v")
        .long("verbose")
        .takes_value(false)
}

fn render_app<'a, 'b>() -> App<'a, 'b> {
    let arg_htmlout = Arg::with_name("output_htmlfile")
        .help("name of the output html file")
        .short("o")
        .long("htmlfile")
        .takes_value(true)
        .default_value("dashboard.html");
    let arg_svgdir = Arg::with_name("svg_dir")
        .help("also write each chart as an svg file in this folder")
        .long("svgdir")
        .takes_value(true);
    let arg_start = Arg::with_name("start")
        .help("first date of the range, YYYY-MM-DD")
        .short("s")
        .long("start")
        .takes_value(true);
    let arg_end = Arg::with_name("end")
        .help("last date of the range, YYYY-MM-DD")
        .short("e")
        .long("end")
        .takes_value(true);
    let arg_tab = Arg::with_name("tab")
        .help("hourly analysis shown on the page")
        .short("t")
        .long("tab")
        .takes_value(true)
        .possible_values(&["workday", "users"])
        .default_value("workday");
    let arg_raw = Arg::with_name("raw")
        .help("include the filtered raw tables")
        .short("r")
        .long("raw")
        .takes_value(false);
    App::new("Bikeshare_render")
        .version(VERSION.unwrap_or("unknown"))
        .about("cli app to render the bike sharing dashboard to html")
        .arg(arg_data_dir())
        .arg(arg_htmlout)
        .arg(arg_svgdir)
        .arg(arg_start)
        .arg(arg_end)
        .arg(arg_tab)
        .arg(arg_raw)
        .arg(arg_verbose())
}

fn render_args(cli_args: &ArgMatches) -> Result<RenderArgs, clap::Error> {
    Ok(RenderArgs {
        data_dir: PathBuf::from(cli_args.value_of("data_dir").unwrap_or(".")),
        html_out: PathBuf::from(
            cli_args
                .value_of("output_htmlfile")
                .unwrap_or("dashboard.html"),
        ),
        svg_dir: cli_args.value_of("svg_dir").map(PathBuf::from),
        start: cli_args.value_of("start").map(String::from),
        end: cli_args.value_of("end").map(String::from),
        tab: value_t!(cli_args, "tab", Tab)?,
        raw: cli_args.is_present("raw"),
        verbose: cli_args.is_present("verbose"),
    })
}

pub fn parse_args<I, T>(args: I) -> Result<RenderArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli_args = render_app().get_matches_from_safe(args)?;
    render_args(&cli_args)
}

/// Takes the CLI arguments that control the page rendering; exits on bad arguments.
pub fn parse_cli() -> RenderArgs {
    parse_args(std::env::args_os()).unwrap_or_else(|e| e.exit())
}

/// Loads the data, runs the dashboard once and writes the page, plus the
/// three charts when an svg folder is given. Nothing is written if loading fails.
pub fn render_to_files(args: &RenderArgs) -> DashboardResult<()> {
    let dataset = Dataset::load(&args.data_dir)?;
    let controls = Controls {
        endpoints: resolve_endpoints(
            args.start.as_deref(),
            args.end.as_deref(),
            dataset.day_span(),
        )?,
        tab: args.tab,
        show_raw: args.raw,
    };
    let run = dashboard::run(&dataset, &controls)?;
    let html = Page::new(&run, PageMode::Static).to_string();
    if let Some(svg_dir) = &args.svg_dir {
        fs::create_dir_all(svg_dir)?;
        let charts = [
            ("season.svg", &run.season_chart),
            ("workday.svg", &run.workday_chart),
            ("users.svg", &run.users_chart),
        ];
        for (name, svg) in charts.iter() {
            let path = svg_dir.join(name);
            fs::write(&path, svg)?;
            info!("wrote chart {}", path.display());
        }
    }
    fs::write(&args.html_out, html)?;
    info!("wrote dashboard page {}", args.html_out.display());
    Ok(())
}

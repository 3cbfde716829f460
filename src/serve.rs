use super::VERSION;
use crate::render::{arg_data_dir, arg_verbose};
use clap::{value_t, App, Arg};
use std::ffi::OsString;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Settings of the dashboard server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServeArgs {
    pub data_dir: PathBuf,
    pub addr: SocketAddr,
    pub verbose: bool,
}

pub fn parse_args<I, T>(args: I) -> Result<ServeArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let arg_host = Arg::with_name("host")
        .help("address to bind to")
        .long("host")
        .takes_value(true)
        .default_value("127.0.0.1");
    let arg_port = Arg::with_name("port")
        .help("port to listen on")
        .short("p")
        .long("port")
        .takes_value(true)
        .default_value("8501");
    let cli_args = App::new("Bikeshare_serve")
        .version(VERSION.unwrap_or("unknown"))
        .about("interactive bike sharing dashboard served over http")
        .arg(arg_data_dir())
        .arg(arg_host)
        .arg(arg_port)
        .arg(arg_verbose())
        .get_matches_from_safe(args)?;
    let host = value_t!(cli_args, "host", IpAddr)?;
    let port = value_t!(cli_args, "port", u16)?;
    Ok(ServeArgs {
        data_dir: PathBuf::from(cli_args.value_of("data_dir").unwrap_or(".")),
        addr: SocketAddr::new(host, port),
        verbose: cli_args.is_present("verbose"),
    })
}

/// Takes the CLI arguments of the server; exits on bad arguments.
pub fn parse_cli() -> ServeArgs {
    parse_args(std::env::args_os()).unwrap_or_else(|e| e.exit())
}

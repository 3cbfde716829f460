use bikeshare_dash::render::{parse_cli, render_to_files};
use bikeshare_dash::{logging, DashboardError};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args = parse_cli();
    logging::init(args.verbose);
    info!(
        "read data from {} and render to {}",
        args.data_dir.display(),
        args.html_out.display()
    );
    match render_to_files(&args) {
        Ok(()) => Ok(()),
        Err(e @ DashboardError::MissingInput { .. }) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

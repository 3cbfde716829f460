use anyhow::Context;
use bikeshare_dash::serve::parse_cli;
use bikeshare_dash::{logging, web, DashboardError, DataStore};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_cli();
    logging::init(args.verbose);

    let store = DataStore::new(&args.data_dir);
    // load before binding, so a missing file halts without serving anything
    match store.get() {
        Ok(ds) => info!(
            "serving {} daily and {} hourly rows from {}",
            ds.day.len(),
            ds.hour.len(),
            args.data_dir.display()
        ),
        Err(e @ DashboardError::MissingInput { .. }) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("could not load the rental data"),
    }

    web::run_server(store, args.addr).await
}

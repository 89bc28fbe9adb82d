use std::error::Error;
use std::path::PathBuf;
use std::process;

use dotenv::dotenv;
use log::{error, info, initialize_logger};
use structopt::StructOpt;

use listings::config::get_variable_or;
use listings::environment::DEFAULT_DATA_PATH;
use listings::store::{JsonFileStore, Store};
use listings::validation::validate;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "check-listings",
    about = "Check a listings source file and print every invariant it breaks"
)]
struct Opt {
    /// The source file to check (defaults to LISTINGS_DATA_PATH)
    #[structopt(parse(from_os_str))]
    path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let opt = Opt::from_args();

    let logger = initialize_logger();

    let path = opt
        .path
        .unwrap_or_else(|| get_variable_or("LISTINGS_DATA_PATH", DEFAULT_DATA_PATH).into());

    info!(logger, "Checking listings..."; "path" => %path.display());

    let store = JsonFileStore::new(path);
    let listings = store.load().await?;
    let violations = validate(&listings);

    if violations.is_empty() {
        println!("{} listings, no problems found", listings.len());
        return Ok(());
    }

    for violation in &violations {
        error!(logger, "Invalid listing"; "id" => &violation.id, "problem" => ?violation.problem);
        println!("{}", violation);
    }

    println!("{} listings, {} problems found", listings.len(), violations.len());

    process::exit(1);
}

use dotenv::dotenv;
use fuelroute::bundle::RequestBundle;
use fuelroute::{compute_route, EngineConfig};
use log::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A `.env` file is optional.
    if dotenv().is_err() {
        eprintln!("No .env file loaded");
    }

    #[cfg(feature = "tracing")]
    fuelroute::util::trace::initialize_tracer();
    #[cfg(not(feature = "tracing"))]
    env_logger::init();

    let path = std::env::args_os()
        .nth(1)
        .ok_or("need a request bundle (*.json) as argument")?;

    info!("Reading request bundle from {}", path.to_string_lossy());
    let json = std::fs::read_to_string(&path)?;

    let config = EngineConfig::from_env()?;
    let (request, dataset) = RequestBundle::from_json(&json)?.into_parts()?;

    let result = compute_route(&request, &dataset, &config)?;
    let missing = result
        .categories
        .values()
        .filter(|category| !category.is_calculated())
        .count();

    if missing > 0 {
        warn!("{missing} categories could not be estimated");
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

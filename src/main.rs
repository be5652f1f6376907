use anyhow::{Context, Result};
use clap::Parser;
use polling_unit_finder::{
    sdk::config::Settings,
    sdk::dataset::PollingUnitStore,
    sdk::export::{write_csv_file, write_json_file, write_route_overlay},
    sdk::query::NearestQuery,
    sdk::rank::ResultSet,
    sdk::refine::CancelToken,
    sdk::resolve::Resolver,
    sdk::routing::provider,
    sdk::util::log::init_logging,
};
use std::path::PathBuf;

/// Find the nearest polling units by real road distance
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Your latitude in decimal degrees
    #[arg(long, default_value_t = 9.082, allow_negative_numbers = true)]
    lat: f64,

    /// Your longitude in decimal degrees
    #[arg(long, default_value_t = 8.6753, allow_negative_numbers = true)]
    lon: f64,

    /// Number of nearest polling units to return
    #[arg(short = 'n', long, default_value_t = 5)]
    count: usize,

    /// GeoJSON file of polling unit points
    #[arg(long, default_value = "geojson/polling_units.geojson")]
    dataset: PathBuf,

    /// Where to write the results table
    #[arg(long, default_value = "nearest_polling_units.csv")]
    csv: PathBuf,

    /// [Optional] Also write the full results as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Rank (1-based) of the polling unit whose route is exported
    #[arg(long, default_value_t = 1)]
    select: usize,

    /// [Optional] Export the route to the polling unit with this name instead of by rank
    #[arg(long, conflicts_with = "select")]
    unit: Option<String>,

    /// Where to write the GeoJSON map overlay of the selected route
    #[arg(long, default_value = "selected_route.geojson")]
    route_out: PathBuf,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // Before init_logging: `.env` may set RUST_LOG.
    dotenvy::dotenv().ok();
    init_logging(cli.verbose);

    // Reject bad input before touching the dataset or the network.
    let query = NearestQuery::new(cli.lat, cli.lon, cli.count).context("Invalid query")?;

    let settings = Settings::from_env().context("Invalid routing configuration")?;
    let provider = provider::from_settings(&settings).context("Failed to build routing client")?;

    let store = PollingUnitStore::load(&cli.dataset)
        .with_context(|| format!("Failed to load polling units from {}", cli.dataset.display()))?;

    let resolver = Resolver::new(&store, provider, settings.workers)?;
    log::info!(
        "Searching for the {} nearest polling units to ({:.5}, {:.5})",
        query.count,
        cli.lat,
        cli.lon
    );
    let results = resolver.resolve(&query, &CancelToken::new())?;

    if results.is_empty() {
        log::warn!("No polling units found near ({:.5}, {:.5})", cli.lat, cli.lon);
        return Ok(());
    }

    print_table(&results);

    write_csv_file(&results, &cli.csv)?;
    log::info!("Results table written to {}", cli.csv.display());

    if let Some(path) = &cli.json {
        write_json_file(&results, path)?;
        log::info!("Results written to {}", path.display());
    }

    let selected = match &cli.unit {
        Some(name) => results.find_by_name(name),
        None => results.rank(cli.select),
    };
    match selected {
        Some(selected) => {
            if selected.route.is_none() {
                log::warn!("No road route found to {}; overlay has markers only", selected.unit.name);
            }
            write_route_overlay(&query.point, selected, &cli.route_out)?;
            log::info!(
                "Route to {} written to {}",
                selected.unit.name,
                cli.route_out.display()
            );
        }
        None => match &cli.unit {
            Some(name) => log::warn!("No polling unit named {:?} in the results; no route exported", name),
            None => log::warn!(
                "--select {} is outside the {} results; no route exported",
                cli.select,
                results.len()
            ),
        },
    }

    Ok(())
}

fn print_table(results: &ResultSet<'_>) {
    println!(
        "{:>4}  {:<40} {:<20} {:<20} {:<12} {:>12} {:>10}",
        "#", "Polling Unit", "Ward", "LGA", "State", "Road (m)", "Time (s)"
    );
    for (idx, c) in results.iter().enumerate() {
        println!(
            "{:>4}  {:<40} {:<20} {:<20} {:<12} {:>12.0} {:>10.0}",
            idx + 1,
            c.unit.name,
            c.unit.ward,
            c.unit.lga,
            c.unit.state,
            c.road_distance_m,
            c.road_duration_s
        );
    }
}

//! plan_route — end-to-end streetlap demo.
//!
//! Resolves a city through Nominatim, fetches its streets from Overpass,
//! plans a coverage route from the given home location, and writes the
//! result as `route.gpx` and `route.aml`.
//!
//! ```text
//! cargo run -p plan_route -- "Fremont, Seattle" --lat 47.6505 --lon -122.3493 --target-km 8
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use sl_core::LatLng;
use sl_osm::FetchClient;
use sl_output::{apple_maps_url, google_maps_url, write_aml_file, write_gpx_file};
use sl_plan::build_efficient_coverage_route;

#[derive(Parser)]
#[command(name = "plan_route", about = "Plan a run-every-street coverage route")]
struct Args {
    /// City to fetch, e.g. "Fremont, Seattle".
    city: String,

    /// Home latitude.
    #[arg(long)]
    lat: f64,

    /// Home longitude.
    #[arg(long)]
    lon: f64,

    /// Target distance in kilometres.
    #[arg(long, default_value_t = 8.0)]
    target_km: f64,

    /// Output directory for route.gpx / route.aml.
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let home = LatLng::new(args.lat, args.lon);

    // 1. Resolve and fetch the city dataset.
    let client = FetchClient::new()?;
    let (resolved, streets) = client.fetch_city_dataset(&args.city).await?;
    println!(
        "Fetched {} runnable street segments for {}",
        streets.len(),
        resolved.display_name
    );

    // 2. Plan the coverage route.
    let route =
        build_efficient_coverage_route(&streets, home, args.target_km, Some(&resolved.bounds))?;
    println!(
        "Planned {:.2} km over {} streets ({} of {} nodes covered)",
        route.distance_km,
        route.street_ids.len(),
        route.node_ids_covered.len(),
        route.available_nodes.len()
    );

    // 3. Write GPX and AML artifacts.
    std::fs::create_dir_all(&args.out_dir)?;
    let created = chrono::Utc::now();
    let gpx_path = args.out_dir.join("route.gpx");
    let aml_path = args.out_dir.join("route.aml");
    write_gpx_file(&gpx_path, &route, created)?;
    write_aml_file(&aml_path, &route, created)?;
    println!("Wrote {} and {}", gpx_path.display(), aml_path.display());

    // 4. Hand-off links.
    if let Some(url) = google_maps_url(&route.points) {
        println!("Google Maps: {url}");
    }
    if let Some(url) = apple_maps_url(&route.points) {
        println!("Apple Maps:  {url}");
    }

    // 5. Street summary.
    println!();
    println!("First streets on the route:");
    println!("{}", "-".repeat(32));
    for name in route.street_names.iter().take(12) {
        println!("  {name}");
    }

    Ok(())
}

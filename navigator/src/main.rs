use std::{sync::Arc, time::Duration};

use clap::Parser;
use geo_types::Point;
use navigator::{display::LogDisplay, navigator::Navigator, tracking::HttpTrackingClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trip_navigator_lib::route::{Route, TravelMode};

#[derive(Parser)]
#[command(name = "Navigator")]
#[command(about = "Simulates live navigation along a booked route", long_about = None)]
struct Cli {
    /// Base URL of the tracking backend
    #[arg(long, default_value = "http://localhost:5000")]
    server: String,

    /// Bearer token for the tracking API
    #[arg(long)]
    token: String,

    /// Source name, e.g. "MG Road"
    #[arg(long)]
    source: String,

    /// Destination name
    #[arg(long)]
    destination: String,

    #[arg(long)]
    source_lat: f64,

    #[arg(long)]
    source_lng: f64,

    #[arg(long)]
    dest_lat: f64,

    #[arg(long)]
    dest_lng: f64,

    /// Route length in km, as precomputed by the route optimizer
    #[arg(long)]
    distance_km: f64,

    /// Predicted travel time in minutes
    #[arg(long)]
    duration_mins: f64,

    #[arg(long, default_value_t = 0.0)]
    speed_kmh: f64,

    /// Travel mode: bike, car, walk, bus, metro, auto or cab
    #[arg(long, default_value = "car")]
    mode: TravelMode,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let route = Route::new(
        cli.source,
        cli.destination,
        Point::new(cli.source_lng, cli.source_lat),
        Point::new(cli.dest_lng, cli.dest_lat),
        cli.distance_km,
        cli.duration_mins,
        cli.speed_kmh,
        cli.mode,
    );

    tracing::info!(
        "{} {} -> {} ({} km, {} mins)",
        route.mode.glyph(),
        route.source,
        route.destination,
        route.distance_km,
        route.duration_mins
    );

    let tracking = Arc::new(HttpTrackingClient::new(cli.server, cli.token));
    let display = Arc::new(LogDisplay);
    let mut nav = Navigator::new(tracking, display);

    nav.start(route).await?;

    while nav.is_navigating() {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(1)) => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping navigation");
                nav.cancel();
                break;
            }
        }
    }

    // Give the best-effort stop call a moment to go out before the runtime
    // shuts down.
    tokio::time::sleep(Duration::from_millis(250)).await;

    Ok(())
}

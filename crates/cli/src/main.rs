use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notdienst_core::config::Settings;
use notdienst_core::domain::pharmacy::{Candidate, GeoPoint};
use notdienst_core::domain::select;
use notdienst_core::format;
use notdienst_core::ingest;
use notdienst_core::ingest::provider::{HttpXmlFeedSource, PharmacyFeedSource};
use notdienst_core::time;

#[derive(Debug, Parser)]
#[command(name = "notdienst_cli")]
struct Args {
    /// User latitude in decimal degrees (WGS-84).
    #[arg(long)]
    lat: Option<f64>,

    /// User longitude in decimal degrees (WGS-84).
    #[arg(long)]
    lon: Option<f64>,

    /// Evaluation time override (YYYY-MM-DDTHH:MM[:SS], local wall clock).
    /// Defaults to the current local time.
    #[arg(long)]
    at: Option<String>,

    /// Print the selected pharmacy as JSON instead of the text summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    if let Err(err) = run(args, &settings).await {
        sentry_anyhow::capture_anyhow(&err);
        return Err(err);
    }
    Ok(())
}

async fn run(args: Args, settings: &Settings) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.lat.is_some() == args.lon.is_some(),
        "--lat and --lon must be provided together"
    );
    let user = args
        .lat
        .zip(args.lon)
        .map(|(lat, lon)| GeoPoint { lat, lon });

    let now = time::resolve_evaluation_time(args.at.as_deref(), time::now_local())?;

    let feed = HttpXmlFeedSource::from_settings(settings)?;
    let entries = feed.fetch_entries().await?;
    let records = ingest::normalize_records(entries);

    tracing::info!(
        source = feed.source_name(),
        records = records.len(),
        %now,
        "evaluating on-call records"
    );

    match select::select_nearest(&records, now, user) {
        Some(candidate) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&candidate)?);
            } else {
                print_summary(&candidate);
            }
        }
        None => {
            println!("No pharmacy is currently on duty.");
        }
    }

    Ok(())
}

fn print_summary(candidate: &Candidate) {
    let r = &candidate.record;
    println!("{}", r.name);
    println!("Adresse:     {}, {} {}", r.street, r.zip_code, r.location);
    println!("Telefon:     {}", r.phone);
    println!(
        "Schichtzeit: {}",
        format::format_shift_window(r.from, r.to)
    );
    if let Some(km) = candidate.distance_km {
        println!("Entfernung:  {} km", format::format_distance_km(km));
    }
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

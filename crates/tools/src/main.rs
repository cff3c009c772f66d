use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use display::{DisplayStore, Overlay, PulseAnimator, StatusMessage, pulse_speed};
use foundation::time::{Clock, FixedClock, SystemClock, Time};
use imagery::{
    DateResolver, ImageryConfig, ImageryFetcher, PlaceholderSet, ProxyClient, SliderPosition,
    UpstreamClient, iso_date, probe, probe_date,
};
use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pulsing Earth imagery pipeline")]
struct Args {
    /// Imagery proxy base URL (default: EARTHPULSE_PROXY_URL or http://localhost:3000)
    #[arg(long)]
    proxy_url: Option<String>,

    /// API key forwarded to the imagery service (default: NASA_API_KEY or DEMO_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Pretend today is this date (YYYY-MM-DD) when clamping slider years
    #[arg(long)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve one slider position to an image and metrics
    Resolve {
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(0..=9))]
        slider: u8,

        /// Write the resolved image as PNG
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run the pulse animation while the slider position resolves
    Animate {
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(0..=9))]
        slider: u8,

        /// Number of frames to run
        #[arg(long, default_value_t = 120)]
        frames: u64,

        /// Print every Nth frame
        #[arg(long, default_value_t = 10)]
        every: u64,
    },

    /// List every image available for a slider position's date
    Gallery {
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(0..=9))]
        slider: u8,
    },

    /// Check connectivity to the upstream imagery API
    Probe {
        /// Seed for the probe date (default: derived from the clock)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write the built-in placeholder planets as PNG files
    Placeholders {
        #[arg(long, default_value = "placeholders")]
        out: PathBuf,

        /// Edge length in pixels (default: EARTHPULSE_PLACEHOLDER_SIZE or 540)
        #[arg(long)]
        size: Option<u32>,
    },
}

#[derive(Debug, Serialize)]
struct ResolveSummary {
    slider: u8,
    target_year: i32,
    query_date: String,
    clamped: bool,
    source_date: String,
    provenance: String,
    degraded: Option<String>,
    centroid: Option<[f64; 2]>,
    width: u32,
    height: u32,
    co2_ppm: f64,
    temperature_c: f64,
    heartbeat: f64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut config = ImageryConfig::from_env();
    if let Some(url) = args.proxy_url {
        config.proxy_url = url;
    }
    if let Some(key) = args.api_key {
        config.api_key = key;
    }
    let clock: Arc<dyn Clock> = match args.today {
        Some(day) => Arc::new(FixedClock(day)),
        None => Arc::new(SystemClock),
    };

    match args.command {
        Command::Resolve { slider, out } => cmd_resolve(&config, clock, slider, out).await,
        Command::Animate {
            slider,
            frames,
            every,
        } => cmd_animate(&config, clock, slider, frames, every).await,
        Command::Gallery { slider } => cmd_gallery(&config, clock, slider).await,
        Command::Probe { seed } => cmd_probe(&config, seed).await,
        Command::Placeholders { out, size } => {
            cmd_placeholders(out, size.unwrap_or(config.placeholder_size))
        }
    }
}

fn slider_position(value: u8) -> Result<SliderPosition, Box<dyn std::error::Error>> {
    SliderPosition::new(value).ok_or_else(|| format!("slider out of range: {value}").into())
}

fn build_fetcher(config: &ImageryConfig, clock: Arc<dyn Clock>) -> ImageryFetcher {
    let source = ProxyClient::from_config(reqwest::Client::new(), config);
    ImageryFetcher::new(
        Arc::new(source),
        DateResolver::new(imagery::BASE_YEAR, clock),
        Arc::new(PlaceholderSet::generate(config.placeholder_size)),
    )
}

async fn cmd_resolve(
    config: &ImageryConfig,
    clock: Arc<dyn Clock>,
    slider: u8,
    out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = build_fetcher(config, clock);
    let res = fetcher.resolve(slider_position(slider)?).await;

    let summary = ResolveSummary {
        slider,
        target_year: res.date.target_year,
        query_date: res.date.iso(),
        clamped: res.date.clamped,
        source_date: iso_date(res.record.source_date),
        provenance: format!("{:?}", res.record.provenance),
        degraded: res.degraded.map(|k| k.to_string()),
        centroid: res.record.centroid.map(|c| [c.lat, c.lon]),
        width: res.record.pixels.width(),
        height: res.record.pixels.height(),
        co2_ppm: res.metrics.co2_ppm,
        temperature_c: res.metrics.temperature_c,
        heartbeat: pulse_speed(Some(&res.metrics)),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(path) = out {
        res.record.pixels.save(&path)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

async fn cmd_animate(
    config: &ImageryConfig,
    clock: Arc<dyn Clock>,
    slider: u8,
    frames: u64,
    every: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let slider = slider_position(slider)?;
    let fetcher = build_fetcher(config, clock);
    let target_year = fetcher.resolver().target_year(slider);

    let mut store = DisplayStore::new();
    let generation = store.begin();
    let (tx, mut rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = tx.send(fetcher.resolve(slider).await);
    });

    let mut animator = PulseAnimator::new();
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / 60.0));
    let every = every.max(1);

    for _ in 0..frames {
        ticker.tick().await;
        if let Ok(res) = rx.try_recv() {
            if store.commit(generation, &res) {
                if res.record.is_real() {
                    info!("display updated with imagery from {}", res.record.source_date);
                } else {
                    warn!("display updated with {:?} imagery", res.record.provenance);
                }
            }
        }

        let state = store.current();
        let frame = animator.tick(state.as_ref().map(|s| &s.metrics));
        if frame.index % every == 0 {
            let overlay = Overlay::compose(state.as_deref(), target_year, frame.speed);
            let image_line = overlay
                .image_date
                .unwrap_or_else(|| display::LOADING_MESSAGE.to_string());
            println!(
                "#{:<5} size={:7.2} rot={:.4} | {} | {} | {} | {}",
                frame.index,
                frame.earth_size,
                frame.rotation,
                overlay.co2_label,
                overlay.temperature_label,
                overlay.heartbeat,
                image_line
            );
        }
    }
    Ok(())
}

async fn cmd_gallery(
    config: &ImageryConfig,
    clock: Arc<dyn Clock>,
    slider: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = ProxyClient::from_config(reqwest::Client::new(), config);
    let endpoints = source.endpoints().clone();
    let fetcher = ImageryFetcher::new(
        Arc::new(source),
        DateResolver::new(imagery::BASE_YEAR, clock),
        Arc::new(PlaceholderSet::generate(1)),
    );

    match fetcher.gallery(slider_position(slider)?).await {
        Ok(gallery) => {
            println!("{}", gallery.summary());
            for entry in &gallery.entries {
                println!("{}  {}", entry.caption(), entry.image_url(&endpoints)?);
            }
            Ok(())
        }
        Err(err) => Err(format!("Error loading images: {err}").into()),
    }
}

async fn cmd_probe(
    config: &ImageryConfig,
    seed: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let seed = seed.unwrap_or_else(|| Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64);
    let date = probe_date(seed);
    eprintln!("{}", StatusMessage::testing(Time(0.0)).lines.join("\n"));

    let client = UpstreamClient::from_config(reqwest::Client::new(), config);
    let outcome = probe(&client, date).await;
    let status = StatusMessage::from_probe(&outcome, Time(0.0));
    for line in &status.lines {
        println!("{line}");
    }
    if outcome.is_success() {
        Ok(())
    } else {
        Err(format!("probe for {} did not return imagery", iso_date(outcome.date())).into())
    }
}

fn cmd_placeholders(out: PathBuf, size: u32) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(&out)?;
    let set = PlaceholderSet::generate(size);
    for (i, img) in set.iter().enumerate() {
        let path = out.join(format!("placeholder_{i}.png"));
        img.save(&path)?;
        eprintln!("wrote {} ({}px)", path.display(), set.size());
    }
    Ok(())
}

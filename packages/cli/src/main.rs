#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the wildfire map toolchain.
//!
//! Every subcommand reads its incident source from the same flags the
//! server reads from the environment (`WILDFIRE_MAP_*`); flags win over
//! environment variables.

mod report;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use geojson::FeatureCollection;
use wildfire_map_fire_models::DisplayMode;
use wildfire_map_geography::{MapView, MapViewSlot, RenderedMap, load_boundaries};
use wildfire_map_index::{build_index, province_counts, summarize};
use wildfire_map_server::ServerConfig;
use wildfire_map_source::{IncidentSource, fetch_or_empty};

/// Container name used for views rendered by the `map` command.
const CLI_MAP_CONTAINER: &str = "cli";

#[derive(Parser)]
#[command(name = "wildfire_map_cli", about = "Wildfire map dashboard toolchain")]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Incident source flags shared by every subcommand.
#[derive(Args)]
struct SourceArgs {
    /// Embedded feed definition id (overrides `WILDFIRE_MAP_FEED`).
    #[arg(long, global = true)]
    feed: Option<String>,
    /// Local JSON snapshot; takes priority over `--feed-url`.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
    /// Upstream feed endpoint.
    #[arg(long, global = true)]
    feed_url: Option<String>,
    /// Open-data service key sent with feed requests.
    #[arg(long, global = true)]
    service_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List indexed regions, ordered by region key
    Regions {
        /// Display color rule (`severity` or `completion_priority`).
        #[arg(long, value_parser = parse_display_mode)]
        mode: Option<DisplayMode>,
    },
    /// Print summary statistics for the current batch
    Summary,
    /// Render styled district boundaries as `GeoJSON`
    Map {
        /// `GeoJSON` boundary file (overrides `WILDFIRE_MAP_BOUNDARIES`).
        #[arg(long)]
        boundaries: Option<PathBuf>,
        /// Display color rule (`severity` or `completion_priority`).
        #[arg(long, value_parser = parse_display_mode)]
        mode: Option<DisplayMode>,
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
        /// Re-fetch and re-render every N seconds until interrupted.
        #[arg(long)]
        watch: Option<u64>,
        /// Feature property holding the region name; repeat to try several
        /// keys in order. Defaults to the Korean `SIG` boundary properties.
        #[arg(long = "name-property")]
        name_properties: Vec<String>,
    },
    /// Start the API server
    Serve {
        /// Listener address (overrides `BIND_ADDR`).
        #[arg(long)]
        bind: Option<String>,
        /// Listener port (overrides `PORT`).
        #[arg(long)]
        port: Option<u16>,
        /// `GeoJSON` boundary file (overrides `WILDFIRE_MAP_BOUNDARIES`).
        #[arg(long)]
        boundaries: Option<PathBuf>,
        /// Default display color rule.
        #[arg(long, value_parser = parse_display_mode)]
        mode: Option<DisplayMode>,
    },
}

fn parse_display_mode(s: &str) -> Result<DisplayMode, String> {
    s.parse()
        .map_err(|_| format!("expected severity or completion_priority, got {s:?}"))
}

impl SourceArgs {
    /// Applies the flags that were given on top of `config`.
    fn apply(self, config: &mut ServerConfig) {
        if let Some(feed) = self.feed {
            config.source.feed = feed;
        }
        if let Some(snapshot) = self.snapshot {
            config.source.snapshot = Some(snapshot);
        }
        if let Some(feed_url) = self.feed_url {
            config.source.feed_url = Some(feed_url);
        }
        if let Some(service_key) = self.service_key {
            config.source.service_key = Some(service_key);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    let mut config = ServerConfig::from_env()?;
    cli.source.apply(&mut config);

    match cli.command {
        Commands::Regions { mode } => {
            let source = config.source.build()?;
            let index = build_index(&fetch_or_empty(source.as_ref()).await);
            let mut out = String::new();
            report::write_regions_table(&mut out, &index, mode.unwrap_or(config.display_mode))?;
            print!("{out}");
        }
        Commands::Summary => {
            let source = config.source.build()?;
            let records = fetch_or_empty(source.as_ref()).await;
            let mut out = String::new();
            report::write_summary(&mut out, &summarize(&records), &province_counts(&records))?;
            print!("{out}");
        }
        Commands::Map {
            boundaries,
            mode,
            output,
            watch,
            name_properties,
        } => {
            let path = boundaries
                .or(config.boundaries)
                .ok_or("No boundaries given: pass --boundaries or set WILDFIRE_MAP_BOUNDARIES")?;
            let source = config.source.build()?;
            let mode = mode.unwrap_or(config.display_mode);
            render_map(
                source.as_ref(),
                &path,
                &MapOptions {
                    mode,
                    name_properties,
                    output,
                    watch: watch.map(Duration::from_secs),
                },
            )
            .await?;
        }
        Commands::Serve {
            bind,
            port,
            boundaries,
            mode,
        } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if boundaries.is_some() {
                config.boundaries = boundaries;
            }
            if let Some(mode) = mode {
                config.display_mode = mode;
            }

            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(wildfire_map_server::run_server(config))
            })
            .await??;
        }
    }

    Ok(())
}

/// Settings for the `map` command.
struct MapOptions {
    mode: DisplayMode,
    name_properties: Vec<String>,
    output: Option<PathBuf>,
    watch: Option<Duration>,
}

impl MapOptions {
    fn create_view(&self, boundaries: &Arc<FeatureCollection>) -> MapView {
        let view = MapView::create(CLI_MAP_CONTAINER, Arc::clone(boundaries));
        if self.name_properties.is_empty() {
            view
        } else {
            view.with_name_properties(self.name_properties.clone())
        }
    }
}

/// Renders the map once, or on every `watch` tick until Ctrl-C.
///
/// Each refresh mounts a fresh view into the slot, which disposes the one
/// from the previous tick.
async fn render_map(
    source: &dyn IncidentSource,
    boundaries: &Path,
    options: &MapOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let boundaries = Arc::new(load_boundaries(boundaries)?);
    let mut slot = MapViewSlot::default();

    loop {
        let index = build_index(&fetch_or_empty(source).await);
        let view = slot.mount(options.create_view(&boundaries));
        let rendered = view.render(&index, options.mode);
        write_map(&rendered, options.output.as_deref()).await?;

        let Some(interval) = options.watch else {
            break;
        };

        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            result = tokio::signal::ctrl_c() => {
                result?;
                log::info!("Interrupted; stopping map refresh");
                break;
            }
        }
    }

    slot.unmount();
    Ok(())
}

async fn write_map(
    rendered: &RenderedMap,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(&rendered.features)?;

    match output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            log::info!(
                "Wrote {} ({} of {} features matched)",
                path.display(),
                rendered.matched_features,
                rendered.features.features.len(),
            );
        }
        None => println!("{json}"),
    }

    if !rendered.unmatched_regions.is_empty() {
        log::warn!(
            "{} regions have no boundary feature: {}",
            rendered.unmatched_regions.len(),
            rendered.unmatched_regions.join(", ")
        );
    }

    Ok(())
}

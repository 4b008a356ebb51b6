mod display;
mod pipeline;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use clap::{Args, Parser, Subcommand, ValueEnum};
use opsdash_core::{DashboardConfig, FilterSpec, HeaderMatch, Status, filter};
use opsdash_export::ExportFormat;
use opsdash_map::{BaseMap, CenterMode, RenderOptions};
use opsdash_sync::DatasetLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "opsdash", version, about = "Facility operations dashboard")]
struct Cli {
    /// Secrets file holding DATA_CSV_URL and optional tunables.
    #[arg(long, global = true, value_name = "PATH")]
    secrets: Option<PathBuf>,

    /// CSV export URL; overrides the secrets file and environment.
    #[arg(long, global = true)]
    url: Option<String>,

    /// Match column headers ignoring case and surrounding whitespace.
    #[arg(long, global = true)]
    case_insensitive_headers: bool,

    #[command(flatten)]
    filters: FilterArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct FilterArgs {
    /// Keep only these statuses (repeatable).
    #[arg(long = "status", global = true, value_parser = parse_status)]
    statuses: Vec<Status>,

    /// Keep only these floors/zones (repeatable).
    #[arg(long = "zone", global = true)]
    zones: Vec<String>,

    /// Job order number search; when set, status and zone filters are ignored.
    #[arg(long, global = true)]
    search: Option<String>,
}

impl FilterArgs {
    fn into_spec(self) -> FilterSpec {
        let spec = FilterSpec::default()
            .with_statuses(self.statuses)
            .with_zones(self.zones);
        match self.search {
            Some(term) => spec.with_search(term),
            None => spec,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Show KPIs, filter options and matching rows.
    Summary {
        /// Maximum table rows to print.
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Render the map description as JSON.
    Map {
        #[arg(long, default_value_t = BaseMap::default())]
        basemap: BaseMap,

        /// Add a heat layer of record density.
        #[arg(long)]
        heat: bool,

        #[arg(long, default_value_t = CenterMode::default())]
        center: CenterMode,

        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write the filtered rows as CSV and/or XLSX.
    Export {
        #[arg(long, value_enum, default_value_t = FormatChoice::Both)]
        format: FormatChoice,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Refresh on a timer and print KPIs with data freshness.
    Watch {
        /// Seconds between refreshes (defaults to the configured interval).
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,

        /// Stop after this many refreshes.
        #[arg(long)]
        ticks: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatChoice {
    Csv,
    Xlsx,
    Both,
}

impl FormatChoice {
    fn formats(self) -> &'static [ExportFormat] {
        match self {
            Self::Csv => &[ExportFormat::Csv],
            Self::Xlsx => &[ExportFormat::Xlsx],
            Self::Both => &ExportFormat::ALL,
        }
    }
}

fn parse_status(s: &str) -> Result<Status, String> {
    Status::from_label(s).ok_or_else(|| {
        let known: Vec<&str> = Status::ALL.iter().map(|s| s.label()).collect();
        format!("unknown status '{s}' (expected one of: {})", known.join(", "))
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let header_match = if cli.case_insensitive_headers {
        HeaderMatch::CaseInsensitive
    } else {
        HeaderMatch::Exact
    };
    let config = DashboardConfig::load(cli.secrets.as_deref())?
        .with_override(cli.url)
        .with_header_match(header_match);
    info!(
        url = %config.source_url,
        source = ?config.source,
        "opsdash v{}",
        env!("CARGO_PKG_VERSION")
    );

    let spec = cli.filters.into_spec();
    let loader = DatasetLoader::from_config(&config)?;
    let url = config.source_url.as_str();

    match cli.command {
        Command::Summary { limit } => {
            let dataset = loader.load(url).await?;
            let dashboard = pipeline::run(&dataset, &spec, &RenderOptions::default());
            display::print_summary(&dataset, &spec, &dashboard.view, &dashboard.kpis, limit)?;
        }
        Command::Map {
            basemap,
            heat,
            center,
            out,
        } => {
            let dataset = loader.load(url).await?;
            let options = RenderOptions {
                base_map: basemap,
                heat,
                center,
            };
            let dashboard = pipeline::run(&dataset, &spec, &options);
            let json = dashboard.map.to_json()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    info!(path = %path.display(), markers = dashboard.map.markers().len(), "wrote map");
                }
                None => println!("{json}"),
            }
        }
        Command::Export { format, out_dir } => {
            let dataset = loader.load(url).await?;
            let view = filter(&dataset, &spec);
            for path in pipeline::export_all(&view, &spec, format.formats(), &out_dir)? {
                println!("{}", path.display());
            }
        }
        Command::Watch { interval, ticks } => {
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or(config.refresh_interval);
            if interval.is_zero() {
                bail!("refresh interval must be positive");
            }
            pipeline::watch(&loader, url, &spec, interval, ticks, display::print_tick).await;
        }
    }

    Ok(())
}

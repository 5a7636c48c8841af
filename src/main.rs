use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use comitia::calendar;
use comitia::centers::{CandidateFilter, CenterCache, CenterClient, CenterDirectory, CenterFilter};
use comitia::config::Config;
use comitia::geo::format_coords;
use comitia::location::{locate, CachedProvider, ChainProvider, IpProvider, ManualProvider};
use comitia::nearest;

/// Comitia — find your voting center for the 2026 general elections.
///
/// Examples:
///   comitia nearest --lat -12.0464 --lon -77.0428
///   comitia nearest --auto --top 3
///   comitia nearest --dni 45678912 --auto
///   comitia centers --distrito Miraflores
///   comitia mesas 12
///   comitia candidates --cargo Senador --region Lima
///   comitia calendar
///   comitia serve --port 8080
#[derive(Parser)]
#[command(name = "comitia", version, about, long_about = None)]
struct Cli {
    /// Election backend base URL.
    #[arg(long, global = true, env = "COMITIA_API_URL")]
    api_url: Option<String>,

    /// Offline mode: only use the local cache.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the voting center closest to you.
    Nearest(NearestArgs),
    /// List voting centers.
    Centers {
        #[arg(long)]
        distrito: Option<String>,
        #[arg(long)]
        nombre: Option<String>,
        /// Elector DNI.
        #[arg(long)]
        dni: Option<String>,
    },
    /// Show a voting center and its tables.
    Mesas {
        /// Center identifier.
        center_id: String,
    },
    /// List registered political parties.
    Parties,
    /// List candidates, or show one candidate in full.
    Candidates {
        /// Candidate identifier; prints the full record.
        id: Option<String>,
        #[arg(long)]
        region: Option<String>,
        /// Office (e.g. Presidente, Senador, Diputado).
        #[arg(long)]
        cargo: Option<String>,
        /// Party or alliance identifier.
        #[arg(long)]
        agrupacion: Option<i64>,
    },
    /// Show the electoral calendar.
    Calendar {
        /// Show table-member dates instead of general dates.
        #[arg(long)]
        members: bool,
        /// Include past events.
        #[arg(long)]
        all: bool,
        /// Reference date (YYYY-MM-DD). Defaults to today in Lima.
        #[arg(long, short = 'd')]
        date: Option<String>,
    },
    /// Run the HTTP API.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args)]
struct NearestArgs {
    /// Latitude (-90 to 90).
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// Longitude (-180 to 180).
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Auto-detect position via IP geolocation.
    #[arg(long, short = 'a')]
    auto: bool,

    /// Only consider centers in this district.
    #[arg(long)]
    distrito: Option<String>,

    /// Only consider the center assigned to this elector DNI.
    #[arg(long)]
    dni: Option<String>,

    /// Also list the N closest centers.
    #[arg(long)]
    top: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("comitia=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()
        .with_api_url(cli.api_url.clone())
        .with_offline(cli.offline);

    let client = CenterClient::new(&config.api_base_url, config.http_timeout);
    let mut directory = CenterDirectory::new(client, CenterCache::load(&config.cache_dir));
    directory.set_offline(config.offline);

    match cli.command {
        Command::Nearest(args) => run_nearest(&args, &config, &directory),
        Command::Centers { distrito, nombre, dni } => {
            let listing = directory.list(&CenterFilter { distrito, nombre, dni })?;
            eprintln!("  {} voting centers ({})", listing.centers.len(), listing.source);
            print_json(&listing.centers)
        }
        Command::Mesas { center_id } => {
            if config.offline {
                bail!("Voting tables are not cached; run without --offline");
            }
            let detail = directory.client().center_detail(&center_id)?;
            eprintln!("  {} \u{2014} {} tables", detail.center.name, detail.mesas.len());
            print_json(&detail)
        }
        Command::Parties => {
            if config.offline {
                bail!("Political parties are not cached; run without --offline");
            }
            let parties = directory.client().list_parties()?;
            print_json(&parties)
        }
        Command::Candidates { id, region, cargo, agrupacion } => {
            if config.offline {
                bail!("Candidates are not cached; run without --offline");
            }
            match id {
                Some(id) => print_json(&directory.client().get_candidate(&id)?),
                None => {
                    let filter = CandidateFilter { region, cargo, id_agrupacion: agrupacion };
                    let candidates = directory.client().list_candidates(&filter)?;
                    eprintln!("  {} candidates", candidates.len());
                    print_json(&candidates)
                }
            }
        }
        Command::Calendar { members, all, date } => run_calendar(members, all, date.as_deref()),
        Command::Serve { host, port } => {
            let runtime = tokio::runtime::Runtime::new().context("cannot start async runtime")?;
            runtime
                .block_on(comitia::server::start(&host, port, directory))
                .with_context(|| format!("server on {}:{} failed", host, port))
        }
    }
}

fn run_nearest(args: &NearestArgs, config: &Config, directory: &CenterDirectory) -> Result<()> {
    // Priority: --lat/--lon > --auto > last known position
    let mut chain = ChainProvider::new();
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        chain = chain.with(ManualProvider::new(lat, lon));
    } else if args.auto && !config.offline {
        chain = chain.with(IpProvider::new(config.http_timeout));
    }
    chain = chain.with(CachedProvider::new(directory.last_origin()));

    let Some(origin) = locate(&chain) else {
        bail!("No origin available. Use --lat/--lon or --auto.");
    };
    directory.remember_origin(origin.point);

    let filter = CenterFilter {
        distrito: args.distrito.clone(),
        dni: args.dni.clone(),
        ..Default::default()
    };
    let listing = directory.list(&filter)?;

    eprintln!(
        "  \u{1F4CD} {} ({}{})",
        origin.point,
        origin.source,
        origin.label.as_deref().map(|l| format!(", {}", l)).unwrap_or_default(),
    );

    let best = nearest::resolve(origin.point, &listing.centers);
    match &best {
        Some(best) => {
            let coords = best
                .center
                .location
                .map(|p| format_coords(p.latitude, p.longitude))
                .unwrap_or_default();
            eprintln!("  \u{1F5F3}\u{FE0F}  {} \u{2014} {:.2} km", best.center.name, best.distance_km);
            eprintln!("  \u{1F4D0} {}", coords);
        }
        None => eprintln!("  No voting center found."),
    }

    let ranked = match args.top {
        Some(n) if n > 0 => nearest::rank(origin.point, &listing.centers, n),
        _ => Vec::new(),
    };
    let output = serde_json::json!({
        "origin": origin,
        "nearest": best,
        "ranked": ranked,
        "source": listing.source,
    });
    print_json(&output)
}

fn run_calendar(members: bool, all: bool, date: Option<&str>) -> Result<()> {
    let today = match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}'", d))?,
        None => calendar::today_in_lima(),
    };

    if let Some(next) = calendar::next_election_day(today) {
        let days = (next.date - today).num_days();
        eprintln!("  \u{1F5F3}\u{FE0F}  {} {} (in {} days)", next.date.format("%d/%m/%Y"), next.event, days);
    }

    if members {
        let events: Vec<_> = calendar::member_events()
            .into_iter()
            .filter(|e| all || e.date >= today)
            .collect();
        print_json(&events)
    } else if all {
        print_json(&calendar::general_events())
    } else {
        print_json(&calendar::upcoming(today))
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

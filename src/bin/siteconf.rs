use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use siteconf::{ConfigContext, EnvOverrides};

#[derive(Parser)]
#[command(name = "siteconf")]
#[command(about = "Inspect a site's resolved configuration", long_about = None)]
struct Cli {
    /// Site directory; overrides `path` from the config env blob
    #[arg(short, long)]
    path: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolved site settings
    Site,
    /// Normalized route table (path -> domain -> descriptor)
    Routes,
    /// Raw routermap file, before normalization
    OriginRoutes,
    /// Static route table
    StaticRoutes,
    /// Server block for the current environment
    Server,
    /// Extensions loader configuration
    Extends,
    /// First non-internal IPv4 address of this host
    Ip,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "siteconf=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut overrides = EnvOverrides::from_process_env();
    if let Some(path) = cli.path {
        // Splice the path into the config blob so resolution sees it as
        // the last word on the site directory.
        let mut blob: serde_json::Map<String, serde_json::Value> = overrides
            .config
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();
        blob.insert("path".to_string(), json!(path));
        overrides.config = Some(serde_json::Value::Object(blob).to_string());
    }

    let ctx = ConfigContext::with_overrides(overrides);

    match cli.command {
        Commands::Site => print_json(&serde_json::to_value(ctx.site_conf())?),
        Commands::Routes => print_json(&serde_json::to_value(ctx.router_map()?)?),
        Commands::OriginRoutes => print_json(&json!(ctx.origin_router_map())),
        Commands::StaticRoutes => print_json(&json!(ctx.static_router_map())),
        Commands::Server => print_json(ctx.server_conf()),
        Commands::Extends => match ctx.extends_conf() {
            Some(value) => print_json(value),
            None => println!("no extends file"),
        },
        Commands::Ip => match ctx.local_ip() {
            Some(ip) => println!("{ip}"),
            None => println!("no external IPv4 address"),
        },
    }

    Ok(())
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("Error: failed to render JSON: {err}"),
    }
}

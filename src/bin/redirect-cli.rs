use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use edge_redirect::config::load_config;
use edge_redirect::edge::{self, EdgeRequest, EdgeValue};
use edge_redirect::RouteTable;

#[derive(Parser)]
#[command(name = "redirect-cli")]
#[command(about = "Evaluate requests against an edge-redirect route table", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "edge-redirect.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single request
    Check {
        #[arg(long)]
        host: String,
        #[arg(long)]
        path: String,
        /// Query parameter as key=value; repeatable, order kept
        #[arg(long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,
    },
    /// Run an edge event JSON file ("-" for stdin) through the handler
    Event {
        #[arg(default_value = "-")]
        file: String,
    },
    /// Load and validate the config, then list rule counts per host
    Validate,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Check { host, path, query } => {
            let mut headers = indexmap::IndexMap::new();
            headers.insert("host".to_string(), EdgeValue::new(host));
            let request = EdgeRequest {
                uri: path,
                querystring: Some(query.into_iter().map(|(k, v)| (k, EdgeValue::new(v))).collect()),
                headers,
                extra: Default::default(),
            };
            let event = edge::EdgeEvent { request };
            let outcome = edge::handle_event(&config.routes, event)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Commands::Event { file } => {
            let input = read_input(&file)?;
            println!("{}", edge::handle_event_json(&config.routes, &input)?);
        }
        Commands::Validate => {
            print_summary(&cli.config, &config.routes);
        }
    }

    Ok(())
}

fn read_input(file: &str) -> std::io::Result<String> {
    if file == "-" {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        std::fs::read_to_string(file)
    }
}

fn print_summary(path: &Path, routes: &RouteTable) {
    println!("{}: OK", path.display());
    for (host, rules) in routes.iter() {
        println!("  {:<32} {} rule(s)", host, rules.len());
    }
}

use std::{error::Error, time::Duration};

use clap::{Parser, Subcommand};
use livestatus::{Address, Client, Command, Query};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Livestatus socket: `unix:/path`, `tcp:host:port`, a socket path or `host:port`
    #[arg(short, long, env = "LIVESTATUS_ADDRESS")]
    address: Address,
    /// Write and read timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,
    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Query a table and print one JSON object per record
    Query {
        table: String,
        /// Column to retrieve; repeatable
        #[arg(short, long = "column")]
        columns: Vec<String>,
        /// Filter rule, e.g. `state = 1`; repeatable, combined with `And`
        #[arg(short, long = "filter")]
        filters: Vec<String>,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Submit an external command
    Command { name: String, args: Vec<String> },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let mut client = Client::new(cli.address);
    if let Some(secs) = cli.timeout {
        client = client
            .with_write_timeout(Duration::from_secs(secs))
            .with_read_timeout(Duration::from_secs(secs));
    }

    match cli.action {
        Action::Query {
            table,
            columns,
            filters,
            limit,
        } => {
            let mut query = Query::new(table);
            if !columns.is_empty() {
                query = query.columns(columns);
            }
            let count = filters.len();
            for filter in &filters {
                query = query.filter(filter);
            }
            if count > 1 {
                query = query.and(count);
            }
            if let Some(limit) = limit {
                query = query.limit(limit);
            }

            let response = client.exec(&query)?;
            for record in &response.records {
                println!("{}", serde_json::Value::from(record));
            }
        }
        Action::Command { name, args } => {
            client.exec(&Command::new(name).args(args))?;
        }
    }

    Ok(())
}

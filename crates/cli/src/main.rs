//! `pg-call-function` CLI entry-point.
//!
//! Available sub-commands:
//! - `sql`  — print the statement a call would run, without connecting.
//! - `call` — call a stored function and print its outputs as a JSON array.

use std::time::Duration;

use anyhow::Context;
use caller::{build_query_text, CallConfig, CallFunction};
use clap::{Parser, Subcommand};
use db::PoolConfig;
use serde_json::Value;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "pg-call-function",
    about = "Call Postgres stored functions with positional parameters",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the SQL a call would run.
    Sql {
        /// Function name, optionally schema-qualified.
        #[arg(long)]
        function: String,
        /// Positional input; JSON, or a bare string.
        #[arg(long = "arg", value_parser = parse_json)]
        args: Vec<Value>,
    },
    /// Call a stored function.
    Call {
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
        #[arg(long, default_value_t = 1)]
        max_connections: u32,
        /// Seconds to wait for a pooled connection.
        #[arg(long, default_value_t = 30)]
        acquire_timeout: u64,
        /// `application_name` reported to the server.
        #[arg(long, env = "PGAPPNAME", default_value = db::pool::DEFAULT_APPLICATION_NAME)]
        application_name: String,
        /// Function name, optionally schema-qualified.
        #[arg(long)]
        function: String,
        /// Executor option as `key=JSON`, e.g. `persistent=false`.
        #[arg(long = "option", value_parser = parse_option)]
        options: Vec<(String, Value)>,
        /// Positional input; JSON, or a bare string.
        #[arg(long = "arg", value_parser = parse_json)]
        args: Vec<Value>,
    },
}

/// Parse an argument as JSON, falling back to a plain string.
fn parse_json(s: &str) -> Result<Value, String> {
    Ok(serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.to_owned())))
}

fn parse_option(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    Ok((key.to_owned(), parse_json(value)?))
}

fn build_config(function: String, options: Vec<(String, Value)>) -> CallConfig {
    options
        .into_iter()
        .fold(CallConfig::new(function), |config, (key, value)| config.with_option(key, value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Sql { function, args } => {
            println!("{}", build_query_text(&function, args.len()));
        }
        Command::Call {
            database_url,
            max_connections,
            acquire_timeout,
            application_name,
            function,
            options,
            args,
        } => {
            let pool_config = PoolConfig::new(database_url)
                .max_connections(max_connections)
                .acquire_timeout(Duration::from_secs(acquire_timeout))
                .application_name(application_name);
            let pool = db::pool::create_pool(&pool_config)
                .await
                .context("failed to connect to database")?;
            let client = db::PgExecutor::new(pool);

            let config = build_config(function, options);
            info!("Calling {} with {} input(s)", config.function, args.len());
            let outputs = client
                .call_function(config, &args)
                .await
                .context("function call failed")?;

            println!("{}", serde_json::to_string(&outputs)?);
        }
    }
    Ok(())
}

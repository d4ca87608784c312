use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use crate::demo;
use crate::error::RequestError;
use crate::error_handler::RequestExceptionHandler;
use crate::runtime_config::AppConfig;
use crate::server::Request;
use crate::view::ViewFactory;

/// Command-line interface for waypoint
///
/// Runs requests through the bundled demo application and renders error pages.
#[derive(Parser, Debug)]
#[command(name = "waypoint")]
#[command(about = "waypoint MVC dispatcher CLI", long_about = None)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true, env = "WAYPOINT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show error messages on error pages
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the routes of the demo application
    Routes,
    /// Send one request through the demo application and print the HTTP response
    Request {
        /// Request target, e.g. `/users/1?verbose=1`
        target: String,

        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Request header as `Name: value` (repeatable)
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,

        /// Print the collected metrics after the response
        #[arg(long, default_value_t = false)]
        metrics: bool,
    },
    /// Render the error page for a status code
    ErrorPage {
        /// HTTP status code
        status: u16,

        /// Message shown on the page (requires --debug)
        #[arg(short, long)]
        message: Option<String>,
    },
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected 'Name: value', got '{raw}'")),
    }
}

impl Cli {
    /// Configuration file (if any) plus environment overrides plus `--debug`.
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load_with_env(self.config.as_deref())?;
        if self.debug {
            config.debug = true;
        }
        Ok(config)
    }
}

/// Execute a parsed command, writing its output to `out`.
pub fn run_cli<W: Write>(cli: &Cli, config: AppConfig, out: &mut W) -> Result<()> {
    match &cli.command {
        Commands::Routes => {
            let (app, _) = demo::build_app(config)?;
            for line in app.router().dump_routes() {
                writeln!(out, "{line}")?;
            }
            writeln!(out)?;
            for target in app.dispatcher().controllers().targets() {
                writeln!(out, "controller action: {target}")?;
            }
        }
        Commands::Request {
            target,
            method,
            headers,
            data,
            metrics,
        } => {
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .map_err(|e| anyhow!("invalid method '{method}': {e}"))?;
            let mut request = Request::new(method, target);
            for (name, value) in headers {
                request = request.with_header(name, value.clone());
            }
            if let Some(data) = data {
                let body = serde_json::from_str(data).context("request body is not valid JSON")?;
                request = request.with_body(body);
            }

            let (app, collected) = demo::build_app(config)?;
            app.serve(&request, out)?;
            if *metrics {
                writeln!(out)?;
                write!(out, "{}", collected.render_prometheus())?;
            }
        }
        Commands::ErrorPage { status, message } => {
            if !(100..=599).contains(status) {
                return Err(anyhow!("status must be between 100 and 599, got {status}"));
            }
            let views = Arc::new(match &config.views_dir {
                Some(dir) => ViewFactory::with_views_dir(dir),
                None => ViewFactory::new(),
            });
            let mut error = RequestError::new(*status);
            if let Some(message) = message {
                error = error.with_message(message.clone());
            }
            RequestExceptionHandler::new(error, views)
                .debug(config.debug)
                .handle(out)?;
        }
    }
    Ok(())
}

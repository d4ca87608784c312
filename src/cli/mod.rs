//! # CLI Module
//!
//! Command-line front end of the `waypoint` binary.
//!
//! ## Commands
//!
//! ```bash
//! # List routes and registered controller actions of the demo application
//! waypoint routes
//!
//! # Send a request through the demo application
//! waypoint request /users/1
//! waypoint request -X POST /users -d '{"name": "dave"}'
//! waypoint request /admin -H 'Authorization: Bearer x'
//!
//! # Render an error page, optionally with custom views
//! waypoint --debug error-page 404 --message "no such page"
//! WAYPOINT_VIEWS_DIR=./views waypoint error-page 503
//! ```
//!
//! Global options: `--config <FILE>` (YAML, also `WAYPOINT_CONFIG`) and `--debug`.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use clap::Parser;
//! use waypoint::cli::{run_cli, Cli};
//!
//! let cli = Cli::parse();
//! let config = cli.load_config()?;
//! run_cli(&cli, config, &mut std::io::stdout().lock())?;
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands};

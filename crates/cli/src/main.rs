//! Vista command line.
//!
//! Resolves one configuration scope and prints it as JSON:
//!
//! ```text
//! vista --defaults defaults.json --views views.json fast lr=0.3 prompt=%Hello World%
//! ```

mod catalog;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use vista_scope::{Namespace, Registry};

/// Vista command line arguments.
#[derive(Parser, Debug)]
#[command(name = "vista")]
#[command(about = "Resolve a configuration scope from defaults, views and overrides")]
struct Args {
	/// Name of the scope to resolve
	#[arg(short, long, default_value = "config")]
	scope: String,

	/// JSON file with default values
	#[arg(short, long, value_name = "PATH")]
	defaults: Option<PathBuf>,

	/// JSON file with view declarations
	#[arg(long, value_name = "PATH")]
	views: Option<PathBuf>,

	/// Print single-line JSON
	#[arg(long)]
	compact: bool,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,

	/// View names and key=value overrides
	#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
	overrides: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if args.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::INFO
		})
		.with_writer(std::io::stderr)
		.finish();

	tracing::subscriber::set_global_default(subscriber)?;

	let defaults = match &args.defaults {
		Some(path) => Namespace::from_json_file(path)?,
		None => Namespace::new(),
	};

	let registry = Registry::new();
	let scope = registry.create_scope(args.scope.as_str(), defaults)?;
	if let Some(path) = &args.views {
		catalog::register(&scope, catalog::load_catalog(path)?)?;
	}

	registry.ingest_command(&args.overrides.join(" "))?;
	let config = scope.apply()?;

	let report = scope.assigned_views();
	info!(scope = scope.name(), views = ?report.views, assignments = ?report.assignments, "resolved");

	let json = if args.compact {
		serde_json::to_string(&config)?
	} else {
		config.to_json_string()?
	};
	println!("{json}");

	Ok(())
}

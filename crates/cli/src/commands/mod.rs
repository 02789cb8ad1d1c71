mod counter;
mod mods;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use color_print::{cformat, cprintln};

use dsktcc::shared::output::{MessageContents, MessageLevel, ModsOutput};
use dsktcc::{Configuration, ModsClient};

use super::output::TerminalOutput;

#[derive(Debug, Subcommand)]
pub enum Command {
	#[command(about = "List mods, optionally filtered")]
	#[clap(alias = "ls")]
	List {
		/// Text to search for
		#[arg(short, long)]
		search: Option<String>,
		/// How to sort the results
		#[arg(long)]
		sort: Option<String>,
		/// Only list mods of this type
		#[arg(short = 't', long = "type")]
		mod_type: Option<String>,
		/// Only list mods in this category
		#[arg(short, long)]
		category: Option<String>,
		/// Only print the names of the mods
		#[arg(short, long)]
		raw: bool,
	},
	#[command(about = "List featured mods")]
	Featured {
		/// Only print the names of the mods
		#[arg(short, long)]
		raw: bool,
	},
	#[command(about = "Print information about a mod")]
	Info {
		/// The name of the mod
		name: String,
		/// Print the response from the API as-is
		#[arg(short, long)]
		raw: bool,
	},
	#[command(about = "Print download and view counts of all mods")]
	Stats,
	#[command(about = "Count a view of a mod")]
	View {
		/// The name of the mod
		name: String,
	},
	#[command(about = "Count a download of a mod")]
	Download {
		/// The name of the mod
		name: String,
	},
	#[command(about = "Print the dsktcc version")]
	Version,
}

#[derive(Debug, Parser)]
pub struct Cli {
	#[command(subcommand)]
	command: Command,
	#[arg(short, long)]
	debug: bool,
	#[arg(short = 'D', long)]
	trace: bool,
}

/// Run the command line interface
pub async fn run_cli() -> anyhow::Result<()> {
	// Parse the CLI
	let cli = Cli::try_parse();
	if let Err(e) = &cli {
		if let clap::error::ErrorKind::DisplayHelp
		| clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
		| clap::error::ErrorKind::DisplayVersion = e.kind()
		{
			println!("{e}");
			return Ok(());
		} else {
			eprintln!("{}", cformat!("<r>{e}"));
			bail!("");
		}
	}
	let cli = cli?;

	// Prepare the command data
	let mut data = CmdData::new()?;
	let log_level = get_log_level(&cli);
	data.output.set_log_level(log_level);

	let res = match cli.command {
		Command::List {
			search,
			sort,
			mod_type,
			category,
			raw,
		} => {
			let query = dsktcc::ModsQuery {
				search,
				sort,
				mod_type,
				category,
			};
			mods::list(&mut data, query, raw).await
		}
		Command::Featured { raw } => mods::featured(&mut data, raw).await,
		Command::Info { name, raw } => mods::info(&mut data, &name, raw).await,
		Command::Stats => mods::stats(&mut data).await,
		Command::View { name } => counter::view(&mut data, &name).await,
		Command::Download { name } => counter::download(&mut data, &name).await,
		Command::Version => {
			print_version();
			Ok(())
		}
	};

	if let Err(e) = &res {
		data.output.display(
			MessageContents::Error(format!("{e:?}")),
			MessageLevel::Important,
		);
	}

	res
}

/// Get the log level based on the debug options
fn get_log_level(cli: &Cli) -> MessageLevel {
	if cli.trace {
		MessageLevel::Trace
	} else if cli.debug {
		MessageLevel::Debug
	} else {
		MessageLevel::Important
	}
}

/// Data passed to commands
pub struct CmdData {
	pub client: ModsClient,
	pub output: TerminalOutput,
}

impl CmdData {
	pub fn new() -> anyhow::Result<Self> {
		let output = TerminalOutput::new().context("Failed to set up output")?;
		let client =
			ModsClient::new(Configuration::new()).context("Failed to set up API client")?;
		Ok(Self { client, output })
	}
}

/// Print the dsktcc version
fn print_version() {
	let version = env!("CARGO_PKG_VERSION");
	cprintln!("CLI version: <g>{}</g>", version);
	cprintln!("Library version: <g>{}</g>", dsktcc::VERSION);
}

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use color_print::{cformat, cstr};
use directories::ProjectDirs;
use dsktcc::shared::output::{Message, MessageContents, MessageLevel, ModsOutput};

/// A nice colored bullet point for terminal output
pub const HYPHEN_POINT: &str = cstr!("<k!> - </k!>");

/// Environment variable that overrides where logs are written
const LOG_DIR_ENV: &str = "DSKTCC_LOG_DIR";

/// Terminal ModsOutput
pub struct TerminalOutput {
	level: MessageLevel,
	latest_log_file: File,
}

impl ModsOutput for TerminalOutput {
	fn display_text(&mut self, text: String, level: MessageLevel) {
		let _ = self.log_message(&text, level);
		self.display_text_impl(text, level);
	}

	fn display_message(&mut self, message: Message) {
		let _ = self.log_message(
			&Self::format_message_log(message.contents.clone()),
			message.level,
		);
		self.display_text_impl(Self::format_message(message.contents), message.level);
	}
}

impl TerminalOutput {
	pub fn new() -> anyhow::Result<Self> {
		let dir = get_log_dir().context("Failed to get log directory")?;
		std::fs::create_dir_all(&dir).context("Failed to create log directory")?;
		let latest_file = File::create(dir.join("latest.txt"))
			.context("Failed to open latest.txt log file")?;
		Ok(Self {
			level: MessageLevel::Important,
			latest_log_file: latest_file,
		})
	}

	/// Display text
	fn display_text_impl(&mut self, text: String, level: MessageLevel) {
		if !level.at_least(&self.level) {
			return;
		}

		println!("{text}");
	}

	/// Formatting for messages
	fn format_message(contents: MessageContents) -> String {
		match contents {
			MessageContents::Simple(text) => text,
			MessageContents::Notice(text) => cformat!("<y>Notice: {}", text),
			MessageContents::Warning(text) => cformat!("<y><s>Warning:</> {}", text),
			MessageContents::Error(text) => cformat!("<r><s,u>Error:</> {}", text),
			MessageContents::Success(text) => cformat!("<g>{}", add_period(text)),
			MessageContents::Property(key, value) => {
				cformat!("<s>{}:</> {}", key, Self::format_message(*value))
			}
			MessageContents::Header(text) => cformat!("<s>{}", text),
			MessageContents::StartProcess(text) => cformat!("{text}..."),
			MessageContents::ListItem(item) => {
				HYPHEN_POINT.to_string() + &Self::format_message(*item)
			}
			contents => contents.default_format(),
		}
	}

	/// Formatting for messages in the log file
	fn format_message_log(contents: MessageContents) -> String {
		match contents {
			MessageContents::Simple(text) => text,
			MessageContents::Notice(text) => format!("[NOTICE] {}", text),
			MessageContents::Warning(text) => format!("[WARN] {}", text),
			MessageContents::Error(text) => format!("[ERR] {}", text),
			MessageContents::Success(text) => format!("[SUCCESS] {}", add_period(text)),
			MessageContents::Property(key, value) => {
				format!("{}: {}", key, Self::format_message_log(*value))
			}
			MessageContents::Header(text) => format!("### {} ###", text),
			MessageContents::StartProcess(text) => format!("{text}..."),
			MessageContents::ListItem(item) => " - ".to_string() + &Self::format_message_log(*item),
			contents => contents.default_format(),
		}
	}

	/// Log a message to the log file
	pub fn log_message(&mut self, text: &str, level: MessageLevel) -> anyhow::Result<()> {
		writeln!(self.latest_log_file, "[{}] {text}", level_indicator(level))?;

		Ok(())
	}

	/// Set the log level of the output
	pub fn set_log_level(&mut self, level: MessageLevel) {
		self.level = level;
	}
}

/// Get the single-letter indicator for a level in the log file
fn level_indicator(level: MessageLevel) -> &'static str {
	match level {
		MessageLevel::Important => "I",
		MessageLevel::Extra => "E",
		MessageLevel::Debug => "D",
		MessageLevel::Trace => "T",
	}
}

/// Get the directory to write logs to
fn get_log_dir() -> anyhow::Result<PathBuf> {
	if let Ok(dir) = std::env::var(LOG_DIR_ENV) {
		return Ok(PathBuf::from(dir));
	}
	let dirs = ProjectDirs::from("", "", "dsktcc")
		.ok_or(anyhow!("Failed to find a home directory"))?;
	Ok(dirs.data_dir().join("logs"))
}

/// Adds a period to the end of a string if it isn't punctuated already
fn add_period(string: String) -> String {
	if string.ends_with(['.', ',', ';', ':', '!', '?']) {
		string
	} else {
		string + "."
	}
}

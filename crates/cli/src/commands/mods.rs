use super::CmdData;
use crate::output::HYPHEN_POINT;

use anyhow::Context;
use color_print::{cprint, cprintln};
use dsktcc::shared::output::{MessageContents, MessageLevel, ModsOutput};
use dsktcc::{Mod, ModsQuery};

pub async fn list(data: &mut CmdData, query: ModsQuery, raw: bool) -> anyhow::Result<()> {
	data.output.display(
		MessageContents::StartProcess("Fetching mods".into()),
		MessageLevel::Debug,
	);
	let mods = data.client.fetch_mods(&query).await?;

	if !raw {
		cprintln!("<s>Mods:");
	}
	print_mod_list(&mods, raw);

	Ok(())
}

pub async fn featured(data: &mut CmdData, raw: bool) -> anyhow::Result<()> {
	data.output.display(
		MessageContents::StartProcess("Fetching featured mods".into()),
		MessageLevel::Debug,
	);
	let mods = data.client.fetch_featured_mods().await?;

	if !raw {
		cprintln!("<s>Featured mods:");
	}
	print_mod_list(&mods, raw);

	Ok(())
}

pub async fn info(data: &mut CmdData, name: &str, raw: bool) -> anyhow::Result<()> {
	if raw {
		let text = data.client.fetch_mod_raw(name).await?;
		println!("{text}");
		return Ok(());
	}

	let info = data.client.fetch_mod_by_name(name).await?;
	cprintln!("<s><g>{}</g>", info.name);
	for (key, value) in &info.metadata {
		let value = match value {
			serde_json::Value::String(text) => text.clone(),
			other => serde_json::to_string(other).context("Failed to format field")?,
		};
		cprintln!("{}<s>{}:</> {}", HYPHEN_POINT, key, value);
	}

	Ok(())
}

pub async fn stats(data: &mut CmdData) -> anyhow::Result<()> {
	let mut stats = data.client.fetch_mod_stats().await?;
	stats.sort_by(|a, b| b.downloads.cmp(&a.downloads).then(a.name.cmp(&b.name)));

	cprintln!("<s>Mod stats:");
	for entry in stats {
		cprintln!(
			"{}<s>{}</> - <g>{}</> downloads, <c>{}</> views",
			HYPHEN_POINT,
			entry.name,
			entry.downloads,
			entry.views
		);
	}

	Ok(())
}

fn print_mod_list(mods: &[Mod], raw: bool) {
	for item in mods {
		if raw {
			println!("{}", item.name);
			continue;
		}

		cprint!("{}", HYPHEN_POINT);
		match item.metadata.get("description").and_then(|x| x.as_str()) {
			Some(description) => cprintln!("<s>{}</> - {}", item.name, description),
			None => cprintln!("<s>{}", item.name),
		}
	}
}

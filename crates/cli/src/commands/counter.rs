use super::CmdData;

use anyhow::bail;
use dsktcc::shared::output::{MessageContents, MessageLevel, ModsOutput};
use dsktcc::RateLimitResult;

pub async fn view(data: &mut CmdData, name: &str) -> anyhow::Result<()> {
	let result = data
		.client
		.increment_mod_views(name, &mut data.output)
		.await;
	report(data, result, name, "view")
}

pub async fn download(data: &mut CmdData, name: &str) -> anyhow::Result<()> {
	let result = data
		.client
		.increment_mod_downloads(name, &mut data.output)
		.await;
	report(data, result, name, "download")
}

fn report(
	data: &mut CmdData,
	result: RateLimitResult,
	name: &str,
	action: &str,
) -> anyhow::Result<()> {
	match result {
		RateLimitResult { success: true, .. } => {
			data.output.display(
				MessageContents::Success(format!("Counted a {action} of '{name}'")),
				MessageLevel::Important,
			);
		}
		RateLimitResult {
			remaining_time: Some(hours),
			..
		} => {
			let unit = if hours == 1 { "hour" } else { "hours" };
			data.output.display(
				MessageContents::Warning(format!(
					"A {action} of '{name}' was already counted recently. Try again in {hours} {unit}"
				)),
				MessageLevel::Important,
			);
		}
		RateLimitResult { .. } => bail!("Failed to count a {action} of '{name}'"),
	}

	Ok(())
}

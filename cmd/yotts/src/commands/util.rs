//! Utility functions for CLI commands.

use yotts_cli::config::{load_config, Config, Context};
use yotts_dashscope::{Client, Region, MODEL_QWEN3_TTS_VC_REALTIME};

use crate::Cli;

pub const APP_NAME: &str = "yotts";

/// Gets the global configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(APP_NAME, cli.config.as_deref())
}

/// Gets the context selected with `-c`, or the current context.
///
/// Returns `None` when no context is selected and none is current; an
/// explicitly named context that does not exist is an error.
pub fn find_context(cli: &Cli) -> anyhow::Result<Option<Context>> {
    let cfg = get_config(cli)?;
    match (cfg.resolve_context(cli.context.as_deref()), cli.context.as_deref()) {
        (Some(ctx), _) => Ok(Some(ctx.clone())),
        (None, Some(name)) => anyhow::bail!("context '{}' not found", name),
        (None, None) => Ok(None),
    }
}

/// Parses a context region; empty means the default region.
pub fn parse_region(region: &str) -> anyhow::Result<Region> {
    if region.trim().is_empty() {
        return Ok(Region::default());
    }
    region.parse().map_err(anyhow::Error::msg)
}

/// Realtime model for a context: `extra.model`, or the default.
pub fn context_model(ctx: &Context) -> String {
    ctx.get_extra("model")
        .filter(|m| !m.is_empty())
        .unwrap_or(MODEL_QWEN3_TTS_VC_REALTIME)
        .to_string()
}

/// Creates a DashScope API client from context configuration.
pub fn create_client(ctx: &Context) -> anyhow::Result<Client> {
    let mut builder = Client::builder(ctx.api_key.as_str()).region(parse_region(&ctx.region)?);

    if !ctx.base_url.is_empty() {
        builder = builder.http_base_url(ctx.base_url.as_str());
    }
    if !ctx.realtime_url.is_empty() {
        builder = builder.base_url(ctx.realtime_url.as_str());
    }

    if let Some(workspace) = ctx.get_extra("workspace") {
        if !workspace.is_empty() {
            builder = builder.workspace(workspace);
        }
    }

    Ok(builder.build()?)
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints error message.
pub fn print_error(msg: &str) {
    eprintln!("\x1b[31m✗\x1b[0m {}", msg);
}

/// Prints info message.
pub fn print_info(msg: &str) {
    eprintln!("\x1b[34mℹ\x1b[0m {}", msg);
}

/// Prints warning message.
pub fn print_warning(msg: &str) {
    eprintln!("\x1b[33m⚠\x1b[0m {}", msg);
}

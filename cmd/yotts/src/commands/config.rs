//! Configuration management commands.

use clap::{Args, Subcommand};

use yotts_cli::config::{mask_api_key, Context as CliContext};

use super::{context_model, get_config, parse_region, print_success};
use crate::Cli;

/// Manage CLI configuration.
///
/// Contexts allow you to manage multiple API configurations,
/// similar to kubectl's context management.
///
/// Configuration is stored in ~/.yotts/yotts/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add a new context
    #[command(name = "add-context")]
    AddContext {
        /// Context name
        name: String,
        /// API key (required)
        #[arg(long)]
        api_key: String,
        /// Region: cn (Beijing) or intl (Singapore)
        #[arg(long)]
        region: Option<String>,
        /// REST base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Realtime WebSocket URL
        #[arg(long)]
        realtime_url: Option<String>,
        /// Realtime TTS model
        #[arg(long)]
        model: Option<String>,
        /// Workspace ID
        #[arg(long)]
        workspace: Option<String>,
    },
    /// Delete a context
    #[command(name = "delete-context")]
    DeleteContext {
        /// Context name
        name: String,
    },
    /// Set the current context
    #[command(name = "use-context")]
    UseContext {
        /// Context name
        name: String,
    },
    /// Display the current context
    #[command(name = "get-context")]
    GetContext,
    /// List all contexts
    #[command(name = "list-contexts", alias = "get-contexts")]
    ListContexts,
    /// View the current configuration
    View,
}

impl ConfigCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::AddContext {
                name,
                api_key,
                region,
                base_url,
                realtime_url,
                model,
                workspace,
            } => {
                let mut cfg = get_config(cli)?;

                let region = match region {
                    Some(r) => parse_region(r)?.as_str().to_string(),
                    None => String::new(),
                };
                let mut ctx = CliContext {
                    api_key: api_key.clone(),
                    region,
                    base_url: base_url.clone().unwrap_or_default(),
                    realtime_url: realtime_url.clone().unwrap_or_default(),
                    ..Default::default()
                };
                if let Some(model) = model {
                    ctx.set_extra("model", model);
                }
                if let Some(workspace) = workspace {
                    ctx.set_extra("workspace", workspace);
                }

                cfg.add_context(name, ctx)?;
                print_success(&format!("Context \"{}\" added successfully", name));
                Ok(())
            }

            ConfigSubcommand::DeleteContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.delete_context(name)?;
                print_success(&format!("Context \"{}\" deleted", name));
                Ok(())
            }

            ConfigSubcommand::UseContext { name } => {
                let mut cfg = get_config(cli)?;
                cfg.use_context(name)?;
                print_success(&format!("Switched to context \"{}\"", name));
                Ok(())
            }

            ConfigSubcommand::GetContext => {
                let cfg = get_config(cli)?;
                if cfg.current_context.is_empty() {
                    println!("No current context set");
                } else {
                    println!("{}", cfg.current_context);
                }
                Ok(())
            }

            ConfigSubcommand::ListContexts => {
                let cfg = get_config(cli)?;

                if cfg.contexts.is_empty() {
                    println!("No contexts configured");
                    return Ok(());
                }

                println!("{:<8} {:<20} {:<8} {}", "CURRENT", "NAME", "REGION", "MODEL");
                for name in cfg.list_contexts() {
                    let Some(ctx) = cfg.get_context(name) else { continue };
                    let current = if name == cfg.current_context { "*" } else { "" };
                    let region = parse_region(&ctx.region).map(|r| r.as_str()).unwrap_or("?");
                    println!("{:<8} {:<20} {:<8} {}", current, name, region, context_model(ctx));
                }

                Ok(())
            }

            ConfigSubcommand::View => {
                let cfg = get_config(cli)?;

                println!("Config file: {}", cfg.path().display());
                println!("Current context: {}", cfg.current_context);
                println!("Contexts: {}", cfg.contexts.len());

                if !cfg.contexts.is_empty() {
                    println!("\nContext details:");

                    for name in cfg.list_contexts() {
                        let Some(ctx) = cfg.get_context(name) else { continue };
                        println!("\n  {}:", name);
                        println!("    API Key: {}", mask_api_key(&ctx.api_key));
                        if !ctx.region.is_empty() {
                            println!("    Region: {}", ctx.region);
                        }
                        if !ctx.base_url.is_empty() {
                            println!("    Base URL: {}", ctx.base_url);
                        }
                        if !ctx.realtime_url.is_empty() {
                            println!("    Realtime URL: {}", ctx.realtime_url);
                        }
                        if let Some(model) = ctx.get_extra("model").filter(|m| !m.is_empty()) {
                            println!("    Model: {}", model);
                        }
                    }
                }

                Ok(())
            }
        }
    }
}

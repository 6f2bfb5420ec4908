//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.info("No config file found, using defaults"),
    }

    let storage = &ctx.config.storage;
    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output.kv("dir", &storage.dir);
    ctx.output.kv("resolved", &ctx.storage_dir().display().to_string());
    ctx.output.kv("cart_key", &storage.cart_key);

    let pricing = &ctx.config.pricing;
    ctx.output.info("");
    ctx.output.info("[pricing]");
    ctx.output.kv("currency", pricing.currency.code());
    ctx.output.kv("tax_rate_bps", &pricing.tax_rate_bps.to_string());
    ctx.output.kv(
        "free_shipping_threshold",
        &pricing.free_shipping_threshold.to_string(),
    );
    ctx.output.kv("flat_shipping_fee", &pricing.flat_shipping_fee.to_string());
    ctx.output.kv("point_value", &pricing.point_value.to_string());

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("shop.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "created": config_path.display().to_string() }));
    } else {
        ctx.output.success(&format!("Created: {}", config_path.display()));
    }

    Ok(())
}

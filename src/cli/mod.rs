//! CLI module for the Air Quality CO Predictor
//!
//! Subcommands:
//! - `serve`: HTTP API server
//! - `predict`: one prediction printed as JSON
//! - `realtime`: current snapshots of every configured city, as JSON

pub mod predict;
pub mod realtime;
pub mod serve;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::observability::init_tracing;

/// Air Quality CO Predictor - one-hour-ahead carbon monoxide forecasts
#[derive(Parser)]
#[command(name = "aq-co-predictor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(serve::ServeArgs),

    /// Predict the next hour of CO for a city and print it as JSON
    Predict(predict::PredictArgs),

    /// Print current air quality and weather for every configured city
    Realtime,
}

/// Load `.env`, the layered configuration, and install the subscriber
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging, &config.observability.tracing);

    Ok(config)
}

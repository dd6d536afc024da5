use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use thermo_core::provider::{resolver_from_config, reverse_from_config, source_from_config};
use thermo_core::{Config, ElementIds, MemorySurface, Thermometer, Unit};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "thermo", version, about = "Environmental thermometer widget")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Adjust service endpoints, unit, and gauge range interactively.
    Configure,

    /// Show the thermometer for a place name.
    Show {
        /// Place name, e.g. "Naples" or "Frattamaggiore, Campania, Italy".
        location: String,
    },

    /// Resolve device coordinates into a place name.
    Locate {
        latitude: f64,
        longitude: f64,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Show { location } => show(&config, &location).await,
            Command::Locate {
                latitude,
                longitude,
            } => locate(&config, latitude, longitude).await,
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    config.yql_url = Text::new("YQL endpoint:")
        .with_default(&config.yql_url)
        .prompt()?;
    config.forecast_feed_url = Text::new("Forecast feed URL:")
        .with_default(&config.forecast_feed_url)
        .prompt()?;
    config.reverse_geocode_url = Text::new("Reverse geocode endpoint:")
        .with_default(&config.reverse_geocode_url)
        .prompt()?;

    let unit = Select::new("Temperature unit:", vec!["celsius", "fahrenheit"]).prompt()?;
    config.unit = match unit {
        "fahrenheit" => Unit::Fahrenheit,
        _ => Unit::Celsius,
    };

    config.range.max = CustomType::<f64>::new("Gauge max:")
        .with_default(config.range.max)
        .prompt()?;
    config.range.min = CustomType::<f64>::new("Gauge min:")
        .with_default(config.range.min)
        .prompt()?;
    config.range.step = CustomType::<f64>::new("Label step:")
        .with_default(config.range.step)
        .prompt()?;

    // Reject impossible gauges before they hit the disk.
    config.range().context("Rejecting configured gauge range")?;

    config.save()?;
    println!("Saved {}", Config::config_file_path()?.display());
    Ok(())
}

/// Builds a widget over an in-memory surface sized like the demo page.
fn demo_widget(config: &Config) -> anyhow::Result<Thermometer<MemorySurface>> {
    let mut surface = MemorySurface::new();
    let ids = ElementIds::default();
    surface.insert(&ids.wrapper, 200.0, 400.0);
    surface.insert(&ids.gauge, 360.0, 40.0);
    surface.insert_text(&ids.labels, 16.0);

    let range = config.range()?;
    let mut widget = Thermometer::new(surface, ids, range);
    widget.mount();
    Ok(widget)
}

async fn show(config: &Config, location: &str) -> anyhow::Result<()> {
    let resolver = resolver_from_config(config)?;
    let source = source_from_config(config)?;

    let mut widget = demo_widget(config)?;
    let outcome = widget.submit(resolver.as_ref(), source.as_ref(), location).await;

    print!("{}", render::draw(&widget));

    match outcome {
        Ok(_) => Ok(()),
        // Handled lookup errors are already on the widget's error slot;
        // only transport-class faults should fail the process.
        Err(err) if err.is_transport() => {
            tracing::warn!(%err, "submission failed in transit");
            Err(err.into())
        }
        Err(_) => Ok(()),
    }
}

async fn locate(config: &Config, latitude: f64, longitude: f64) -> anyhow::Result<()> {
    let reverse = reverse_from_config(config)?;

    let mut widget = demo_widget(config)?;
    match widget.locate(reverse.as_ref(), latitude, longitude).await {
        Ok(name) => {
            println!("{name}");
            Ok(())
        }
        Err(err) => {
            println!("{err}");
            Err(err.into())
        }
    }
}

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, warn};

use ndvi_zone_codec::{codec, export, message, pipeline, Config, DetectionRun, Error, Result};

#[derive(Parser)]
#[command(name = "ndvi-zone-codec")]
#[command(about = "Pack NDVI zone polygons into SMS-sized payloads and back", long_about = None)]
struct Cli {
    /// JSON configuration file; both ends must use the same one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a detection run JSON document ("-" reads stdin)
    Encode {
        input: PathBuf,

        /// Print the full SMS body instead of the bare payload
        #[arg(long, default_value = "false")]
        summary: bool,

        /// Also write the encoded zones as CSV rows
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Pack zone rows from a CSV file written by `encode --csv`
    Pack {
        input: PathBuf,
    },

    /// Decode a payload or a complete SMS body ("-" reads stdin)
    Decode {
        payload: String,

        #[arg(long, value_enum, default_value_t = Format::Geojson)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Geojson,
    Csv,
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        read_stdin()
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Encode { input, summary, csv } => {
            let run: DetectionRun = serde_json::from_str(&read_input(&input)?)?;
            let encoded = pipeline::encode_run(&run, &config)?;

            for dropped in &encoded.dropped {
                warn!("Zone {} not sent: {}", dropped.index, dropped.reason);
            }
            if let Some(path) = csv {
                export::write_batch_file(&encoded.batch, path)?;
            }

            if summary {
                println!("{}", message::compose(&encoded.batch, &encoded.payload));
            } else {
                println!("{}", encoded.payload);
            }
        }
        Commands::Pack { input } => {
            let batch = export::read_batch_file(input)?;
            println!("{}", codec::pack(&batch, &config.codec)?);
        }
        Commands::Decode { payload, format } => {
            let text = if payload == "-" { read_stdin()? } else { payload };
            let payload = message::extract_payload(&text)
                .ok_or_else(|| Error::Codec("Empty payload".to_string()))?;

            let batch = codec::decode(payload, &config.codec)?;
            let zones = batch.reconstruct(&config.grid)?;

            match format {
                Format::Geojson => {
                    let collection = export::feature_collection(batch.reference, &zones);
                    println!("{}", serde_json::to_string_pretty(&collection)?);
                }
                Format::Csv => export::write_polygons(batch.reference, &zones, io::stdout())?,
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run(cli).map_err(|e| {
        error!("{}", e);
        e
    })
}

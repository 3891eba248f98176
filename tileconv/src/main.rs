use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tileconv::{Config, ConversionError, TileConverter};

/// Convert images to and from 2 bit per pixel 8x8 tile data
#[derive(Parser)]
#[command(name = "tileconv")]
#[command(version)]
struct Cli {
    /// JSON configuration file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the deduplicated tileset string of an image
    Tiles {
        image: PathBuf,
    },

    /// Print the linear sprite data of an image
    Sprite {
        image: PathBuf,
    },

    /// Print the tilemap of an image against the tiles of a tileset image
    Tilemap {
        image: PathBuf,

        tileset: PathBuf,

        /// Added to every index, may be negative
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<i64>,
    },

    /// Merge the tiles of several images into one tileset PNG
    Tileset {
        /// Output PNG file
        output: PathBuf,

        /// Input images, merged in the given order
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Also write a JSON description of the merged tiles
        #[arg(long)]
        json: Option<PathBuf>,

        /// Tiles per row of the output image
        #[arg(long)]
        columns: Option<u32>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), ConversionError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Tiles { image } => {
            println!("{}", TileConverter::new(config).image_to_tiles_string(&image)?);
        }
        Commands::Sprite { image } => {
            println!("{}", TileConverter::new(config).image_to_sprite_string(&image)?);
        }
        Commands::Tilemap {
            image,
            tileset,
            offset,
        } => {
            if let Some(offset) = offset {
                config.tilemap_offset = offset;
            }
            let converter = TileConverter::new(config);
            println!("{}", converter.image_and_tileset_to_tilemap(&image, &tileset)?);
        }
        Commands::Tileset {
            output,
            images,
            json,
            columns,
        } => {
            if json.is_some() {
                config.output_json = json;
            }
            if let Some(columns) = columns {
                config.tileset_columns = columns;
            }
            let converter = TileConverter::new(config);
            converter.images_to_tileset_image(&images, Some(&output))?;
        }
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pixelform::{Channels, SaveOptions, Unstoppable};

/// Load, reshape and convert raster images.
#[derive(Parser, Debug)]
#[command(name = "pixelform", version, about, disable_version_flag = true)]
struct Args {
    /// Image file to load; the format is sniffed from its content
    input: PathBuf,

    /// Save the image to this path; the extension picks the format
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reshape to this many channels (1 gray, 2 gray+alpha, 3 RGB, 4 RGBA)
    #[arg(short = 'n', long = "channels", value_parser = clap::value_parser!(u32).range(1..=4))]
    channels: Option<u32>,

    /// Print the image's format, dimensions and channel layout
    #[arg(short = 'd', long)]
    describe: bool,

    /// Save back over the input file
    #[arg(short = 'i', long)]
    in_place: bool,

    /// JPEG encoder quality
    #[arg(short, long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Print version information
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let (mut image, format) = pixelform::load(&args.input)
        .with_context(|| format!("could not load {}", args.input.display()))?;

    if let Some(n) = args.channels {
        let target = Channels::from_count(n)?;
        image = image.reshape(target);
    }

    if args.describe {
        println!("file: '{}'", args.input.display());
        println!("format: {format}");
        println!("width: {}", image.width());
        println!("height: {}", image.height());
        println!("channels: {} - '{}'", image.channels().count(), image.channels());
    }

    let options = SaveOptions { jpeg_quality: args.quality };
    if let Some(out) = &args.output {
        pixelform::save_with(out, &image, &options, &Unstoppable)
            .with_context(|| format!("could not save {}", out.display()))?;
    }
    if args.in_place {
        pixelform::save_with(&args.input, &image, &options, &Unstoppable)
            .with_context(|| format!("could not save {}", args.input.display()))?;
    }

    Ok(())
}

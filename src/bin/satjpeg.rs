//! satjpeg CLI - decoder for onboard camera payloads.
//!
//! Turns a compressed payload plus its codes source into raw pixels or a
//! PPM/PGM image, and can emit or inspect codes sources.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

use satjpeg_rs::{CodeTableSet, ColorMatrix, DecodeOptions, Frame, FrameExtent, decode_with_tables};

/// Decoder for JPEG-derived satellite image payloads
#[derive(Parser)]
#[command(name = "satjpeg")]
#[command(version)]
#[command(about = "Decode satellite camera payloads into images", long_about = None)]
#[command(after_help = "EXAMPLES:
    satjpeg decode -i image.bin -c codes.bin --width 640 --height 480 --crop -o image.ppm -f ppm
    satjpeg decode -i image.bin -c codes.bin --mcus 1024 --greyscale -o pixels.raw
    satjpeg codes -o codes.bin
    satjpeg tables -c codes.bin --verbose

Set RUST_LOG=debug for per-table and per-session diagnostics.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a payload to raw pixels or a PPM/PGM image
    ///
    /// Exactly one of --mcus, --width/--height or --until-exhausted selects
    /// where the frame ends.
    #[command(visible_alias = "d")]
    Decode {
        /// Compressed payload
        #[arg(short, long, help = "Path to the compressed payload")]
        input: PathBuf,

        /// Codes source holding the four Huffman tables
        #[arg(short, long, help = "Path to the codes source")]
        codes: PathBuf,

        #[command(flatten)]
        extent: ExtentArgs,

        /// Payload carries Y blocks only
        #[arg(long)]
        greyscale: bool,

        /// YCbCr to RGB conversion
        #[arg(long, default_value = "studio", value_enum)]
        color_matrix: MatrixArg,

        /// Trim MCU padding to --width x --height
        #[arg(long, requires = "width")]
        crop: bool,

        /// Output file path for decoded pixels
        #[arg(short, long, help = "Path for the output file")]
        output: PathBuf,

        /// Output format: raw (binary pixels) or ppm (Portable PixMap)
        #[arg(short, long, default_value = "raw", value_enum)]
        format: OutputFormat,
    },

    /// Write the canonical codes source for the standard tables
    #[command(visible_alias = "g")]
    Codes {
        #[arg(short, long, help = "Path for the codes source")]
        output: PathBuf,
    },

    /// Load a codes source and summarize its tables
    #[command(visible_alias = "t")]
    Tables {
        #[arg(short, long, help = "Path to the codes source")]
        codes: PathBuf,

        /// List every codeword
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args)]
#[group(required = true, multiple = true)]
struct ExtentArgs {
    /// Number of MCUs in the payload (square frame)
    #[arg(long, conflicts_with_all = ["width", "height", "until_exhausted"])]
    mcus: Option<usize>,

    /// Image width in pixels
    #[arg(short, long, requires = "height")]
    width: Option<usize>,

    /// Image height in pixels
    #[arg(short = 'H', long, requires = "width")]
    height: Option<usize>,

    /// Decode until the payload runs out (legacy; payload must end on a byte boundary)
    #[arg(long, conflicts_with_all = ["width", "height"])]
    until_exhausted: bool,
}

impl ExtentArgs {
    fn extent(&self) -> FrameExtent {
        match (self.mcus, self.width, self.height) {
            (Some(mcus), _, _) => FrameExtent::McuCount(mcus),
            (None, Some(width), Some(height)) => FrameExtent::Dimensions { width, height },
            _ => FrameExtent::UntilExhausted,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Raw binary pixel data
    Raw,
    /// Portable PixMap (PPM/PGM) format
    Ppm,
}

#[derive(Clone, Copy, ValueEnum)]
enum MatrixArg {
    /// BT.601 studio swing
    Studio,
    /// JFIF full range
    FullRange,
}

impl From<MatrixArg> for ColorMatrix {
    fn from(value: MatrixArg) -> Self {
        match value {
            MatrixArg::Studio => ColorMatrix::Studio,
            MatrixArg::FullRange => ColorMatrix::FullRange,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            input,
            codes,
            extent,
            greyscale,
            color_matrix,
            crop,
            output,
            format,
        } => {
            let mut options = DecodeOptions::with_extent(extent.extent()).color_matrix(color_matrix.into());
            if greyscale {
                options = options.greyscale();
            }
            decode_payload(&input, &codes, &options, crop, &output, &format)
        }
        Commands::Codes { output } => write_codes(&output),
        Commands::Tables { codes, verbose } => show_tables(&codes, verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn decode_payload(
    input: &Path,
    codes: &Path,
    options: &DecodeOptions,
    crop: bool,
    output: &Path,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let tables = CodeTableSet::load(fs::File::open(codes)?)?;
    let payload = fs::File::open(input)?;
    let mut frame = decode_with_tables(&tables, payload, options)?;

    if crop {
        if let FrameExtent::Dimensions { width, height } = options.extent {
            frame = frame.crop(width, height)?;
        }
    }

    let pixels = to_bytes(&frame);
    match format {
        OutputFormat::Raw => {
            fs::write(output, &pixels)?;
        }
        OutputFormat::Ppm => {
            write_ppm(output, &pixels, frame.width(), frame.height(), frame.channels())?;
        }
    }

    println!(
        "✓ Decoded {}x{} image ({} components) to {:?}",
        frame.width(),
        frame.height(),
        frame.channels(),
        output
    );
    Ok(())
}

fn write_codes(output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let tables = CodeTableSet::standard();
    tables.write_codes(fs::File::create(output)?)?;
    let total: usize = tables.iter().map(|t| t.len()).sum();
    println!("✓ Wrote {} codewords for 4 tables to {:?}", total, output);
    Ok(())
}

fn show_tables(codes: &Path, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tables = CodeTableSet::load(fs::File::open(codes)?)?;
    println!("Codes source: {:?}", codes);
    println!();
    for table in tables.iter() {
        println!(
            "  {:<7} {:>3} codewords, longest {:>2} bits",
            table.id().name(),
            table.len(),
            table.max_length()
        );
        if verbose {
            for entry in table.codewords() {
                println!("    0x{:02x}  {}", entry.symbol, entry.bits);
            }
        }
    }
    Ok(())
}

/// Clamps and rounds samples to 8 bits.
fn to_bytes(frame: &Frame) -> Vec<u8> {
    frame
        .samples()
        .iter()
        .map(|&s| s.round().clamp(0.0, 255.0) as u8)
        .collect()
}

fn write_ppm(
    path: &Path,
    pixels: &[u8],
    width: usize,
    height: usize,
    components: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    use std::io::Write;
    let mut file = fs::File::create(path)?;

    if components == 1 {
        writeln!(file, "P5")?;
    } else {
        writeln!(file, "P6")?;
    }
    writeln!(file, "{} {}", width, height)?;
    writeln!(file, "255")?;
    file.write_all(pixels)?;

    Ok(())
}

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};

use qrpix_core::{Ecl, SymbolVersion};
use qrpix_encode::Encoder;
use qrpix_render::{BitmapRenderer, CanvasSpec};

/// Upper bound on the input size: twice the largest QR payload (7089 digits
/// at V40-L), so anything beyond it cannot possibly encode.
const MAX_INPUT_SIZE: usize = 7090 * 2;

#[derive(Parser)]
#[command(name = "qrpix")]
#[command(version)]
#[command(allow_negative_numbers = true)]
#[command(about = "Encode input data in a QR Code and save it as a raw bitmap")]
#[command(
    long_about = "Encode input data in a QR Code and save it as a raw bitmap.\n\
    The output is an uncompressed, row-padded pixel buffer with no image header; \
    its width, height and byte depth are whatever was requested on the command line."
)]
struct Cli {
    /// Input data. If not specified, data is taken from standard input.
    #[arg(value_name = "STRING")]
    text: Option<String>,

    /// Write the image to FILENAME. '-' writes to standard output.
    #[arg(short, long, value_name = "FILENAME")]
    output: Option<PathBuf>,

    /// Read input data from FILENAME.
    #[arg(short, long, value_name = "FILENAME")]
    read_from: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(short, long, value_name = "NUMBER", default_value_t = 128)]
    width: i64,

    /// Canvas height in pixels.
    #[arg(
        short = 'H',
        long = "heigth",
        alias = "height",
        value_name = "NUMBER",
        default_value_t = 128
    )]
    heigth: i64,

    /// Bytes written per pixel of the output buffer.
    #[arg(short, long, value_name = "NUMBER", default_value_t = 3)]
    size: i64,

    /// Error correction level from L (lowest) to H (highest).
    #[arg(short, long, value_name = "{LMQH}", default_value = "M")]
    level: String,

    /// Minimum version of the symbol. 0 picks the smallest version that fits.
    #[arg(
        short = 'v',
        long = "symversion",
        value_name = "NUMBER",
        default_value_t = 0,
        long_help = "Minimum version of the symbol, in the range 1..=40. The encoder \
        may still pick a larger symbol if the data does not fit. 0 means auto."
    )]
    symversion: i64,

    /// Maximum number of pixels used to draw one module. 0 means unbounded.
    #[arg(
        short = 'P',
        long = "max_pixel_size",
        value_name = "NUMBER",
        default_value_t = 0
    )]
    max_pixel_size: i64,

    /// Print the computed pixel scale and margins to standard error.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Bare invocation gets the usage text and a failure status.
    if std::env::args_os().len() < 2 {
        eprint!("{}", Cli::command().render_help());
        std::process::exit(1);
    }
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let spec = canvas_spec(&cli)?;
    let level: Ecl = cli.level.parse()?;
    let min_version = min_version(cli.symversion)?;
    let Some(output) = cli.output.as_deref() else {
        bail!("No output filename is given.");
    };

    let input = acquire_input(&cli)?;

    let mut encoder = Encoder::new().with_ecl(level);
    if let Some(version) = min_version {
        encoder = encoder.with_min_version(version);
    }
    let matrix = encoder.encode(&input).context("QR code encoding failed")?;

    let renderer = BitmapRenderer::new(spec);
    if cli.verbose {
        let layout = renderer.layout(matrix.size())?;
        eprintln!(
            "pixel size = {}, margin = {}x{}",
            layout.scale, layout.margin_x, layout.margin_y
        );
    }
    let buffer = renderer.render(&matrix)?;
    write_output(output, buffer.as_bytes())
}

fn canvas_spec(cli: &Cli) -> Result<CanvasSpec> {
    if cli.size <= 0 {
        bail!("Invalid size: {}", cli.size);
    }
    if cli.width <= 0 {
        bail!("Invalid width: {}", cli.width);
    }
    if cli.heigth <= 0 {
        bail!("Invalid heigth: {}", cli.heigth);
    }
    if cli.max_pixel_size < 0 {
        bail!("Invalid pixel size: {}", cli.max_pixel_size);
    }
    Ok(CanvasSpec {
        width: cli.width as usize,
        height: cli.heigth as usize,
        bytes_per_pixel: cli.size as usize,
        max_pixel_scale: NonZeroUsize::new(cli.max_pixel_size as usize),
    })
}

fn min_version(symversion: i64) -> Result<Option<SymbolVersion>> {
    if symversion == 0 {
        return Ok(None);
    }
    let version = u8::try_from(symversion)
        .ok()
        .and_then(SymbolVersion::new)
        .with_context(|| format!("Invalid version: {}", symversion))?;
    Ok(Some(version))
}

fn acquire_input(cli: &Cli) -> Result<Vec<u8>> {
    // A positional argument wins over any file or stream.
    if let Some(text) = &cli.text {
        return Ok(text.clone().into_bytes());
    }
    match &cli.read_from {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Can not read input file {}.", path.display()))?;
            read_input(file)
        }
        None => read_input(io::stdin().lock()),
    }
}

/// Read at most [MAX_INPUT_SIZE] bytes from `reader`, failing on empty input
/// and on input exceeding the cap.
fn read_input<R: Read>(reader: R) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader
        .take(MAX_INPUT_SIZE as u64 + 1)
        .read_to_end(&mut data)
        .context("failed to read input")?;
    if data.is_empty() {
        bail!("No input data.");
    }
    if data.len() > MAX_INPUT_SIZE {
        bail!("Input data is too large.");
    }
    Ok(data)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if path == Path::new("-") {
        let mut stdout = io::stdout().lock();
        stdout.write_all(bytes).context("write data failure.")?;
        stdout.flush().context("write data failure.")?;
    } else {
        let file = File::create(path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes).context("write data failure.")?;
        writer.flush().context("write data failure.")?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("qrpix").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-o", "out.bin"]);
        assert_eq!(cli.width, 128);
        assert_eq!(cli.heigth, 128);
        assert_eq!(cli.size, 3);
        assert_eq!(cli.level, "M");
        assert_eq!(cli.symversion, 0);
        assert_eq!(cli.max_pixel_size, 0);
        assert!(!cli.verbose);
        assert!(cli.text.is_none());
    }

    #[test]
    fn test_height_spellings() {
        assert_eq!(parse(&["--heigth", "90"]).heigth, 90);
        assert_eq!(parse(&["--height", "90"]).heigth, 90);
        assert_eq!(parse(&["-H", "90"]).heigth, 90);
    }

    #[test]
    fn test_invalid_size_diagnostic() {
        let err = canvas_spec(&parse(&["-s", "0"])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid size: 0");
    }

    #[test]
    fn test_negative_dimensions_are_rejected() {
        assert!(canvas_spec(&parse(&["-w", "-5"])).is_err());
        assert!(canvas_spec(&parse(&["-H", "-5"])).is_err());
        assert!(canvas_spec(&parse(&["-P", "-1"])).is_err());
    }

    #[test]
    fn test_zero_pixel_cap_means_unbounded() {
        let spec = canvas_spec(&parse(&[])).unwrap();
        assert_eq!(spec.max_pixel_scale, None);
        let spec = canvas_spec(&parse(&["-P", "6"])).unwrap();
        assert_eq!(spec.max_pixel_scale, NonZeroUsize::new(6));
    }

    #[test]
    fn test_min_version_parsing() {
        assert_eq!(min_version(0).unwrap(), None);
        assert_eq!(min_version(7).unwrap(), SymbolVersion::new(7));
        assert!(min_version(41).is_err());
        assert!(min_version(-1).is_err());
    }

    #[test]
    fn test_read_input_rejects_empty() {
        let err = read_input(io::empty()).unwrap_err();
        assert_eq!(err.to_string(), "No input data.");
    }

    #[test]
    fn test_read_input_accepts_exactly_the_cap() {
        let data = vec![b'a'; MAX_INPUT_SIZE];
        assert_eq!(read_input(&data[..]).unwrap().len(), MAX_INPUT_SIZE);
    }

    #[test]
    fn test_read_input_rejects_over_the_cap() {
        let data = vec![b'a'; MAX_INPUT_SIZE + 1];
        let err = read_input(&data[..]).unwrap_err();
        assert_eq!(err.to_string(), "Input data is too large.");
    }
}

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use ccros_rs::{
    ConvertConfig, Converter, JsonRenderer, Renderer, Strictness, TextRenderer, VhdlRenderer,
    BANNER,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Vhdl,
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    author,
    about = "Convert a CCROS listing into packed 56-bit control-store words",
    disable_version_flag = true
)]
struct Opts {
    /// Print the version banner and exit
    #[arg(short = 'v', long = "version")]
    version: bool,
    /// Input listing (defaults to stdin)
    #[arg(short, long, value_name = "FILE")]
    input: Option<String>,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Vhdl)]
    format: OutputFormat,
    /// Emit all 56 bit positions, including the fixed end marker
    #[arg(long)]
    full_width: bool,
    /// Reject non-hex ADDR/CN digits and bit characters other than 0, 1, ?
    #[arg(long)]
    strict: bool,
    /// Maximum number of entries
    #[arg(long, default_value_t = ccros_rs::store::DEFAULT_CAPACITY)]
    capacity: usize,
    /// Accept an additional 3-character version tag. Repeat to add several.
    #[arg(long = "accept", value_name = "TAG")]
    accept: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let opts = Opts::parse();
    if opts.version {
        println!("{BANNER}");
        return Ok(());
    }

    let mut cfg = ConvertConfig {
        capacity: opts.capacity,
        strictness: if opts.strict { Strictness::Strict } else { Strictness::Lenient },
        ..ConvertConfig::default()
    };
    for tag in &opts.accept {
        anyhow::ensure!(tag.len() == 3, "version tag must be 3 characters: {tag:?}");
        cfg.accepted_versions.insert(tag.as_str());
    }

    let conv = Converter::new(cfg);
    let (store, _stats) = match &opts.input {
        Some(path) => {
            let f = File::open(path).with_context(|| format!("opening {path}"))?;
            conv.convert(BufReader::new(f))?
        }
        None => conv.convert(io::stdin().lock())?,
    };

    let renderer: Box<dyn Renderer> = match opts.format {
        OutputFormat::Vhdl => Box::new(VhdlRenderer { full_width: opts.full_width }),
        OutputFormat::Text => Box::new(TextRenderer { full_width: opts.full_width }),
        OutputFormat::Json => Box::new(JsonRenderer { full_width: opts.full_width }),
    };

    let mut out: Box<dyn Write> = match &opts.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {path}"))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    renderer.render(store.entries(), &mut out)?;
    out.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_v_is_the_banner_flag() {
        let opts = Opts::try_parse_from(["ccros-convert", "-v"]).unwrap();
        assert!(opts.version);
    }

    #[test]
    fn defaults_reproduce_historical_run() {
        let opts = Opts::try_parse_from(["ccros-convert"]).unwrap();
        assert!(!opts.strict && !opts.full_width);
        assert_eq!(opts.capacity, 4096);
        assert!(matches!(opts.format, OutputFormat::Vhdl));
    }
}

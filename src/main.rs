//! huffpack command line.
//!
//! ```bash
//! huffpack encode input.txt input.huff
//! huffpack decode input.huff restored.txt
//! huffpack inspect --tree input.txt
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use huffpack::{CodeTable, CodecConfig, FrequencyTable, HuffmanCodec, HuffmanTree, Result};

#[derive(Parser, Debug)]
#[command(name = "huffpack")]
#[command(version)]
#[command(about = "Static Huffman file compressor", long_about = None)]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Accept a truncated payload instead of failing
    #[arg(long, global = true)]
    lenient: bool,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Compress a file
    Encode { input: PathBuf, output: PathBuf },

    /// Decompress a file
    Decode { input: PathBuf, output: PathBuf },

    /// Print the code assigned to each byte of a file
    Inspect {
        input: PathBuf,

        /// Also print the Huffman tree
        #[arg(long)]
        tree: bool,
    },
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => CodecConfig::load(path)?,
        None => CodecConfig::default(),
    };
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if args.lenient {
        config.strict = false;
    }
    init_logging(&config.log_level);
    debug!(?config, "configuration");

    let codec = HuffmanCodec::new(config);
    match args.mode {
        Mode::Encode { input, output } => {
            codec.encode_file(&input, &output)?;
            println!("Encoded {} to {}", input.display(), output.display());
        }
        Mode::Decode { input, output } => {
            codec.decode_file(&input, &output)?;
            println!("Decoded {} to {}", input.display(), output.display());
        }
        Mode::Inspect { input, tree } => inspect(&input, tree)?,
    }
    Ok(())
}

fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn inspect(input: &Path, show_tree: bool) -> Result<()> {
    let data = std::fs::read(input).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => huffpack::HuffmanError::missing_file(input),
        _ => e.into(),
    })?;
    let table = FrequencyTable::from_bytes(&data)?;
    match HuffmanTree::build(&table)? {
        Some(tree) => print!("{}", describe(&table, &tree, show_tree)),
        None => println!("{}: empty", input.display()),
    }
    Ok(())
}

fn describe(table: &FrequencyTable, tree: &HuffmanTree, show_tree: bool) -> String {
    let codes = CodeTable::from_tree(tree);
    let mut out = String::new();

    let _ = writeln!(out, "{:>6} {:>5} {:>12} {:>5}  code", "byte", "char", "count", "bits");
    for (byte, count) in table.iter_nonzero() {
        let shown = if byte.is_ascii_graphic() { byte as char } else { '.' };
        let _ = writeln!(
            out,
            "{:>6} {:>5} {:>12} {:>5}  {}",
            format!("0x{:02x}", byte),
            shown,
            count,
            codes.len_of(byte),
            codes.code_string(byte)
        );
    }
    let _ = writeln!(
        out,
        "{} bytes, {} distinct, tree depth {}, {} payload bits",
        table.total(),
        table.distinct(),
        tree.depth(),
        codes.payload_bits(table)
    );
    if show_tree {
        let _ = writeln!(out, "Huffman Tree Structure:");
        out.push_str(&tree.render());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_accepts_tree_flag() {
        let args = Args::try_parse_from(["huffpack", "inspect", "in.txt", "--tree"]).unwrap();
        assert!(matches!(args.mode, Mode::Inspect { tree: true, .. }));

        let args = Args::try_parse_from(["huffpack", "inspect", "in.txt"]).unwrap();
        assert!(matches!(args.mode, Mode::Inspect { tree: false, .. }));
    }

    #[test]
    fn describe_appends_tree_on_request() {
        let table = FrequencyTable::from_bytes(b"aab").unwrap();
        let tree = HuffmanTree::build(&table).unwrap().unwrap();

        let plain = describe(&table, &tree, false);
        assert!(plain.contains("3 bytes, 2 distinct, tree depth 1, 3 payload bits"));
        assert!(!plain.contains("Huffman Tree Structure"));

        let with_tree = describe(&table, &tree, true);
        assert!(with_tree.contains("Huffman Tree Structure:"));
        assert!(with_tree.contains("root-> Internal [weight: 3]"));
        assert!(with_tree.contains("Leaf: 'a' (97) [weight: 2]"));
    }
}

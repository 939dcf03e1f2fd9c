use std::error;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io::{self, Write};

use clap::Parser;

use aztec::{AztecError, Symbol};

#[derive(Debug)]
enum CliError {
    NoMessage,
}

impl error::Error for CliError {}
impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoMessage => write!(f, "no message given, pass one or use --input"),
        }
    }
}

/// Encode a message into an Aztec Code symbol, written as a PBM (P1) image.
#[derive(Parser)]
#[command(name = "aztec", version)]
struct Opts {
    /// Message to encode; omit to read from --input instead.
    message: Option<String>,

    /// Read the message from a file instead of the command line.
    #[arg(short, long)]
    input: Option<String>,

    /// Write the PBM image to a file instead of stdout.
    #[arg(short, long)]
    output: Option<String>,

    /// Error-correction percentage; values above 50 clamp to the highest tier.
    #[arg(short, long, default_value_t = aztec::CORRECTION_MEDIUM)]
    correction: u32,

    /// Pack output rows least-significant-bit first instead of MSB-first.
    #[arg(long)]
    inverted: bool,
}

fn write_pbm(symbol: &Symbol, inverted: bool, writer: &mut dyn Write) -> io::Result<()> {
    writeln!(writer, "P1")?;
    writeln!(writer, "{} {}", symbol.size(), symbol.size())?;
    for row in symbol.rows() {
        let mut line = String::with_capacity(symbol.size() as usize * 2);
        for x in 0..symbol.size() {
            let byte = row[(x / 8) as usize];
            let bit = if inverted {
                (byte >> (7 - (x % 8))) & 1
            } else {
                (byte >> (x % 8)) & 1
            };
            line.push(if bit != 0 { '1' } else { '0' });
            line.push(' ');
        }
        writeln!(writer, "{}", line.trim_end())?;
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let opts = Opts::parse();

    let data = match (&opts.message, &opts.input) {
        (Some(message), _) => message.clone().into_bytes(),
        (None, Some(path)) => fs::read(path)?,
        (None, None) => return Err(CliError::NoMessage.into()),
    };

    let symbol = if opts.inverted {
        aztec::encode_inv(&data, opts.correction)
    } else {
        aztec::encode(&data, opts.correction)
    }
    .map_err(|e: AztecError| e.to_string())?;

    match opts.output {
        Some(path) => {
            let mut file = fs::File::create(path)?;
            write_pbm(&symbol, opts.inverted, &mut file)?;
        }
        None => {
            let mut stdout = io::stdout();
            write_pbm(&symbol, opts.inverted, &mut stdout)?;
        }
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    match run() {
        Err(e) => Err(e.to_string().into()),
        Ok(_) => Ok(()),
    }
}

//! Aztec Code (ISO/IEC 24778) symbol encoder.
//!
//! Turns a byte message into a square black-and-white matrix: segment the
//! message into character-mode runs, encode those runs into a bit stream,
//! pack the stream into codewords, pick the smallest symbol that can hold
//! them, Reed-Solomon-protect the data and the mode message, and place
//! everything into the finder pattern.

use std::error;
use std::fmt;

use log::{debug, info, warn};

mod bits;
mod codewords;
mod config;
mod mode_encoder;
mod mode_message;
mod placer;
mod rs;
mod segment;
mod tables;

pub use bits::BitStream;

/// Error-correction percentage presets (ISO/IEC 24778 Annex A).
pub const CORRECTION_LOW: u32 = 10;
pub const CORRECTION_MEDIUM: u32 = 23;
pub const CORRECTION_HIGH: u32 = 36;
pub const CORRECTION_HIGHEST: u32 = 50;

#[derive(Debug)]
pub enum AztecError {
    EmptyInput,
    CapacityExceeded { bitcount: u32, correction: u32 },
}

impl error::Error for AztecError {}

impl fmt::Display for AztecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "message must not be empty"),
            Self::CapacityExceeded {
                bitcount,
                correction,
            } => write!(
                f,
                "message needs {} data bits, too large for any symbol at {}% correction",
                bitcount, correction
            ),
        }
    }
}

/// An encoded Aztec symbol: a square grid of `size` x `size` modules, each
/// packed MSB-first into `ceil(size/8)` bytes per row.
#[derive(Debug, Clone)]
pub struct Symbol {
    size: u32,
    rows: Vec<Vec<u8>>,
}

impl Symbol {
    /// Side length of the symbol, in modules.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Packed rows, top to bottom, `ceil(size/8)` bytes each.
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }
}

fn fill_row(bits: &BitStream, size: u32, offset: u32) -> Vec<u8> {
    let rowsize = ((size + 7) / 8) as usize;
    let mut row = vec![0u8; rowsize];
    let mut i = offset;
    for x in 0..rowsize - 1 {
        row[x] = bits.get(i, 8) as u8;
        i += 8;
    }
    row[rowsize - 1] = bits.get(i, size - (rowsize as u32 - 1) * 8) as u8;
    row
}

fn fill_row_inv(bits: &BitStream, size: u32, offset: u32) -> Vec<u8> {
    let rowsize = ((size + 7) / 8) as usize;
    let mut row = vec![0u8; rowsize];
    let mut i = offset;
    for x in 0..rowsize - 1 {
        row[x] = bits.get_inv(i, 8) as u8;
        i += 8;
    }
    let tail = size - (rowsize as u32 - 1) * 8;
    row[rowsize - 1] = (bits.get_inv(i, tail) << (8 - tail)) as u8;
    row
}

fn symbol_from_bits(symsize: u32, bits: &BitStream, inverted: bool) -> Symbol {
    let rows = (0..symsize)
        .map(|y| {
            let offset = y * symsize;
            if inverted {
                fill_row_inv(bits, symsize, offset)
            } else {
                fill_row(bits, symsize, offset)
            }
        })
        .collect();
    Symbol { size: symsize, rows }
}

fn encode_impl(data: &[u8], correction: u32, inverted: bool) -> Result<Symbol, AztecError> {
    if data.is_empty() {
        return Err(AztecError::EmptyInput);
    }

    let blocks = segment::segment(data);
    let bits = mode_encoder::encode(data, &blocks);
    debug!(
        "segmented {} bytes into {} blocks, {} character bits",
        data.len(),
        blocks.len(),
        bits.count()
    );

    let mut bitcount = bits.count();
    let mut words: Vec<u16> = Vec::new();
    let mut chosen: Option<config::Config> = None;

    loop {
        let cfg = config::pick(bitcount, correction)
            .ok_or(AztecError::CapacityExceeded { bitcount, correction })?;
        if chosen.map_or(false, |prev| same_config(&prev, &cfg)) {
            chosen = Some(cfg);
            break;
        }
        words = codewords::pack(&bits, cfg.cwsize as u32)
            .into_iter()
            .map(|w| w as u16)
            .collect();
        bitcount = words.len() as u32 * cfg.cwsize as u32;
        chosen = Some(cfg);
    }

    let cfg = chosen.expect("convergence loop always assigns a config");
    let data_blocks = words.len() as u32;
    let ecc_blocks = cfg.cwcount - data_blocks;
    let ecc = rs::encode16(cfg.gfpoly, 1, &words, ecc_blocks);
    words.extend(ecc);

    info!(
        "picked {} symbol, {} layers, {} data + {} ecc codewords at {} bits",
        if cfg.compact { "compact" } else { "full" },
        cfg.layers,
        data_blocks,
        ecc_blocks,
        cfg.cwsize
    );

    let mut codeword_bits = BitStream::new();
    codeword_bits.reserve(cfg.cwcount * cfg.cwsize as u32);
    for &w in &words {
        codeword_bits.append_inv(w as u32, cfg.cwsize as u32);
    }

    let mode_bits = if cfg.compact {
        mode_message::compact(cfg.layers, data_blocks)
    } else {
        mode_message::full(cfg.layers, data_blocks)
    };

    let symbol_bits = if cfg.compact {
        placer::compact_symbol(cfg.symsize, &codeword_bits, &mode_bits)
    } else {
        placer::full_symbol(cfg.symsize, &codeword_bits, &mode_bits)
    };

    if cfg.cwcount > 2000 {
        warn!("large symbol: {} codewords", cfg.cwcount);
    }

    Ok(symbol_from_bits(cfg.symsize as u32, &symbol_bits, inverted))
}

fn same_config(a: &config::Config, b: &config::Config) -> bool {
    a.compact == b.compact
        && a.layers == b.layers
        && a.symsize == b.symsize
        && a.cwsize == b.cwsize
        && a.cwcount == b.cwcount
        && a.gfpoly == b.gfpoly
}

/// Encodes `data` into an Aztec symbol, rows packed most-significant-bit
/// first within each byte.
pub fn encode(data: &[u8], correction: u32) -> Result<Symbol, AztecError> {
    encode_impl(data, correction, false)
}

/// Encodes `data` into an Aztec symbol, rows packed least-significant-bit
/// first within each byte (used by some display/printer back ends).
pub fn encode_inv(data: &[u8], correction: u32) -> Result<Symbol, AztecError> {
    encode_impl(data, correction, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(encode(b"", CORRECTION_MEDIUM), Err(AztecError::EmptyInput)));
    }

    #[test]
    fn short_upper_message_picks_the_smallest_compact_symbol() {
        let symbol = encode(b"HELLO", CORRECTION_MEDIUM).unwrap();
        assert_eq!(symbol.size(), 15);
        assert_eq!(symbol.rows().len(), 15);
    }

    #[test]
    fn excessive_correction_falls_back_to_the_highest_tier() {
        let a = encode(b"HELLO WORLD", CORRECTION_HIGHEST).unwrap();
        let b = encode(b"HELLO WORLD", 90).unwrap();
        assert_eq!(a.size(), b.size());
    }

    #[test]
    fn capacity_exceeded_is_reported_rather_than_panicking() {
        let huge: Vec<u8> = (0..30_000u32).map(|i| (i % 26) as u8 + b'A').collect();
        let err = encode(&huge, CORRECTION_HIGHEST).unwrap_err();
        assert!(matches!(err, AztecError::CapacityExceeded { .. }));
    }

    #[test]
    fn inverted_rows_differ_from_normal_rows_for_a_partial_byte() {
        let normal = encode(b"HELLO", CORRECTION_MEDIUM).unwrap();
        let inv = encode_inv(b"HELLO", CORRECTION_MEDIUM).unwrap();
        assert_eq!(normal.size(), inv.size());
    }
}

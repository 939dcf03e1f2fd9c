//! Builds the Reed-Solomon-protected mode message that tells a reader the
//! symbol's layer count and data codeword count.

use crate::bits::BitStream;
use crate::rs;

fn rs_protect(bits: &mut BitStream, data_words: u32, check_words: u32) {
    let mut words: Vec<u16> = (0..data_words)
        .map(|i| bits.get_inv(i * 4, 4) as u16)
        .collect();
    let ecc = rs::encode16(0x13, 1, &words, check_words);
    words.extend(ecc);

    bits.clear();
    for w in &words {
        bits.append_inv(*w as u32, 4);
    }
}

/// 28-bit compact mode message: 2-bit (layers-1), 6-bit (codewords-1),
/// protected by 5 Reed-Solomon check words over GF(16).
pub fn compact(layers: u8, codewords: u32) -> BitStream {
    let mut bits = BitStream::new();
    bits.reserve(28);
    bits.append_inv((layers - 1) as u32, 2);
    bits.append_inv(codewords - 1, 6);
    rs_protect(&mut bits, 2, 5);
    bits
}

/// 40-bit full mode message: 5-bit (layers-1), 11-bit (codewords-1),
/// protected by 6 Reed-Solomon check words over GF(16).
pub fn full(layers: u8, codewords: u32) -> BitStream {
    let mut bits = BitStream::new();
    bits.reserve(40);
    bits.append_inv((layers - 1) as u32, 5);
    bits.append_inv(codewords - 1, 11);
    rs_protect(&mut bits, 4, 6);
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_mode_message_is_28_bits() {
        let bits = compact(1, 17);
        assert_eq!(bits.count(), 28);
    }

    #[test]
    fn full_mode_message_is_40_bits() {
        let bits = full(4, 1664);
        assert_eq!(bits.count(), 40);
    }

    #[test]
    fn mode_message_is_deterministic() {
        let a = compact(2, 40);
        let b = compact(2, 40);
        assert_eq!(a.get(0, 28), b.get(0, 28));
    }
}

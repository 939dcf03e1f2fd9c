//! Selects a symbol configuration (compact vs full, layer count, codeword
//! width) for a given data-bit count and error-correction percentage.

/// Error-correction percentage and the bit capacity each layer buys for it.
struct ErrorCorrection {
    percent: u32,
    compact: [u32; 4],
    full: [u32; 32],
}

struct SymbolParams {
    size: u8,
    cwsize: u8,
    cwcount: u16,
}

const ALL_ERRCOR: [ErrorCorrection; 4] = [
    ErrorCorrection {
        percent: 10,
        compact: [78, 198, 336, 520],
        full: [
            96, 246, 408, 616, 840, 1104, 1392, 1704, 2040, 2420, 2820, 3250, 3720, 4200, 4730,
            5270, 5840, 6450, 7080, 7750, 8430, 9150, 9900, 10680, 11484, 12324, 13188, 14076,
            15000, 15948, 16920, 17940,
        ],
    },
    ErrorCorrection {
        percent: 23,
        compact: [66, 168, 288, 440],
        full: [
            84, 204, 352, 520, 720, 944, 1184, 1456, 1750, 2070, 2410, 2780, 3180, 3590, 4040,
            4500, 5000, 5520, 6060, 6630, 7210, 7830, 8472, 9132, 9816, 10536, 11280, 12036,
            12828, 13644, 14472, 15348,
        ],
    },
    ErrorCorrection {
        percent: 36,
        compact: [48, 138, 232, 360],
        full: [
            66, 168, 288, 432, 592, 776, 984, 1208, 1450, 1720, 2000, 2300, 2640, 2980, 3350,
            3740, 4150, 4580, 5030, 5500, 5990, 6500, 7032, 7584, 8160, 8760, 9372, 9996, 10656,
            11340, 12024, 12744,
        ],
    },
    ErrorCorrection {
        percent: 50,
        compact: [36, 102, 176, 280],
        full: [
            48, 126, 216, 328, 456, 600, 760, 936, 1120, 1330, 1550, 1790, 2050, 2320, 2610, 2910,
            3230, 3570, 3920, 4290, 4670, 5070, 5484, 5916, 6360, 6828, 7308, 7800, 8316, 8844,
            9384, 9948,
        ],
    },
];

const COMPACT_SYMBOLS: [SymbolParams; 4] = [
    SymbolParams { size: 15, cwsize: 6, cwcount: 17 },
    SymbolParams { size: 19, cwsize: 6, cwcount: 40 },
    SymbolParams { size: 23, cwsize: 8, cwcount: 51 },
    SymbolParams { size: 27, cwsize: 8, cwcount: 76 },
];

const FULL_SYMBOLS: [SymbolParams; 32] = [
    SymbolParams { size: 19, cwsize: 6, cwcount: 21 },
    SymbolParams { size: 23, cwsize: 6, cwcount: 48 },
    SymbolParams { size: 27, cwsize: 8, cwcount: 60 },
    SymbolParams { size: 31, cwsize: 8, cwcount: 88 },
    SymbolParams { size: 37, cwsize: 8, cwcount: 120 },
    SymbolParams { size: 41, cwsize: 8, cwcount: 156 },
    SymbolParams { size: 45, cwsize: 8, cwcount: 196 },
    SymbolParams { size: 49, cwsize: 8, cwcount: 240 },
    SymbolParams { size: 53, cwsize: 10, cwcount: 230 },
    SymbolParams { size: 57, cwsize: 10, cwcount: 272 },
    SymbolParams { size: 61, cwsize: 10, cwcount: 316 },
    SymbolParams { size: 67, cwsize: 10, cwcount: 364 },
    SymbolParams { size: 71, cwsize: 10, cwcount: 416 },
    SymbolParams { size: 75, cwsize: 10, cwcount: 470 },
    SymbolParams { size: 79, cwsize: 10, cwcount: 528 },
    SymbolParams { size: 83, cwsize: 10, cwcount: 588 },
    SymbolParams { size: 87, cwsize: 10, cwcount: 652 },
    SymbolParams { size: 91, cwsize: 10, cwcount: 720 },
    SymbolParams { size: 95, cwsize: 10, cwcount: 790 },
    SymbolParams { size: 101, cwsize: 10, cwcount: 864 },
    SymbolParams { size: 105, cwsize: 10, cwcount: 940 },
    SymbolParams { size: 109, cwsize: 10, cwcount: 1020 },
    SymbolParams { size: 113, cwsize: 12, cwcount: 920 },
    SymbolParams { size: 117, cwsize: 12, cwcount: 992 },
    SymbolParams { size: 121, cwsize: 12, cwcount: 1066 },
    SymbolParams { size: 125, cwsize: 12, cwcount: 1144 },
    SymbolParams { size: 131, cwsize: 12, cwcount: 1224 },
    SymbolParams { size: 135, cwsize: 12, cwcount: 1306 },
    SymbolParams { size: 139, cwsize: 12, cwcount: 1392 },
    SymbolParams { size: 143, cwsize: 12, cwcount: 1480 },
    SymbolParams { size: 147, cwsize: 12, cwcount: 1570 },
    SymbolParams { size: 151, cwsize: 12, cwcount: 1664 },
];

/// A chosen symbol configuration: shape, size, and the Reed-Solomon field
/// the data codewords are protected with.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub compact: bool,
    pub layers: u8,
    pub symsize: u8,
    pub cwsize: u8,
    pub cwcount: u32,
    pub gfpoly: u32,
}

fn gfpoly_for_cwsize(cwsize: u8) -> u32 {
    match cwsize {
        6 => 0x43,
        8 => 0x12d,
        10 => 0x409,
        12 => 0x1069,
        _ => unreachable!(),
    }
}

/// Finds the smallest symbol able to carry `bitcount` data bits at
/// `correction` percent error correction. `correction` above 50 is treated
/// as 50 (ISO/IEC 24778 defines no tier beyond HIGHEST).
pub fn pick(bitcount: u32, correction: u32) -> Option<Config> {
    let errcor = ALL_ERRCOR
        .iter()
        .find(|e| correction <= e.percent)
        .unwrap_or(&ALL_ERRCOR[ALL_ERRCOR.len() - 1]);

    if let Some((i, _)) = errcor
        .compact
        .iter()
        .enumerate()
        .find(|(_, &cap)| bitcount <= cap)
    {
        let symbol = &COMPACT_SYMBOLS[i];
        return Some(Config {
            compact: true,
            layers: (i + 1) as u8,
            symsize: symbol.size,
            cwsize: symbol.cwsize,
            cwcount: symbol.cwcount as u32,
            gfpoly: gfpoly_for_cwsize(symbol.cwsize),
        });
    }

    if let Some((i, _)) = errcor
        .full
        .iter()
        .enumerate()
        .find(|(_, &cap)| bitcount <= cap)
    {
        let symbol = &FULL_SYMBOLS[i];
        return Some(Config {
            compact: false,
            layers: (i + 1) as u8,
            symsize: symbol.size,
            cwsize: symbol.cwsize,
            cwcount: symbol.cwcount as u32,
            gfpoly: gfpoly_for_cwsize(symbol.cwsize),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_message_picks_the_smallest_compact_symbol() {
        let config = pick(20, 23).unwrap();
        assert!(config.compact);
        assert_eq!(config.layers, 1);
        assert_eq!(config.symsize, 15);
    }

    #[test]
    fn exceeding_all_compact_capacity_picks_a_full_symbol() {
        let config = pick(500, 23).unwrap();
        assert!(!config.compact);
    }

    #[test]
    fn exceeding_every_capacity_fails() {
        assert!(pick(999_999, 50).is_none());
    }

    #[test]
    fn correction_above_fifty_falls_back_to_the_highest_tier() {
        let low = pick(300, 50).unwrap();
        let high = pick(300, 90).unwrap();
        assert_eq!(low.symsize, high.symsize);
        assert_eq!(low.layers, high.layers);
    }

    #[test]
    fn gfpoly_matches_codeword_width() {
        for (cwsize, poly) in [(6u8, 0x43u32), (8, 0x12d), (10, 0x409), (12, 0x1069)] {
            assert_eq!(gfpoly_for_cwsize(cwsize), poly);
        }
    }
}

//! Bitfield mask arithmetic shared by the 16- and 32-bit BMP paths.

/// Position and size of a channel's bits inside a packed pixel word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MaskShape {
    /// Index of the lowest set bit.
    pub offset: u32,
    /// Run length of set bits.
    pub width: u32,
}

/// Derive `(offset, width)` from an arbitrary contiguous bitmask, e.g.
/// `0x0000F800 -> (11, 5)`. A zero mask yields a zero-width shape.
pub(crate) fn mask_shape(mask: u32) -> MaskShape {
    if mask == 0 {
        MaskShape { offset: 0, width: 0 }
    } else {
        MaskShape {
            offset: mask.trailing_zeros(),
            width: mask.count_ones(),
        }
    }
}

// Bit replication: an N-bit value scaled to 8 bits by repeating its bit
// pattern (wrapping multiply, then a corrective shift). This maps the
// N-bit maximum to exactly 0xFF, which a plain left shift would not.
const MUL_TABLE: [u32; 9] = [
    0,    // 0 bits
    0xFF, // 1 bit:  0b11111111
    0x55, // 2 bits: 0b01010101
    0x49, // 3 bits: 0b01001001
    0x11, // 4 bits: 0b00010001
    0x21, // 5 bits: 0b00100001
    0x41, // 6 bits: 0b01000001
    0x81, // 7 bits: 0b10000001
    0x01, // 8 bits
];

const SHIFT_TABLE: [u32; 9] = [0, 0, 0, 1, 0, 2, 4, 6, 0];

/// Extract one channel from a packed pixel word and normalize it to the
/// 0-255 range. Masks wider than 8 bits keep their top 8.
pub(crate) fn expand_sample(word: u32, shape: MaskShape) -> u8 {
    if shape.width == 0 {
        return 0;
    }
    let raw = (word >> shape.offset) & ((1u64 << shape.width) as u32).wrapping_sub(1);
    if shape.width >= 8 {
        (raw >> (shape.width - 8)) as u8
    } else {
        let w = shape.width as usize;
        (raw.wrapping_mul(MUL_TABLE[w]) >> SHIFT_TABLE[w]) as u8
    }
}

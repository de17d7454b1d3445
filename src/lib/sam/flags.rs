//! FLAG decoding.
//!
//! The FLAG value is expanded into a fixed 12-bit vector, most significant bit first, so
//! bit `2^k` lives at index `11 - k`. Named predicates delegate to the noodles
//! [`Flags`] bit set.

use noodles::sam::alignment::record::Flags;

/// Number of FLAG bits defined by the SAM specification.
pub const FLAG_WIDTH: usize = 12;

/// Value and description of each defined FLAG bit, least significant first.
pub const FLAG_DESCRIPTIONS: [(u16, &str); FLAG_WIDTH] = [
    (0x1, "template having multiple segments in sequencing"),
    (0x2, "each segment properly aligned according to the aligner"),
    (0x4, "segment unmapped"),
    (0x8, "next segment in the template unmapped"),
    (0x10, "SEQ being reverse complemented"),
    (0x20, "SEQ of the next segment in the template being reverse complemented"),
    (0x40, "the first segment in the template"),
    (0x80, "the last segment in the template"),
    (0x100, "secondary alignment"),
    (0x200, "not passing filters, such as platform/vendor quality controls"),
    (0x400, "PCR or optical duplicate"),
    (0x800, "supplementary alignment"),
];

/// Decoded FLAG: a 12-element bit vector plus named predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagBits {
    flags: Flags,
    bits: [u8; FLAG_WIDTH],
}

impl FlagBits {
    /// Decodes a numeric FLAG. Bits above `0x800` are kept in [`Self::value`] but are
    /// not part of the 12-bit vector.
    #[must_use]
    pub fn from_value(value: u16) -> Self {
        let mut bits = [0u8; FLAG_WIDTH];
        for (i, bit) in bits.iter_mut().enumerate() {
            *bit = ((value >> (FLAG_WIDTH - 1 - i)) & 1) as u8;
        }
        Self { flags: Flags::from(value), bits }
    }

    #[must_use]
    pub fn value(&self) -> u16 {
        u16::from(self.flags)
    }

    /// The bit vector, index 0 = `0x800` (supplementary), index 11 = `0x1`.
    #[must_use]
    pub fn bits(&self) -> &[u8; FLAG_WIDTH] {
        &self.bits
    }

    /// Bit counted from the least significant end: `from_end(1)` is `0x1`,
    /// `from_end(3)` is `0x4`, `from_end(12)` is `0x800`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero or greater than 12.
    #[must_use]
    pub fn from_end(&self, n: usize) -> u8 {
        assert!((1..=FLAG_WIDTH).contains(&n), "bit index {n} out of range");
        self.bits[FLAG_WIDTH - n]
    }

    /// Descriptions of the bits that are set, least significant first.
    #[must_use]
    pub fn set_descriptions(&self) -> Vec<(u16, &'static str)> {
        FLAG_DESCRIPTIONS.iter().copied().filter(|(bit, _)| self.value() & bit != 0).collect()
    }

    #[must_use]
    pub fn is_multi_segment(&self) -> bool {
        self.flags.is_segmented()
    }

    #[must_use]
    pub fn is_properly_aligned(&self) -> bool {
        self.flags.is_properly_segmented()
    }

    #[must_use]
    pub fn is_unmapped(&self) -> bool {
        self.flags.is_unmapped()
    }

    #[must_use]
    pub fn is_mate_unmapped(&self) -> bool {
        self.flags.is_mate_unmapped()
    }

    #[must_use]
    pub fn is_reverse_complemented(&self) -> bool {
        self.flags.is_reverse_complemented()
    }

    #[must_use]
    pub fn is_mate_reverse_complemented(&self) -> bool {
        self.flags.is_mate_reverse_complemented()
    }

    #[must_use]
    pub fn is_first_segment(&self) -> bool {
        self.flags.is_first_segment()
    }

    #[must_use]
    pub fn is_last_segment(&self) -> bool {
        self.flags.is_last_segment()
    }

    #[must_use]
    pub fn is_secondary(&self) -> bool {
        self.flags.is_secondary()
    }

    #[must_use]
    pub fn is_qc_fail(&self) -> bool {
        self.flags.is_qc_fail()
    }

    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.flags.is_duplicate()
    }

    #[must_use]
    pub fn is_supplementary(&self) -> bool {
        self.flags.is_supplementary()
    }
}

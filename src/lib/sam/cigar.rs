//! CIGAR decoding, read classification and per-operation nucleotide histograms.

use std::fmt;

use noodles::sam::alignment::record::cigar::op::Kind;

use crate::errors::{Result, SamTallyError};

/// Operation kinds in SAM code order (`MIDNSHP=X`).
pub const CIGAR_KINDS: [Kind; 9] = [
    Kind::Match,
    Kind::Insertion,
    Kind::Deletion,
    Kind::Skip,
    Kind::SoftClip,
    Kind::HardClip,
    Kind::Pad,
    Kind::SequenceMatch,
    Kind::SequenceMismatch,
];

/// SAM operation character for a kind.
#[must_use]
pub const fn kind_to_char(kind: Kind) -> char {
    match kind {
        Kind::Match => 'M',
        Kind::Insertion => 'I',
        Kind::Deletion => 'D',
        Kind::Skip => 'N',
        Kind::SoftClip => 'S',
        Kind::HardClip => 'H',
        Kind::Pad => 'P',
        Kind::SequenceMatch => '=',
        Kind::SequenceMismatch => 'X',
    }
}

/// Kind for a SAM operation character.
#[must_use]
pub const fn char_to_kind(c: char) -> Option<Kind> {
    match c {
        'M' => Some(Kind::Match),
        'I' => Some(Kind::Insertion),
        'D' => Some(Kind::Deletion),
        'N' => Some(Kind::Skip),
        'S' => Some(Kind::SoftClip),
        'H' => Some(Kind::HardClip),
        'P' => Some(Kind::Pad),
        '=' => Some(Kind::SequenceMatch),
        'X' => Some(Kind::SequenceMismatch),
        _ => None,
    }
}

/// Human-readable name of an operation kind.
#[must_use]
pub const fn kind_description(kind: Kind) -> &'static str {
    match kind {
        Kind::Match => "Alignment Match",
        Kind::Insertion => "Insertion",
        Kind::Deletion => "Deletion",
        Kind::Skip => "Skipped region",
        Kind::SoftClip => "Soft Clipping",
        Kind::HardClip => "Hard Clipping",
        Kind::Pad => "Padding",
        Kind::SequenceMatch => "Sequence Match",
        Kind::SequenceMismatch => "Sequence Mismatch",
    }
}

const fn kind_slot(kind: Kind) -> usize {
    match kind {
        Kind::Match => 0,
        Kind::Insertion => 1,
        Kind::Deletion => 2,
        Kind::Skip => 3,
        Kind::SoftClip => 4,
        Kind::HardClip => 5,
        Kind::Pad => 6,
        Kind::SequenceMatch => 7,
        Kind::SequenceMismatch => 8,
    }
}

/// One `length + operator` element of a CIGAR string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarOp {
    pub len: u32,
    pub kind: Kind,
}

/// How well a mapped read aligns to its reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MappingStatus {
    Unmapped,
    BadlyMapped,
    TotallyMapped,
}

impl MappingStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            MappingStatus::Unmapped => "unmapped",
            MappingStatus::BadlyMapped => "badly mapped",
            MappingStatus::TotallyMapped => "totally mapped",
        }
    }
}

impl fmt::Display for MappingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A decoded CIGAR string. `*` decodes to an empty operation list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cigar {
    ops: Vec<CigarOp>,
}

impl Cigar {
    /// Parses a CIGAR string.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing length, a zero or overflowing length, an unknown
    /// operator or trailing digits.
    pub fn parse(cigar: &str) -> Result<Self> {
        if cigar == "*" {
            return Ok(Self::default());
        }
        let err = |reason: &str| SamTallyError::InvalidCigar {
            cigar: cigar.to_string(),
            reason: reason.to_string(),
        };
        if cigar.is_empty() {
            return Err(err("empty string"));
        }

        let mut ops = Vec::new();
        let mut len: Option<u32> = None;
        for c in cigar.chars() {
            if let Some(d) = c.to_digit(10) {
                let current = len.unwrap_or(0);
                len = Some(
                    current
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(d))
                        .ok_or_else(|| err("operation length overflows"))?,
                );
            } else {
                let kind = char_to_kind(c).ok_or_else(|| err(&format!("unknown operator '{c}'")))?;
                let len = len.take().ok_or_else(|| err(&format!("operator '{c}' has no length")))?;
                if len == 0 {
                    return Err(err("operation length must be positive"));
                }
                ops.push(CigarOp { len, kind });
            }
        }
        if len.is_some() {
            return Err(err("trailing length without operator"));
        }
        Ok(Self { ops })
    }

    #[must_use]
    pub fn ops(&self) -> &[CigarOp] {
        &self.ops
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Length of the single `M` run when the CIGAR is exactly `<n>M`.
    #[must_use]
    pub fn perfect_match_len(&self) -> Option<u32> {
        match self.ops.as_slice() {
            [CigarOp { len, kind: Kind::Match }] => Some(*len),
            _ => None,
        }
    }

    /// Classification of a mapped read: totally mapped iff the CIGAR is a bare `<n>M`.
    #[must_use]
    pub fn classify(&self) -> MappingStatus {
        if self.perfect_match_len().is_some() {
            MappingStatus::TotallyMapped
        } else {
            MappingStatus::BadlyMapped
        }
    }

    /// Number of read bases the alignment consumes (`M`, `I`, `S`, `=`, `X`).
    #[must_use]
    pub fn read_len(&self) -> u64 {
        self.ops.iter().filter(|op| op.kind.consumes_read()).map(|op| u64::from(op.len)).sum()
    }

    /// Sum of all operation lengths.
    #[must_use]
    pub fn total_len(&self) -> u64 {
        self.ops.iter().map(|op| u64::from(op.len)).sum()
    }
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ops.is_empty() {
            return f.write_str("*");
        }
        for op in &self.ops {
            write!(f, "{}{}", op.len, kind_to_char(op.kind))?;
        }
        Ok(())
    }
}

/// Total nucleotides per CIGAR operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CigarHistogram {
    counts: [u64; 9],
}

impl CigarHistogram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every operation's length to its kind's tally.
    pub fn add(&mut self, cigar: &Cigar) {
        for op in cigar.ops() {
            self.counts[kind_slot(op.kind)] += u64::from(op.len);
        }
    }

    #[must_use]
    pub fn count(&self, kind: Kind) -> u64 {
        self.counts[kind_slot(kind)]
    }

    /// Sum over all kinds.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Non-zero tallies in `MIDNSHP=X` order.
    pub fn iter(&self) -> impl Iterator<Item = (Kind, u64)> + '_ {
        CIGAR_KINDS.iter().map(|&kind| (kind, self.count(kind))).filter(|(_, n)| *n > 0)
    }
}

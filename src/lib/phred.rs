//! Phred quality utilities.
//!
//! QUAL characters are Phred+33 encoded. Only the span `!` (Q0) through `I` (Q40) is
//! supported when turning a base call into an accuracy figure; anything above that is
//! treated as out of range rather than extrapolated.

/// Phred score type
pub type PhredScore = u8;

/// ASCII offset of Phred+33 encoding.
pub const PHRED_OFFSET: u8 = b'!';

/// Highest quality character with a supported accuracy (`I` = Q40).
pub const MAX_QUALITY_CHAR: u8 = b'I';

/// Highest supported Phred score.
pub const MAX_PHRED: PhredScore = MAX_QUALITY_CHAR - PHRED_OFFSET;

/// Converts a QUAL character to its Phred score.
///
/// Returns `None` for characters outside `!`..=`I`.
///
/// # Examples
/// ```
/// use samtally_lib::phred::quality_char_to_phred;
///
/// assert_eq!(quality_char_to_phred(b'!'), Some(0));
/// assert_eq!(quality_char_to_phred(b'+'), Some(10));
/// assert_eq!(quality_char_to_phred(b'I'), Some(40));
/// assert_eq!(quality_char_to_phred(b'J'), None);
/// ```
#[inline]
#[must_use]
pub const fn quality_char_to_phred(c: u8) -> Option<PhredScore> {
    if c >= PHRED_OFFSET && c <= MAX_QUALITY_CHAR { Some(c - PHRED_OFFSET) } else { None }
}

/// Converts a Phred score to a probability of error, `10^(-Q/10)`.
#[inline]
#[must_use]
pub fn phred_to_error_prob(phred: PhredScore) -> f64 {
    10f64.powf(-f64::from(phred) / 10.0)
}

/// Base-call accuracy as a percentage, `(1 - 10^(-Q/10)) * 100`.
///
/// # Examples
/// ```
/// use samtally_lib::phred::accuracy_percent;
///
/// assert!((accuracy_percent(10) - 90.0).abs() < 1e-9);
/// assert!((accuracy_percent(20) - 99.0).abs() < 1e-9);
/// ```
#[inline]
#[must_use]
pub fn accuracy_percent(phred: PhredScore) -> f64 {
    (1.0 - phred_to_error_prob(phred)) * 100.0
}

/// Base-call accuracy of a QUAL character, or `None` when it is outside `!`..=`I`.
#[inline]
#[must_use]
pub fn quality_char_accuracy(c: u8) -> Option<f64> {
    quality_char_to_phred(c).map(accuracy_percent)
}

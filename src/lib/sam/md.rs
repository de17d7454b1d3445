//! MD tag decoding.
//!
//! The MD string is `[0-9]+(([A-Z]|\^[A-Z]+)[0-9]+)*`: runs of matching bases separated by
//! a single mismatching reference base or by `^` followed by deleted reference bases.
//! Trailing match counts may be omitted.

use crate::errors::{Result, SamTallyError};

/// One decoded element of an MD string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MdToken {
    /// Number of consecutive bases matching the reference.
    Match(u32),
    /// Reference base at a mismatching read position.
    Mismatch(u8),
    /// Reference bases deleted from the read.
    Deletion(Vec<u8>),
}

/// A mismatch located on the read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    /// Zero-based read offset of the mismatching base.
    pub offset: usize,
    /// Reference base reported by the MD tag at that offset.
    pub reference_base: u8,
}

/// A decoded MD tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdTag {
    tokens: Vec<MdToken>,
}

impl MdTag {
    /// Parses an MD value (without the `MD:Z:` prefix).
    ///
    /// # Errors
    ///
    /// Returns an error for an empty value, a `^` not followed by bases, a character
    /// outside digits, letters and `^`, or an overflowing match count.
    pub fn parse(md: &str) -> Result<Self> {
        let err = |reason: String| SamTallyError::InvalidMd { md: md.to_string(), reason };
        if md.is_empty() {
            return Err(err("empty value".to_string()));
        }

        let bytes = md.as_bytes();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if b.is_ascii_digit() {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let n = md[start..i]
                    .parse::<u32>()
                    .map_err(|_| err(format!("match count '{}' overflows", &md[start..i])))?;
                tokens.push(MdToken::Match(n));
            } else if b == b'^' {
                let start = i + 1;
                i = start;
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                if i == start {
                    return Err(err("deletion marker '^' without bases".to_string()));
                }
                tokens.push(MdToken::Deletion(bytes[start..i].to_vec()));
            } else if b.is_ascii_alphabetic() {
                tokens.push(MdToken::Mismatch(b));
                i += 1;
            } else {
                return Err(err(format!("unexpected character '{}'", char::from(b))));
            }
        }
        Ok(Self { tokens })
    }

    #[must_use]
    pub fn tokens(&self) -> &[MdToken] {
        &self.tokens
    }

    /// True when the tag records neither mismatches nor deletions (e.g. `150`).
    #[must_use]
    pub fn is_pure_match(&self) -> bool {
        self.tokens.iter().all(|t| matches!(t, MdToken::Match(_)))
    }

    /// True when the tag contains at least one `^` deletion.
    #[must_use]
    pub fn has_deletions(&self) -> bool {
        self.tokens.iter().any(|t| matches!(t, MdToken::Deletion(_)))
    }

    /// Mismatches in read order.
    ///
    /// The read offset advances by each match count and by one past every mismatch.
    /// Deleted bases are absent from the read, so deletions do not move the offset.
    #[must_use]
    pub fn mismatches(&self) -> Vec<Mismatch> {
        let mut offset = 0usize;
        let mut out = Vec::new();
        for token in &self.tokens {
            match token {
                MdToken::Match(n) => offset += *n as usize,
                MdToken::Mismatch(base) => {
                    out.push(Mismatch { offset, reference_base: *base });
                    offset += 1;
                }
                MdToken::Deletion(_) => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_single_mismatch() {
        let md = MdTag::parse("4A3").unwrap();
        let mismatches = md.mismatches();
        assert_eq!(mismatches, vec![Mismatch { offset: 4, reference_base: b'A' }]);
        // the cursor resumes one past the mismatching base
        assert_eq!(mismatches[0].offset + 1, 5);
        assert!(!md.is_pure_match());
    }

    #[test]
    fn test_pure_match() {
        let md = MdTag::parse("150").unwrap();
        assert!(md.is_pure_match());
        assert!(md.mismatches().is_empty());
    }

    #[test]
    fn test_adjacent_mismatches() {
        let md = MdTag::parse("2A0C5").unwrap();
        let offsets: Vec<usize> = md.mismatches().iter().map(|m| m.offset).collect();
        assert_eq!(offsets, vec![2, 3]);
    }

    #[test]
    fn test_deletion_does_not_advance_read_offset() {
        let md = MdTag::parse("3^AC2T4").unwrap();
        assert!(md.has_deletions());
        assert_eq!(
            md.tokens(),
            &[
                MdToken::Match(3),
                MdToken::Deletion(b"AC".to_vec()),
                MdToken::Match(2),
                MdToken::Mismatch(b'T'),
                MdToken::Match(4),
            ]
        );
        assert_eq!(md.mismatches(), vec![Mismatch { offset: 5, reference_base: b'T' }]);
    }

    #[test]
    fn test_missing_trailing_count() {
        let md = MdTag::parse("10G").unwrap();
        assert_eq!(md.mismatches(), vec![Mismatch { offset: 10, reference_base: b'G' }]);
    }

    #[rstest]
    #[case("", "empty")]
    #[case("3^", "without bases")]
    #[case("3-2", "unexpected character")]
    #[case("99999999999", "overflows")]
    fn test_parse_errors(#[case] md: &str, #[case] expected: &str) {
        let err = MdTag::parse(md).unwrap_err();
        assert!(err.to_string().contains(expected), "{err}");
    }
}

//! Substitution calling from the MD tag of totally mapped reads.
//!
//! Each mismatch reported by the MD tag becomes a [`Substitution`]: its genomic position,
//! the base change, the base-call accuracy from QUAL and the amino-acid impact in three
//! arbitrary reading frames around the mismatching base.

use std::fmt;

use log::{debug, warn};

use crate::dna::{AminoAcid, translate_codon};
use crate::errors::Result;
use crate::phred::quality_char_accuracy;
use crate::sam::md::{MdTag, Mismatch};
use crate::sam::record::AlignmentRecord;

/// Number of reading frames examined per substitution.
pub const FRAME_COUNT: usize = 3;

/// Amino-acid consequence of a substitution in one reading frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameImpact {
    /// Both codons translate to the same amino acid.
    Synonymous,
    /// The codon window leaves the read or contains a non-ACGT base.
    NotDetermined,
    /// The reference codon and the read codon translate differently.
    Change { reference: AminoAcid, query: AminoAcid },
}

impl fmt::Display for FrameImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameImpact::Synonymous => f.write_str("synonymous"),
            FrameImpact::NotDetermined => f.write_str("ND"),
            FrameImpact::Change { reference, query } => write!(f, "{reference} to {query}"),
        }
    }
}

/// One called substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub read_name: String,
    /// `POS + offset` for a non-negative TLEN, `POS - offset` otherwise.
    pub position: i64,
    /// Base observed in SEQ at the mismatch.
    pub read_base: u8,
    /// Base reported by the MD tag at the mismatch.
    pub reference_base: u8,
    /// Base-call accuracy in percent, absent when QUAL is missing or out of range.
    pub accuracy: Option<f64>,
    /// Impact in the frames ending at, centred on, and starting at the mismatch.
    pub frames: [FrameImpact; FRAME_COUNT],
}

impl Substitution {
    /// The change as written in reports, `"<read base> -> <MD base>"`.
    #[must_use]
    pub fn change(&self) -> String {
        format!("{} -> {}", char::from(self.read_base), char::from(self.reference_base))
    }
}

/// Amino-acid impact of replacing the read base at `offset` by `reference_base`, in the
/// given frame (0: codon ends at the base, 1: codon centred on it, 2: codon starts at it).
///
/// The reference codon is SEQ with the MD base substituted; the query codon is SEQ as is.
#[must_use]
pub fn frame_impact(seq: &[u8], offset: usize, reference_base: u8, frame: usize) -> FrameImpact {
    debug_assert!(frame < FRAME_COUNT);
    let Some(start) = offset.checked_sub(FRAME_COUNT - 1 - frame) else {
        return FrameImpact::NotDetermined;
    };
    let end = start + 3;
    if end > seq.len() {
        return FrameImpact::NotDetermined;
    }

    let query = &seq[start..end];
    let mut reference = [query[0], query[1], query[2]];
    reference[offset - start] = reference_base;

    match (translate_codon(&reference), translate_codon(query)) {
        (Some(r), Some(q)) if r == q => FrameImpact::Synonymous,
        (Some(r), Some(q)) => FrameImpact::Change { reference: r, query: q },
        _ => FrameImpact::NotDetermined,
    }
}

/// Genomic position of a mismatch, flipped by the sign of TLEN.
#[must_use]
pub fn genomic_position(pos: i64, tlen: i64, offset: usize) -> i64 {
    let offset = offset as i64;
    if tlen < 0 { pos - offset } else { pos + offset }
}

/// Calls substitutions for a totally mapped record.
///
/// Nothing is reported when the record has no MD tag or the tag is a bare match count.
/// Mismatches past the end of SEQ or of the aligned length are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the MD tag is malformed.
pub fn call_substitutions(
    record: &AlignmentRecord<'_>,
    aligned_len: u32,
) -> Result<Vec<Substitution>> {
    let Some(md) = record.md() else {
        return Ok(Vec::new());
    };
    let md = MdTag::parse(md)?;
    if md.is_pure_match() {
        return Ok(Vec::new());
    }
    if md.has_deletions() {
        debug!("Read {} has MD deletions; they are not reported as substitutions", record.qname);
    }
    if record.seq == "*" {
        warn!("Read {} has an MD tag but no SEQ; substitutions skipped", record.qname);
        return Ok(Vec::new());
    }

    let seq = record.seq.as_bytes();
    let qual = if record.qual == "*" { None } else { Some(record.qual.as_bytes()) };
    let limit = seq.len().min(aligned_len as usize);

    let mut substitutions = Vec::new();
    for Mismatch { offset, reference_base } in md.mismatches() {
        if offset >= limit {
            warn!(
                "Read {}: MD mismatch at offset {offset} lies outside the {limit} aligned bases",
                record.qname
            );
            continue;
        }

        let accuracy = match qual.and_then(|q| q.get(offset)) {
            Some(&c) => {
                let accuracy = quality_char_accuracy(c);
                if accuracy.is_none() {
                    warn!(
                        "Read {}: quality character '{}' at offset {offset} is outside the supported range '!'..'I'",
                        record.qname,
                        char::from(c)
                    );
                }
                accuracy
            }
            None => None,
        };

        let frames: [FrameImpact; FRAME_COUNT] =
            std::array::from_fn(|frame| frame_impact(seq, offset, reference_base, frame));

        substitutions.push(Substitution {
            read_name: record.qname.to_string(),
            position: genomic_position(record.pos, record.tlen, offset),
            read_base: seq[offset],
            reference_base,
            accuracy,
            frames,
        });
    }
    Ok(substitutions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sam::record::split_fields;
    use rstest::rstest;

    fn call(line: &str, aligned_len: u32) -> Vec<Substitution> {
        let fields = split_fields(line);
        let record = AlignmentRecord::from_fields(&fields).unwrap();
        call_substitutions(&record, aligned_len).unwrap()
    }

    #[test]
    fn test_single_substitution() {
        let subs = call("r1\t0\tchr1\t100\t60\t8M\t*\t0\t0\tACGTTCGT\tIIII+III\tMD:Z:4A3", 8);
        assert_eq!(subs.len(), 1);
        let sub = &subs[0];
        assert_eq!(sub.read_name, "r1");
        assert_eq!(sub.change(), "T -> A");
        assert_eq!(sub.position, 104);
        assert!((sub.accuracy.unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(sub.frames[0], FrameImpact::Synonymous);
        assert_eq!(sub.frames[1], FrameImpact::Change { reference: "Tyr", query: "Phe" });
        assert_eq!(sub.frames[2].to_string(), "Thr to Ser");
    }

    #[test]
    fn test_negative_tlen_flips_position() {
        let subs = call("r1\t16\tchr1\t100\t60\t8M\t=\t50\t-58\tACGTTCGT\tIIIIIIII\tMD:Z:4A3", 8);
        assert_eq!(subs[0].position, 96);
    }

    #[test]
    fn test_pure_match_md_reports_nothing() {
        assert!(call("r1\t0\tchr1\t100\t60\t8M\t*\t0\t0\tACGTTCGT\tIIIIIIII\tMD:Z:8", 8).is_empty());
    }

    #[test]
    fn test_missing_md_reports_nothing() {
        assert!(call("r1\t0\tchr1\t100\t60\t8M\t*\t0\t0\tACGTTCGT\tIIIIIIII", 8).is_empty());
    }

    #[test]
    fn test_out_of_range_quality_drops_accuracy() {
        let subs = call("r1\t0\tchr1\t100\t60\t8M\t*\t0\t0\tACGTTCGT\tIIIIJIII\tMD:Z:4A3", 8);
        assert_eq!(subs.len(), 1);
        assert!(subs[0].accuracy.is_none());
    }

    #[test]
    fn test_missing_quality_drops_accuracy() {
        let subs = call("r1\t0\tchr1\t100\t60\t8M\t*\t0\t0\tACGTTCGT\t*\tMD:Z:4A3", 8);
        assert!(subs[0].accuracy.is_none());
    }

    #[test]
    fn test_mismatch_past_read_is_skipped() {
        let subs = call("r1\t0\tchr1\t100\t60\t8M\t*\t0\t0\tACGTTCGT\tIIIIIIII\tMD:Z:4A3C0", 8);
        assert_eq!(subs.len(), 1);
        let subs = call("r1\t0\tchr1\t100\t60\t8M\t*\t0\t0\tACGTTCGT\tIIIIIIII\tMD:Z:9A", 8);
        assert!(subs.is_empty());
    }

    #[test]
    fn test_multiple_substitutions_in_order() {
        let subs = call("r1\t0\tchr1\t10\t60\t8M\t*\t0\t0\tACGTTCGT\tIIIIIIII\tMD:Z:0T3A3", 8);
        let changes: Vec<String> = subs.iter().map(Substitution::change).collect();
        assert_eq!(changes, vec!["A -> T", "T -> A"]);
        assert_eq!(subs[0].position, 10);
        assert_eq!(subs[1].position, 14);
    }

    #[test]
    fn test_malformed_md_is_an_error() {
        let fields = split_fields("r1\t0\tchr1\t100\t60\t8M\t*\t0\t0\tACGTTCGT\tIIIIIIII\tMD:Z:4-3");
        let record = AlignmentRecord::from_fields(&fields).unwrap();
        assert!(call_substitutions(&record, 8).is_err());
    }

    #[rstest]
    #[case(b"ACGTTCGT", 0, b'G', [FrameImpact::NotDetermined, FrameImpact::NotDetermined, FrameImpact::Change { reference: "Ala", query: "Thr" }])]
    #[case(b"ACGTTCGT", 7, b'A', [FrameImpact::Synonymous, FrameImpact::NotDetermined, FrameImpact::NotDetermined])]
    #[case(b"ACNTTCGT", 3, b'A', [FrameImpact::NotDetermined, FrameImpact::NotDetermined, FrameImpact::Change { reference: "Ile", query: "Phe" }])]
    fn test_frame_impacts(
        #[case] seq: &[u8],
        #[case] offset: usize,
        #[case] reference_base: u8,
        #[case] expected: [FrameImpact; 3],
    ) {
        let got: [FrameImpact; 3] =
            std::array::from_fn(|frame| frame_impact(seq, offset, reference_base, frame));
        assert_eq!(got, expected);
    }

    #[test]
    fn test_frame_impact_display() {
        assert_eq!(FrameImpact::Synonymous.to_string(), "synonymous");
        assert_eq!(FrameImpact::NotDetermined.to_string(), "ND");
        assert_eq!(FrameImpact::Change { reference: "Met", query: "Stop" }.to_string(), "Met to Stop");
    }
}

//! A borrowed view over one tab-separated SAM alignment line.

use std::str::FromStr;

use crate::errors::{Result, SamTallyError};

/// Number of mandatory fields in an alignment line.
pub const MANDATORY_FIELD_COUNT: usize = 11;

/// Prefix of the MD optional field.
pub const MD_TAG_PREFIX: &str = "MD:Z:";

/// The eleven mandatory SAM fields, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Qname,
    Flag,
    Rname,
    Pos,
    Mapq,
    Cigar,
    Rnext,
    Pnext,
    Tlen,
    Seq,
    Qual,
}

impl Field {
    /// All mandatory fields in column order.
    pub const ALL: [Field; MANDATORY_FIELD_COUNT] = [
        Field::Qname,
        Field::Flag,
        Field::Rname,
        Field::Pos,
        Field::Mapq,
        Field::Cigar,
        Field::Rnext,
        Field::Pnext,
        Field::Tlen,
        Field::Seq,
        Field::Qual,
    ];

    /// Zero-based column index.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Upper-case field name as used in the SAM specification.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Field::Qname => "QNAME",
            Field::Flag => "FLAG",
            Field::Rname => "RNAME",
            Field::Pos => "POS",
            Field::Mapq => "MAPQ",
            Field::Cigar => "CIGAR",
            Field::Rnext => "RNEXT",
            Field::Pnext => "PNEXT",
            Field::Tlen => "TLEN",
            Field::Seq => "SEQ",
            Field::Qual => "QUAL",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits one input line into its tab-separated fields.
///
/// A trailing carriage return is dropped so CRLF files split the same as LF files.
#[must_use]
pub fn split_fields(line: &str) -> Vec<&str> {
    line.strip_suffix('\r').unwrap_or(line).split('\t').collect()
}

/// Typed view of an alignment line's mandatory fields plus its optional tags.
///
/// Built from fields that already passed [`crate::sam::validator::RecordValidator`];
/// construction still re-checks numeric parsing so it never panics on bad input.
#[derive(Debug, Clone)]
pub struct AlignmentRecord<'a> {
    pub qname: &'a str,
    pub flag: u16,
    pub rname: &'a str,
    pub pos: i64,
    pub mapq: u8,
    pub cigar: &'a str,
    pub rnext: &'a str,
    pub pnext: i64,
    pub tlen: i64,
    pub seq: &'a str,
    pub qual: &'a str,
    tags: &'a [&'a str],
}

impl<'a> AlignmentRecord<'a> {
    /// Builds a record from tab-split fields.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than eleven fields are present or a numeric field does
    /// not parse.
    pub fn from_fields(fields: &'a [&'a str]) -> Result<Self> {
        if fields.len() < MANDATORY_FIELD_COUNT {
            return Err(SamTallyError::MissingField {
                field: Field::ALL[fields.len()].name(),
                found: fields.len(),
            });
        }

        Ok(Self {
            qname: fields[Field::Qname.index()],
            flag: parse_number(Field::Flag, fields)?,
            rname: fields[Field::Rname.index()],
            pos: parse_number(Field::Pos, fields)?,
            mapq: parse_number(Field::Mapq, fields)?,
            cigar: fields[Field::Cigar.index()],
            rnext: fields[Field::Rnext.index()],
            pnext: parse_number(Field::Pnext, fields)?,
            tlen: parse_number(Field::Tlen, fields)?,
            seq: fields[Field::Seq.index()],
            qual: fields[Field::Qual.index()],
            tags: &fields[MANDATORY_FIELD_COUNT..],
        })
    }

    /// Value of the `MD:Z:` optional field, if present.
    #[must_use]
    pub fn md(&self) -> Option<&'a str> {
        self.tags.iter().find_map(|field| field.strip_prefix(MD_TAG_PREFIX))
    }

    /// True when the mate is reported on the same reference as this read.
    #[must_use]
    pub fn mate_on_same_reference(&self) -> bool {
        self.rnext == "=" || (self.rname != "*" && self.rnext == self.rname)
    }
}

fn parse_number<T: FromStr>(field: Field, fields: &[&str]) -> Result<T> {
    let value = fields[field.index()];
    value.parse::<T>().map_err(|_| SamTallyError::InvalidField {
        field: field.name(),
        value: value.to_string(),
        reason: "not a number in the allowed range".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "read1\t99\tchr1\t100\t60\t8M\t=\t180\t88\tACGTACGT\tIIIIIIII\tNM:i:1\tMD:Z:4A3";

    #[test]
    fn test_split_fields_drops_carriage_return() {
        let fields = split_fields("a\tb\tc\r");
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_from_fields() {
        let fields = split_fields(LINE);
        let record = AlignmentRecord::from_fields(&fields).unwrap();
        assert_eq!(record.qname, "read1");
        assert_eq!(record.flag, 99);
        assert_eq!(record.rname, "chr1");
        assert_eq!(record.pos, 100);
        assert_eq!(record.mapq, 60);
        assert_eq!(record.cigar, "8M");
        assert_eq!(record.tlen, 88);
        assert!(record.mate_on_same_reference());
    }

    #[test]
    fn test_md() {
        let fields = split_fields(LINE);
        let record = AlignmentRecord::from_fields(&fields).unwrap();
        assert_eq!(record.md(), Some("4A3"));

        let fields = split_fields("read1\t0\tchr1\t100\t60\t8M\t*\t0\t0\tACGTACGT\tIIIIIIII\tNM:i:0");
        assert_eq!(AlignmentRecord::from_fields(&fields).unwrap().md(), None);
    }

    #[test]
    fn test_short_record_is_an_error() {
        let fields = split_fields("read1\t0\tchr1\t100");
        let err = AlignmentRecord::from_fields(&fields).unwrap_err();
        assert!(err.to_string().contains("MAPQ"));
    }

    #[test]
    fn test_bad_number_is_an_error() {
        let fields = split_fields("r\t0\tchr1\tx\t60\t8M\t*\t0\t0\tACGTACGT\tIIIIIIII");
        let err = AlignmentRecord::from_fields(&fields).unwrap_err();
        assert!(err.to_string().contains("POS"));
    }

    #[test]
    fn test_mate_on_other_reference() {
        let fields = split_fields("r\t0\tchr1\t1\t60\t8M\tchr2\t5\t0\tACGTACGT\tIIIIIIII");
        let record = AlignmentRecord::from_fields(&fields).unwrap();
        assert!(!record.mate_on_same_reference());
    }

    #[test]
    fn test_field_names() {
        assert_eq!(Field::ALL.len(), MANDATORY_FIELD_COUNT);
        assert_eq!(Field::Qual.index(), 10);
        assert_eq!(Field::Tlen.to_string(), "TLEN");
    }
}

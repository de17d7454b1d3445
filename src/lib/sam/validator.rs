//! Grammar checks for the eleven mandatory SAM fields.
//!
//! Each field is matched against the pattern or numeric range given by the SAM format
//! specification. A record with fewer than eleven fields fails every missing column.

use std::sync::LazyLock;

use log::warn;
use regex::Regex;

use super::cigar::Cigar;
use super::record::{Field, MANDATORY_FIELD_COUNT};

/// Upper bound of POS and PNEXT, `2^31 - 1`.
pub const MAX_POSITION: i64 = (1 << 31) - 1;

/// Upper bound of FLAG, `2^16 - 1`.
pub const MAX_FLAG: i64 = (1 << 16) - 1;

/// Upper bound of MAPQ, `2^8 - 1`.
pub const MAX_MAPQ: i64 = (1 << 8) - 1;

static QNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[!-?A-~]{1,254}$").expect("valid QNAME pattern"));

static RNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*|[0-9A-Za-z!\#$%\&+./:;?@\^_|\~\-][0-9A-Za-z!\#$%\&*+./:;=?@\^_|\~\-]*)$")
        .expect("valid RNAME pattern")
});

static RNEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*|=|[0-9A-Za-z!\#$%\&+./:;?@\^_|\~\-][0-9A-Za-z!\#$%\&*+./:;=?@\^_|\~\-]*)$")
        .expect("valid RNEXT pattern")
});

static CIGAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\*|([0-9]+[MIDNSHPX=])+)$").expect("valid CIGAR pattern"));

static SEQ_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\*|[A-Za-z=.]+)$").expect("valid SEQ pattern"));

static QUAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[!-~]+$").expect("valid QUAL pattern"));

static UNSIGNED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid unsigned pattern"));

static SIGNED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("valid signed pattern"));

/// Outcome of checking one mandatory field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCheck<'a> {
    pub field: Field,
    /// The raw value, or `None` when the record is too short to contain the field.
    pub value: Option<&'a str>,
    pub passed: bool,
}

/// Per-field pass/fail result for one record.
#[derive(Debug, Clone)]
pub struct ValidationReport<'a> {
    checks: [FieldCheck<'a>; MANDATORY_FIELD_COUNT],
}

impl<'a> ValidationReport<'a> {
    /// All eleven checks in column order.
    #[must_use]
    pub fn checks(&self) -> &[FieldCheck<'a>] {
        &self.checks
    }

    /// Whether the given field passed.
    #[must_use]
    pub fn passed(&self, field: Field) -> bool {
        self.checks[field.index()].passed
    }

    /// Number of failing fields, `11 - passes`.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    /// Iterates over the failing checks.
    pub fn failures(&self) -> impl Iterator<Item = &FieldCheck<'a>> {
        self.checks.iter().filter(|c| !c.passed)
    }

    /// Emits one warning per failing field naming the field, line and offending value.
    pub fn log_failures(&self, line_number: u64, record: &str) {
        for check in self.failures() {
            match check.value {
                Some(value) => warn!(
                    "{} ERROR on line {line_number}: value '{value}' does not match the SAM grammar. Line: {record}",
                    check.field
                ),
                None => warn!(
                    "{} ERROR on line {line_number}: field is missing. Line: {record}",
                    check.field
                ),
            }
        }
    }
}

/// Validates alignment lines against the SAM grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordValidator;

impl RecordValidator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Checks every mandatory field of a tab-split record.
    ///
    /// Fields past the end of a short record are reported as failed with no value.
    #[must_use]
    pub fn validate<'a>(&self, fields: &[&'a str]) -> ValidationReport<'a> {
        let checks = Field::ALL.map(|field| {
            let value = fields.get(field.index()).copied();
            let passed = value.is_some_and(|v| Self::check_field(field, v));
            FieldCheck { field, value, passed }
        });
        ValidationReport { checks }
    }

    /// Checks a single field value.
    #[must_use]
    pub fn check_field(field: Field, value: &str) -> bool {
        match field {
            Field::Qname => QNAME_RE.is_match(value),
            Field::Flag => unsigned_in_range(value, MAX_FLAG),
            Field::Rname => RNAME_RE.is_match(value),
            Field::Pos | Field::Pnext => unsigned_in_range(value, MAX_POSITION),
            Field::Mapq => unsigned_in_range(value, MAX_MAPQ),
            // Operation lengths must also be positive and fit in 32 bits.
            Field::Cigar => CIGAR_RE.is_match(value) && Cigar::parse(value).is_ok(),
            Field::Rnext => RNEXT_RE.is_match(value),
            Field::Tlen => {
                SIGNED_RE.is_match(value)
                    && value.parse::<i64>().is_ok_and(|v| (-MAX_POSITION..=MAX_POSITION).contains(&v))
            }
            Field::Seq => SEQ_RE.is_match(value),
            Field::Qual => QUAL_RE.is_match(value),
        }
    }
}

fn unsigned_in_range(value: &str, max: i64) -> bool {
    UNSIGNED_RE.is_match(value) && value.parse::<i64>().is_ok_and(|v| v <= max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sam::record::split_fields;
    use rstest::rstest;

    const VALID: &str = "read1\t99\tchr1\t100\t60\t8M\t=\t180\t88\tACGTACGT\tIIIIIIII";

    #[test]
    fn test_valid_record_has_no_errors() {
        let fields = split_fields(VALID);
        let report = RecordValidator::new().validate(&fields);
        assert!(report.is_valid());
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.checks().len(), MANDATORY_FIELD_COUNT);
    }

    #[test]
    fn test_optional_fields_are_not_examined() {
        let line = format!("{VALID}\tMD:Z:4A3\tXX:weird value");
        let fields = split_fields(&line);
        assert!(RecordValidator::new().validate(&fields).is_valid());
    }

    #[test]
    fn test_short_record_fails_missing_fields() {
        let fields = split_fields("read1\t0\tchr1\t100\t60\t8M\t*\t0");
        let report = RecordValidator::new().validate(&fields);
        assert_eq!(report.error_count(), 3);
        let missing: Vec<Field> = report.failures().map(|c| c.field).collect();
        assert_eq!(missing, vec![Field::Tlen, Field::Seq, Field::Qual]);
        assert!(report.failures().all(|c| c.value.is_none()));
    }

    #[test]
    fn test_multiple_failures_are_counted() {
        let fields = split_fields("read 1\t99\tchr1\t-5\t300\t8M\t=\t180\t88\tACGTACGT\tIIIIIIII");
        let report = RecordValidator::new().validate(&fields);
        assert_eq!(report.error_count(), 3);
        assert!(!report.passed(Field::Qname));
        assert!(!report.passed(Field::Pos));
        assert!(!report.passed(Field::Mapq));
        assert!(report.passed(Field::Flag));
    }

    #[rstest]
    #[case(Field::Qname, "read/1", true)]
    #[case(Field::Qname, "read@1", false)]
    #[case(Field::Qname, "", false)]
    #[case(Field::Flag, "0", true)]
    #[case(Field::Flag, "65535", true)]
    #[case(Field::Flag, "65536", false)]
    #[case(Field::Flag, "", false)]
    #[case(Field::Rname, "*", true)]
    #[case(Field::Rname, "chr1", true)]
    #[case(Field::Rname, "HLA-A*01:01", true)]
    #[case(Field::Rname, "=chr1", false)]
    #[case(Field::Rname, "*chr1", false)]
    #[case(Field::Pos, "0", true)]
    #[case(Field::Pos, "2147483647", true)]
    #[case(Field::Pos, "2147483648", false)]
    #[case(Field::Pos, "-5", false)]
    #[case(Field::Pos, "", false)]
    #[case(Field::Pos, "99999999999999999999999", false)]
    #[case(Field::Mapq, "255", true)]
    #[case(Field::Mapq, "256", false)]
    #[case(Field::Cigar, "*", true)]
    #[case(Field::Cigar, "10S140M", true)]
    #[case(Field::Cigar, "5=1X4=", true)]
    #[case(Field::Cigar, "M10", false)]
    #[case(Field::Cigar, "10Q", false)]
    #[case(Field::Cigar, "0M", false)]
    #[case(Field::Cigar, "0M4M", false)]
    #[case(Field::Cigar, "4294967295M", true)]
    #[case(Field::Cigar, "4294967296M", false)]
    #[case(Field::Cigar, "99999999999M", false)]
    #[case(Field::Rnext, "=", true)]
    #[case(Field::Rnext, "*", true)]
    #[case(Field::Rnext, "chrX", true)]
    #[case(Field::Pnext, "12", true)]
    #[case(Field::Tlen, "-2147483647", true)]
    #[case(Field::Tlen, "-2147483648", false)]
    #[case(Field::Tlen, "250", true)]
    #[case(Field::Tlen, "--1", false)]
    #[case(Field::Seq, "*", true)]
    #[case(Field::Seq, "ACGTN=.", true)]
    #[case(Field::Seq, "ACG T", false)]
    #[case(Field::Qual, "*", true)]
    #[case(Field::Qual, "II#I~", true)]
    #[case(Field::Qual, "II I", false)]
    fn test_check_field(#[case] field: Field, #[case] value: &str, #[case] expected: bool) {
        assert_eq!(RecordValidator::check_field(field, value), expected, "{field} = '{value}'");
    }

    #[test]
    fn test_qname_length_limit() {
        let ok = "a".repeat(254);
        let too_long = "a".repeat(255);
        assert!(RecordValidator::check_field(Field::Qname, &ok));
        assert!(!RecordValidator::check_field(Field::Qname, &too_long));
    }

    #[test]
    fn test_log_failures_does_not_panic_on_missing() {
        let fields = split_fields("read1");
        let report = RecordValidator::new().validate(&fields);
        assert_eq!(report.error_count(), 10);
        report.log_failures(3, "read1");
    }
}

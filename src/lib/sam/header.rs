//! Human-readable interpretation of SAM header lines.

use log::debug;

/// The five SAM header record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderKind {
    Header,
    ReferenceSequence,
    ReadGroup,
    Program,
    Comment,
}

impl HeaderKind {
    pub const ALL: [HeaderKind; 5] = [
        HeaderKind::Header,
        HeaderKind::ReferenceSequence,
        HeaderKind::ReadGroup,
        HeaderKind::Program,
        HeaderKind::Comment,
    ];

    /// Parses a record-type tag such as `@SQ`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            HeaderKind::Header => "@HD",
            HeaderKind::ReferenceSequence => "@SQ",
            HeaderKind::ReadGroup => "@RG",
            HeaderKind::Program => "@PG",
            HeaderKind::Comment => "@CO",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            HeaderKind::Header => "Header line",
            HeaderKind::ReferenceSequence => "Reference sequence dictionary",
            HeaderKind::ReadGroup => "Read group",
            HeaderKind::Program => "Program",
            HeaderKind::Comment => "Comments",
        }
    }

    /// Description of a two-letter sub-field tag for this record type.
    #[must_use]
    pub fn describe(self, sub_tag: &str) -> Option<&'static str> {
        let description = match (self, sub_tag) {
            (HeaderKind::Header, "VN") => "Format version",
            (HeaderKind::Header, "SO") => "Sorting order of alignments",
            (HeaderKind::Header, "GO") => "Grouping of alignments",
            (HeaderKind::Header, "SS") => "Sub-sorting order of alignments",

            (HeaderKind::ReferenceSequence, "SN") => "Reference sequence name",
            (HeaderKind::ReferenceSequence, "LN") => "Reference sequence length",
            (HeaderKind::ReferenceSequence, "AH") => "Alternate locus",
            (HeaderKind::ReferenceSequence, "AN") => "Alternative reference sequence names",
            (HeaderKind::ReferenceSequence, "AS") => "Genome assembly identifier",
            (HeaderKind::ReferenceSequence, "DS") => "Description",
            (HeaderKind::ReferenceSequence, "M5") => "MD5 checksum of the sequence",
            (HeaderKind::ReferenceSequence, "SP") => "Species",
            (HeaderKind::ReferenceSequence, "TP") => "Molecule topology",
            (HeaderKind::ReferenceSequence, "UR") => "URI of the sequence",

            (HeaderKind::ReadGroup, "ID") => "Read group identifier",
            (HeaderKind::ReadGroup, "BC") => "Barcode sequence",
            (HeaderKind::ReadGroup, "CN") => "Name of sequencing center",
            (HeaderKind::ReadGroup, "DS") => "Description",
            (HeaderKind::ReadGroup, "DT") => "Date the run was produced",
            (HeaderKind::ReadGroup, "FO") => "Flow order",
            (HeaderKind::ReadGroup, "KS") => "Array of nucleotide bases",
            (HeaderKind::ReadGroup, "LB") => "Library",
            (HeaderKind::ReadGroup, "PG") => "Processing programs",
            (HeaderKind::ReadGroup, "PI") => "Predicted median insert size",
            (HeaderKind::ReadGroup, "PL") => "Platform/technology",
            (HeaderKind::ReadGroup, "PM") => "Platform model",
            (HeaderKind::ReadGroup, "PU") => "Platform unit",
            (HeaderKind::ReadGroup, "SM") => "Sample",

            (HeaderKind::Program, "ID") => "Program record identifier",
            (HeaderKind::Program, "PN") => "Program name",
            (HeaderKind::Program, "CL") => "Command line",
            (HeaderKind::Program, "PP") => "Previous @PG-ID",
            (HeaderKind::Program, "DS") => "Description",
            (HeaderKind::Program, "VN") => "Program version",

            (HeaderKind::Comment, "CO") => "Comment",
            _ => return None,
        };
        Some(description)
    }
}

/// A described `TAG:VALUE` sub-field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    pub tag: String,
    pub description: &'static str,
    pub value: String,
}

/// An interpreted header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRecord {
    pub kind: HeaderKind,
    pub fields: Vec<HeaderField>,
}

impl HeaderRecord {
    /// Title line as written in reports, e.g. `@SQ - Reference sequence dictionary`.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} - {}", self.kind.tag(), self.kind.title())
    }
}

/// Interprets a tab-split header line.
///
/// Returns `None` when the first field is not one of `@HD`, `@SQ`, `@RG`, `@PG`, `@CO`.
/// Sub-fields whose tag is not defined for the record type are skipped. A `@CO` line
/// carries free text, which is reported as a single `Comment` field.
#[must_use]
pub fn interpret_header(fields: &[&str]) -> Option<HeaderRecord> {
    let (first, rest) = fields.split_first()?;
    let kind = HeaderKind::from_tag(first)?;

    if kind == HeaderKind::Comment {
        let text = rest.join("\t");
        let fields = vec![HeaderField {
            tag: "CO".to_string(),
            description: "Comment",
            value: text,
        }];
        return Some(HeaderRecord { kind, fields });
    }

    let mut described = Vec::new();
    for sub_field in rest.iter().flat_map(|f| split_sub_fields(f.trim_end())) {
        let Some((tag, value)) = sub_field.split_once(':') else {
            debug!("Skipping malformed {} sub-field '{sub_field}'", kind.tag());
            continue;
        };
        match kind.describe(tag) {
            Some(description) => described.push(HeaderField {
                tag: tag.to_string(),
                description,
                value: value.to_string(),
            }),
            None => debug!("Skipping unknown {} sub-field tag '{tag}'", kind.tag()),
        }
    }
    Some(HeaderRecord { kind, fields: described })
}

/// Splits a tab field further on spaces that precede another `XX:` sub-field, so
/// space-separated headers parse while values containing spaces (e.g. `CL:`) survive.
fn split_sub_fields(field: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, _) in field.match_indices(' ') {
        let next = &field[i + 1..];
        if looks_like_sub_field(next) {
            parts.push(&field[start..i]);
            start = i + 1;
        }
    }
    parts.push(&field[start..]);
    parts.into_iter().filter(|p| !p.is_empty()).collect()
}

fn looks_like_sub_field(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 3 && b[0].is_ascii_alphabetic() && b[1].is_ascii_alphanumeric() && b[2] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hd_line() {
        let record = interpret_header(&["@HD", "VN:1.6", "SO:coordinate"]).unwrap();
        assert_eq!(record.kind, HeaderKind::Header);
        assert_eq!(record.title(), "@HD - Header line");
        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.fields[0].description, "Format version");
        assert_eq!(record.fields[0].value, "1.6");
        assert_eq!(record.fields[1].description, "Sorting order of alignments");
    }

    #[test]
    fn test_sq_line() {
        let record = interpret_header(&["@SQ", "SN:chr1", "LN:248956422"]).unwrap();
        assert_eq!(record.fields[0].description, "Reference sequence name");
        assert_eq!(record.fields[0].value, "chr1");
        assert_eq!(record.fields[1].value, "248956422");
    }

    #[test]
    fn test_unknown_sub_tag_is_skipped() {
        let record = interpret_header(&["@SQ", "SN:chr1", "ZZ:whatever", "nocolon"]).unwrap();
        assert_eq!(record.fields.len(), 1);
        assert_eq!(record.fields[0].tag, "SN");
    }

    #[test]
    fn test_pg_command_line_keeps_spaces() {
        let record =
            interpret_header(&["@PG", "ID:bwa", "PN:bwa", "CL:bwa mem ref.fa r1.fq r2.fq"]).unwrap();
        let cl = record.fields.iter().find(|f| f.tag == "CL").unwrap();
        assert_eq!(cl.value, "bwa mem ref.fa r1.fq r2.fq");
    }

    #[test]
    fn test_space_separated_sub_fields() {
        let record = interpret_header(&["@RG", "ID:grp1 SM:sample1 PL:ILLUMINA"]).unwrap();
        let tags: Vec<&str> = record.fields.iter().map(|f| f.tag.as_str()).collect();
        assert_eq!(tags, vec!["ID", "SM", "PL"]);
        assert_eq!(record.fields[1].description, "Sample");
    }

    #[test]
    fn test_comment_line() {
        let record = interpret_header(&["@CO", "free text", "more"]).unwrap();
        assert_eq!(record.kind, HeaderKind::Comment);
        assert_eq!(record.fields[0].value, "free text\tmore");
    }

    #[test]
    fn test_not_a_header() {
        assert!(interpret_header(&["@XX", "VN:1"]).is_none());
        assert!(interpret_header(&["read1", "0"]).is_none());
        assert!(interpret_header(&[]).is_none());
    }

    #[test]
    fn test_same_sub_tag_differs_by_kind() {
        assert_eq!(HeaderKind::ReadGroup.describe("DS"), Some("Description"));
        assert_eq!(HeaderKind::Program.describe("ID"), Some("Program record identifier"));
        assert_eq!(HeaderKind::Header.describe("ID"), None);
    }
}

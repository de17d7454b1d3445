//! DNA sequence utilities.
//!
//! This module provides the standard genetic code used to judge the amino-acid impact
//! of a substitution.

/// Three-letter name of a translated codon (`Stop` for the three stop codons).
pub type AminoAcid = &'static str;

/// Returns true for an unambiguous nucleotide (A, C, G or T in either case).
#[inline]
#[must_use]
pub const fn is_acgt(base: u8) -> bool {
    matches!(base.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T')
}

/// Translates a codon using the standard genetic code.
///
/// Input is case-insensitive. Returns `None` when the codon is not exactly three
/// bases long or contains anything other than A, C, G or T (IUPAC ambiguity codes
/// such as `N` or `R` included).
///
/// # Examples
///
/// ```
/// use samtally_lib::dna::translate_codon;
///
/// assert_eq!(translate_codon(b"ATG"), Some("Met"));
/// assert_eq!(translate_codon(b"tgg"), Some("Trp"));
/// assert_eq!(translate_codon(b"TAA"), Some("Stop"));
/// assert_eq!(translate_codon(b"ANG"), None);
/// ```
#[must_use]
pub fn translate_codon(codon: &[u8]) -> Option<AminoAcid> {
    let [a, b, c] = codon else {
        return None;
    };
    if !(is_acgt(*a) && is_acgt(*b) && is_acgt(*c)) {
        return None;
    }
    let key = [a.to_ascii_uppercase(), b.to_ascii_uppercase(), c.to_ascii_uppercase()];

    let aa = match &key {
        b"TTT" | b"TTC" => "Phe",
        b"TTA" | b"TTG" | b"CTT" | b"CTC" | b"CTA" | b"CTG" => "Leu",
        b"ATT" | b"ATC" | b"ATA" => "Ile",
        b"ATG" => "Met",
        b"GTT" | b"GTC" | b"GTA" | b"GTG" => "Val",
        b"TCT" | b"TCC" | b"TCA" | b"TCG" | b"AGT" | b"AGC" => "Ser",
        b"CCT" | b"CCC" | b"CCA" | b"CCG" => "Pro",
        b"ACT" | b"ACC" | b"ACA" | b"ACG" => "Thr",
        b"GCT" | b"GCC" | b"GCA" | b"GCG" => "Ala",
        b"TAT" | b"TAC" => "Tyr",
        b"CAT" | b"CAC" => "His",
        b"CAA" | b"CAG" => "Gln",
        b"AAT" | b"AAC" => "Asn",
        b"AAA" | b"AAG" => "Lys",
        b"GAT" | b"GAC" => "Asp",
        b"GAA" | b"GAG" => "Glu",
        b"TGT" | b"TGC" => "Cys",
        b"TGG" => "Trp",
        b"CGT" | b"CGC" | b"CGA" | b"CGG" | b"AGA" | b"AGG" => "Arg",
        b"GGT" | b"GGC" | b"GGA" | b"GGG" => "Gly",
        b"TAA" | b"TAG" | b"TGA" => "Stop",
        _ => return None,
    };
    Some(aa)
}

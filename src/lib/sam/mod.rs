//! SAM text-format decoding.
//!
//! - [`record`] - tab-split alignment lines and the mandatory field view
//! - [`validator`] - grammar checks for the eleven mandatory fields
//! - [`flags`] - FLAG bit vector and named predicates
//! - [`cigar`] - CIGAR decoding, mapping classification and histograms
//! - [`md`] - MD tag decoding into read-relative mismatches
//! - [`header`] - human-readable header line interpretation

pub mod cigar;
pub mod flags;
pub mod header;
pub mod md;
pub mod record;
pub mod validator;

pub use cigar::{Cigar, CigarHistogram, CigarOp, MappingStatus};
pub use flags::FlagBits;
pub use header::{HeaderKind, HeaderRecord, interpret_header};
pub use md::{MdTag, Mismatch};
pub use record::{AlignmentRecord, Field, split_fields};
pub use validator::{RecordValidator, ValidationReport};

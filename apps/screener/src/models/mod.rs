pub mod document;
pub mod profile;

pub use document::{file_extension, Document, DocumentFormat, PlainText};
pub use profile::{CandidateProfile, EntityLabel, LabeledSpan, MatchResult, Section};

// Candidate profile extraction: entity labeling (external collaborator) and
// deterministic section resolution over its output.

pub mod classifier;
pub mod resolver;

pub use classifier::{EntityClassifier, HttpEntityClassifier};
pub use resolver::SectionResolver;

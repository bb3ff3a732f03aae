// Screening: document → candidate profile + match score.
// All collaborator calls go through the injected traits. The pipeline owns
// no models and keeps no state between runs.

pub mod handlers;
pub mod pipeline;

pub use pipeline::MatchPipeline;

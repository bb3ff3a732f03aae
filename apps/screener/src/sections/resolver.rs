//! Section Resolver — buckets labeled spans into skills, experience and education.
//!
//! Rules, evaluated per span in strict order, first match wins:
//! 1. label `organization` → education
//! 2. label `date`, or the lowercased text contains "years" → experience
//! 3. label `product` or `skill` → skills
//! 4. anything else is dropped
//!
//! A text carried by several spans lands in the highest-precedence category
//! any of them matched (education > experience > skills), so span order
//! never changes the resolved profile.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{CandidateProfile, EntityLabel, LabeledSpan, Section};

const EXPERIENCE_MARKER: &str = "years";

#[derive(Debug, Clone, Copy, Default)]
pub struct SectionResolver {
    drop_blank_spans: bool,
}

impl SectionResolver {
    /// With `drop_blank_spans`, spans whose text is empty after trimming are
    /// ignored; otherwise they are placed like any other span.
    pub fn new(drop_blank_spans: bool) -> Self {
        Self { drop_blank_spans }
    }

    pub fn resolve<I>(&self, spans: I) -> CandidateProfile
    where
        I: IntoIterator<Item = LabeledSpan>,
    {
        let mut placements: BTreeMap<String, Section> = BTreeMap::new();
        let mut dropped = 0usize;

        for span in spans {
            if self.drop_blank_spans && span.text.trim().is_empty() {
                dropped += 1;
                continue;
            }
            match classify(&span) {
                Some(section) => {
                    placements
                        .entry(span.text)
                        .and_modify(|placed| *placed = (*placed).max(section))
                        .or_insert(section);
                }
                None => dropped += 1,
            }
        }

        let profile = CandidateProfile::from_placements(placements);

        debug!(
            "Resolved profile: {} skills, {} experience, {} education ({} spans dropped)",
            profile.skills().len(),
            profile.experience().len(),
            profile.education().len(),
            dropped
        );
        profile
    }
}

/// Category for a single span, or `None` when no rule matches.
pub fn classify(span: &LabeledSpan) -> Option<Section> {
    match &span.label {
        EntityLabel::Organization => Some(Section::Education),
        EntityLabel::Date => Some(Section::Experience),
        _ if span.text.to_lowercase().contains(EXPERIENCE_MARKER) => Some(Section::Experience),
        EntityLabel::Product | EntityLabel::Skill => Some(Section::Skills),
        EntityLabel::Other(_) => None,
    }
}

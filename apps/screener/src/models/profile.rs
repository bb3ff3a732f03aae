use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Entity category assigned by the entity classifier collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityLabel {
    Organization,
    Date,
    Product,
    Skill,
    Other(String),
}

impl From<&str> for EntityLabel {
    /// Accepts both spaCy-style short labels (`ORG`, `DATE`) and long forms.
    fn from(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "org" | "organization" | "organisation" => EntityLabel::Organization,
            "date" => EntityLabel::Date,
            "product" => EntityLabel::Product,
            "skill" => EntityLabel::Skill,
            _ => EntityLabel::Other(label.to_string()),
        }
    }
}

/// A text fragment and the category the classifier gave it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledSpan {
    pub text: String,
    pub label: EntityLabel,
}

impl LabeledSpan {
    pub fn new(text: impl Into<String>, label: impl Into<EntityLabel>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Profile category. Ordered by precedence: a text matched into several
/// categories ends up in the greatest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    Skills,
    Experience,
    Education,
}

/// Structured candidate attributes. Each category is a set, and a given
/// text lives in at most one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    skills: BTreeSet<String>,
    experience: BTreeSet<String>,
    education: BTreeSet<String>,
}

impl CandidateProfile {
    pub fn skills(&self) -> &BTreeSet<String> {
        &self.skills
    }

    pub fn experience(&self) -> &BTreeSet<String> {
        &self.experience
    }

    pub fn education(&self) -> &BTreeSet<String> {
        &self.education
    }

    pub fn section(&self, section: Section) -> &BTreeSet<String> {
        match section {
            Section::Skills => &self.skills,
            Section::Experience => &self.experience,
            Section::Education => &self.education,
        }
    }

    /// Which category, if any, already holds `text`.
    pub fn section_of(&self, text: &str) -> Option<Section> {
        [Section::Skills, Section::Experience, Section::Education]
            .into_iter()
            .find(|s| self.section(*s).contains(text))
    }

    pub fn len(&self) -> usize {
        self.skills.len() + self.experience.len() + self.education.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a profile from final placements. Keyed by text, so a text
    /// lands in exactly one category.
    pub(crate) fn from_placements(placements: BTreeMap<String, Section>) -> Self {
        let mut profile = Self::default();
        for (text, section) in placements {
            let target = match section {
                Section::Skills => &mut profile.skills,
                Section::Experience => &mut profile.experience,
                Section::Education => &mut profile.education,
            };
            target.insert(text);
        }
        profile
    }
}

/// Terminal artifact of a screening run.
///
/// Serializes flat: `skills`, `experience`, `education` and `score`.
/// The range of `score` depends on the scoring strategy that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub profile: CandidateProfile,
    pub score: f64,
}

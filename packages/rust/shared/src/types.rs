//! Core domain types for the model catalog and the knowledge base.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version tag written into every knowledge base file.
pub const KNOWLEDGE_BASE_VERSION: &str = "1.0";

// ---------------------------------------------------------------------------
// ArtifactDescriptor
// ---------------------------------------------------------------------------

/// A downloadable model weight file, as listed in the static catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    /// Unique catalog key (e.g. `phi-2-q4`).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Source URL of the weight file.
    pub url: &'static str,
    /// Expected size, human readable.
    pub size: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Minimum memory hint, human readable.
    pub ram_requirement: &'static str,
    /// Whether `--download-all` fetches this artifact.
    pub recommended: bool,
}

impl ArtifactDescriptor {
    /// File name the artifact is stored under: the last path segment of its URL.
    pub fn local_name(&self) -> &'static str {
        let path = self.url.split(['?', '#']).next().unwrap_or(self.url);
        path.rsplit('/').next().unwrap_or(path)
    }
}

// ---------------------------------------------------------------------------
// Category / Priority
// ---------------------------------------------------------------------------

/// Topic tag of a guideline entry.
///
/// Variants are declared in categorizer order; `Ord` follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    WarSurgery,
    BleedingControl,
    WoundCare,
    Fractures,
    Burns,
    ShockManagement,
    RespiratoryEmergency,
    PainManagement,
    InfectionControl,
    EmergencyCare,
    FeverManagement,
    FluidManagement,
    Cardiovascular,
    Triage,
    GeneralMedicine,
}

impl Category {
    /// The snake_case tag used in ids and in the JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WarSurgery => "war_surgery",
            Self::BleedingControl => "bleeding_control",
            Self::WoundCare => "wound_care",
            Self::Fractures => "fractures",
            Self::Burns => "burns",
            Self::ShockManagement => "shock_management",
            Self::RespiratoryEmergency => "respiratory_emergency",
            Self::PainManagement => "pain_management",
            Self::InfectionControl => "infection_control",
            Self::EmergencyCare => "emergency_care",
            Self::FeverManagement => "fever_management",
            Self::FluidManagement => "fluid_management",
            Self::Cardiovascular => "cardiovascular",
            Self::Triage => "triage",
            Self::GeneralMedicine => "general_medicine",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency level of a guideline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GuidelineEntry / KnowledgeBase
// ---------------------------------------------------------------------------

/// One labeled text passage in the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidelineEntry {
    /// `<category>_<section>_<chunk>`, optionally prefixed by a document slug.
    pub id: String,
    pub category: Category,
    /// Cleaned passage text.
    pub text: String,
    /// Provenance tag.
    pub source: String,
    pub priority: Priority,
    /// Matched medical terms, at most 10.
    pub keywords: Vec<String>,
}

/// The `metadata` object of a knowledge base file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseMetadata {
    pub total_entries: usize,
    /// Distinct categories present, in category order.
    pub categories: Vec<Category>,
    pub created_at: DateTime<Utc>,
    pub version: String,
}

/// Root structure of `medical_knowledge_rag.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub metadata: KnowledgeBaseMetadata,
    pub knowledge_base: Vec<GuidelineEntry>,
}

impl KnowledgeBase {
    /// Build a knowledge base stamped with the current time.
    pub fn new(entries: Vec<GuidelineEntry>) -> Self {
        Self::with_timestamp(entries, Utc::now())
    }

    /// Build a knowledge base with an explicit creation time.
    pub fn with_timestamp(entries: Vec<GuidelineEntry>, created_at: DateTime<Utc>) -> Self {
        let categories: BTreeSet<Category> = entries.iter().map(|e| e.category).collect();

        Self {
            metadata: KnowledgeBaseMetadata {
                total_entries: entries.len(),
                categories: categories.into_iter().collect(),
                created_at,
                version: KNOWLEDGE_BASE_VERSION.to_string(),
            },
            knowledge_base: entries,
        }
    }
}

//! Emotional metadata - per-entity scoring model
//!
//! Every entity carries a small record that drives decay and ranking:
//! - **trust**: 0.0-1.0 reliability, grows with positive interaction
//! - **resonance**: 0.0-1.0 importance, the primary ranking signal
//! - **importance_pattern**: which decay rule applies
//!
//! Defaults for new entities come from keyword inference over their text.
//! Inference is expressed as ordered rule tables so new keyword sets can be
//! added without touching the classifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{MemoryError, MemoryResult};

pub const DEFAULT_TRUST: f64 = 0.5;
pub const DEFAULT_DECAY_RATE: f64 = 0.5;
pub const FALLBACK_RESONANCE: f64 = 0.5;

/// How an entity's scores evolve over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ImportancePattern {
    /// User preferences: never decay, slowly strengthen
    Preference,
    /// Relationships: trust and resonance grow with every pass
    Strengthen,
    /// Ordinary knowledge: half-life decay over a one-week window
    #[default]
    TimeBased,
    /// Left alone by the decay engine
    SelfManaged,
}

impl std::fmt::Display for ImportancePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportancePattern::Preference => write!(f, "preference"),
            ImportancePattern::Strengthen => write!(f, "strengthen"),
            ImportancePattern::TimeBased => write!(f, "time-based"),
            ImportancePattern::SelfManaged => write!(f, "self-managed"),
        }
    }
}

impl std::str::FromStr for ImportancePattern {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preference" => Ok(ImportancePattern::Preference),
            "strengthen" => Ok(ImportancePattern::Strengthen),
            "time-based" => Ok(ImportancePattern::TimeBased),
            "self-managed" => Ok(ImportancePattern::SelfManaged),
            _ => anyhow::bail!("Unknown importance pattern: {}", s),
        }
    }
}

/// Scoring fields attached 1:1 to every entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub trust: f64,

    pub importance_pattern: ImportancePattern,

    pub resonance: f64,

    #[serde(default)]
    pub is_user_preference: bool,

    #[serde(default)]
    pub accessibility_flag: bool,

    pub created_at: DateTime<Utc>,

    pub last_updated: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,

    /// Base of the time-based decay curve; only read for `time-based`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay_rate: Option<f64>,
}

impl Metadata {
    /// Fresh metadata with neutral scores
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            trust: DEFAULT_TRUST,
            importance_pattern: ImportancePattern::TimeBased,
            resonance: FALLBACK_RESONANCE,
            is_user_preference: false,
            accessibility_flag: false,
            created_at: now,
            last_updated: now,
            last_accessed: None,
            decay_rate: Some(DEFAULT_DECAY_RATE),
        }
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate.unwrap_or(DEFAULT_DECAY_RATE)
    }

    /// Clamp scores back into [0, 1]
    pub fn clamp(&mut self) {
        self.trust = clamp_unit(self.trust);
        self.resonance = clamp_unit(self.resonance);
    }

    /// Raise trust by a fixed step, never above 1.0
    pub fn bump_trust(&mut self, step: f64) {
        self.trust = (self.trust + step).min(1.0);
    }

    /// Check caller-supplied metadata before it enters the graph.
    ///
    /// Scores are clamped; values that cannot be clamped meaningfully are
    /// rejected.
    pub fn validated(mut self, entity: &str) -> MemoryResult<Self> {
        let reject = |reason: String| MemoryError::Scoring {
            entity: entity.to_string(),
            reason,
        };

        if !self.trust.is_finite() {
            return Err(reject(format!("trust must be finite, got {}", self.trust)));
        }
        if !self.resonance.is_finite() {
            return Err(reject(format!(
                "resonance must be finite, got {}",
                self.resonance
            )));
        }
        if let Some(rate) = self.decay_rate {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(reject(format!("decayRate must be in (0, 1], got {}", rate)));
            }
        }

        self.clamp();
        Ok(self)
    }
}

/// Caller-supplied scoring overrides. Timestamps are never taken from the
/// caller; unset fields keep their inferred values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance_pattern: Option<ImportancePattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resonance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_user_preference: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_flag: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay_rate: Option<f64>,
}

impl MetadataInput {
    /// Overlay the set fields on `base`, then validate the result
    pub fn merge_into(self, mut base: Metadata, entity: &str) -> MemoryResult<Metadata> {
        if let Some(trust) = self.trust {
            base.trust = trust;
        }
        if let Some(pattern) = self.importance_pattern {
            base.importance_pattern = pattern;
        }
        if let Some(resonance) = self.resonance {
            base.resonance = resonance;
        }
        if let Some(flag) = self.is_user_preference {
            base.is_user_preference = flag;
        }
        if let Some(flag) = self.accessibility_flag {
            base.accessibility_flag = flag;
        }
        if let Some(rate) = self.decay_rate {
            base.decay_rate = Some(rate);
        }
        base.validated(entity)
    }
}

pub fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Partial metadata written by a matching rule
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataPatch {
    pub importance_pattern: Option<ImportancePattern>,
    pub resonance: Option<f64>,
    pub is_user_preference: Option<bool>,
    pub accessibility_flag: Option<bool>,
}

impl MetadataPatch {
    pub fn apply(&self, metadata: &mut Metadata) {
        if let Some(pattern) = self.importance_pattern {
            metadata.importance_pattern = pattern;
        }
        if let Some(resonance) = self.resonance {
            metadata.resonance = resonance;
        }
        if let Some(flag) = self.is_user_preference {
            metadata.is_user_preference = flag;
        }
        if let Some(flag) = self.accessibility_flag {
            metadata.accessibility_flag = flag;
        }
    }
}

/// Keyword set mapped to a metadata patch
#[derive(Debug)]
pub struct ClassificationRule {
    pub label: &'static str,
    /// Matched anywhere in the joined lowercase text
    pub keywords: &'static [&'static str],
    /// Matched against the lowercase entity type only
    pub type_keywords: &'static [&'static str],
    pub patch: MetadataPatch,
}

impl ClassificationRule {
    pub fn matches(&self, text: &str, entity_type: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k))
            || self.type_keywords.iter().any(|k| entity_type.contains(k))
    }
}

/// Pattern rules, first match wins
pub static PATTERN_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        label: "preference",
        keywords: &[
            "prefers",
            "preference",
            "uses zsh",
            "uses bash",
            "uses fish",
            "uses powershell",
            "likes",
            "dislikes",
            "favorite",
            "needs",
            "working style",
            "always uses",
            "never uses",
        ],
        type_keywords: &[],
        patch: MetadataPatch {
            importance_pattern: Some(ImportancePattern::Preference),
            resonance: Some(0.9),
            is_user_preference: Some(true),
            accessibility_flag: None,
        },
    },
    ClassificationRule {
        label: "relationship",
        keywords: &[
            "bond",
            "trust",
            "collaboration",
            "partnership",
            "friendship",
            "teamwork",
        ],
        type_keywords: &["relationship", "team", "collaboration", "partner"],
        patch: MetadataPatch {
            importance_pattern: Some(ImportancePattern::Strengthen),
            resonance: Some(0.7),
            is_user_preference: None,
            accessibility_flag: None,
        },
    },
];

/// Flag rules, every match applies
pub static FLAG_RULES: &[ClassificationRule] = &[ClassificationRule {
    label: "accessibility",
    keywords: &[
        "screen reader",
        "vision impaired",
        "visually impaired",
        "cognitive",
        "accessibility",
        "dyslexia",
        "hearing impaired",
        "high contrast",
    ],
    type_keywords: &[],
    patch: MetadataPatch {
        importance_pattern: None,
        resonance: None,
        is_user_preference: None,
        accessibility_flag: Some(true),
    },
}];

/// Lowercase text the classifiers scan: name, type, then observations
pub fn inference_text(name: &str, entity_type: &str, observations: &[String]) -> String {
    let mut text = String::with_capacity(
        name.len() + entity_type.len() + observations.iter().map(|o| o.len() + 1).sum::<usize>(),
    );
    text.push_str(name);
    text.push(' ');
    text.push_str(entity_type);
    for observation in observations {
        text.push(' ');
        text.push_str(observation);
    }
    text.to_lowercase()
}

/// Derive default metadata for a brand-new entity
pub fn infer_metadata(
    name: &str,
    entity_type: &str,
    observations: &[String],
    now: DateTime<Utc>,
) -> Metadata {
    let text = inference_text(name, entity_type, observations);
    let entity_type = entity_type.to_lowercase();
    let mut metadata = Metadata::new(now);

    if let Some(rule) = PATTERN_RULES
        .iter()
        .find(|rule| rule.matches(&text, &entity_type))
    {
        rule.patch.apply(&mut metadata);
    }

    for rule in FLAG_RULES.iter().filter(|rule| rule.matches(&text, &entity_type)) {
        rule.patch.apply(&mut metadata);
    }

    metadata
}

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// ============================================================================
// Vocabularies
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Coding,
    Writing,
    Design,
    Automation,
    DataAnalysis,
    Productivity,
    Hiring,
    Marketing,
    Research,
    Personal,
    Other,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Self::Coding,
        Self::Writing,
        Self::Design,
        Self::Automation,
        Self::DataAnalysis,
        Self::Productivity,
        Self::Hiring,
        Self::Marketing,
        Self::Research,
        Self::Personal,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coding => "coding",
            Self::Writing => "writing",
            Self::Design => "design",
            Self::Automation => "automation",
            Self::DataAnalysis => "data-analysis",
            Self::Productivity => "productivity",
            Self::Hiring => "hiring",
            Self::Marketing => "marketing",
            Self::Research => "research",
            Self::Personal => "personal",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Other
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Audience {
    Engineers,
    ProductManagers,
    Designers,
    Executives,
    Marketers,
    Everyone,
    NonTechnical,
}

impl Audience {
    pub const ALL: [Audience; 7] = [
        Self::Engineers,
        Self::ProductManagers,
        Self::Designers,
        Self::Executives,
        Self::Marketers,
        Self::Everyone,
        Self::NonTechnical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Engineers => "engineers",
            Self::ProductManagers => "product-managers",
            Self::Designers => "designers",
            Self::Executives => "executives",
            Self::Marketers => "marketers",
            Self::Everyone => "everyone",
            Self::NonTechnical => "non-technical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }
}

impl Default for Audience {
    fn default() -> Self {
        Self::Everyone
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|d| d.as_str() == s)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Intermediate
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why someone would reach for a use case. Assigned by the enrichment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    ShipFaster,
    Automate,
    Tinker,
    GetInspired,
    LevelUp,
    ThinkStrategically,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Self::ShipFaster,
        Self::Automate,
        Self::Tinker,
        Self::GetInspired,
        Self::LevelUp,
        Self::ThinkStrategically,
    ];

    /// Substituted when the model proposes no valid intent.
    pub const FALLBACK: Intent = Intent::GetInspired;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShipFaster => "ship-faster",
            Self::Automate => "automate",
            Self::Tinker => "tinker",
            Self::GetInspired => "get-inspired",
            Self::LevelUp => "level-up",
            Self::ThinkStrategically => "think-strategically",
        }
    }

    /// Exact match only: intents are a closed taxonomy.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_str() == s)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Episodes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start_time_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub publish_date: Option<String>, // YYYYMMDD
    pub duration_seconds: u64,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub url: String,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_segments: Option<Vec<TranscriptSegment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Analysis>,
}

impl Episode {
    pub fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }

    pub fn has_transcript(&self) -> bool {
        self.transcript
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    pub fn has_segments(&self) -> bool {
        self.transcript_segments
            .as_ref()
            .is_some_and(|s| !s.is_empty())
    }

    /// Transcript or description available for extraction
    pub fn has_content(&self) -> bool {
        self.has_transcript() || !self.description.trim().is_empty()
    }

    pub fn published_on(&self) -> Option<NaiveDate> {
        self.publish_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y%m%d").ok())
    }
}

// ============================================================================
// Analysis (one per episode)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub guest_name: Option<String>,
    pub guest_role: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    #[serde(default)]
    pub use_cases: Vec<EpisodeUseCase>,
    #[serde(default)]
    pub tools_mentioned: Vec<String>,
    #[serde(default)]
    pub notable_quotes: Vec<String>,
}

/// A use case as it appears inside one episode's analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeUseCase {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tools: Vec<String>,
    pub category: Category,
    pub audience: Audience,
    pub difficulty: Difficulty,
}

// ============================================================================
// Flattened use-case index
// ============================================================================

const USE_CASE_NAMESPACE: Uuid = Uuid::from_u128(0x6f0c_2a4e_93d1_4b7a_8e25_1c9f_d04b_7a31);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseCase {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tools: Vec<String>,
    pub category: Category,
    pub audience: Audience,
    pub difficulty: Difficulty,
    pub episode_id: String,
    pub episode_title: String,
    pub guest_name: Option<String>,
    pub publish_date: Option<String>,
    // Enrichment fields stay absent until the enrichment pass sets them;
    // once set, `pick_reason` is written even when null.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intents: Option<Vec<Intent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pick: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub pick_reason: Option<Option<String>>,
}

impl UseCase {
    /// Content-derived id: the same episode/title/description always maps to
    /// the same id. `occurrence` separates exact duplicates within an episode.
    pub fn derive_id(episode_id: &str, title: &str, description: &str, occurrence: usize) -> Uuid {
        let mut key = format!("{}\u{1f}{}\u{1f}{}", episode_id, title, description);
        if occurrence > 0 {
            key.push_str(&format!("\u{1f}{}", occurrence));
        }
        Uuid::new_v5(&USE_CASE_NAMESPACE, key.as_bytes())
    }

    pub fn is_enriched(&self) -> bool {
        self.intents.as_ref().is_some_and(|i| !i.is_empty())
    }

    pub fn enrichment(&self) -> Option<Enrichment> {
        let intents = self.intents.clone().filter(|i| !i.is_empty())?;
        Some(Enrichment {
            intents,
            is_pick: self.is_pick.unwrap_or(false),
            pick_reason: self.pick_reason.clone().flatten(),
        })
    }

    pub fn set_enrichment(&mut self, enrichment: Enrichment) {
        self.intents = Some(enrichment.intents);
        self.is_pick = Some(enrichment.is_pick);
        self.pick_reason = Some(enrichment.pick_reason);
    }
}

/// Distinguishes `"pick_reason": null` (present) from a missing key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Validated enrichment for one use case.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichment {
    pub intents: Vec<Intent>,
    pub is_pick: bool,
    pub pick_reason: Option<String>,
}

impl Enrichment {
    pub const MAX_INTENTS: usize = 2;

    /// Normalizes intents to 1..=2 distinct values (falling back to
    /// `get-inspired`) and drops the reason unless the use case is a pick.
    pub fn new(intents: Vec<Intent>, is_pick: bool, pick_reason: Option<String>) -> Self {
        let mut unique: Vec<Intent> = Vec::with_capacity(Self::MAX_INTENTS);
        for intent in intents {
            if !unique.contains(&intent) {
                unique.push(intent);
            }
            if unique.len() == Self::MAX_INTENTS {
                break;
            }
        }
        if unique.is_empty() {
            unique.push(Intent::FALLBACK);
        }

        let pick_reason = if is_pick {
            pick_reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
        } else {
            None
        };

        Self {
            intents: unique,
            is_pick,
            pick_reason,
        }
    }
}

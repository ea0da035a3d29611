/*!
 * Database entity models.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};

/// A vocabulary card: the unit of work for the translation pipeline.
///
/// Cards are created by a separate ingestion process and are immutable while
/// the pipeline runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRecord {
    /// Unique card identifier (UUID); the resumption cursor scans ascending by id
    pub id: String,
    /// The English source term
    pub term: String,
    /// Source language code (always "en" for the current corpus)
    pub language: String,
    /// Whether the card is visible to the pipeline
    pub is_public: bool,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl CardRecord {
    /// Create a new card with a generated id
    pub fn new(term: String) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), term)
    }

    /// Create a new card with an explicit id
    pub fn with_id(id: String, term: String) -> Self {
        Self {
            id,
            term,
            language: crate::languages::SOURCE_LANGUAGE.to_string(),
            is_public: true,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// A completion-index entry: one translation of one card into one language.
///
/// At most one record exists per (card_id, lang) pair; writes are
/// replace-on-conflict upserts keyed on that pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Card this translation belongs to
    pub card_id: String,
    /// Target language code
    pub lang: String,
    /// Primary translation first, then up to 3 alternates
    pub translations: Vec<String>,
    /// Provider that produced the translation
    pub provider: String,
    /// Quality marker (1 = machine-generated, unreviewed)
    pub quality: i64,
    /// Whether the record was produced by the system rather than a user
    pub is_system: bool,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

impl TranslationRecord {
    /// Create a new system-contributed translation record
    pub fn new(card_id: String, lang: String, translations: Vec<String>, provider: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            card_id,
            lang,
            translations,
            provider,
            quality: 1,
            is_system: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Best-effort enrichment: an example sentence attached to a translation.
///
/// Same (card_id, lang) key shape as the completion index, but writes are
/// fire-and-forget and never affect the primary translation path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    /// Card this enrichment belongs to
    pub card_id: String,
    /// Target language code
    pub lang: String,
    /// The translation the example sentence uses
    pub translation: String,
    /// Example sentence in the target language
    pub context: String,
    /// Provider that produced the sentence
    pub provider: String,
    /// Quality marker
    pub quality: i64,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

impl EnrichmentRecord {
    /// Create a new enrichment record
    pub fn new(
        card_id: String,
        lang: String,
        translation: String,
        context: String,
        provider: String,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            card_id,
            lang,
            translation,
            context,
            provider,
            quality: 1,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

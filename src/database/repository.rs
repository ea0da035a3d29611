/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access.
 */

use std::collections::HashSet;

use anyhow::Result;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{CardRecord, EnrichmentRecord, TranslationRecord};

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Access the underlying connection (for stats)
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Card Operations
    // =========================================================================

    /// Insert a single card
    pub async fn insert_card(&self, card: &CardRecord) -> Result<()> {
        let card = card.clone();

        self.db
            .execute_async(move |conn| {
                Self::insert_card_sync(conn, &card)?;
                Ok(())
            })
            .await
    }

    /// Insert cards in bulk (single transaction)
    pub async fn insert_cards(&self, cards: Vec<CardRecord>) -> Result<()> {
        self.db
            .transaction_async(move |tx| {
                for card in cards {
                    tx.execute(
                        r#"
                        INSERT INTO vocab_cards (id, term, language, is_public, created_at)
                        VALUES (?1, ?2, ?3, ?4, ?5)
                        "#,
                        params![
                            card.id,
                            card.term,
                            card.language,
                            card.is_public as i32,
                            card.created_at,
                        ],
                    )?;
                }
                Ok(())
            })
            .await
    }

    fn insert_card_sync(conn: &Connection, card: &CardRecord) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO vocab_cards (id, term, language, is_public, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                card.id,
                card.term,
                card.language,
                card.is_public as i32,
                card.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a card by id
    pub async fn get_card(&self, card_id: &str) -> Result<Option<CardRecord>> {
        let card_id = card_id.to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT id, term, language, is_public, created_at
                        FROM vocab_cards WHERE id = ?1
                        "#,
                        [&card_id],
                        Self::map_card_row,
                    )
                    .optional()?;

                Ok(result)
            })
            .await
    }

    /// Select the next batch of cards that still need translations.
    ///
    /// Returns up to `limit` public English cards, ordered ascending by id and
    /// strictly greater than `continue_from`, whose count of distinct
    /// translated languages is below `total_languages`. The aggregation runs
    /// in the database; the corpus is never loaded client-side.
    pub async fn select_cards_needing_translation(
        &self,
        total_languages: usize,
        limit: usize,
        continue_from: Option<String>,
    ) -> Result<Vec<CardRecord>> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT c.id, c.term, c.language, c.is_public, c.created_at
                    FROM vocab_cards c
                    LEFT JOIN (
                        SELECT card_id, COUNT(DISTINCT lang) AS lang_count
                        FROM vocab_translations
                        GROUP BY card_id
                    ) t ON c.id = t.card_id
                    WHERE c.is_public = 1
                      AND c.language = 'en'
                      AND COALESCE(t.lang_count, 0) < ?1
                      AND (?2 IS NULL OR c.id > ?2)
                    ORDER BY c.id ASC
                    LIMIT ?3
                    "#,
                )?;

                let rows = stmt.query_map(
                    params![total_languages as i64, continue_from, limit as i64],
                    Self::map_card_row,
                )?;

                let cards: Vec<CardRecord> = rows.filter_map(|r| r.ok()).collect();
                Ok(cards)
            })
            .await
    }

    /// Total number of cards
    pub async fn count_cards(&self) -> Result<i64> {
        self.db
            .execute_async(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM vocab_cards", [], |row| row.get(0))?;
                Ok(count)
            })
            .await
    }

    fn map_card_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CardRecord> {
        Ok(CardRecord {
            id: row.get(0)?,
            term: row.get(1)?,
            language: row.get(2)?,
            is_public: row.get::<_, i32>(3)? != 0,
            created_at: row.get(4)?,
        })
    }

    // =========================================================================
    // Completion Index Operations
    // =========================================================================

    /// Fetch the set of already-completed (card_id, lang) pairs for a batch of
    /// cards in one bulk query.
    pub async fn existing_translation_pairs(
        &self,
        card_ids: &[String],
    ) -> Result<HashSet<(String, String)>> {
        if card_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let card_ids = card_ids.to_vec();

        self.db
            .execute_async(move |conn| {
                let placeholders = vec!["?"; card_ids.len()].join(",");
                let sql = format!(
                    "SELECT card_id, lang FROM vocab_translations WHERE card_id IN ({})",
                    placeholders
                );

                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt.query_map(params_from_iter(card_ids.iter()), |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?;

                let pairs: HashSet<(String, String)> = rows.filter_map(|r| r.ok()).collect();
                Ok(pairs)
            })
            .await
    }

    /// Insert or replace a translation record.
    ///
    /// The (card_id, lang) unique constraint is the dedup key; a conflicting
    /// write overwrites the existing record. Concurrent writers interleave
    /// safely with last-write-wins semantics.
    pub async fn upsert_translation(&self, record: &TranslationRecord) -> Result<()> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                let translations_json = serde_json::to_string(&record.translations)?;

                conn.execute(
                    r#"
                    INSERT INTO vocab_translations (
                        card_id, lang, translations, provider, quality, is_system,
                        created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(card_id, lang) DO UPDATE SET
                        translations = excluded.translations,
                        provider = excluded.provider,
                        quality = excluded.quality,
                        is_system = excluded.is_system,
                        updated_at = excluded.updated_at
                    "#,
                    params![
                        record.card_id,
                        record.lang,
                        translations_json,
                        record.provider,
                        record.quality,
                        record.is_system as i32,
                        record.created_at,
                        record.updated_at,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    /// Get a translation record for a (card_id, lang) pair
    pub async fn get_translation(
        &self,
        card_id: &str,
        lang: &str,
    ) -> Result<Option<TranslationRecord>> {
        let card_id = card_id.to_string();
        let lang = lang.to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT card_id, lang, translations, provider, quality, is_system,
                               created_at, updated_at
                        FROM vocab_translations
                        WHERE card_id = ?1 AND lang = ?2
                        "#,
                        params![card_id, lang],
                        |row| {
                            Ok((
                                row.get::<_, String>(0)?,
                                row.get::<_, String>(1)?,
                                row.get::<_, String>(2)?,
                                row.get::<_, String>(3)?,
                                row.get::<_, i64>(4)?,
                                row.get::<_, i32>(5)?,
                                row.get::<_, String>(6)?,
                                row.get::<_, String>(7)?,
                            ))
                        },
                    )
                    .optional()?;

                let record = match result {
                    Some((card_id, lang, json, provider, quality, is_system, created, updated)) => {
                        Some(TranslationRecord {
                            card_id,
                            lang,
                            translations: serde_json::from_str(&json).unwrap_or_default(),
                            provider,
                            quality,
                            is_system: is_system != 0,
                            created_at: created,
                            updated_at: updated,
                        })
                    }
                    None => None,
                };

                Ok(record)
            })
            .await
    }

    /// Total number of translation records
    pub async fn count_translations(&self) -> Result<i64> {
        self.db
            .execute_async(|conn| {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM vocab_translations", [], |row| {
                    row.get(0)
                })?;
                Ok(count)
            })
            .await
    }

    // =========================================================================
    // Enrichment Operations
    // =========================================================================

    /// Insert or replace an enrichment record.
    ///
    /// Callers treat this as best-effort; the orchestrator never awaits the
    /// result on its primary path.
    pub async fn upsert_enrichment(&self, record: &EnrichmentRecord) -> Result<()> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO vocab_enrichments (
                        card_id, lang, translation, context, provider, quality,
                        created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(card_id, lang) DO UPDATE SET
                        translation = excluded.translation,
                        context = excluded.context,
                        provider = excluded.provider,
                        quality = excluded.quality,
                        updated_at = excluded.updated_at
                    "#,
                    params![
                        record.card_id,
                        record.lang,
                        record.translation,
                        record.context,
                        record.provider,
                        record.quality,
                        record.created_at,
                        record.updated_at,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    /// Get an enrichment context for a (card_id, lang) pair
    pub async fn get_enrichment(&self, card_id: &str, lang: &str) -> Result<Option<String>> {
        let card_id = card_id.to_string();
        let lang = lang.to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        "SELECT context FROM vocab_enrichments WHERE card_id = ?1 AND lang = ?2",
                        params![card_id, lang],
                        |row| row.get::<_, String>(0),
                    )
                    .optional()?;
                Ok(result)
            })
            .await
    }

    /// Total number of enrichment records
    pub async fn count_enrichments(&self) -> Result<i64> {
        self.db
            .execute_async(|conn| {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM vocab_enrichments", [], |row| {
                    row.get(0)
                })?;
                Ok(count)
            })
            .await
    }
}

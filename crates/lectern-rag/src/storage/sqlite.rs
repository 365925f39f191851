//! SQLite-backed vector store
//!
//! Provides the durable key-value persistence behind the `VectorStore`
//! trait. Embeddings are stored as little-endian `f32` BLOBs; all three
//! record kinds live in their own table keyed by `(document_id, index)`
//! with `INSERT OR REPLACE` giving last-write-wins per key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::DocumentMeta;

use super::{VectorRecord, VectorStore};

/// SQLite-based vector store
pub struct SqliteVectorStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteVectorStore {
    /// Create or open the database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::Store(format!("Failed to open database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.migrate()?;
        Ok(store)
    }

    /// Create an in-memory database (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Store(format!("Failed to open in-memory database: {}", e)))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.migrate()?;
        Ok(store)
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        // WAL mode for concurrent readers alongside a writer
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA cache_size=10000;
            PRAGMA temp_store=MEMORY;
        "#,
        )
        .map_err(|e| Error::Store(format!("Failed to set pragmas: {}", e)))?;

        conn.execute_batch(
            r#"
            -- Document metadata: written last during ingestion, gates
            -- visibility of the document's vectors
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                chunk_count INTEGER NOT NULL,
                ingested_at TEXT NOT NULL
            );

            -- Chunk text keyed by (document id, index)
            CREATE TABLE IF NOT EXISTS chunks (
                document_id TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                content TEXT NOT NULL,
                PRIMARY KEY (document_id, chunk_index)
            );

            -- Embedding vectors, little-endian f32 BLOBs, same key space
            CREATE TABLE IF NOT EXISTS vectors (
                document_id TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                embedding BLOB NOT NULL,
                PRIMARY KEY (document_id, chunk_index)
            );
        "#,
        )
        .map_err(|e| Error::Store(format!("Failed to run migrations: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    async fn put_meta(&self, meta: &DocumentMeta) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        let meta = meta.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            conn.execute(
                "INSERT OR REPLACE INTO documents (id, title, chunk_count, ingested_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![meta.id, meta.title, meta.chunk_count, meta.ingested_at.to_rfc3339()],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| Error::Store(format!("Task join error: {}", e)))?
    }

    async fn get_meta(&self, document_id: &str) -> Result<Option<DocumentMeta>> {
        let conn = Arc::clone(&self.conn);
        let document_id = document_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            let meta = conn
                .query_row(
                    "SELECT id, title, chunk_count, ingested_at FROM documents WHERE id = ?1",
                    params![document_id],
                    row_to_meta,
                )
                .optional()?;
            Ok(meta)
        })
        .await
        .map_err(|e| Error::Store(format!("Task join error: {}", e)))?
    }

    async fn list_meta(&self) -> Result<Vec<DocumentMeta>> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            let mut stmt = conn.prepare(
                "SELECT id, title, chunk_count, ingested_at FROM documents ORDER BY id",
            )?;
            let rows = stmt.query_map([], row_to_meta)?;
            let mut metas = Vec::new();
            for row in rows {
                metas.push(row?);
            }
            Ok(metas)
        })
        .await
        .map_err(|e| Error::Store(format!("Task join error: {}", e)))?
    }

    async fn put_chunk(&self, document_id: &str, index: u32, text: &str) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        let document_id = document_id.to_string();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            conn.execute(
                "INSERT OR REPLACE INTO chunks (document_id, chunk_index, content)
                 VALUES (?1, ?2, ?3)",
                params![document_id, index, text],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| Error::Store(format!("Task join error: {}", e)))?
    }

    async fn get_chunk(&self, document_id: &str, index: u32) -> Result<Option<String>> {
        let conn = Arc::clone(&self.conn);
        let document_id = document_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            let text = conn
                .query_row(
                    "SELECT content FROM chunks WHERE document_id = ?1 AND chunk_index = ?2",
                    params![document_id, index],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(text)
        })
        .await
        .map_err(|e| Error::Store(format!("Task join error: {}", e)))?
    }

    async fn put_vector(&self, document_id: &str, index: u32, embedding: &[f32]) -> Result<()> {
        let conn = Arc::clone(&self.conn);
        let document_id = document_id.to_string();
        let blob = encode_embedding(embedding);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            conn.execute(
                "INSERT OR REPLACE INTO vectors (document_id, chunk_index, embedding)
                 VALUES (?1, ?2, ?3)",
                params![document_id, index, blob],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| Error::Store(format!("Task join error: {}", e)))?
    }

    async fn scan_vectors(&self) -> Result<Vec<VectorRecord>> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            // Metadata gates visibility: only vectors of documents with a
            // metadata record, at indices below the advertised chunk count,
            // take part in retrieval.
            let mut stmt = conn.prepare(
                "SELECT v.document_id, v.chunk_index, v.embedding
                 FROM vectors v
                 JOIN documents d ON d.id = v.document_id
                 WHERE v.chunk_index < d.chunk_count",
            )?;
            let rows = stmt.query_map([], |row| {
                let document_id: String = row.get(0)?;
                let index: u32 = row.get(1)?;
                let blob: Vec<u8> = row.get(2)?;
                Ok((document_id, index, blob))
            })?;

            let mut records = Vec::new();
            for row in rows {
                let (document_id, index, blob) = row?;
                records.push(VectorRecord {
                    document_id,
                    index,
                    embedding: decode_embedding(&blob)?,
                });
            }
            Ok(records)
        })
        .await
        .map_err(|e| Error::Store(format!("Task join error: {}", e)))?
    }

    async fn delete_from(&self, document_id: &str, first_index: u32) -> Result<usize> {
        let conn = Arc::clone(&self.conn);
        let document_id = document_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            let chunks_deleted = conn.execute(
                "DELETE FROM chunks WHERE document_id = ?1 AND chunk_index >= ?2",
                params![document_id, first_index],
            )?;
            let vectors_deleted = conn.execute(
                "DELETE FROM vectors WHERE document_id = ?1 AND chunk_index >= ?2",
                params![document_id, first_index],
            )?;
            Ok(chunks_deleted.max(vectors_deleted))
        })
        .await
        .map_err(|e| Error::Store(format!("Task join error: {}", e)))?
    }

    async fn vector_count(&self) -> Result<usize> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            let count: usize =
                conn.query_row("SELECT COUNT(*) FROM vectors", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
        .map_err(|e| Error::Store(format!("Task join error: {}", e)))?
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

/// Parse a metadata row
fn row_to_meta(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentMeta> {
    let ingested_at: String = row.get(3)?;
    Ok(DocumentMeta {
        id: row.get(0)?,
        title: row.get(1)?,
        chunk_count: row.get(2)?,
        ingested_at: ingested_at
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now()),
    })
}

/// Encode an embedding as a little-endian f32 BLOB
fn encode_embedding(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * 4);
    for value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decode a little-endian f32 BLOB back into an embedding
fn decode_embedding(blob: &[u8]) -> Result<Vec<f32>> {
    if blob.len() % 4 != 0 {
        return Err(Error::Store(format!(
            "embedding blob length {} is not a multiple of 4",
            blob.len()
        )));
    }
    let mut values = Vec::with_capacity(blob.len() / 4);
    for chunk in blob.chunks_exact(4) {
        values.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_blob_roundtrip() {
        let vector = vec![0.0f32, 1.5, -2.25, f32::MIN_POSITIVE];
        let decoded = decode_embedding(&encode_embedding(&vector)).unwrap();
        assert_eq!(vector, decoded);
    }

    #[test]
    fn test_decode_rejects_truncated_blob() {
        assert!(decode_embedding(&[0u8, 0, 0]).is_err());
    }

    #[tokio::test]
    async fn test_meta_roundtrip() {
        let store = SqliteVectorStore::in_memory().unwrap();

        assert!(store.get_meta("lec1").await.unwrap().is_none());

        let meta = DocumentMeta::new("lec1", "Intro", 4);
        store.put_meta(&meta).await.unwrap();

        let loaded = store.get_meta("lec1").await.unwrap().unwrap();
        assert_eq!(loaded.id, "lec1");
        assert_eq!(loaded.title, "Intro");
        assert_eq!(loaded.chunk_count, 4);
    }

    #[tokio::test]
    async fn test_chunk_and_vector_roundtrip() {
        let store = SqliteVectorStore::in_memory().unwrap();

        store.put_chunk("lec1", 0, "hello").await.unwrap();
        store.put_vector("lec1", 0, &[1.0, 2.0]).await.unwrap();

        assert_eq!(
            store.get_chunk("lec1", 0).await.unwrap(),
            Some("hello".to_string())
        );
        assert!(store.get_chunk("lec1", 1).await.unwrap().is_none());
        assert_eq!(store.vector_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_last_write_wins_per_key() {
        let store = SqliteVectorStore::in_memory().unwrap();

        store.put_chunk("lec1", 0, "old").await.unwrap();
        store.put_chunk("lec1", 0, "new").await.unwrap();
        assert_eq!(
            store.get_chunk("lec1", 0).await.unwrap(),
            Some("new".to_string())
        );

        store.put_vector("lec1", 0, &[1.0]).await.unwrap();
        store.put_vector("lec1", 0, &[2.0]).await.unwrap();
        assert_eq!(store.vector_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_scan_excludes_documents_without_metadata() {
        let store = SqliteVectorStore::in_memory().unwrap();

        store.put_chunk("pending", 0, "text").await.unwrap();
        store.put_vector("pending", 0, &[1.0, 0.0]).await.unwrap();

        // No metadata written: the document is not visible
        assert!(store.scan_vectors().await.unwrap().is_empty());

        store.put_meta(&DocumentMeta::new("pending", "T", 1)).await.unwrap();
        let records = store.scan_vectors().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].document_id, "pending");
        assert_eq!(records[0].embedding, vec![1.0, 0.0]);
    }

    #[tokio::test]
    async fn test_scan_excludes_indices_beyond_chunk_count() {
        let store = SqliteVectorStore::in_memory().unwrap();

        store.put_vector("doc", 0, &[1.0]).await.unwrap();
        store.put_vector("doc", 1, &[2.0]).await.unwrap();
        store.put_vector("doc", 2, &[3.0]).await.unwrap();
        store.put_meta(&DocumentMeta::new("doc", "T", 2)).await.unwrap();

        let records = store.scan_vectors().await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.index < 2));
    }

    #[tokio::test]
    async fn test_delete_from_drops_trailing_records() {
        let store = SqliteVectorStore::in_memory().unwrap();

        for index in 0..4 {
            store.put_chunk("doc", index, "text").await.unwrap();
            store.put_vector("doc", index, &[index as f32]).await.unwrap();
        }

        let deleted = store.delete_from("doc", 2).await.unwrap();
        assert_eq!(deleted, 2);
        assert!(store.get_chunk("doc", 2).await.unwrap().is_none());
        assert!(store.get_chunk("doc", 1).await.unwrap().is_some());
        assert_eq!(store.vector_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.db");

        {
            let store = SqliteVectorStore::new(&path).unwrap();
            store.put_chunk("lec1", 0, "persisted").await.unwrap();
            store.put_vector("lec1", 0, &[0.5, 0.5]).await.unwrap();
            store.put_meta(&DocumentMeta::new("lec1", "Intro", 1)).await.unwrap();
        }

        let store = SqliteVectorStore::new(&path).unwrap();
        assert_eq!(
            store.get_chunk("lec1", 0).await.unwrap(),
            Some("persisted".to_string())
        );
        assert_eq!(store.scan_vectors().await.unwrap().len(), 1);
    }
}

//! Client side of the bulk import: splits a JSON array into fixed-size
//! chunks and posts them one at a time to `/v1/import/{table}`.
//!
//! Chunks are sent strictly in order and the run stops at the first
//! failure. Chunks already accepted stay in place; there is no resume.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_CHUNK_SIZE: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("input JSON must be an array of objects")]
    NotArray,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server rejected chunk ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("rows {start}..{end} failed: {source}")]
    Chunk {
        start: usize,
        end: usize,
        #[source]
        source: Box<ImportError>,
    },
}

/// Where chunks go. The HTTP implementation talks to a running server.
#[async_trait]
pub trait ChunkSink: Send + Sync {
    /// Inserts one chunk and returns the number of rows the target accepted.
    async fn insert_chunk(&self, table: &str, rows: &[Value]) -> Result<u64, ImportError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub chunks: usize,
    pub rows: u64,
}

pub fn parse_rows(input: &str) -> Result<Vec<Value>, ImportError> {
    match serde_json::from_str::<Value>(input)? {
        Value::Array(rows) => Ok(rows),
        _ => Err(ImportError::NotArray),
    }
}

pub async fn run_import(
    sink: &dyn ChunkSink,
    table: &str,
    rows: &[Value],
    chunk_size: usize,
) -> Result<ImportReport, ImportError> {
    let chunk_size = chunk_size.max(1);
    tracing::info!(rows = rows.len(), table = %table, "Inserting rows");
    let mut report = ImportReport::default();
    for (index, chunk) in rows.chunks(chunk_size).enumerate() {
        let start = index * chunk_size;
        let end = start + chunk.len() - 1;
        match sink.insert_chunk(table, chunk).await {
            Ok(inserted) => {
                tracing::info!("Inserted rows {start}..{end}");
                report.chunks += 1;
                report.rows += inserted;
            }
            Err(e) => {
                tracing::error!(start, end, error = %e, "Insert error");
                return Err(ImportError::Chunk {
                    start,
                    end,
                    source: Box::new(e),
                });
            }
        }
    }
    tracing::info!(chunks = report.chunks, rows = report.rows, "Import complete");
    Ok(report)
}

/// Posts chunks to a server, authenticated with the service key.
pub struct HttpChunkSink {
    client: reqwest::Client,
    api_url: String,
    service_key: String,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    err_msg: String,
    data: Option<Inserted>,
}

#[derive(Deserialize)]
struct Inserted {
    inserted: u64,
}

impl HttpChunkSink {
    pub fn new(api_url: &str, service_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }
}

#[async_trait]
impl ChunkSink for HttpChunkSink {
    async fn insert_chunk(&self, table: &str, rows: &[Value]) -> Result<u64, ImportError> {
        let url = format!("{}/v1/import/{}", self.api_url, table);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.service_key)
            .json(rows)
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        let envelope = serde_json::from_str::<Envelope>(&body).ok();
        if !status.is_success() {
            let message = envelope
                .map(|e| e.err_msg)
                .filter(|m| !m.is_empty())
                .unwrap_or(body);
            return Err(ImportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(envelope
            .and_then(|e| e.data)
            .map_or(rows.len() as u64, |d| d.inserted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<usize>>,
        fail_on_call: Option<usize>,
    }

    #[async_trait]
    impl ChunkSink for RecordingSink {
        async fn insert_chunk(&self, _table: &str, rows: &[Value]) -> Result<u64, ImportError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(rows.len());
            if self.fail_on_call == Some(calls.len()) {
                return Err(ImportError::Rejected {
                    status: 409,
                    message: "duplicate key".into(),
                });
            }
            Ok(rows.len() as u64)
        }
    }

    fn rows(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!({ "title": format!("row {i}") })).collect()
    }

    #[tokio::test]
    async fn splits_into_chunks_of_two_hundred() {
        let sink = RecordingSink::default();
        let report = run_import(&sink, "services", &rows(450), DEFAULT_CHUNK_SIZE)
            .await
            .unwrap();
        assert_eq!(*sink.calls.lock().unwrap(), vec![200, 200, 50]);
        assert_eq!(report, ImportReport { chunks: 3, rows: 450 });
    }

    #[tokio::test]
    async fn failure_on_second_chunk_stops_the_run() {
        let sink = RecordingSink {
            fail_on_call: Some(2),
            ..Default::default()
        };
        let err = run_import(&sink, "services", &rows(450), DEFAULT_CHUNK_SIZE)
            .await
            .unwrap_err();
        assert_eq!(sink.calls.lock().unwrap().len(), 2);
        match err {
            ImportError::Chunk { start, end, .. } => assert_eq!((start, end), (200, 399)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_array_sends_nothing() {
        let sink = RecordingSink::default();
        let report = run_import(&sink, "services", &[], DEFAULT_CHUNK_SIZE)
            .await
            .unwrap();
        assert!(sink.calls.lock().unwrap().is_empty());
        assert_eq!(report.chunks, 0);
    }

    #[test]
    fn parse_rows_requires_an_array() {
        assert_eq!(parse_rows("[{\"a\":1}]").unwrap().len(), 1);
        assert!(matches!(parse_rows("{\"a\":1}"), Err(ImportError::NotArray)));
        assert!(matches!(parse_rows("[1,"), Err(ImportError::Parse(_))));
    }
}

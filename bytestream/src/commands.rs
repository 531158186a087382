//! Command implementations behind the `bytestream` binary.

use std::fs;
use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, bail};
use serde::Serialize;
use statuspage::{SubscriberRow, render_subscribers};
use tracing::info;

use crate::client::{FileInfo, FileKind, FsClient};
use crate::counter::{Counter, NullSink};
use crate::stream::{ByteStream, RemoteByteStream};

#[derive(Debug, Clone)]
pub struct CatOptions {
    pub offset: u64,
    pub length: Option<u64>,
    pub chunk_size: usize,
}

impl Default for CatOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            length: None,
            chunk_size: 64 * 1024,
        }
    }
}

/// Copies `[offset, offset + length)` of `path` into `out` and returns the
/// number of bytes reported by the stream's byte counter.
pub fn cat<C: FsClient, W: Write>(
    client: Arc<C>,
    path: &str,
    opts: &CatOptions,
    out: &mut W,
) -> anyhow::Result<u64> {
    if opts.chunk_size == 0 {
        bail!("chunk size must be greater than zero");
    }
    let counter = Arc::new(Counter::new("BytesRead"));
    let mut stream = RemoteByteStream::new(client, counter.clone());
    stream.open(path)?;
    if opts.offset > 0 {
        stream.seek(opts.offset)?;
    }

    let mut buf = vec![0u8; opts.chunk_size];
    let mut remaining = opts.length.unwrap_or(u64::MAX);
    while remaining > 0 {
        let want = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let n = stream.read(&mut buf[..want])?;
        out.write_all(&buf[..n]).context("failed to write output")?;
        remaining -= n as u64;
        if n < want {
            break;
        }
    }
    out.flush().context("failed to flush output")?;
    stream.close()?;

    let bytes = u64::try_from(counter.value()).unwrap_or_default();
    info!(path, offset = opts.offset, bytes, "{}: {}", counter.name(), bytes);
    Ok(bytes)
}

#[derive(Debug, Serialize)]
pub struct StatReport {
    #[serde(flatten)]
    pub info: FileInfo,
    /// Whether a freshly opened stream is already at end-of-file. Absent for
    /// directories, which cannot be opened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eof_at_start: Option<bool>,
}

pub fn stat<C: FsClient>(client: Arc<C>, path: &str) -> anyhow::Result<StatReport> {
    let info = client
        .get_path_info(path)
        .with_context(|| format!("failed to stat {path}"))?;
    let report = StatReport {
        info: info.clone(),
        eof_at_start: None,
    };
    client.free_file_info(info);
    if report.info.kind != FileKind::File {
        return Ok(report);
    }
    let mut stream = RemoteByteStream::new(client, Arc::new(NullSink));
    stream.open(path)?;
    let at_end = stream.eof()?;
    stream.close()?;
    Ok(StatReport {
        eof_at_start: Some(at_end),
        ..report
    })
}

/// Renders the subscribers page from a JSON array of rows stored at `rows_path`.
pub fn status(rows_path: &str) -> anyhow::Result<String> {
    let raw = fs::read_to_string(rows_path)
        .with_context(|| format!("failed to read subscriber rows from {rows_path}"))?;
    let rows: Vec<SubscriberRow> =
        serde_json::from_str(&raw).with_context(|| format!("invalid subscriber rows in {rows_path}"))?;
    Ok(render_subscribers(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::localfs::LocalFsClient;
    use crate::client::memory::MemoryClient;

    #[test]
    fn test_cat_range() {
        let client = Arc::new(MemoryClient::new());
        client.insert("/t/f", b"0123456789".to_vec());
        let mut out = Vec::new();
        let opts = CatOptions {
            offset: 2,
            length: Some(5),
            chunk_size: 2,
        };
        let n = cat(client.clone(), "/t/f", &opts, &mut out).unwrap();
        assert_eq!(out, b"23456");
        assert_eq!(n, 5);
        assert_eq!(client.open_handles(), 0);
    }

    #[test]
    fn test_cat_to_end_of_file() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("f.txt"), b"hello remote world").unwrap();
        let client = Arc::new(LocalFsClient::new(tmp.path()));
        let mut out = Vec::new();
        let opts = CatOptions {
            chunk_size: 4,
            ..CatOptions::default()
        };
        let n = cat(client, "/f.txt", &opts, &mut out).unwrap();
        assert_eq!(out, b"hello remote world");
        assert_eq!(n, 18);
    }

    #[test]
    fn test_cat_rejects_zero_chunk() {
        let client = Arc::new(MemoryClient::new());
        client.insert("/t/f", b"x".to_vec());
        let opts = CatOptions {
            chunk_size: 0,
            ..CatOptions::default()
        };
        assert!(cat(client, "/t/f", &opts, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_stat_reports_size_and_eof() {
        let client = Arc::new(MemoryClient::new());
        client.insert("/t/empty", Vec::new());
        client.insert("/t/full", vec![1u8; 3]);

        let empty = stat(client.clone(), "/t/empty").unwrap();
        assert_eq!(empty.info.size, 0);
        assert_eq!(empty.eof_at_start, Some(true));

        let full = stat(client.clone(), "/t/full").unwrap();
        assert_eq!(full.info.size, 3);
        assert_eq!(full.eof_at_start, Some(false));
        assert_eq!(client.outstanding_file_infos(), 0);

        let json = serde_json::to_value(&full).unwrap();
        assert_eq!(json["size"], 3);
        assert_eq!(json["kind"], "file");
        assert_eq!(json["eof_at_start"], false);
    }

    #[test]
    fn test_stat_directory_has_no_eof() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("part")).unwrap();
        let client = Arc::new(LocalFsClient::new(tmp.path()));

        let report = stat(client.clone(), "/part").unwrap();
        assert_eq!(report.info.kind, FileKind::Directory);
        assert_eq!(report.eof_at_start, None);
        assert_eq!(client.open_handles(), 0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "directory");
        assert!(json.get("eof_at_start").is_none());
    }

    #[test]
    fn test_status_renders_rows_file() {
        let tmp = tempfile::tempdir().unwrap();
        let rows = tmp.path().join("rows.json");
        fs::write(
            &rows,
            r#"[{"id":"impalad@host-1","address":"host-1:23000","num_topics":2,
                "num_priority_topics":1,"secs_since_heartbeat":0.25}]"#,
        )
        .unwrap();
        let page = status(rows.to_str().unwrap()).unwrap();
        assert!(page.contains("<td>impalad@host-1</td>"));
        assert!(page.contains("<td>0.250</td>"));
    }
}

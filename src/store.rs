//! Comment collection collaborator.
//!
//! The feed only needs append + list (plus a like counter); `InMemoryStore`
//! keeps comments in insertion order behind a mutex and can mirror every
//! change into a JSON snapshot file. Snapshot writes happen after the
//! comment is already classified and stored; a failed write is logged and
//! never surfaces to the submitter.
//!
//! Writers are serialised and each write lands in a sibling `.tmp` file that
//! is renamed over the snapshot, so a reader never sees a half-written file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::comment::{Comment, CommentId};

pub trait CommentStore: Send + Sync {
    /// Reserve a fresh, never reused id.
    fn next_id(&self) -> CommentId;
    fn append(&self, comment: Comment);
    /// All comments, oldest first.
    fn list(&self) -> Vec<Comment>;
    fn get(&self, id: CommentId) -> Option<Comment>;
    /// Apply `delta` to the like counter (saturating at zero); `None` for unknown ids.
    fn adjust_likes(&self, id: CommentId, delta: i64) -> Option<u32>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    next_id: u64,
    comments: Vec<Comment>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Snapshot>,
    snapshot_path: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` if it exists (an absent file starts empty) and keep it updated.
    pub fn with_snapshot<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut snap = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("reading comment snapshot {}", path.display()))?;
            serde_json::from_str::<Snapshot>(&raw)
                .with_context(|| format!("parsing comment snapshot {}", path.display()))?
        } else {
            Snapshot::default()
        };

        // Never hand out an id that is already taken.
        let max_seen = snap.comments.iter().map(|c| c.id.0 + 1).max().unwrap_or(0);
        snap.next_id = snap.next_id.max(max_seen);
        debug!(
            target: "store",
            path = %path.display(),
            comments = snap.comments.len(),
            "snapshot loaded"
        );

        Ok(Self {
            inner: Mutex::new(snap),
            snapshot_path: Some(path),
            write_lock: Mutex::new(()),
        })
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("store mutex poisoned").comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the current state to `path` as pretty JSON (temp file + rename).
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        // Held across serialise + rename: the last writer always carries the newest state.
        let _writer = self.write_lock.lock().expect("snapshot writer mutex poisoned");
        let bytes = {
            let guard = self.inner.lock().expect("store mutex poisoned");
            serde_json::to_vec_pretty(&*guard).context("serializing comment snapshot")?
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating snapshot dir {}", dir.display()))?;
        }
        let tmp = tmp_path(path);
        fs::write(&tmp, bytes).with_context(|| format!("writing snapshot {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("replacing snapshot {}", path.display()))
    }

    fn persist(&self) {
        if let Some(path) = &self.snapshot_path {
            if let Err(e) = self.save_snapshot(path) {
                warn!(target: "store", "snapshot write failed: {e:#}");
            }
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

impl CommentStore for InMemoryStore {
    fn next_id(&self) -> CommentId {
        let mut guard = self.inner.lock().expect("store mutex poisoned");
        let id = CommentId(guard.next_id);
        guard.next_id += 1;
        id
    }

    fn append(&self, comment: Comment) {
        {
            let mut guard = self.inner.lock().expect("store mutex poisoned");
            guard.next_id = guard.next_id.max(comment.id.0 + 1);
            guard.comments.push(comment);
        }
        self.persist();
    }

    fn list(&self) -> Vec<Comment> {
        self.inner
            .lock()
            .expect("store mutex poisoned")
            .comments
            .clone()
    }

    fn get(&self, id: CommentId) -> Option<Comment> {
        self.inner
            .lock()
            .expect("store mutex poisoned")
            .comments
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    fn adjust_likes(&self, id: CommentId, delta: i64) -> Option<u32> {
        let updated = {
            let mut guard = self.inner.lock().expect("store mutex poisoned");
            let c = guard.comments.iter_mut().find(|c| c.id == id)?;
            let next = (c.like_count as i64 + delta).clamp(0, u32::MAX as i64);
            c.like_count = next as u32;
            c.like_count
        };
        self.persist();
        Some(updated)
    }
}

//! Reorganization result models.
//!
//! The orchestrator emits typed per-item records; rendering layers consume
//! the structure directly and never parse information back out of text.

use serde::{Deserialize, Serialize};

/// Outcome of processing one attachment. Exactly one per attachment per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    /// File already sits at its target path.
    AlreadyOrganized,
    /// File was physically moved and references were rewritten.
    Moved,
    /// Move was attempted and failed. Files are left as they were.
    Failed,
    /// No target could be resolved; nothing was attempted.
    Skipped,
}

impl std::fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveOutcome::AlreadyOrganized => write!(f, "already organized"),
            MoveOutcome::Moved => write!(f, "moved"),
            MoveOutcome::Failed => write!(f, "failed"),
            MoveOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// Per-attachment result record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResult {
    /// Attachment ID.
    pub attachment_id: u64,
    /// Outcome kind.
    pub outcome: MoveOutcome,
    /// Path before the run, relative to the uploads root.
    pub current_path: String,
    /// Resolved target path, relative to the uploads root. Empty when no
    /// target could be resolved.
    pub target_path: String,
    /// Human-readable detail, e.g. the failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MoveResult {
    /// One display line for this result.
    pub fn display_line(&self) -> String {
        let detail = match self.outcome {
            MoveOutcome::Moved => format!("{} -> {}", self.current_path, self.target_path),
            MoveOutcome::AlreadyOrganized => self.current_path.clone(),
            MoveOutcome::Failed | MoveOutcome::Skipped => match self.message {
                Some(ref msg) => format!("{}: {}", self.current_path, msg),
                None => self.current_path.clone(),
            },
        };
        format!("#{} {}: {}", self.attachment_id, self.outcome, detail)
    }
}

/// Results for one post, in processing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResults {
    /// Post ID.
    pub post_id: u64,
    /// Post title, for display.
    pub post_title: String,
    /// Per-attachment results.
    pub results: Vec<MoveResult>,
    /// Post-level failure that prevented processing, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate outcome of one orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorganizationSummary {
    /// Unique run ID.
    pub run_id: String,
    /// Run timestamp.
    pub started_at: String,
    /// Per-post results, in processing order.
    pub posts: Vec<PostResults>,
}

impl ReorganizationSummary {
    /// Create an empty summary with a fresh run ID.
    pub fn new() -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
            posts: Vec::new(),
        }
    }

    fn count(&self, outcome: MoveOutcome) -> usize {
        self.posts
            .iter()
            .flat_map(|post| post.results.iter())
            .filter(|result| result.outcome == outcome)
            .count()
    }

    /// Number of moved attachments.
    pub fn moved(&self) -> usize {
        self.count(MoveOutcome::Moved)
    }

    /// Number of failed attachments.
    pub fn failed(&self) -> usize {
        self.count(MoveOutcome::Failed)
    }

    /// Number of skipped attachments.
    pub fn skipped(&self) -> usize {
        self.count(MoveOutcome::Skipped)
    }

    /// Number of attachments already at their target.
    pub fn already_organized(&self) -> usize {
        self.count(MoveOutcome::AlreadyOrganized)
    }

    /// Total attachments attempted.
    pub fn total(&self) -> usize {
        self.posts.iter().map(|post| post.results.len()).sum()
    }
}

impl Default for ReorganizationSummary {
    fn default() -> Self {
        Self::new()
    }
}

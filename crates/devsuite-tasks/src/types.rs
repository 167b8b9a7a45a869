use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TaskRecord
// ---------------------------------------------------------------------------

/// A flat task row as supplied by the data layer.
///
/// Callers are responsible for pre-filtering: records should already be
/// scoped to one tenant and exclude soft-deleted rows before they reach the
/// tree builder. `sort_key` orders siblings by code-point comparison and is
/// not required to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub sort_key: String,
}

impl TaskRecord {
    pub fn new(id: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            sort_key: sort_key.into(),
        }
    }

    pub fn with_parent(
        id: impl Into<String>,
        parent_id: impl Into<String>,
        sort_key: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: Some(parent_id.into()),
            sort_key: sort_key.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskNode
// ---------------------------------------------------------------------------

/// A task record with its children attached, in display order.
///
/// Nodes are a read-only projection rebuilt on every [`crate::build_task_tree`]
/// call; when the underlying records change, rebuild the forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
    #[serde(flatten)]
    pub record: TaskRecord,
    pub children: Vec<TaskNode>,
}

impl TaskNode {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn sort_key(&self) -> &str {
        &self.record.sort_key
    }
}

// ---------------------------------------------------------------------------
// TreeAnomaly
// ---------------------------------------------------------------------------

/// A relational inconsistency the builder repaired rather than failed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TreeAnomaly {
    /// `parent_id` referenced an id absent from the input; the record was
    /// promoted to a root.
    #[serde(rename_all = "camelCase")]
    DanglingParent {
        task_id: String,
        missing_parent_id: String,
    },
    /// The parent chain closed on itself. The first ring member (by input
    /// order) had its parent edge cut and became a root; `ring` lists the
    /// cycle's ids starting at that member and following parent links.
    ParentCycle { ring: Vec<String> },
}

// ---------------------------------------------------------------------------
// TaskForest
// ---------------------------------------------------------------------------

/// Output of [`crate::build_task_tree`]: ordered roots plus any anomalies
/// repaired during construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskForest {
    pub roots: Vec<TaskNode>,
    pub anomalies: Vec<TreeAnomaly>,
}

impl TaskForest {
    /// True when the input had no dangling parents and no parent cycles.
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }

    /// Pre-order traversal of the whole forest (display order).
    pub fn flatten(&self) -> Vec<&TaskNode> {
        crate::tree::flatten_task_tree(&self.roots)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

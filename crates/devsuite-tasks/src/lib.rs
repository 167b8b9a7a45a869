pub mod error;
pub mod tree;
pub mod types;

pub use error::{Result, TaskTreeError};
pub use tree::{build_task_tree, flatten_task_tree, task_depth, task_index};
pub use types::{TaskForest, TaskNode, TaskRecord, TreeAnomaly};

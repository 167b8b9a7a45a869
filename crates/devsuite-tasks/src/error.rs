use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskTreeError {
    #[error("duplicate task id: {0}")]
    DuplicateTaskId(String),
}

pub type Result<T> = std::result::Result<T, TaskTreeError>;

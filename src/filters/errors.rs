use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FilterError {
    #[error("Invalid range format: `{value}` (expected `seq_name:start-end`, e.g. `1:1000-2000`)")]
    InvalidRangeFormat { value: String },
    #[error("Invalid overlap mode: `{value}` (expected `any` or `within`)")]
    InvalidOverlapMode { value: String },
}

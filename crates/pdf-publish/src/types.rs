use pdf_paginate::PaginateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error(transparent)]
    Paginate(#[from] PaginateError),
    #[error("Invalid bump type {0:?}: expected major, minor or patch")]
    InvalidBump(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, PublishError>;

/// What a successful publish wrote
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PublishReceipt {
    /// Version string embedded in every running head, e.g. `v1.3.0`
    pub version: String,
    /// Blob key of the stored PDF
    pub key: String,
    /// Size of the stored PDF in bytes
    pub size: usize,
}

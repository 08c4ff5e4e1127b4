use std::io;

use thiserror::Error;

use tableview::TableError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid row data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("could not determine a log directory, pass --log-file")]
    NoLogDir,
}

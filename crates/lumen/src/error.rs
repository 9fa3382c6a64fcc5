//! Errors surfaced by the styling runtime.

use thiserror::Error;

use lcss::CssError;

#[derive(Error, Debug)]
pub enum LumenError {
    #[error(transparent)]
    Css(#[from] CssError),

    #[error("logger already installed: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("cannot open log file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LumenError>;

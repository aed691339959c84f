//! Application errors
use std::{fmt, path::PathBuf};

use jack::prelude::JackError;

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
}

impl std::error::Error for AppError {}

#[derive(Debug)]
pub enum ErrorKind {
    Io(std::io::Error),
    Conf(serde_yaml::Error),
    /// Compilation of a source file failed.
    Source {
        path: PathBuf,
        err: JackError,
    },
}

impl AppError {
    pub fn source(path: impl Into<PathBuf>, err: JackError) -> Self {
        Self {
            kind: ErrorKind::Source {
                path: path.into(),
                err,
            },
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "application error: {}", self.kind)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Conf(err) => write!(f, "configuration: {err}"),
            Self::Source { path, err } => write!(f, "{}: {err}", path.display()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Io(err),
        }
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        Self {
            kind: ErrorKind::Conf(err),
        }
    }
}

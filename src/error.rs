// Copyright (c) 2026 rezky_nightky

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to apply {flag} {value} (min {min} max {max})")]
    OutOfRange {
        flag: &'static str,
        value: String,
        min: String,
        max: String,
    },

    #[error("failed to apply {flag} {value} (must be a finite number)")]
    NotFinite { flag: &'static str, value: f64 },

    #[error("invalid --colormode: {0} (allowed: 0,8,16,24)")]
    InvalidColorMode(u16),

    #[error("cannot open log file {}: {source}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

use std::io;
use thiserror::Error;

/// Everything that can go wrong while talking to the AUR or unpacking what it sent.
#[derive(Error, Debug)]
pub enum AurError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to set up the HTTP client: {0}")]
    ClientSetup(#[source] reqwest::Error),

    #[error("AUR returned status {status} {reason} for {url}")]
    HttpStatus {
        status: u16,
        reason: String,
        url: String,
    },

    #[error("AUR error: {0}")]
    Remote(String),

    #[error("invalid response type \"{got}\" - expected \"{want}\"")]
    UnexpectedResponseType { got: String, want: &'static str },

    #[error("failed to decode AUR response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("package {name} has no download path")]
    MissingDownloadPath { name: String },

    #[error("archive for {name} is not valid gzip data: {source}")]
    Decompression {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to unpack {path}: {source}")]
    Extract {
        path: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AurError>;

/// Problems with the command line or with the option table itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("expected option, got \"{0}\"")]
    Syntax(String),

    #[error("unknown option \"{0}\"")]
    UnknownOption(String),

    #[error("option \"{0}\" expects an argument but none was given")]
    MissingArgument(String),

    #[error("option \"{option}\" expects an integer, got \"{value}\"")]
    InvalidInteger { option: String, value: String },

    #[error("an option needs a short or a long name")]
    EmptyName,

    #[error("short option name \"{0}\" must be a single character")]
    InvalidShortName(String),
}

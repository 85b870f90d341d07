//! Error types that can be emitted from this library

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// source archive does not exist
    #[error("no such file: {path}")]
    NotFound {
        /// The path that was requested
        path: PathBuf,
    },

    /// file does not start with the BIN signature
    #[error("file does not start with the BIN signature")]
    BadMagic,

    /// fewer bytes are available than the header or offset table declare
    #[error("file is truncated: fewer bytes available than declared")]
    TruncatedFile,

    /// offset table rows are out of order or point past the end of the file
    #[error("corrupt offset table at row {index}")]
    CorruptOffsetTable {
        /// The first row at which the table stopped making sense
        index: usize,
    },

    /// write attempted on an entry whose payload was never loaded
    #[error("texture at index {0} has no loaded payload")]
    MissingPayload(usize),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;

// src/package/error.rs
// Everything that can stop a project from being packaged.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackageError {
    /// The README itself couldn't be downloaded
    #[error("could not fetch README {url}: {source}")]
    Readme {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// One of the README's assets couldn't be downloaded
    #[error("could not fetch asset {url}: {source}")]
    Asset {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// An asset URL has no usable file name (e.g. ends in "..")
    #[error("asset {reference} has no usable file name")]
    AssetName { reference: String },

    /// The trusted asset prefixes couldn't be parsed
    #[error("invalid asset policy: {0}")]
    Policy(#[source] anyhow::Error),

    /// Creating the output directory or writing a file failed
    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

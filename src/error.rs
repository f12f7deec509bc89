use std::path::PathBuf;
use thiserror::Error;

use crate::validation::VerificationReport;

/// The main error type for synthvoc operations.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageProbe {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Image {path} is too large: {message}")]
    ImageTooLarge { path: PathBuf, message: String },

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write annotation {path}: {source}")]
    AnnotationWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    ReportWrite(#[from] serde_json::Error),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("No source images found in {path}")]
    EmptySourceDir { path: PathBuf },

    #[error("Foreground pool is empty")]
    EmptyForegroundPool,

    #[error(
        "Background {path} is {width}x{height}, too small to yield a {tile_size}x{tile_size} tile \
         (each side must exceed {tile_size} pixels)"
    )]
    BackgroundTooSmall {
        path: PathBuf,
        width: u32,
        height: u32,
        tile_size: u32,
    },

    #[error(
        "Foreground {path} is {width}x{height} in at least one orientation, larger than the \
         {tile_size}x{tile_size} frame"
    )]
    ForegroundTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        tile_size: u32,
    },

    #[error(
        "Cannot place a {width}x{height} foreground on a {frame_width}x{frame_height} frame"
    )]
    InvalidPlacement {
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    },

    #[error("Failed to parse VOC XML from {path}: {message}")]
    VocXmlParse { path: PathBuf, message: String },

    #[error("Verification failed with {error_count} error(s) and {warning_count} warning(s)")]
    VerificationFailed {
        error_count: usize,
        warning_count: usize,
        report: VerificationReport,
    },
}

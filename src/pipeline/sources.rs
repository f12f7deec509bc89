//! Source discovery, decoding, and output numbering.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::SynthError;
use crate::ir::RasterImage;

/// List the regular files directly inside `dir`, sorted by file name.
///
/// Directory listing order is filesystem dependent; sorting is what makes a
/// seeded run reproducible. Subdirectories are ignored.
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>, SynthError> {
    let mut files = list_files(dir)?;
    if files.is_empty() {
        return Err(SynthError::EmptySourceDir {
            path: dir.to_path_buf(),
        });
    }

    files.sort_by_cached_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    });
    Ok(files)
}

/// Decode an image file into an RGB buffer.
pub fn load_image(path: &Path) -> Result<RasterImage, SynthError> {
    let decoded = image::open(path).map_err(|source| SynthError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decoded.to_rgb8())
}

/// Read an image's dimensions from its header without decoding pixels.
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), SynthError> {
    let size = imagesize::size(path).map_err(|source| SynthError::ImageProbe {
        path: path.to_path_buf(),
        source,
    })?;

    let width: u32 = size
        .width
        .try_into()
        .map_err(|_| SynthError::ImageTooLarge {
            path: path.to_path_buf(),
            message: format!("image width {} does not fit in u32", size.width),
        })?;

    let height: u32 = size
        .height
        .try_into()
        .map_err(|_| SynthError::ImageTooLarge {
            path: path.to_path_buf(),
            message: format!("image height {} does not fit in u32", size.height),
        })?;

    Ok((width, height))
}

/// Sequential output ids.
///
/// Initialized once from the number of files already in the output directory
/// and then advanced in memory, so the ids of one run are contiguous. Reruns
/// continue from whatever the directory holds at startup; leftovers from an
/// aborted run shift (or collide with) the numbering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputCounter {
    next: u64,
}

impl OutputCounter {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Count the regular files in `dir`; a missing directory counts as empty.
    pub fn from_dir(dir: &Path) -> Result<Self, SynthError> {
        if !dir.exists() {
            return Ok(Self::starting_at(0));
        }
        Ok(Self::starting_at(list_files(dir)?.len() as u64))
    }

    /// The id the next call to [`next_id`](Self::next_id) returns.
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>, SynthError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|source| SynthError::SourceRead {
            path: dir.to_path_buf(),
            source: source.into(),
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

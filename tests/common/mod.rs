#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use synthvoc::GeneratorConfig;

/// Input and output directories of one fixture run.
pub struct Fixture {
    pub root: tempfile::TempDir,
    pub backgrounds: PathBuf,
    pub foregrounds: PathBuf,
    pub output: PathBuf,
}

impl Fixture {
    /// Empty input directories under a fresh temp dir.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let backgrounds = root.path().join("backgrounds");
        let foregrounds = root.path().join("bears");
        let output = root.path().join("result");
        fs::create_dir_all(&backgrounds).expect("create backgrounds dir");
        fs::create_dir_all(&foregrounds).expect("create foregrounds dir");

        Self {
            root,
            backgrounds,
            foregrounds,
            output,
        }
    }

    pub fn add_background(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.backgrounds.join(name);
        gradient(width, height).save(&path).expect("write background");
        path
    }

    pub fn add_foreground(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.foregrounds.join(name);
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
            .save(&path)
            .expect("write foreground");
        path
    }

    pub fn config(&self) -> GeneratorConfig {
        GeneratorConfig::new(&self.backgrounds, &self.foregrounds, &self.output)
    }

    pub fn annotations(&self) -> PathBuf {
        self.output.join("Annotations")
    }
}

/// An image whose pixels are distinct enough to tell tiles apart.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 251) as u8, (y % 241) as u8, ((x + y) % 7) as u8])
    })
}

/// Sorted file names directly inside `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| path.is_file())
        .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

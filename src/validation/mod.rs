//! Verification of a generated corpus.
//!
//! Re-reads the annotation directory and checks every document against the
//! image it describes:
//! - Pairing (every annotation has its image, every image its annotation)
//! - Recorded size agrees with the image header
//! - Geometric validity (ordered boxes within the image)

mod report;

pub use report::{IssueCode, IssueContext, Severity, VerificationIssue, VerificationReport};

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::SynthError;
use crate::ir::io_voc_xml::{collect_xml_files, read_voc_xml};
use crate::ir::AnnotationDocument;
use crate::pipeline::probe_dimensions;

/// Options for verification behavior.
#[derive(Clone, Debug, Default)]
pub struct VerifyOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
}

/// Verifies the `<id>.xml` files in `annotations_dir` against the `<id>.png`
/// files in `images_dir`.
///
/// Only failing to list the annotation directory is an `Err`; problems with
/// individual files are reported as issues. In strict mode every warning is
/// reported as an error.
pub fn verify_corpus(
    images_dir: &Path,
    annotations_dir: &Path,
    opts: &VerifyOptions,
) -> Result<VerificationReport, SynthError> {
    let mut report = VerificationReport::new();
    let mut referenced = BTreeSet::new();

    for xml_path in collect_xml_files(annotations_dir)? {
        let file = file_name_string(&xml_path);
        report.annotations_checked += 1;

        let doc = match read_voc_xml(&xml_path) {
            Ok(doc) => doc,
            Err(err) => {
                report.add(VerificationIssue::error(
                    IssueCode::UnreadableAnnotation,
                    err.to_string(),
                    IssueContext::Annotation { file },
                ));
                continue;
            }
        };

        referenced.insert(doc.file_name());
        verify_document(&doc, &xml_path, images_dir, &mut report);
    }

    if images_dir.is_dir() {
        let entries = std::fs::read_dir(images_dir).map_err(|source| SynthError::SourceRead {
            path: images_dir.to_path_buf(),
            source,
        })?;
        let mut orphans: Vec<String> = Vec::new();
        for entry in entries {
            let path = entry.map_err(SynthError::Io)?.path();
            let is_png = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false);
            if path.is_file() && is_png {
                let file = file_name_string(&path);
                if !referenced.contains(&file) {
                    orphans.push(file);
                }
            }
        }
        orphans.sort();
        for file in orphans {
            report.add(VerificationIssue::warning(
                IssueCode::OrphanImage,
                "No annotation references this image",
                IssueContext::Image { file },
            ));
        }
    }

    if opts.strict {
        for issue in &mut report.issues {
            issue.severity = Severity::Error;
        }
    }

    Ok(report)
}

/// Checks one parsed document.
fn verify_document(
    doc: &AnnotationDocument,
    xml_path: &Path,
    images_dir: &Path,
    report: &mut VerificationReport,
) {
    let file = file_name_string(xml_path);
    let stem = xml_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    if doc.identifier() != stem {
        report.add(VerificationIssue::warning(
            IssueCode::FileNameMismatch,
            format!(
                "<filename> is '{}' but the annotation file is '{}'",
                doc.file_name(),
                file
            ),
            IssueContext::Annotation { file: file.clone() },
        ));
    }

    let image_path = images_dir.join(doc.file_name());
    if !image_path.is_file() {
        report.add(VerificationIssue::error(
            IssueCode::MissingImage,
            format!("Image {} does not exist", image_path.display()),
            IssueContext::Annotation { file: file.clone() },
        ));
    } else {
        match probe_dimensions(&image_path) {
            Ok((width, height)) if (width, height) != (doc.width(), doc.height()) => {
                report.add(VerificationIssue::error(
                    IssueCode::SizeMismatch,
                    format!(
                        "Recorded size {}x{} but image is {}x{}",
                        doc.width(),
                        doc.height(),
                        width,
                        height
                    ),
                    IssueContext::Annotation { file: file.clone() },
                ));
            }
            Ok(_) => {}
            Err(err) => {
                report.add(VerificationIssue::error(
                    IssueCode::MissingImage,
                    err.to_string(),
                    IssueContext::Annotation { file: file.clone() },
                ));
            }
        }
    }

    if doc.boxes().is_empty() {
        report.add(VerificationIssue::warning(
            IssueCode::EmptyAnnotation,
            "Annotation has no objects",
            IssueContext::Annotation { file: file.clone() },
        ));
    }

    for (index, bbox) in doc.boxes().iter().enumerate() {
        report.objects_checked += 1;
        let context = IssueContext::Object {
            file: file.clone(),
            index,
        };

        if !bbox.is_ordered() {
            report.add(VerificationIssue::error(
                IssueCode::InvalidBBoxOrdering,
                format!(
                    "Box ({}, {}, {}, {}) has min >= max",
                    bbox.xmin, bbox.ymin, bbox.xmax, bbox.ymax
                ),
                context,
            ));
        } else if !bbox.fits_within(doc.width(), doc.height()) {
            report.add(VerificationIssue::error(
                IssueCode::BBoxOutOfBounds,
                format!(
                    "Box ({}, {}, {}, {}) extends outside {}x{}",
                    bbox.xmin,
                    bbox.ymin,
                    bbox.xmax,
                    bbox.ymax,
                    doc.width(),
                    doc.height()
                ),
                context,
            ));
        }
    }
}

fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::io_voc_xml::write_voc_xml;
    use crate::ir::{BBox, RasterImage};
    use std::fs;

    fn setup() -> (tempfile::TempDir, std::path::PathBuf, std::path::PathBuf) {
        let temp = tempfile::tempdir().expect("create temp dir");
        let images = temp.path().join("result");
        let annotations = images.join("Annotations");
        fs::create_dir_all(&annotations).expect("create dirs");
        (temp, images, annotations)
    }

    #[test]
    fn clean_corpus_passes() {
        let (_temp, images, annotations) = setup();
        RasterImage::new(20, 20)
            .save(images.join("0.png"))
            .expect("save image");
        let doc = AnnotationDocument::new("0", "bear", 20, 20, vec![BBox::from_xyxy(0, 0, 20, 5)]);
        write_voc_xml(&annotations.join("0.xml"), &doc).expect("write xml");

        let report = verify_corpus(&images, &annotations, &VerifyOptions::default()).expect("verify");
        assert!(report.is_clean(), "{report}");
        assert_eq!(report.annotations_checked, 1);
        assert_eq!(report.objects_checked, 1);
    }

    #[test]
    fn reports_geometry_and_pairing_issues() {
        let (_temp, images, annotations) = setup();
        RasterImage::new(20, 10)
            .save(images.join("0.png"))
            .expect("save image 0");
        RasterImage::new(20, 20)
            .save(images.join("7.png"))
            .expect("save image 7");

        let bad = AnnotationDocument::new(
            "0",
            "bear",
            20,
            20,
            vec![BBox::from_xyxy(5, 5, 5, 9), BBox::from_xyxy(10, 10, 21, 12)],
        );
        write_voc_xml(&annotations.join("0.xml"), &bad).expect("write 0");

        let missing = AnnotationDocument::new("3", "bear", 20, 20, Vec::new());
        write_voc_xml(&annotations.join("3.xml"), &missing).expect("write 3");
        fs::write(annotations.join("4.xml"), "<annotation>").expect("write 4");

        let report = verify_corpus(&images, &annotations, &VerifyOptions::default()).expect("verify");
        assert!(!report.is_ok());
        assert!(report.has(IssueCode::SizeMismatch));
        assert!(report.has(IssueCode::InvalidBBoxOrdering));
        assert!(report.has(IssueCode::BBoxOutOfBounds));
        assert!(report.has(IssueCode::MissingImage));
        assert!(report.has(IssueCode::EmptyAnnotation));
        assert!(report.has(IssueCode::UnreadableAnnotation));
        assert!(report.has(IssueCode::OrphanImage));
        assert_eq!(report.annotations_checked, 3);
    }

    #[test]
    fn strict_mode_reports_warnings_as_errors() {
        let (_temp, images, annotations) = setup();
        RasterImage::new(4, 4)
            .save(images.join("0.png"))
            .expect("save image 0");
        RasterImage::new(4, 4)
            .save(images.join("extra.png"))
            .expect("save orphan");
        let doc = AnnotationDocument::new("0", "bear", 4, 4, vec![BBox::from_xyxy(0, 0, 2, 2)]);
        write_voc_xml(&annotations.join("0.xml"), &doc).expect("write xml");

        let lenient = verify_corpus(&images, &annotations, &VerifyOptions::default()).expect("verify");
        assert!(lenient.is_ok());
        assert_eq!(lenient.warning_count(), 1);

        let strict = verify_corpus(&images, &annotations, &VerifyOptions { strict: true })
            .expect("verify strict");
        assert!(!strict.is_ok());
        assert_eq!(strict.warning_count(), 0);
        assert_eq!(strict.error_count(), 1);
        assert!(strict.has(IssueCode::OrphanImage));
    }

    #[test]
    fn flags_filename_mismatch() {
        let (_temp, images, annotations) = setup();
        RasterImage::new(4, 4)
            .save(images.join("1.png"))
            .expect("save image");
        let doc = AnnotationDocument::new("1", "bear", 4, 4, vec![BBox::from_xyxy(0, 0, 1, 1)]);
        write_voc_xml(&annotations.join("2.xml"), &doc).expect("write xml");

        let report = verify_corpus(&images, &annotations, &VerifyOptions::default()).expect("verify");
        assert!(report.is_ok());
        assert!(report.has(IssueCode::FileNameMismatch));
    }
}

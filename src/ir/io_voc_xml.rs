//! Pascal VOC style XML writer and reader.
//!
//! The writer emits the exact layout downstream training tools expect: a
//! single line, no XML declaration, and empty elements written as explicit
//! open/close pairs (`<depth></depth>`, never `<depth/>`). The reader accepts
//! any well-formed document in the same schema and is used for verification
//! and round-trip tests.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use super::bbox::BBox;
use super::model::AnnotationDocument;
use crate::error::SynthError;

pub const VOC_XML_EXTENSION: &str = "xml";
const IMAGE_EXTENSION: &str = ".png";
const SOURCE_PLACEHOLDER: &str = "Unknown";

/// Serialize an annotation document to its XML string.
pub fn to_voc_xml_string(doc: &AnnotationDocument) -> String {
    let mut xml = String::new();

    write!(xml, "<annotation>").expect("write to string");
    write!(xml, "<folder></folder>").expect("write to string");
    write!(
        xml,
        "<filename>{}</filename>",
        xml_escape(&doc.file_name())
    )
    .expect("write to string");

    write!(xml, "<source>").expect("write to string");
    write!(xml, "<database>{SOURCE_PLACEHOLDER}</database>").expect("write to string");
    write!(xml, "<annotation>{SOURCE_PLACEHOLDER}</annotation>").expect("write to string");
    write!(xml, "<image>{SOURCE_PLACEHOLDER}</image>").expect("write to string");
    write!(xml, "</source>").expect("write to string");

    write!(xml, "<size>").expect("write to string");
    write!(xml, "<width>{}</width>", doc.width()).expect("write to string");
    write!(xml, "<height>{}</height>", doc.height()).expect("write to string");
    write!(xml, "<depth></depth>").expect("write to string");
    write!(xml, "</size>").expect("write to string");

    write!(xml, "<segmented>0</segmented>").expect("write to string");

    let label = xml_escape(doc.label());
    for bbox in doc.boxes() {
        write!(xml, "<object>").expect("write to string");
        write!(xml, "<name>{label}</name>").expect("write to string");
        for key in ["truncated", "occluded", "difficult"] {
            write!(xml, "<{key}>0</{key}>").expect("write to string");
        }
        write!(xml, "<bndbox>").expect("write to string");
        write!(xml, "<xmin>{}</xmin>", bbox.xmin).expect("write to string");
        write!(xml, "<ymin>{}</ymin>", bbox.ymin).expect("write to string");
        write!(xml, "<xmax>{}</xmax>", bbox.xmax).expect("write to string");
        write!(xml, "<ymax>{}</ymax>", bbox.ymax).expect("write to string");
        write!(xml, "</bndbox>").expect("write to string");
        write!(xml, "</object>").expect("write to string");
    }

    write!(xml, "</annotation>").expect("write to string");
    xml
}

/// Write an annotation document to `path`.
pub fn write_voc_xml(path: &Path, doc: &AnnotationDocument) -> Result<(), SynthError> {
    fs::write(path, to_voc_xml_string(doc)).map_err(|source| SynthError::AnnotationWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Read an annotation document from an XML file.
pub fn read_voc_xml(path: &Path) -> Result<AnnotationDocument, SynthError> {
    let xml = fs::read_to_string(path).map_err(|source| SynthError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_voc_xml_str(&xml, path)
}

/// Parse an annotation document from a UTF-8 string.
pub fn from_voc_xml_str(xml: &str) -> Result<AnnotationDocument, SynthError> {
    parse_voc_xml_str(xml, Path::new("<memory>"))
}

/// Parse an annotation document from bytes.
///
/// The input must be valid UTF-8.
pub fn from_voc_xml_slice(bytes: &[u8]) -> Result<AnnotationDocument, SynthError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| SynthError::VocXmlParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    from_voc_xml_str(xml)
}

/// List the `.xml` files directly inside `dir`, sorted by file name.
pub fn collect_xml_files(dir: &Path) -> Result<Vec<PathBuf>, SynthError> {
    let entries = fs::read_dir(dir).map_err(|source| SynthError::SourceRead {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(SynthError::Io)?.path();
        if path.is_file() && has_xml_extension(&path) {
            files.push(path);
        }
    }

    files.sort_by_cached_key(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    });
    Ok(files)
}

fn parse_voc_xml_str(xml: &str, path: &Path) -> Result<AnnotationDocument, SynthError> {
    let document = roxmltree::Document::parse(xml).map_err(|source| SynthError::VocXmlParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    })?;

    let annotation = document.root_element();
    if annotation.tag_name().name() != "annotation" {
        return Err(SynthError::VocXmlParse {
            path: path.to_path_buf(),
            message: "missing <annotation> root element".to_string(),
        });
    }

    let filename = required_child_text(annotation, "filename", path, "<annotation>")?;
    let identifier = filename
        .strip_suffix(IMAGE_EXTENSION)
        .unwrap_or(&filename)
        .to_string();

    let size = required_child_element(annotation, "size", path, "<annotation>")?;
    let width = parse_required_u32(size, "width", path, "<size>")?;
    let height = parse_required_u32(size, "height", path, "<size>")?;

    let mut label: Option<String> = None;
    let mut boxes = Vec::new();
    for object in annotation
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "object")
    {
        let name = required_child_text(object, "name", path, "<object>")?;
        match &label {
            Some(existing) if *existing != name => {
                return Err(SynthError::VocXmlParse {
                    path: path.to_path_buf(),
                    message: format!(
                        "mixed object labels '{existing}' and '{name}'; expected a single class"
                    ),
                });
            }
            Some(_) => {}
            None => label = Some(name),
        }

        let bndbox = required_child_element(object, "bndbox", path, "<object>")?;
        boxes.push(BBox::from_xyxy(
            parse_required_u32(bndbox, "xmin", path, "<bndbox>")?,
            parse_required_u32(bndbox, "ymin", path, "<bndbox>")?,
            parse_required_u32(bndbox, "xmax", path, "<bndbox>")?,
            parse_required_u32(bndbox, "ymax", path, "<bndbox>")?,
        ));
    }

    Ok(AnnotationDocument::new(
        identifier,
        label.unwrap_or_default(),
        width,
        height,
        boxes,
    ))
}

fn required_child_element<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<Node<'a, 'input>, SynthError> {
    child_element(node, tag).ok_or_else(|| SynthError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn required_child_text(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<String, SynthError> {
    optional_child_text(node, tag).ok_or_else(|| SynthError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("missing <{tag}> in {context}"),
    })
}

fn parse_required_u32(
    node: Node<'_, '_>,
    tag: &str,
    path: &Path,
    context: &str,
) -> Result<u32, SynthError> {
    let raw = required_child_text(node, tag, path, context)?;
    raw.parse::<u32>().map_err(|_| SynthError::VocXmlParse {
        path: path.to_path_buf(),
        message: format!("invalid <{tag}> value '{raw}' in {context}; expected u32"),
    })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

fn optional_child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag)
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

/// Escapes element text; quotes stay literal.
fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(VOC_XML_EXTENSION))
        .unwrap_or(false)
}

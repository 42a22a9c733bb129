//! `.docx` package handling
//!
//! A `.docx` file is a ZIP container of XML parts. Only
//! `word/document.xml` is parsed; every other part is stored as raw bytes
//! and copied back out unchanged, in the original entry order, when the
//! package is re-serialized.

use std::io::{Cursor, Read, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::document::TemplateDocument;
use super::{TemplateError, TemplateResult};

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Clone)]
enum PartKind {
    /// Preserved byte-for-byte
    Raw(Vec<u8>),
    /// Directory entry
    Directory,
    /// The parsed `word/document.xml`, rewritten on save
    Document,
}

#[derive(Debug, Clone)]
struct PackagePart {
    name: String,
    kind: PartKind,
}

/// An opened `.docx` package.
#[derive(Debug, Clone)]
pub struct DocxPackage {
    parts: Vec<PackagePart>,
    document: TemplateDocument,
}

impl DocxPackage {
    /// Open a package from its raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a ZIP archive, the archive has
    /// no `word/document.xml`, or the document part is not well-formed XML.
    pub fn from_bytes(bytes: &[u8]) -> TemplateResult<Self> {
        let mut zip = ZipArchive::new(Cursor::new(bytes))?;

        let mut parts = Vec::with_capacity(zip.len());
        let mut document = None;

        for i in 0..zip.len() {
            let mut file = zip.by_index(i)?;
            let name = file.name().to_string();

            if file.is_dir() {
                parts.push(PackagePart {
                    name,
                    kind: PartKind::Directory,
                });
                continue;
            }

            let mut data = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
            file.read_to_end(&mut data)?;

            if name == DOCUMENT_PART {
                let xml = String::from_utf8(data).map_err(|_| TemplateError::Encoding)?;
                document = Some(TemplateDocument::parse(&xml)?);
                parts.push(PackagePart {
                    name,
                    kind: PartKind::Document,
                });
            } else {
                parts.push(PackagePart {
                    name,
                    kind: PartKind::Raw(data),
                });
            }
        }

        let document =
            document.ok_or_else(|| TemplateError::MissingPart(DOCUMENT_PART.to_string()))?;

        Ok(Self { parts, document })
    }

    /// The parsed document body
    #[must_use]
    pub fn document(&self) -> &TemplateDocument {
        &self.document
    }

    /// Mutable access to the document body
    pub fn document_mut(&mut self) -> &mut TemplateDocument {
        &mut self.document
    }

    /// Serialize the package back to `.docx` bytes.
    ///
    /// Entries keep their original order; a fixed timestamp is used so the
    /// same package always serializes to the same bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if an archive entry cannot be written.
    pub fn save_to_bytes(&self) -> TemplateResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        for part in &self.parts {
            match &part.kind {
                PartKind::Directory => writer.add_directory(part.name.clone(), options)?,
                PartKind::Raw(data) => {
                    writer.start_file(part.name.clone(), options)?;
                    writer.write_all(data)?;
                }
                PartKind::Document => {
                    writer.start_file(part.name.clone(), options)?;
                    writer.write_all(self.document.to_xml().as_bytes())?;
                }
            }
        }

        Ok(writer.finish()?.into_inner())
    }
}

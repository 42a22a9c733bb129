//! Shared fixtures for integration tests: minimal `.docx` builders and
//! archive inspection.

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};

use atenea_core::{Record, ScalarValue};
use atenea_service::template::{Block, DocxPackage};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Wrap body markup in a complete `word/document.xml`.
pub fn document_xml(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    )
}

/// Build a minimal but valid `.docx` around the given `word/document.xml`.
pub fn docx_from_document_xml(document_xml: &str) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        ("word/document.xml", document_xml),
    ] {
        writer.start_file(name, options).expect("start entry");
        writer
            .write_all(content.as_bytes())
            .expect("write entry");
    }
    writer.finish().expect("finish docx").into_inner()
}

/// A `.docx` whose body is one single-run paragraph per given text.
pub fn simple_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|text| format!("<w:p><w:r><w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>"))
        .collect();
    docx_from_document_xml(&document_xml(&body))
}

/// Build a record from (name, text value) pairs, preserving order.
pub fn record(pairs: &[(&str, &str)]) -> Record {
    let mut record = Record::new();
    for (name, value) in pairs {
        record.insert(*name, ScalarValue::from(*value));
    }
    record
}

/// Entry names of a ZIP archive, in archive order.
pub fn entry_names(archive_bytes: &[u8]) -> Vec<String> {
    let mut zip = ZipArchive::new(Cursor::new(archive_bytes)).expect("open archive");
    (0..zip.len())
        .map(|i| zip.by_index(i).expect("entry").name().to_string())
        .collect()
}

/// Raw bytes of one archive entry.
pub fn read_entry(archive_bytes: &[u8], name: &str) -> Vec<u8> {
    let mut zip = ZipArchive::new(Cursor::new(archive_bytes)).expect("open archive");
    let mut file = zip.by_name(name).expect("entry present");
    let mut data = Vec::new();
    file.read_to_end(&mut data).expect("read entry");
    data
}

/// All block texts of a generated document, body first, then table cells.
pub fn block_texts(docx_bytes: &[u8]) -> Vec<String> {
    let package = DocxPackage::from_bytes(docx_bytes).expect("parse docx");
    let document = package.document();
    let mut texts: Vec<String> = document.body_blocks().map(Block::text).collect();
    for table in document.tables() {
        texts.extend(table.blocks().map(Block::text));
    }
    texts
}

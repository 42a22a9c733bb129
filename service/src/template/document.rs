//! In-memory model of a WordprocessingML document body
//!
//! The model knows exactly three structures: paragraphs (`w:p`, here
//! "blocks"), runs (`w:r`) and one level of tables (`w:tbl` → `w:tr` →
//! `w:tc`). Everything else (section properties, bookmarks, drawings,
//! tables nested inside cells) is carried through as raw XML and re-emitted
//! unchanged. A run keeps its original inner XML until its text is rewritten;
//! only then is its content replaced by a single `<w:t>` element, keeping
//! the run's `w:rPr` formatting.

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};

use super::{TemplateError, TemplateResult};

/// The text content of a `word/document.xml` part.
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    /// Everything up to and including the `<w:body>` start tag
    prefix: String,
    children: Vec<BodyChild>,
    /// `</w:body>` and everything after it
    suffix: String,
}

#[derive(Debug, Clone)]
enum BodyChild {
    Block(Block),
    Table(Table),
    Raw(String),
}

/// A paragraph-equivalent unit of document text, containing runs.
#[derive(Debug, Clone)]
pub struct Block {
    start_tag: String,
    children: Vec<BlockChild>,
}

#[derive(Debug, Clone)]
enum BlockChild {
    Run(Run),
    Raw(String),
}

/// A contiguous span of text sharing one formatting state within a block.
#[derive(Debug, Clone)]
pub struct Run {
    start_tag: String,
    /// Raw `<w:rPr>…</w:rPr>` element, kept on rewrite
    props: Option<String>,
    /// Original inner XML after the run properties
    raw: String,
    /// Text as seen by substitution: `w:t` content, `\t` for tabs,
    /// `\n` for breaks
    text: String,
    /// Replacement text, set when the run was rewritten
    replaced: Option<String>,
}

/// A grid of cells, each cell an ordered sequence of blocks.
#[derive(Debug, Clone)]
pub struct Table {
    start_tag: String,
    children: Vec<TableChild>,
}

#[derive(Debug, Clone)]
enum TableChild {
    Row(TableRow),
    Raw(String),
}

#[derive(Debug, Clone)]
struct TableRow {
    start_tag: String,
    children: Vec<RowChild>,
}

#[derive(Debug, Clone)]
enum RowChild {
    Cell(TableCell),
    Raw(String),
}

#[derive(Debug, Clone)]
struct TableCell {
    start_tag: String,
    children: Vec<CellChild>,
}

#[derive(Debug, Clone)]
enum CellChild {
    Block(Block),
    Raw(String),
}

impl TemplateDocument {
    /// Parse a `word/document.xml` part.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML is not well formed or has no `w:body`.
    pub fn parse(xml: &str) -> TemplateResult<Self> {
        let mut parser = EventSource::new(xml);

        let mut prefix = Writer::new(Vec::new());
        loop {
            let ev = parser.next()?;
            match &ev {
                Event::Start(e) if e.name().as_ref() == b"w:body" => {
                    prefix.write_event(ev.clone())?;
                    break;
                }
                Event::Eof => {
                    return Err(TemplateError::Malformed("document has no <w:body>".into()));
                }
                _ => prefix.write_event(ev.clone())?,
            }
        }

        let mut children = Vec::new();
        let suffix = loop {
            let ev = parser.next()?;
            match &ev {
                Event::Start(e) if e.name().as_ref() == b"w:p" => {
                    children.push(BodyChild::Block(parse_block(&mut parser, &ev)?));
                }
                Event::Start(e) if e.name().as_ref() == b"w:tbl" => {
                    children.push(BodyChild::Table(parse_table(&mut parser, &ev)?));
                }
                Event::Start(_) => {
                    children.push(BodyChild::Raw(capture_element(&mut parser, &ev)?));
                }
                Event::End(e) if e.name().as_ref() == b"w:body" => {
                    let mut tail = Writer::new(Vec::new());
                    tail.write_event(ev.clone())?;
                    loop {
                        let rest = parser.next()?;
                        if matches!(rest, Event::Eof) {
                            break;
                        }
                        tail.write_event(rest)?;
                    }
                    break writer_to_string(tail)?;
                }
                Event::Eof => {
                    return Err(TemplateError::Malformed("unterminated <w:body>".into()));
                }
                _ => children.push(BodyChild::Raw(event_to_string(&ev)?)),
            }
        };

        Ok(Self {
            prefix: writer_to_string(prefix)?,
            children,
            suffix,
        })
    }

    /// Serialize back to XML.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(self.prefix.len() + self.suffix.len() + 1024);
        out.push_str(&self.prefix);
        for child in &self.children {
            match child {
                BodyChild::Block(b) => b.serialize_into(&mut out),
                BodyChild::Table(t) => t.serialize_into(&mut out),
                BodyChild::Raw(raw) => out.push_str(raw),
            }
        }
        out.push_str(&self.suffix);
        out
    }

    /// Body-level blocks, in document order (table cell blocks excluded)
    pub fn body_blocks(&self) -> impl Iterator<Item = &Block> {
        self.children.iter().filter_map(|c| match c {
            BodyChild::Block(b) => Some(b),
            _ => None,
        })
    }

    /// Mutable body-level blocks
    pub fn body_blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.children.iter_mut().filter_map(|c| match c {
            BodyChild::Block(b) => Some(b),
            _ => None,
        })
    }

    /// Body-level tables, in document order
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.children.iter().filter_map(|c| match c {
            BodyChild::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Mutable body-level tables
    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.children.iter_mut().filter_map(|c| match c {
            BodyChild::Table(t) => Some(t),
            _ => None,
        })
    }
}

impl Block {
    /// Concatenated text of the block's runs, in order.
    ///
    /// This is the only view in which a placeholder split across runs is
    /// visible at all.
    #[must_use]
    pub fn text(&self) -> String {
        self.runs().map(Run::text).collect()
    }

    /// Runs in block order
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.children.iter().filter_map(|c| match c {
            BlockChild::Run(r) => Some(r),
            BlockChild::Raw(_) => None,
        })
    }

    /// Mutable runs in block order
    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut Run> {
        self.children.iter_mut().filter_map(|c| match c {
            BlockChild::Run(r) => Some(r),
            BlockChild::Raw(_) => None,
        })
    }

    fn serialize_into(&self, out: &mut String) {
        out.push_str(&self.start_tag);
        for child in &self.children {
            match child {
                BlockChild::Run(r) => r.serialize_into(out),
                BlockChild::Raw(raw) => out.push_str(raw),
            }
        }
        out.push_str("</w:p>");
    }
}

impl Run {
    /// Current text of the run
    #[must_use]
    pub fn text(&self) -> &str {
        self.replaced.as_deref().unwrap_or(&self.text)
    }

    /// Rewrite the run's text.
    ///
    /// The original inner XML is dropped and replaced on serialization by a
    /// single `<w:t xml:space="preserve">`; the run's formatting properties
    /// are kept.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.replaced = Some(text.into());
    }

    fn serialize_into(&self, out: &mut String) {
        out.push_str(&self.start_tag);
        if let Some(props) = &self.props {
            out.push_str(props);
        }
        match &self.replaced {
            Some(text) => {
                out.push_str("<w:t xml:space=\"preserve\">");
                out.push_str(&escape(text.as_str()));
                out.push_str("</w:t>");
            }
            None => out.push_str(&self.raw),
        }
        out.push_str("</w:r>");
    }
}

impl Table {
    /// All blocks inside the table's cells, in row-major order
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.rows().flat_map(TableRow::blocks)
    }

    /// Mutable view of all blocks inside the table's cells
    pub fn blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.children
            .iter_mut()
            .filter_map(|c| match c {
                TableChild::Row(r) => Some(r),
                TableChild::Raw(_) => None,
            })
            .flat_map(TableRow::blocks_mut)
    }

    fn rows(&self) -> impl Iterator<Item = &TableRow> {
        self.children.iter().filter_map(|c| match c {
            TableChild::Row(r) => Some(r),
            TableChild::Raw(_) => None,
        })
    }

    fn serialize_into(&self, out: &mut String) {
        out.push_str(&self.start_tag);
        for child in &self.children {
            match child {
                TableChild::Row(r) => r.serialize_into(out),
                TableChild::Raw(raw) => out.push_str(raw),
            }
        }
        out.push_str("</w:tbl>");
    }
}

impl TableRow {
    fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.children
            .iter()
            .filter_map(|c| match c {
                RowChild::Cell(cell) => Some(cell),
                RowChild::Raw(_) => None,
            })
            .flat_map(|cell| {
                cell.children.iter().filter_map(|c| match c {
                    CellChild::Block(b) => Some(b),
                    CellChild::Raw(_) => None,
                })
            })
    }

    fn blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.children
            .iter_mut()
            .filter_map(|c| match c {
                RowChild::Cell(cell) => Some(cell),
                RowChild::Raw(_) => None,
            })
            .flat_map(|cell| {
                cell.children.iter_mut().filter_map(|c| match c {
                    CellChild::Block(b) => Some(b),
                    CellChild::Raw(_) => None,
                })
            })
    }

    fn serialize_into(&self, out: &mut String) {
        out.push_str(&self.start_tag);
        for child in &self.children {
            match child {
                RowChild::Cell(cell) => cell.serialize_into(out),
                RowChild::Raw(raw) => out.push_str(raw),
            }
        }
        out.push_str("</w:tr>");
    }
}

impl TableCell {
    fn serialize_into(&self, out: &mut String) {
        out.push_str(&self.start_tag);
        for child in &self.children {
            match child {
                CellChild::Block(b) => b.serialize_into(out),
                CellChild::Raw(raw) => out.push_str(raw),
            }
        }
        out.push_str("</w:tc>");
    }
}

/// Pull-based event reader yielding owned events.
struct EventSource<'a> {
    reader: Reader<&'a [u8]>,
    buf: Vec<u8>,
}

impl<'a> EventSource<'a> {
    fn new(xml: &'a str) -> Self {
        Self {
            reader: Reader::from_reader(xml.as_bytes()),
            buf: Vec::new(),
        }
    }

    fn next(&mut self) -> TemplateResult<Event<'static>> {
        self.buf.clear();
        Ok(self.reader.read_event_into(&mut self.buf)?.into_owned())
    }
}

/// Serialize a single event back to its markup.
fn event_to_string(ev: &Event<'_>) -> TemplateResult<String> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(ev.clone())?;
    writer_to_string(writer)
}

fn writer_to_string(writer: Writer<Vec<u8>>) -> TemplateResult<String> {
    String::from_utf8(writer.into_inner()).map_err(|_| TemplateError::Encoding)
}

/// Copy `start` and everything up to its matching end tag, verbatim.
fn capture_element(parser: &mut EventSource<'_>, start: &Event<'static>) -> TemplateResult<String> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(start.clone())?;
    let mut depth = 1usize;
    while depth > 0 {
        let ev = parser.next()?;
        match &ev {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(TemplateError::UnexpectedEof),
            _ => {}
        }
        writer.write_event(ev)?;
    }
    writer_to_string(writer)
}

fn parse_block(parser: &mut EventSource<'_>, start: &Event<'static>) -> TemplateResult<Block> {
    let start_tag = event_to_string(start)?;
    let mut children = Vec::new();
    loop {
        let ev = parser.next()?;
        match &ev {
            Event::Start(e) if e.name().as_ref() == b"w:r" => {
                children.push(BlockChild::Run(parse_run(parser, &ev)?));
            }
            Event::Start(_) => children.push(BlockChild::Raw(capture_element(parser, &ev)?)),
            Event::End(e) if e.name().as_ref() == b"w:p" => break,
            Event::Eof => return Err(TemplateError::UnexpectedEof),
            _ => children.push(BlockChild::Raw(event_to_string(&ev)?)),
        }
    }
    Ok(Block { start_tag, children })
}

fn parse_run(parser: &mut EventSource<'_>, start: &Event<'static>) -> TemplateResult<Run> {
    let start_tag = event_to_string(start)?;
    let mut props = None;
    let mut raw = String::new();
    let mut text = String::new();
    loop {
        let ev = parser.next()?;
        match &ev {
            Event::Start(e) if e.name().as_ref() == b"w:rPr" => {
                props = Some(capture_element(parser, &ev)?);
            }
            Event::Start(e) if e.name().as_ref() == b"w:t" => {
                raw.push_str(&event_to_string(&ev)?);
                loop {
                    let tev = parser.next()?;
                    match &tev {
                        Event::Text(t) => {
                            text.push_str(&t.unescape()?);
                            raw.push_str(&event_to_string(&tev)?);
                        }
                        Event::CData(c) => {
                            text.push_str(&String::from_utf8_lossy(c));
                            raw.push_str(&event_to_string(&tev)?);
                        }
                        Event::End(e2) if e2.name().as_ref() == b"w:t" => {
                            raw.push_str(&event_to_string(&tev)?);
                            break;
                        }
                        Event::Eof => return Err(TemplateError::UnexpectedEof),
                        _ => raw.push_str(&event_to_string(&tev)?),
                    }
                }
            }
            Event::Empty(e) if e.name().as_ref() == b"w:tab" => {
                text.push('\t');
                raw.push_str(&event_to_string(&ev)?);
            }
            Event::Empty(e)
                if e.name().as_ref() == b"w:br" || e.name().as_ref() == b"w:cr" =>
            {
                text.push('\n');
                raw.push_str(&event_to_string(&ev)?);
            }
            Event::Start(_) => raw.push_str(&capture_element(parser, &ev)?),
            Event::End(e) if e.name().as_ref() == b"w:r" => break,
            Event::Eof => return Err(TemplateError::UnexpectedEof),
            _ => raw.push_str(&event_to_string(&ev)?),
        }
    }
    Ok(Run {
        start_tag,
        props,
        raw,
        text,
        replaced: None,
    })
}

fn parse_table(parser: &mut EventSource<'_>, start: &Event<'static>) -> TemplateResult<Table> {
    let start_tag = event_to_string(start)?;
    let mut children = Vec::new();
    loop {
        let ev = parser.next()?;
        match &ev {
            Event::Start(e) if e.name().as_ref() == b"w:tr" => {
                children.push(TableChild::Row(parse_row(parser, &ev)?));
            }
            Event::Start(_) => children.push(TableChild::Raw(capture_element(parser, &ev)?)),
            Event::End(e) if e.name().as_ref() == b"w:tbl" => break,
            Event::Eof => return Err(TemplateError::UnexpectedEof),
            _ => children.push(TableChild::Raw(event_to_string(&ev)?)),
        }
    }
    Ok(Table { start_tag, children })
}

fn parse_row(parser: &mut EventSource<'_>, start: &Event<'static>) -> TemplateResult<TableRow> {
    let start_tag = event_to_string(start)?;
    let mut children = Vec::new();
    loop {
        let ev = parser.next()?;
        match &ev {
            Event::Start(e) if e.name().as_ref() == b"w:tc" => {
                children.push(RowChild::Cell(parse_cell(parser, &ev)?));
            }
            Event::Start(_) => children.push(RowChild::Raw(capture_element(parser, &ev)?)),
            Event::End(e) if e.name().as_ref() == b"w:tr" => break,
            Event::Eof => return Err(TemplateError::UnexpectedEof),
            _ => children.push(RowChild::Raw(event_to_string(&ev)?)),
        }
    }
    Ok(TableRow { start_tag, children })
}

fn parse_cell(parser: &mut EventSource<'_>, start: &Event<'static>) -> TemplateResult<TableCell> {
    let start_tag = event_to_string(start)?;
    let mut children = Vec::new();
    loop {
        let ev = parser.next()?;
        match &ev {
            Event::Start(e) if e.name().as_ref() == b"w:p" => {
                children.push(CellChild::Block(parse_block(parser, &ev)?));
            }
            // Tables nested inside cells pass through untouched; this model
            // handles exactly one level of nesting.
            Event::Start(_) => children.push(CellChild::Raw(capture_element(parser, &ev)?)),
            Event::End(e) if e.name().as_ref() == b"w:tc" => break,
            Event::Eof => return Err(TemplateError::UnexpectedEof),
            _ => children.push(CellChild::Raw(event_to_string(&ev)?)),
        }
    }
    Ok(TableCell { start_tag, children })
}

//! Placeholder substitution
//!
//! Replaces `{{field}}` placeholders in a parsed template with the values
//! of one record. The algorithm is run-atomic: a placeholder is detected in
//! the concatenated text of a block's runs, but only a single run that
//! contains the entire placeholder is ever rewritten. A placeholder whose
//! braces are split across two runs (bold/plain boundaries and the like) is
//! silently left unresolved. That is a deliberate limitation: merging or
//! re-splitting runs would change the formatting of substituted text.

use std::collections::BTreeSet;

use atenea_core::Record;
use once_cell::sync::Lazy;
use regex::Regex;

use super::document::{Block, TemplateDocument};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("placeholder pattern is valid"));

/// Substitute one record into a parsed template.
///
/// Processes every body block, then every block inside every table cell.
/// The template copy is mutated in place; non-placeholder text, formatting
/// and document structure are untouched.
pub fn apply_record(document: &mut TemplateDocument, record: &Record) {
    for block in document.body_blocks_mut() {
        substitute_block(block, record);
    }
    for table in document.tables_mut() {
        for block in table.blocks_mut() {
            substitute_block(block, record);
        }
    }
}

/// Substitute all of a record's fields into one block.
///
/// Fields are processed in the record's natural key order. Presence checks
/// run against the text as it was when the block was entered, so a
/// substituted value never triggers matching for another field's pattern.
fn substitute_block(block: &mut Block, record: &Record) {
    let originals: Vec<String> = block.runs().map(|r| r.text().to_string()).collect();
    let block_text = originals.concat();

    for (name, value) in record.iter() {
        let placeholder = format!("{{{{{name}}}}}");
        if !block_text.contains(&placeholder) {
            continue;
        }

        // Only a run holding the entire placeholder can be rewritten.
        let Some(idx) = originals.iter().position(|t| t.contains(&placeholder)) else {
            tracing::debug!(
                field = %name,
                "placeholder split across formatting runs, left unresolved"
            );
            continue;
        };

        let rendered = value.to_string();
        if let Some(run) = block.runs_mut().nth(idx) {
            let updated = run.text().replace(&placeholder, &rendered);
            run.set_text(updated);
        }
    }
}

/// Collect the distinct `{{identifier}}` placeholders visible in the
/// template's blocks, body and table cells alike.
///
/// Placeholders split across runs are reported too: detection works on the
/// concatenated block text, like substitution.
#[must_use]
pub fn find_placeholders(document: &TemplateDocument) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut scan = |text: &str| {
        for capture in PLACEHOLDER_RE.captures_iter(text) {
            found.insert(capture[1].to_string());
        }
    };

    for block in document.body_blocks() {
        scan(&block.text());
    }
    for table in document.tables() {
        for block in table.blocks() {
            scan(&block.text());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC_NS: &str =
        r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn doc(body: &str) -> TemplateDocument {
        let xml = format!("<w:document {DOC_NS}><w:body>{body}</w:body></w:document>");
        TemplateDocument::parse(&xml).expect("parse")
    }

    #[test]
    fn finds_placeholders_across_body_and_tables() {
        let document = doc(
            "<w:p><w:r><w:t>{{nombre}} y {{cargo}}</w:t></w:r></w:p>\
             <w:tbl><w:tr><w:tc><w:p><w:r><w:t>{{fecha}}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>",
        );
        let found: Vec<String> = find_placeholders(&document).into_iter().collect();
        assert_eq!(found, ["cargo", "fecha", "nombre"]);
    }

    #[test]
    fn finds_placeholders_split_across_runs() {
        let document = doc("<w:p><w:r><w:t>{{nom</w:t></w:r><w:r><w:t>bre}}</w:t></w:r></w:p>");
        let found: Vec<String> = find_placeholders(&document).into_iter().collect();
        assert_eq!(found, ["nombre"]);
    }
}

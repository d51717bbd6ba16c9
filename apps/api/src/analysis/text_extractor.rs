//! Text Extractor — flattens a structured resume into one searchable string.
//!
//! Order: sections in document order; within a section the title, then
//! `content.text`, then every string / string-array leaf of each item in
//! stored field order. Nothing is deduplicated.

use serde_json::Value;

use crate::models::resume::{ResumeDocument, Section, SectionItem};

/// Returns every title, text block and string leaf of the document joined
/// by single spaces.
pub fn extract_text(resume: &ResumeDocument) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for section in &resume.sections {
        collect_section(section, &mut parts);
    }
    parts.join(" ")
}

fn collect_section<'a>(section: &'a Section, parts: &mut Vec<&'a str>) {
    parts.push(section.title.as_str());

    if let Some(text) = section.content.text.as_deref() {
        parts.push(text);
    }

    if let Some(items) = &section.content.items {
        for item in items {
            collect_item(item, parts);
        }
    }
}

fn collect_item<'a>(item: &'a SectionItem, parts: &mut Vec<&'a str>) {
    for value in item.values() {
        match value {
            Value::String(s) => parts.push(s.as_str()),
            Value::Array(values) => {
                parts.extend(values.iter().filter_map(Value::as_str));
            }
            // Numbers, booleans, nulls and nested objects are not text leaves.
            _ => {}
        }
    }
}

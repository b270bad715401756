// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structure-document parser.
//!
//! `Document.xml` describes the label tree in two sections: `<Objects>`
//! declares every object (identifier and type tag), `<ObjectData>` carries
//! each object's properties. Hierarchy is logical, not physical: a group
//! object's `Group` link-list property names its children by identifier,
//! so the tree is built by following those references rather than XML
//! nesting. Shape payloads are referenced by entry name through
//! `<Part file="…"/>` property payloads and are never read here.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::model::{LabelNode, LabelNote, PropertyBag, PropertyValue};

/// Type tag of the synthetic root node representing the document itself.
pub const DOCUMENT_TYPE_TAG: &str = "App::Document";

/// Raw per-object record before hierarchy resolution.
#[derive(Debug, Default)]
struct ObjectRecord {
    identifier: String,
    type_tag: String,
    label: Option<String>,
    shape_ref: Option<String>,
    group_links: Vec<String>,
    properties: PropertyBag,
    notes: Vec<LabelNote>,
}

/// One `<Property>` element being captured.
#[derive(Debug, Default)]
struct PropertyCapture {
    name: String,
    value: Option<PropertyValue>,
    links: Vec<String>,
    shape_file: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Declarations,
    Data,
}

/// Where finished properties are routed.
#[derive(Debug, Clone, Copy)]
enum PropertyTarget {
    /// Document-level properties, outside any object element.
    Document,
    /// Properties of the object record at this index.
    Object(usize),
    /// Properties of an object that was never declared; dropped.
    Discard,
}

/// Parses a structure document into the label tree.
///
/// Output is deterministic for a given input: siblings keep document
/// order, group children keep link order.
pub fn parse_document(xml: &[u8]) -> Result<LabelNode> {
    let text = std::str::from_utf8(xml)
        .map_err(|_| Error::malformed("structure document is not valid UTF-8"))?;

    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut records: Vec<ObjectRecord> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();

    let mut saw_document = false;
    let mut section = Section::Preamble;
    let mut target = PropertyTarget::Document;
    let mut current_prop: Option<PropertyCapture> = None;
    let mut doc_label: Option<String> = None;
    let mut doc_properties = PropertyBag::default();

    let mut buf = Vec::new();
    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| Error::malformed(format!("invalid XML: {e}")))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.name().as_ref() {
                    b"Document" => saw_document = true,
                    b"Objects" => section = Section::Declarations,
                    b"ObjectData" => section = Section::Data,
                    b"Object" => match section {
                        Section::Declarations => {
                            declare_object(e, &mut records, &mut index)?;
                        }
                        Section::Data => {
                            target = match attr(e, b"name")?
                                .and_then(|name| index.get(name.as_str()).copied())
                            {
                                Some(idx) => PropertyTarget::Object(idx),
                                None => PropertyTarget::Discard,
                            };
                        }
                        Section::Preamble => {}
                    },
                    b"Property" => {
                        let name = attr(e, b"name")?.unwrap_or_default();
                        current_prop = Some(PropertyCapture {
                            name,
                            ..PropertyCapture::default()
                        });
                        if is_empty {
                            finish_property(
                                current_prop.take(),
                                target,
                                &mut records,
                                &mut doc_label,
                                &mut doc_properties,
                            );
                        }
                    }
                    _ => {
                        if let Some(prop) = current_prop.as_mut() {
                            capture_value(e, prop)?;
                        }
                    }
                }
            }
            Event::End(ref e) => match e.name().as_ref() {
                b"Objects" | b"ObjectData" => section = Section::Preamble,
                b"Object" => target = PropertyTarget::Document,
                b"Property" => finish_property(
                    current_prop.take(),
                    target,
                    &mut records,
                    &mut doc_label,
                    &mut doc_properties,
                ),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_document {
        return Err(Error::malformed("no Document element found"));
    }

    Ok(resolve_tree(records, index, doc_label, doc_properties))
}

/// Registers one `<Object name=… type=…/>` declaration. First occurrence
/// of an identifier wins; later claims are dropped with a note on the
/// surviving record.
fn declare_object(
    e: &BytesStart,
    records: &mut Vec<ObjectRecord>,
    index: &mut FxHashMap<String, usize>,
) -> Result<()> {
    let Some(name) = attr(e, b"name")? else {
        // An unnamed object can never be referenced; nothing to keep.
        return Ok(());
    };
    let type_tag = attr(e, b"type")?.unwrap_or_default();

    if let Some(&existing) = index.get(name.as_str()) {
        records[existing]
            .notes
            .push(LabelNote::DuplicateIdentifier(name));
        return Ok(());
    }

    index.insert(name.clone(), records.len());
    records.push(ObjectRecord {
        identifier: name,
        type_tag,
        ..ObjectRecord::default()
    });
    Ok(())
}

/// Captures one value element inside a `<Property>`.
fn capture_value(e: &BytesStart, prop: &mut PropertyCapture) -> Result<()> {
    match e.name().as_ref() {
        b"String" => {
            if let Some(v) = attr(e, b"value")? {
                prop.value = Some(PropertyValue::Str(v));
            }
        }
        b"Bool" => {
            if let Some(v) = attr(e, b"value")? {
                prop.value = Some(PropertyValue::Bool(v == "true"));
            }
        }
        b"Integer" => {
            if let Some(v) = attr(e, b"value")? {
                if let Ok(i) = v.parse::<i64>() {
                    prop.value = Some(PropertyValue::Int(i));
                }
            }
        }
        b"Float" => {
            if let Some(v) = attr(e, b"value")? {
                if let Ok(f) = v.parse::<f64>() {
                    prop.value = Some(PropertyValue::Float(f));
                }
            }
        }
        b"Link" => {
            if let Some(v) = attr(e, b"value")? {
                prop.links.push(v);
            }
        }
        b"Part" => {
            if let Some(v) = attr(e, b"file")? {
                prop.shape_file = Some(v);
            }
        }
        b"PropertyPlacement" => {
            // Position plus orientation quaternion, kept as a flat list.
            let mut components = Vec::with_capacity(7);
            for key in [b"Px" as &[u8], b"Py", b"Pz", b"Q0", b"Q1", b"Q2", b"Q3"] {
                let v = attr(e, key)?
                    .and_then(|v| v.parse::<f64>().ok())
                    .unwrap_or(0.0);
                components.push(PropertyValue::Float(v));
            }
            prop.value = Some(PropertyValue::List(components));
        }
        _ => {}
    }
    Ok(())
}

/// Routes a finished property capture onto its owner: the current object
/// record, or the document-level bag when no object is open.
fn finish_property(
    prop: Option<PropertyCapture>,
    target: PropertyTarget,
    records: &mut [ObjectRecord],
    doc_label: &mut Option<String>,
    doc_properties: &mut PropertyBag,
) {
    let Some(prop) = prop else { return };
    if prop.name.is_empty() {
        return;
    }

    match target {
        PropertyTarget::Discard => {}
        PropertyTarget::Object(idx) => {
            let record = &mut records[idx];
            if let Some(file) = prop.shape_file {
                record.shape_ref = Some(file);
            } else if prop.name == "Label" {
                if let Some(PropertyValue::Str(s)) = prop.value {
                    if !s.is_empty() {
                        record.label = Some(s);
                    }
                }
            } else if prop.name == "Group" {
                record.group_links = prop.links;
            } else if !prop.links.is_empty() {
                // Non-hierarchy links are preserved as plain values.
                let links = prop.links.into_iter().map(PropertyValue::Str).collect();
                record
                    .properties
                    .insert(prop.name, PropertyValue::List(links));
            } else if let Some(value) = prop.value {
                record.properties.insert(prop.name, value);
            }
        }
        PropertyTarget::Document => {
            if prop.name == "Label" {
                if let Some(PropertyValue::Str(s)) = prop.value {
                    if !s.is_empty() {
                        *doc_label = Some(s);
                    }
                }
            } else if let Some(value) = prop.value {
                doc_properties.insert(prop.name, value);
            }
        }
    }
}

/// Resolves group links into a strict tree and materializes the output.
fn resolve_tree(
    mut records: Vec<ObjectRecord>,
    index: FxHashMap<String, usize>,
    doc_label: Option<String>,
    doc_properties: PropertyBag,
) -> LabelNode {
    let n = records.len();
    let mut accepted: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut claimed = vec![false; n];

    // First claim wins, in document order. A link to a missing, already
    // claimed, or self identifier is dropped and noted on the parent.
    for parent in 0..n {
        let links = std::mem::take(&mut records[parent].group_links);
        for link in links {
            match index.get(link.as_str()).copied() {
                Some(child) if child != parent && !claimed[child] => {
                    claimed[child] = true;
                    accepted[parent].push(child);
                }
                _ => records[parent]
                    .notes
                    .push(LabelNote::DanglingChildReference(link)),
            }
        }
    }

    // Nodes trapped in a link cycle are unreachable from any root. Break
    // the cycle by re-attaching the first such node (document order) under
    // the document root, then re-check.
    let mut reachable = vec![false; n];
    for root in 0..n {
        if !claimed[root] {
            mark_reachable(root, &accepted, &mut reachable);
        }
    }
    for node in 0..n {
        if reachable[node] {
            continue;
        }
        for children in accepted.iter_mut() {
            children.retain(|&c| c != node);
        }
        claimed[node] = false;
        records[node].notes.push(LabelNote::Reparented);
        mark_reachable(node, &accepted, &mut reachable);
    }

    let mut slots: Vec<Option<ObjectRecord>> = records.into_iter().map(Some).collect();
    let children = (0..n)
        .filter(|&i| !claimed[i])
        .map(|i| materialize(i, &mut slots, &accepted))
        .collect();

    LabelNode {
        identifier: "Document".to_string(),
        label: doc_label.unwrap_or_else(|| "Document".to_string()),
        type_tag: DOCUMENT_TYPE_TAG.to_string(),
        shape_ref: None,
        properties: doc_properties,
        notes: Vec::new(),
        children,
    }
}

fn mark_reachable(start: usize, accepted: &[Vec<usize>], reachable: &mut [bool]) {
    if reachable[start] {
        return;
    }
    reachable[start] = true;
    for &child in &accepted[start] {
        mark_reachable(child, accepted, reachable);
    }
}

fn materialize(
    idx: usize,
    slots: &mut Vec<Option<ObjectRecord>>,
    accepted: &[Vec<usize>],
) -> LabelNode {
    let record = slots[idx].take().expect("record materialized twice");
    let mut notes = record.notes;

    let label = match record.label {
        Some(label) => label,
        None => {
            notes.push(LabelNote::DefaultedLabel);
            format!("{} {}", record.type_tag, record.identifier)
                .trim()
                .to_string()
        }
    };

    let children = accepted[idx]
        .iter()
        .map(|&child| materialize(child, slots, accepted))
        .collect();

    LabelNode {
        identifier: record.identifier,
        label,
        type_tag: record.type_tag,
        shape_ref: record.shape_ref,
        properties: record.properties,
        notes,
        children,
    }
}

/// Returns the value of one attribute, unescaped.
fn attr(e: &BytesStart, key: &[u8]) -> Result<Option<String>> {
    for a in e.attributes() {
        let a = a.map_err(|e| Error::malformed(format!("bad attribute: {e}")))?;
        if a.key.as_ref() == key {
            let value = a
                .unescape_value()
                .map_err(|e| Error::malformed(format!("bad attribute value: {e}")))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

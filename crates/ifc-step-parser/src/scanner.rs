// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fast record scanner using SIMD-accelerated byte searching
//!
//! Splits the DATA section of a STEP file into `#id=TYPE(...);` records
//! without tokenizing their arguments, and reads the HEADER section into
//! [`ModelMetadata`].

use crate::tokenizer::{parse_header_record, Token};
use ifc_step_model::encoding::decode_string;
use ifc_step_model::{EntityId, ModelMetadata, Result, StepError};
use memchr::{memchr, memchr3, memmem};
use rustc_hash::FxHashMap;

/// Entity index mapping id to byte offsets
pub type EntityIndex = FxHashMap<EntityId, (usize, usize)>;

/// One record found by the scanner
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawRecord<'a> {
    pub id: EntityId,
    /// Type keyword as written; empty for complex instances `#1=(A()B());`
    pub type_name: &'a str,
    /// Record text from `#` through the closing `;`
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Record scanner for the DATA section
pub struct EntityScanner<'a> {
    content: &'a str,
    pos: usize,
    malformed: usize,
}

impl<'a> EntityScanner<'a> {
    /// Create a scanner positioned at the start of the DATA section
    ///
    /// Content without a DATA section is scanned from the start.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            pos: data_section_start(content).unwrap_or(0),
            malformed: 0,
        }
    }

    /// Statements skipped because they did not start with `#id=`
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    /// Scan to the next record
    ///
    /// Stops at `ENDSEC;` or at the end of the content. An unterminated
    /// last record is dropped.
    pub fn next_entity(&mut self) -> Option<RawRecord<'a>> {
        let bytes = self.content.as_bytes();
        loop {
            self.skip_whitespace_and_comments();
            if self.pos >= bytes.len() {
                return None;
            }
            let rest = &self.content[self.pos..];
            if rest.starts_with("ENDSEC") {
                return None;
            }
            if bytes[self.pos] != b'#' {
                // Not a record; skip the statement
                self.malformed += 1;
                let start = self.pos;
                let end = find_statement_end(bytes, self.pos)?;
                log::warn!(
                    "Skipping malformed statement at byte {}: {}",
                    start,
                    preview(&self.content[start..end])
                );
                self.pos = end;
                continue;
            }

            let start = self.pos;
            let end = find_statement_end(bytes, self.pos)?;
            self.pos = end;
            let text = &self.content[start..end];

            match split_record_head(text) {
                Some((id, type_name)) => {
                    return Some(RawRecord {
                        id,
                        type_name,
                        text,
                        start,
                        end,
                    });
                }
                None => {
                    self.malformed += 1;
                    log::warn!("Skipping malformed record at byte {}: {}", start, preview(text));
                }
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        let bytes = self.content.as_bytes();
        while self.pos < bytes.len() {
            if bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            } else if bytes[self.pos..].starts_with(b"/*") {
                self.pos = match memmem::find(&bytes[self.pos + 2..], b"*/") {
                    Some(offset) => self.pos + 2 + offset + 2,
                    None => bytes.len(),
                };
            } else {
                break;
            }
        }
    }

    /// Build an index of all records (id -> byte offsets)
    pub fn build_index(content: &'a str) -> EntityIndex {
        let mut scanner = Self::new(content);
        let mut index = FxHashMap::default();

        while let Some(record) = scanner.next_entity() {
            index.insert(record.id, (record.start, record.end));
        }

        index
    }

    /// Count records by upper-case type name
    pub fn count_by_type(content: &'a str) -> FxHashMap<String, usize> {
        let mut scanner = Self::new(content);
        let mut counts: FxHashMap<String, usize> = FxHashMap::default();

        while let Some(record) = scanner.next_entity() {
            *counts.entry(record.type_name.to_ascii_uppercase()).or_insert(0) += 1;
        }

        counts
    }

    /// Get total record count
    pub fn entity_count(content: &'a str) -> usize {
        let mut scanner = Self::new(content);
        let mut count = 0;

        while scanner.next_entity().is_some() {
            count += 1;
        }

        count
    }
}

/// Byte offset just after `DATA;`, looking past the header section
fn data_section_start(content: &str) -> Option<usize> {
    let search_from = section_bounds(content, "HEADER;")
        .map(|(_, end)| end)
        .unwrap_or(0);
    memmem::find(&content.as_bytes()[search_from..], b"DATA;").map(|p| search_from + p + 5)
}

/// Byte range of a section body, between `keyword` and its `ENDSEC;`
fn section_bounds(content: &str, keyword: &str) -> Option<(usize, usize)> {
    let bytes = content.as_bytes();
    let start = memmem::find(bytes, keyword.as_bytes())? + keyword.len();
    let mut pos = start;
    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            return None;
        }
        if bytes[pos..].starts_with(b"ENDSEC") {
            return Some((start, pos));
        }
        pos = find_statement_end(bytes, pos)?;
    }
}

/// Find the end of a statement (just past its `;`), skipping strings and comments
fn find_statement_end(bytes: &[u8], mut pos: usize) -> Option<usize> {
    while pos < bytes.len() {
        let offset = memchr3(b'\'', b';', b'/', &bytes[pos..])?;
        pos += offset;
        match bytes[pos] {
            b';' => return Some(pos + 1),
            b'\'' => {
                // Jump over the string, '' is an escaped quote
                pos += 1;
                loop {
                    let close = memchr(b'\'', &bytes[pos..])?;
                    pos += close + 1;
                    if bytes.get(pos) == Some(&b'\'') {
                        pos += 1;
                    } else {
                        break;
                    }
                }
            }
            _ => {
                if bytes.get(pos + 1) == Some(&b'*') {
                    let close = memmem::find(&bytes[pos + 2..], b"*/")?;
                    pos += 2 + close + 2;
                } else {
                    pos += 1;
                }
            }
        }
    }
    None
}

/// Split `#id = TYPE(` into id and type keyword
fn split_record_head(text: &str) -> Option<(EntityId, &str)> {
    let rest = text.strip_prefix('#')?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let id: u32 = rest[..digits].parse().ok()?;
    let rest = rest[digits..].trim_start().strip_prefix('=')?.trim_start();
    if rest.starts_with('(') {
        return Some((EntityId(id), ""));
    }
    let len = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    if len == 0 {
        return None;
    }
    Some((EntityId(id), &rest[..len]))
}

fn preview(text: &str) -> String {
    text.chars().take(40).collect()
}

/// Parse the header section into model metadata
///
/// Reads `FILE_DESCRIPTION`, `FILE_NAME` and `FILE_SCHEMA`; other header
/// records are ignored. Fails when there is no header section or a header
/// record cannot be tokenized.
pub fn parse_header(content: &str) -> Result<ModelMetadata> {
    let (start, end) = section_bounds(content, "HEADER;")
        .ok_or_else(|| StepError::InvalidHeader("missing HEADER section".to_string()))?;
    let header = &content.as_bytes()[..end];
    let mut metadata = ModelMetadata::default();

    let mut pos = start;
    while let Some(stmt_end) = find_statement_end(header, pos) {
        let statement = content[pos..stmt_end].trim_end_matches(';');
        pos = stmt_end;
        if statement.trim().is_empty() {
            continue;
        }
        let (name, args) = parse_header_record(statement)?;
        match name.to_ascii_uppercase().as_str() {
            "FILE_DESCRIPTION" => {
                metadata.file_description = string_list(args.first())?;
                metadata.implementation_level = optional_string(args.get(1))?;
            }
            "FILE_NAME" => {
                metadata.file_name = optional_string(args.first())?;
                metadata.timestamp = optional_string(args.get(1))?;
                metadata.author = string_list(args.get(2))?;
                metadata.organization = string_list(args.get(3))?;
                metadata.preprocessor_version = optional_string(args.get(4))?;
                metadata.originating_system = optional_string(args.get(5))?;
                metadata.authorization = optional_string(args.get(6))?;
            }
            "FILE_SCHEMA" => {
                metadata.schema_version = string_list(args.first())?
                    .into_iter()
                    .next()
                    .unwrap_or_default();
            }
            other => log::debug!("Ignoring header record {}", other),
        }
    }

    Ok(metadata)
}

/// A header string argument; `$` and empty strings are absent
fn optional_string(token: Option<&Token<'_>>) -> Result<Option<String>> {
    match token {
        Some(Token::String(raw)) if !raw.is_empty() => Ok(Some(decode_string(raw)?)),
        _ => Ok(None),
    }
}

/// A header list of strings, or a single string; empty entries are dropped
fn string_list(token: Option<&Token<'_>>) -> Result<Vec<String>> {
    match token {
        Some(Token::List(items)) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                if let Some(value) = optional_string(Some(item))? {
                    values.push(value);
                }
            }
            Ok(values)
        }
        single => Ok(optional_string(single)?.into_iter().collect()),
    }
}

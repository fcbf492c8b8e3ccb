//! Delimited-text and JSON encoding of a result set.
//!
//! The CSV path needs no network and is what the "download optimized CTAs"
//! button uses. Every field is quoted so commas, quotes, and newlines inside
//! CTA text survive a round trip.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::api::ExportPayload;
use crate::error::ExportError;
use crate::session::entry::{Confidence, ResultEntry};

pub const CSV_HEADER: [&str; 4] = ["Original CTA", "Suggested Improvement", "Confidence", "Source"];

const FILE_STEM: &str = "cta_optimization_results";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A ready-to-download document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl ExportFile {
    pub fn new(format: ExportFormat, contents: String, now: NaiveDateTime) -> Self {
        Self {
            file_name: file_name(format, now),
            mime_type: format.mime_type(),
            contents,
        }
    }

    /// Wrap a payload returned by the service's export endpoint.
    pub fn from_payload(payload: ExportPayload, now: NaiveDateTime) -> Result<Self, ExportError> {
        match payload {
            ExportPayload::Csv(text) => Ok(Self::new(ExportFormat::Csv, text, now)),
            ExportPayload::Json(value) => Ok(Self::new(
                ExportFormat::Json,
                serde_json::to_string_pretty(&value)?,
                now,
            )),
        }
    }
}

pub fn file_name(format: ExportFormat, now: NaiveDateTime) -> String {
    format!("{}_{}.{}", FILE_STEM, now.format("%Y%m%d_%H%M%S"), format.extension())
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn write_row(out: &mut String, fields: &[&str]) {
    let quoted: Vec<String> = fields.iter().map(|f| quote(f)).collect();
    out.push_str(&quoted.join(","));
    out.push_str("\r\n");
}

/// Header plus one fully quoted row per entry, CRLF terminated.
pub fn to_csv<'a>(entries: impl IntoIterator<Item = &'a ResultEntry>) -> String {
    let mut out = String::new();
    write_row(&mut out, &CSV_HEADER);
    for entry in entries {
        write_row(
            &mut out,
            &[
                entry.original_cta.as_str(),
                entry.suggested_improvement.as_str(),
                entry.confidence.as_str(),
                entry.source.as_deref().unwrap_or(""),
            ],
        );
    }
    out
}

/// Split RFC 4180 text into records. Quoted fields may span lines.
fn parse_records(text: &str) -> Result<Vec<Vec<String>>, ExportError> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    in_quotes = false;
                    match chars.peek() {
                        None | Some(',') | Some('\r') | Some('\n') => {}
                        Some(other) => {
                            return Err(ExportError::MalformedCsv {
                                line,
                                reason: format!("unexpected '{}' after closing quote", other),
                            })
                        }
                    }
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if !field_started => {
                in_quotes = true;
                field_started = true;
            }
            '"' => {
                return Err(ExportError::MalformedCsv {
                    line,
                    reason: "quote inside unquoted field".to_string(),
                })
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                field_started = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
                field_started = false;
                line += 1;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }

    if in_quotes {
        return Err(ExportError::MalformedCsv {
            line,
            reason: "unterminated quoted field".to_string(),
        });
    }
    if field_started || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

/// Decode text produced by [`to_csv`] (or any four-column CSV with the same header).
///
/// An empty source cell decodes as `None`, matching how entries treat an empty source.
pub fn parse_csv(text: &str) -> Result<Vec<ResultEntry>, ExportError> {
    let records = parse_records(text)?;
    let mut entries = Vec::new();

    for (i, record) in records.into_iter().enumerate() {
        let line = i + 1;
        if i == 0 && record.first().map(String::as_str) == Some(CSV_HEADER[0]) {
            continue;
        }
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        if record.len() != CSV_HEADER.len() {
            return Err(ExportError::MalformedCsv {
                line,
                reason: format!("expected {} fields, found {}", CSV_HEADER.len(), record.len()),
            });
        }
        let mut fields = record.into_iter();
        let original_cta = fields.next().unwrap_or_default();
        let suggested_improvement = fields.next().unwrap_or_default();
        let confidence = Confidence::from_label(&fields.next().unwrap_or_default());
        let source = fields.next().filter(|s| !s.is_empty());
        entries.push(ResultEntry {
            original_cta,
            suggested_improvement,
            confidence,
            source,
        });
    }
    Ok(entries)
}

pub fn to_json<'a>(entries: impl IntoIterator<Item = &'a ResultEntry>) -> Result<String, ExportError> {
    let entries: Vec<&ResultEntry> = entries.into_iter().collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

pub fn from_json(text: &str) -> Result<Vec<ResultEntry>, ExportError> {
    Ok(serde_json::from_str(text)?)
}

//! File loading — feed file contents into the prompt buffer.
//!
//! The extension decides the interpretation: delimited files are
//! parsed into a table and rendered with the row-capped tabular
//! renderer; plain text/markup files are appended verbatim.

use std::path::Path;

use counsel_core::error::InputError;
use counsel_core::input::Table;
use tracing::debug;

use crate::buffer::PromptBuffer;

impl PromptBuffer {
    /// Read `path` and append its normalized content to the buffer.
    ///
    /// `.csv`/`.tsv` are parsed into rows × columns and rendered with
    /// at most `max_rows` rows (dimension header when clipped, same as
    /// appending a [`Table`]). `.md`/`.markdown`/`.txt` are appended
    /// verbatim. Any other extension is rejected. Returns the text
    /// that was appended.
    pub async fn load_file(
        &mut self,
        path: impl AsRef<Path>,
        max_rows: usize,
    ) -> Result<String, InputError> {
        let path = path.as_ref();
        let display_path = path.display().to_string();

        let delimiter = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Some(','),
            Some("tsv") => Some('\t'),
            Some("md" | "markdown" | "txt") => None,
            _ => {
                return Err(InputError::UnsupportedFileType { path: display_path });
            }
        };

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                InputError::FileNotFound {
                    path: display_path.clone(),
                }
            } else {
                InputError::Read {
                    path: display_path.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let text = match delimiter {
            Some(delimiter) => {
                let table = parse_delimited(&content, delimiter);
                debug!(
                    path = %display_path,
                    rows = table.row_count(),
                    cols = table.column_count(),
                    "Loaded delimited file"
                );
                table.render(max_rows)
            }
            None => {
                debug!(path = %display_path, bytes = content.len(), "Loaded text file");
                content
            }
        };

        self.push_block(&text);
        Ok(text)
    }
}

/// Parse delimited text into a table. The first line is the header.
/// Fields may be double-quoted; `""` inside quotes is an escaped quote.
fn parse_delimited(content: &str, delimiter: char) -> Table {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());

    let Some(header) = lines.next() else {
        return Table::default();
    };

    let mut table = Table::new(split_fields(header, delimiter));
    for line in lines {
        table.push_row(split_fields(line, delimiter));
    }
    table
}

fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == '"' && field.is_empty() {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(c);
        }
    }
    fields.push(field);
    fields
}

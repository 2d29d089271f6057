//! Input normalization — the closed set of shapes the accumulator accepts.
//!
//! Every value fed to the prompt buffer is first classified into an
//! [`InputValue`] variant, then rendered to text by that variant's rule.
//! Rendering is bounded: long sequences, tables, and series are clipped
//! to a preview cap with an explicit marker stating how much was omitted,
//! so large result sets cannot blow up the prompt.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Maximum sequence elements rendered before clipping.
pub const SEQUENCE_PREVIEW_CAP: usize = 100;

/// Maximum series points rendered before clipping.
pub const SERIES_PREVIEW_CAP: usize = 100;

/// Default maximum table rows rendered before clipping.
pub const TABLE_PREVIEW_ROWS: usize = 50;

/// A value normalized into one of the supported input shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InputValue {
    /// Scalar text, appended as-is.
    Text(String),

    /// A finite ordered sequence, joined with single spaces.
    Sequence(Vec<serde_json::Value>),

    /// Rows × named columns, rendered as an aligned text table.
    Table(Table),

    /// A one-dimensional labeled series.
    Series(Series),

    /// A key-value mapping, rendered as indented JSON with stable
    /// (sorted) key order.
    Mapping(serde_json::Map<String, serde_json::Value>),

    /// Anything else — best-effort textual conversion.
    Other(serde_json::Value),
}

/// Tabular data: named columns and string cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Add a row. Short rows are padded with empty cells; long rows are
    /// truncated to the column count.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Render as an aligned text table. When the row count exceeds
    /// `max_rows`, a one-line header states the full dimensions and the
    /// preview limit, and only the first `max_rows` rows are rendered.
    pub fn render(&self, max_rows: usize) -> String {
        let shown = self.rows.len().min(max_rows);
        let mut out = String::new();

        if self.rows.len() > max_rows {
            out.push_str(&format!(
                "[Table: {} rows x {} cols] showing first {} rows\n",
                self.rows.len(),
                self.columns.len(),
                shown,
            ));
        }

        // Column widths over the header and the shown rows only.
        // `push_row` pads rows to the column count, but a deserialized
        // table may carry ragged rows, so widths grows to the longest.
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows[..shown] {
            for (i, cell) in row.iter().enumerate() {
                if i >= widths.len() {
                    widths.resize(i + 1, 0);
                }
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        out.push_str(&render_aligned_row(&self.columns, &widths));
        for row in &self.rows[..shown] {
            out.push('\n');
            out.push_str(&render_aligned_row(row, &widths));
        }
        out
    }
}

fn render_aligned_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        // No padding after the last column.
        if i + 1 < cells.len() {
            for _ in cell.chars().count()..widths[i] {
                line.push(' ');
            }
        }
    }
    line
}

/// A one-dimensional labeled series (label → value pairs).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Series {
    points: Vec<(String, String)>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.points.push((label.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Render as aligned `label  value` lines, clipped to the preview
    /// cap with an `... [and N more]` trailer.
    pub fn render(&self) -> String {
        let shown = self.points.len().min(SERIES_PREVIEW_CAP);
        let width = self.points[..shown]
            .iter()
            .map(|(l, _)| l.chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for (i, (label, value)) in self.points[..shown].iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(label);
            for _ in label.chars().count()..width {
                out.push(' ');
            }
            out.push_str("  ");
            out.push_str(value);
        }
        if self.points.len() > SERIES_PREVIEW_CAP {
            out.push_str(&format!(
                "\n... [and {} more]",
                self.points.len() - SERIES_PREVIEW_CAP
            ));
        }
        out
    }
}

impl From<Vec<(String, String)>> for Series {
    fn from(points: Vec<(String, String)>) -> Self {
        Self { points }
    }
}

impl InputValue {
    /// A short name for this shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Sequence(_) => "sequence",
            Self::Table(_) => "table",
            Self::Series(_) => "series",
            Self::Mapping(_) => "mapping",
            Self::Other(_) => "other",
        }
    }

    /// Render to a text block, without a trailing line terminator.
    ///
    /// A non-empty `label` is prepended as a leading token (scalars,
    /// sequences, fallback) or a leading line (tables, series, mappings).
    pub fn render(&self, label: &str) -> Result<String, InputError> {
        let body = match self {
            Self::Text(s) => s.clone(),
            Self::Sequence(items) => render_sequence(items),
            Self::Table(table) => table.render(TABLE_PREVIEW_ROWS),
            Self::Series(series) => series.render(),
            Self::Mapping(map) => {
                serde_json::to_string_pretty(&serde_json::Value::Object(map.clone()))
                    .map_err(|e| InputError::InvalidInputType(format!("mapping ({e})")))?
            }
            Self::Other(value) => serde_json::to_string(value)
                .map_err(|e| InputError::InvalidInputType(format!("{} ({e})", json_kind(value))))?,
        };

        if label.is_empty() {
            return Ok(body);
        }
        Ok(match self {
            Self::Text(_) | Self::Sequence(_) | Self::Other(_) => format!("{label} {body}"),
            Self::Table(_) | Self::Series(_) | Self::Mapping(_) => format!("{label}\n{body}"),
        })
    }
}

fn render_sequence(items: &[serde_json::Value]) -> String {
    let shown = items.len().min(SEQUENCE_PREVIEW_CAP);
    let mut out = items[..shown]
        .iter()
        .map(scalar_text)
        .collect::<Vec<_>>()
        .join(" ");
    if items.len() > SEQUENCE_PREVIEW_CAP {
        out.push_str(&format!(
            " ... [and {} more]",
            items.len() - SEQUENCE_PREVIEW_CAP
        ));
    }
    out
}

/// Plain textual form of a scalar JSON value (no quotes around strings).
fn scalar_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "null".into(),
        other => other.to_string(),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// The seam between caller values and the accumulator.
///
/// `PromptBuffer::append` takes any `PromptSource`, renders its
/// normalized form, and hands the original value back unchanged so the
/// call can be composed inline around other expressions.
pub trait PromptSource {
    fn to_input(&self) -> InputValue;
}

impl PromptSource for &str {
    fn to_input(&self) -> InputValue {
        InputValue::Text((*self).to_string())
    }
}

impl PromptSource for String {
    fn to_input(&self) -> InputValue {
        InputValue::Text(self.clone())
    }
}

impl<T> PromptSource for Vec<T>
where
    T: Clone + Into<serde_json::Value>,
{
    fn to_input(&self) -> InputValue {
        InputValue::Sequence(self.iter().cloned().map(Into::into).collect())
    }
}

impl PromptSource for Table {
    fn to_input(&self) -> InputValue {
        InputValue::Table(self.clone())
    }
}

impl PromptSource for Series {
    fn to_input(&self) -> InputValue {
        InputValue::Series(self.clone())
    }
}

impl PromptSource for serde_json::Map<String, serde_json::Value> {
    fn to_input(&self) -> InputValue {
        InputValue::Mapping(self.clone())
    }
}

impl PromptSource for serde_json::Value {
    /// Dispatch by shape: strings are text, arrays are sequences,
    /// objects are mappings, everything else takes the fallback path.
    fn to_input(&self) -> InputValue {
        match self {
            serde_json::Value::String(s) => InputValue::Text(s.clone()),
            serde_json::Value::Array(items) => InputValue::Sequence(items.clone()),
            serde_json::Value::Object(map) => InputValue::Mapping(map.clone()),
            other => InputValue::Other(other.clone()),
        }
    }
}

impl PromptSource for InputValue {
    fn to_input(&self) -> InputValue {
        self.clone()
    }
}

macro_rules! scalar_prompt_source {
    ($($t:ty),*) => {
        $(
            impl PromptSource for $t {
                fn to_input(&self) -> InputValue {
                    InputValue::Other(serde_json::json!(self))
                }
            }
        )*
    };
}

scalar_prompt_source!(f64, f32, i64, i32, u64, u32, bool);

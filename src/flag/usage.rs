//! Help text tables

use super::FlagSet;
use crate::output::Color;
use unicode_width::UnicodeWidthStr;

/// Indentation of table rows
const INDENT: &str = "  ";
/// Gap between the two columns
const GAP: usize = 4;

/// One row of a two-column help table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    plain: String,
    painted: String,
    text: String,
}

impl Row {
    /// Row whose left cell is shown as is
    pub fn new(left: impl Into<String>, text: impl Into<String>) -> Self {
        let plain = left.into();
        Self {
            painted: plain.clone(),
            plain,
            text: text.into(),
        }
    }

    /// Row whose left cell is shown styled; alignment uses the plain form
    pub fn styled(plain: impl Into<String>, painted: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            plain: plain.into(),
            painted: painted.into(),
            text: text.into(),
        }
    }
}

/// Rows of the `Options:` section. Hidden flags are left out.
pub fn option_rows(set: &FlagSet, color: &Color) -> Vec<Row> {
    set.flags()
        .iter()
        .filter(|flag| !flag.spec().hidden)
        .map(|flag| {
            let spec = flag.spec();
            let mut left = String::new();
            if spec.is_required {
                left.push('*');
            }
            left.push_str(&spec.display_names());
            if !flag.kind().is_bool() {
                let placeholder = spec
                    .name
                    .clone()
                    .unwrap_or_else(|| flag.kind().hint(&spec.map_sep));
                left.push_str(&format!("={}", placeholder));
            }

            let mut text = spec.usage.clone();
            if spec.is_password {
                text.push_str(" (password)");
            }
            if spec.is_edit {
                text.push_str(" (editor)");
            }
            if let Some(dft) = spec.default.as_deref() {
                text.push_str(&format!(" {}", color.dimmed(&format!("[default: {}]", dft))));
            }

            Row::new(left, text.trim_start().to_string())
        })
        .collect()
}

/// Render rows with the right column aligned by display width
pub fn render_table(rows: &[Row]) -> String {
    let width = rows
        .iter()
        .map(|row| UnicodeWidthStr::width(row.plain.as_str()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for row in rows {
        out.push_str(INDENT);
        out.push_str(&row.painted);
        if !row.text.is_empty() {
            let pad = width - UnicodeWidthStr::width(row.plain.as_str()) + GAP;
            out.push_str(&" ".repeat(pad));
            out.push_str(&row.text);
        }
        out.push('\n');
    }
    out
}

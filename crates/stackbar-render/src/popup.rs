//! Popup tables listing a chart's values per primary/secondary category.

use crate::model::{PopupCell, PopupRow, PopupTable};
use stackbar_core::BarData;
use std::fmt::Write as _;
use std::str::FromStr;

const MISSING: &str = "-";

impl PopupTable {
    pub fn from_data(data: &BarData) -> Self {
        let secondaries = data.secondary_categories();
        let with_aggregate_column = secondaries.len() > 1;

        let mut column_headers = Vec::with_capacity(secondaries.len() + 2);
        column_headers.push(if secondaries.len() == 1 {
            "Category".to_string()
        } else {
            "Primary / secondary".to_string()
        });
        column_headers.extend(secondaries.iter().map(|s| {
            if s.is_empty() {
                "Value".to_string()
            } else {
                s.to_string()
            }
        }));
        if with_aggregate_column {
            column_headers.push("Aggregated".to_string());
        }

        let mut buf = ryu_js::Buffer::new();
        let mut rows = Vec::with_capacity(data.values.len());
        for (primary, row) in &data.values {
            let mut cells: Vec<PopupCell> = secondaries
                .iter()
                .map(|secondary| {
                    let text = match row.get(*secondary) {
                        Some(value) => js_number_to_string(*value, &mut buf).to_string(),
                        None => MISSING.to_string(),
                    };
                    let background_color = data
                        .cell_color(primary, secondary)
                        .map(str::to_string);
                    let color = background_color.as_deref().and_then(contrast_text_color);
                    PopupCell {
                        text,
                        background_color,
                        color: color.map(str::to_string),
                    }
                })
                .collect();
            if with_aggregate_column {
                cells.push(plain_cell(format_aggregate(
                    data.aggregated_values.get(primary).copied(),
                )));
            }
            rows.push(PopupRow {
                header: primary.clone(),
                cells,
            });
        }

        let footer = PopupRow {
            header: "Aggregated".to_string(),
            cells: secondaries
                .iter()
                .map(|secondary| {
                    plain_cell(format_aggregate(
                        data.aggregated_values.get(*secondary).copied(),
                    ))
                })
                .collect(),
        };

        Self {
            caption: data
                .aggregated_location_names
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            column_headers,
            rows,
            footer,
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<table>");
        let _ = write!(out, "<caption>{}</caption>", htmlize::escape_text(&self.caption));

        out.push_str("<thead><tr>");
        for header in &self.column_headers {
            push_header(&mut out, "col", header);
        }
        out.push_str("</tr></thead>");

        out.push_str("<tbody>");
        for row in &self.rows {
            push_row(&mut out, row);
        }
        out.push_str("</tbody>");

        out.push_str("<tfoot>");
        push_row(&mut out, &self.footer);
        out.push_str("</tfoot>");

        out.push_str("</table>");
        out
    }
}

fn plain_cell(text: String) -> PopupCell {
    PopupCell {
        text,
        background_color: None,
        color: None,
    }
}

fn push_header(out: &mut String, scope: &str, text: &str) {
    let _ = write!(
        out,
        r#"<th scope="{scope}">{}</th>"#,
        htmlize::escape_text(text)
    );
}

fn push_row(out: &mut String, row: &PopupRow) {
    out.push_str("<tr>");
    push_header(out, "row", &row.header);
    for cell in &row.cells {
        let mut style = String::new();
        if let Some(bg) = &cell.background_color {
            let _ = write!(style, "background-color: {bg};");
        }
        if let Some(color) = &cell.color {
            if !style.is_empty() {
                style.push(' ');
            }
            let _ = write!(style, "color: {color};");
        }
        if style.is_empty() {
            out.push_str("<td>");
        } else {
            let _ = write!(out, r#"<td style="{}">"#, htmlize::escape_attribute(&style));
        }
        out.push_str(&htmlize::escape_text(&cell.text));
        out.push_str("</td>");
    }
    out.push_str("</tr>");
}

fn js_number_to_string(v: f64, buf: &mut ryu_js::Buffer) -> &str {
    if v.is_nan() {
        return "NaN";
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" };
    }
    buf.format_finite(if v == 0.0 { 0.0 } else { v })
}

/// Aggregates are shown with a space as thousands separator; zero and missing show `-`.
fn format_aggregate(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => {
            let mut buf = ryu_js::Buffer::new();
            group_thousands(js_number_to_string(v, &mut buf))
        }
        _ => MISSING.to_string(),
    }
}

fn group_thousands(number: &str) -> String {
    let (int_part, frac_part) = match number.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (number, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return number.to_string();
    }

    let mut out = String::with_capacity(number.len() + digits.len() / 3);
    out.push_str(sign);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Black text on light backgrounds, white otherwise (YIQ brightness threshold 128).
fn contrast_text_color(background: &str) -> Option<&'static str> {
    let color = match svgtypes::Color::from_str(background) {
        Ok(color) => color,
        Err(err) => {
            tracing::debug!(background, error = %err, "unparsable popup cell color");
            return None;
        }
    };
    let brightness = (u32::from(color.red) * 299
        + u32::from(color.green) * 587
        + u32::from(color.blue) * 114)
        / 1000;
    Some(if brightness >= 128 { "#000000" } else { "#FFFFFF" })
}

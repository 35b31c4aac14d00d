//! ARFF reader
//!
//! Supports the dense subset of the format: `@relation`, `@attribute` with
//! numeric/real/integer/string/date/nominal types, `@data` rows, `%` comments,
//! single or double quoting and `?` for missing values.

use super::table::{Attribute, AttributeKind, Table, Value};
use crate::error::{EvalError, Result};
use std::fs;
use std::path::Path;

/// Read an ARFF file from disk
pub fn read_arff(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| EvalError::io(format!("reading {}", path.display()), e))?;
    parse_arff(&path.display().to_string(), &content)
}

/// Parse ARFF text; `source_name` only labels diagnostics
pub fn parse_arff(source_name: &str, content: &str) -> Result<Table> {
    let err = |line: usize, message: String| EvalError::Parse {
        source_name: source_name.to_string(),
        line,
        message,
    };

    let mut relation = String::new();
    let mut attributes = Vec::new();
    let mut table: Option<Table> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }

        if let Some(table) = table.as_mut() {
            if line.starts_with('{') {
                return Err(err(line_no, "sparse rows are not supported".into()));
            }
            let fields = split_fields(line).map_err(|m| err(line_no, m))?;
            if fields.len() != table.attributes().len() {
                return Err(err(
                    line_no,
                    format!(
                        "expected {} values, found {}",
                        table.attributes().len(),
                        fields.len()
                    ),
                ));
            }
            let row = fields
                .into_iter()
                .zip(table.attributes())
                .map(|(field, attribute)| parse_value(field, attribute))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|m| err(line_no, m))?;
            table.push_row(row)?;
            continue;
        }

        let (keyword, rest) = split_keyword(line);
        match keyword.to_ascii_lowercase().as_str() {
            "@relation" => relation = unquote(rest.trim()),
            "@attribute" => {
                attributes.push(parse_attribute(rest).map_err(|m| err(line_no, m))?);
            }
            "@data" => {
                if attributes.is_empty() {
                    return Err(err(line_no, "@data before any @attribute".into()));
                }
                table = Some(Table::new(relation.clone(), std::mem::take(&mut attributes)));
            }
            other => return Err(err(line_no, format!("unexpected header line '{other}'"))),
        }
    }

    table.ok_or_else(|| err(content.lines().count(), "missing @data section".into()))
}

fn split_keyword(line: &str) -> (&str, &str) {
    match line.find(char::is_whitespace) {
        Some(pos) => (&line[..pos], &line[pos..]),
        None => (line, ""),
    }
}

fn parse_attribute(rest: &str) -> std::result::Result<Attribute, String> {
    let rest = rest.trim();
    let (name, type_spec) = match rest.chars().next() {
        Some(q @ ('\'' | '"')) => {
            let end = rest[1..]
                .find(q)
                .ok_or_else(|| format!("unterminated attribute name in '{rest}'"))?;
            (rest[1..=end].to_string(), rest[end + 2..].trim())
        }
        Some(_) => {
            let (name, tail) = split_keyword(rest);
            (name.to_string(), tail.trim())
        }
        None => return Err("attribute declaration without a name".into()),
    };

    let kind = if let Some(body) = type_spec.strip_prefix('{') {
        let body = body
            .strip_suffix('}')
            .ok_or_else(|| format!("unterminated nominal specification for {name}"))?;
        let labels = split_fields(body)?
            .into_iter()
            .map(|field| field.text)
            .collect();
        AttributeKind::Nominal(labels)
    } else {
        let (type_name, _) = split_keyword(type_spec);
        match type_name.to_ascii_lowercase().as_str() {
            "numeric" | "real" | "integer" => AttributeKind::Numeric,
            "string" => AttributeKind::String,
            "date" => AttributeKind::Date,
            "" => return Err(format!("attribute {name} has no type")),
            other => return Err(format!("unsupported attribute type '{other}' for {name}")),
        }
    };

    Ok(Attribute { name, kind })
}

#[derive(Debug, PartialEq)]
struct Field {
    text: String,
    quoted: bool,
}

/// Split a comma separated line, honouring quotes and backslash escapes
fn split_fields(line: &str) -> std::result::Result<Vec<Field>, String> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let field = match chars.peek() {
            Some(&q @ ('\'' | '"')) => {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some('\\') => {
                            if let Some(c) = chars.next() {
                                text.push(c);
                            }
                        }
                        Some(c) if c == q => break,
                        Some(c) => text.push(c),
                        None => return Err(format!("unterminated quote in '{line}'")),
                    }
                }
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
                Field { text, quoted: true }
            }
            _ => {
                let mut text = String::new();
                while let Some(&c) = chars.peek() {
                    if c == ',' {
                        break;
                    }
                    text.push(c);
                    chars.next();
                }
                Field {
                    text: text.trim().to_string(),
                    quoted: false,
                }
            }
        };
        fields.push(field);

        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(c) => return Err(format!("unexpected '{c}' after quoted value in '{line}'")),
        }
    }

    Ok(fields)
}

fn parse_value(field: Field, attribute: &Attribute) -> std::result::Result<Value, String> {
    if !field.quoted && field.text == "?" {
        return Ok(Value::Missing);
    }
    match &attribute.kind {
        AttributeKind::Numeric => field
            .text
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| format!("'{}' is not numeric ({})", field.text, attribute.name)),
        AttributeKind::Nominal(_) => attribute
            .label_index(&field.text)
            .map(Value::Nominal)
            .ok_or_else(|| format!("'{}' is not a label of {}", field.text, attribute.name)),
        AttributeKind::String | AttributeKind::Date => Ok(Value::Text(field.text)),
    }
}

fn unquote(s: &str) -> String {
    let trimmed = s.trim();
    for q in ['\'', '"'] {
        if let Some(inner) = trimmed.strip_prefix(q).and_then(|t| t.strip_suffix(q)) {
            return inner.to_string();
        }
    }
    trimmed.to_string()
}

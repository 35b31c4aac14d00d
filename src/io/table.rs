//! In-memory table with a typed attribute schema

use crate::error::{EvalError, Result};
use std::fmt;

/// Attribute type
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeKind {
    /// Real-valued attribute
    Numeric,
    /// Finite ordered set of labels
    Nominal(Vec<String>),
    /// Free text
    String,
    /// Date, kept as text
    Date,
}

impl AttributeKind {
    /// Type name as used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeKind::Numeric => "numeric",
            AttributeKind::Nominal(_) => "nominal",
            AttributeKind::String => "string",
            AttributeKind::Date => "date",
        }
    }
}

/// Named, typed column
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

impl Attribute {
    /// Numeric attribute
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    /// Nominal attribute with the given label order
    pub fn nominal<S: Into<String>>(name: impl Into<String>, labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal(labels.into_iter().map(Into::into).collect()),
        }
    }

    /// String attribute
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::String,
        }
    }

    /// Labels of a nominal attribute, empty otherwise
    pub fn labels(&self) -> &[String] {
        match &self.kind {
            AttributeKind::Nominal(labels) => labels,
            _ => &[],
        }
    }

    /// Index of `label` among the nominal labels
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels().iter().position(|l| l == label)
    }
}

/// Single cell
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Missing,
    Number(f64),
    /// Index into the attribute's label list
    Nominal(usize),
    Text(String),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric reading of the cell; nominal cells yield their label index
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Nominal(i) => Some(*i as f64),
            Value::Missing | Value::Text(_) => None,
        }
    }

    /// Textual reading of the cell, resolving nominal indexes against `attribute`
    pub fn as_label<'a>(&'a self, attribute: &'a Attribute) -> Option<&'a str> {
        match self {
            Value::Nominal(i) => attribute.labels().get(*i).map(String::as_str),
            Value::Text(s) => Some(s),
            Value::Missing | Value::Number(_) => None,
        }
    }

    /// Render the cell for diagnostics
    pub fn render(&self, attribute: &Attribute) -> String {
        match self {
            Value::Missing => "?".to_string(),
            Value::Number(v) => v.to_string(),
            Value::Nominal(i) => attribute
                .labels()
                .get(*i)
                .cloned()
                .unwrap_or_else(|| format!("#{i}")),
            Value::Text(s) => s.clone(),
        }
    }
}

/// Named table: attribute schema plus dense rows
#[derive(Clone, Debug)]
pub struct Table {
    name: String,
    attributes: Vec<Attribute>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given schema
    pub fn new(name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            name: name.into(),
            attributes,
            rows: Vec::new(),
        }
    }

    /// Append a row, checking arity and nominal bounds
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.attributes.len() {
            return Err(EvalError::Parse {
                source_name: self.name.clone(),
                line: self.rows.len() + 1,
                message: format!(
                    "row has {} values, schema has {} attributes",
                    row.len(),
                    self.attributes.len()
                ),
            });
        }
        for (value, attribute) in row.iter().zip(&self.attributes) {
            if let Value::Nominal(i) = value {
                if *i >= attribute.labels().len() {
                    return Err(EvalError::Parse {
                        source_name: self.name.clone(),
                        line: self.rows.len() + 1,
                        message: format!("label index {i} out of range for {}", attribute.name),
                    });
                }
            }
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Column index of the attribute called `name`
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    pub fn attribute(&self, index: usize) -> &Attribute {
        &self.attributes[index]
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn value(&self, row: usize, column: usize) -> &Value {
        &self.rows[row][column]
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} attributes, {} rows)",
            self.name,
            self.attributes.len(),
            self.rows.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_row_checks_arity() {
        let mut table = Table::new("t", vec![Attribute::numeric("x")]);
        assert!(table.push_row(vec![Value::Number(1.0)]).is_ok());
        assert!(table.push_row(vec![]).is_err());
        assert_eq!(table.num_rows(), 1);
    }

    #[test]
    fn test_push_row_checks_nominal_bounds() {
        let mut table = Table::new("t", vec![Attribute::nominal("c", ["a", "b"])]);
        assert!(table.push_row(vec![Value::Nominal(1)]).is_ok());
        assert!(table.push_row(vec![Value::Nominal(2)]).is_err());
    }

    #[test]
    fn test_value_readings() {
        let attr = Attribute::nominal("c", ["a", "b"]);
        assert_eq!(Value::Nominal(1).as_label(&attr), Some("b"));
        assert_eq!(Value::Nominal(1).as_f64(), Some(1.0));
        assert_eq!(Value::Text("x".into()).as_label(&attr), Some("x"));
        assert_eq!(Value::Missing.as_f64(), None);
        assert_eq!(Value::Missing.render(&attr), "?");
    }

    #[test]
    fn test_attribute_lookup() {
        let table = Table::new(
            "t",
            vec![Attribute::numeric("row_id"), Attribute::nominal("class", ["x"])],
        );
        assert_eq!(table.attribute_index("class"), Some(1));
        assert_eq!(table.attribute_index("fold"), None);
        assert_eq!(table.attribute(1).label_index("x"), Some(0));
    }
}

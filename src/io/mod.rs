//! Tabular input
//!
//! The evaluation core only sees [`Table`]s. ARFF is the one format shipped
//! with the crate, read from a local file or fetched over http(s).

mod arff;
mod location;
mod table;

pub use arff::{parse_arff, read_arff};
pub use location::{read_table, Location};
pub use table::{Attribute, AttributeKind, Table, Value};

//! Prediction table schema resolution and record extraction

use super::dataset::{Dataset, Task};
use super::parse_identifier;
use super::split_plan::SplitKey;
use crate::config::PredictionColumnNames;
use crate::error::{EvalError, Result};
use crate::io::{AttributeKind, Table, Value};

const TABLE: &str = "Predictions";

/// Column indexes of the predictions table, resolved once before the pass
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionColumns {
    pub row_id: usize,
    pub repeat: usize,
    pub fold: usize,
    pub prediction: usize,
    /// One column per class, in the dataset's class order; empty for regression
    pub confidences: Vec<usize>,
    task: Task,
}

/// Predicted outcome of one record
#[derive(Clone, Debug, PartialEq)]
pub enum Predicted {
    /// Dataset class index, `None` when the prediction cell is missing
    Class(Option<usize>),
    /// Predicted value, `None` when missing
    Value(Option<f64>),
}

/// One prediction, identified by its split key
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionRecord {
    /// Position in the predictions table
    pub record: usize,
    pub key: SplitKey,
    pub predicted: Predicted,
    /// Confidence per class in dataset class order; empty for regression
    pub confidences: Vec<f64>,
}

impl PredictionColumns {
    /// Resolve required columns, failing on the first one absent
    ///
    /// Order: row id, fold, repeat, prediction, then one confidence column
    /// per class label. Fold and repeat try each configured name in turn.
    pub fn resolve(
        predictions: &Table,
        dataset: &Dataset,
        names: &PredictionColumnNames,
    ) -> Result<Self> {
        let required = |name: &str| {
            predictions
                .attribute_index(name)
                .ok_or_else(|| EvalError::MissingColumn {
                    table: TABLE,
                    column: name.to_string(),
                })
        };
        let first_of = |candidates: &[String]| {
            candidates
                .iter()
                .find_map(|name| predictions.attribute_index(name))
                .ok_or_else(|| EvalError::MissingColumn {
                    table: TABLE,
                    column: candidates.first().cloned().unwrap_or_default(),
                })
        };

        let row_id = required(&names.row_id)?;
        let fold = first_of(&names.fold)?;
        let repeat = first_of(&names.repeat)?;
        let prediction = required(&names.prediction)?;

        let task = dataset.task();
        let prediction_attr = predictions.attribute(prediction);
        let prediction_ok = match task {
            Task::Classification => matches!(
                prediction_attr.kind,
                AttributeKind::Nominal(_) | AttributeKind::String
            ),
            Task::Regression => prediction_attr.kind == AttributeKind::Numeric,
        };
        if !prediction_ok {
            return Err(EvalError::ColumnType {
                table: TABLE,
                column: prediction_attr.name.clone(),
                expected: match task {
                    Task::Classification => "nominal or string",
                    Task::Regression => "numeric",
                },
                found: prediction_attr.kind.type_name().to_string(),
            });
        }

        let mut confidences = Vec::with_capacity(dataset.num_classes());
        for label in dataset.class_labels() {
            let column = names.confidence_column(label);
            let index = predictions
                .attribute_index(&column)
                .ok_or_else(|| EvalError::MissingConfidence {
                    label: label.clone(),
                    column: column.clone(),
                })?;
            let attribute = predictions.attribute(index);
            if attribute.kind != AttributeKind::Numeric {
                return Err(EvalError::ColumnType {
                    table: TABLE,
                    column,
                    expected: "numeric",
                    found: attribute.kind.type_name().to_string(),
                });
            }
            confidences.push(index);
        }

        Ok(Self {
            row_id,
            repeat,
            fold,
            prediction,
            confidences,
            task,
        })
    }

    /// Extract record `index` of `predictions`
    ///
    /// Identifiers must be non-negative integers and predicted labels must be
    /// classes of the dataset. Missing confidences read as 0.0. The row id is
    /// not bounds-checked here.
    pub fn record(&self, predictions: &Table, index: usize, dataset: &Dataset) -> Result<PredictionRecord> {
        let row = &predictions.rows()[index];
        let id = |col: usize| {
            let attribute = predictions.attribute(col);
            parse_identifier(&row[col], attribute.labels()).ok_or_else(|| {
                EvalError::InvalidIdentifier {
                    table: TABLE,
                    record: index,
                    column: attribute.name.clone(),
                    value: row[col].render(attribute),
                }
            })
        };
        let key = SplitKey::new(id(self.repeat)?, id(self.fold)?, id(self.row_id)?);

        let cell = &row[self.prediction];
        let predicted = match self.task {
            Task::Classification => {
                let attribute = predictions.attribute(self.prediction);
                match cell.as_label(attribute) {
                    Some(label) => {
                        let class = dataset
                            .class_labels()
                            .iter()
                            .position(|l| l == label)
                            .ok_or_else(|| EvalError::UnknownLabel {
                                record: index,
                                label: label.to_string(),
                            })?;
                        Predicted::Class(Some(class))
                    }
                    None => Predicted::Class(None),
                }
            }
            Task::Regression => Predicted::Value(cell.as_f64()),
        };

        let confidences = self
            .confidences
            .iter()
            .map(|&col| match &row[col] {
                Value::Number(v) => *v,
                _ => 0.0,
            })
            .collect();

        Ok(PredictionRecord {
            record: index,
            key,
            predicted,
            confidences,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Attribute;

    fn dataset() -> Dataset {
        let mut table = Table::new("d", vec![Attribute::nominal("class", ["A", "B"])]);
        table.push_row(vec![Value::Nominal(0)]).unwrap();
        table.push_row(vec![Value::Nominal(1)]).unwrap();
        Dataset::new(table, "class").unwrap()
    }

    fn predictions(attributes: Vec<Attribute>) -> Table {
        Table::new("p", attributes)
    }

    fn full_schema() -> Vec<Attribute> {
        vec![
            Attribute::numeric("repeat"),
            Attribute::numeric("fold"),
            Attribute::numeric("row_id"),
            Attribute::nominal("prediction", ["B", "A"]),
            Attribute::numeric("confidence.A"),
            Attribute::numeric("confidence.B"),
        ]
    }

    #[test]
    fn test_resolve_full_schema() {
        let table = predictions(full_schema());
        let columns =
            PredictionColumns::resolve(&table, &dataset(), &PredictionColumnNames::default())
                .unwrap();
        assert_eq!(columns.row_id, 2);
        assert_eq!(columns.repeat, 0);
        assert_eq!(columns.fold, 1);
        assert_eq!(columns.prediction, 3);
        assert_eq!(columns.confidences, vec![4, 5]);
    }

    #[test]
    fn test_resolve_prefers_primary_alias() {
        let mut schema = full_schema();
        schema.push(Attribute::numeric("repeat_nr"));
        schema.push(Attribute::numeric("fold_nr"));
        let table = predictions(schema);
        let columns =
            PredictionColumns::resolve(&table, &dataset(), &PredictionColumnNames::default())
                .unwrap();
        assert_eq!(columns.repeat, 0);
        assert_eq!(columns.fold, 1);
    }

    #[test]
    fn test_resolve_falls_back_to_legacy_names() {
        let mut schema = full_schema();
        schema[0].name = "repeat_nr".into();
        schema[1].name = "fold_nr".into();
        let table = predictions(schema);
        let columns =
            PredictionColumns::resolve(&table, &dataset(), &PredictionColumnNames::default())
                .unwrap();
        assert_eq!(columns.repeat, 0);
        assert_eq!(columns.fold, 1);
    }

    #[test]
    fn test_resolve_reports_first_missing_column() {
        let mut schema = full_schema();
        schema.retain(|a| a.name != "row_id" && a.name != "fold");
        let table = predictions(schema);
        let err = PredictionColumns::resolve(&table, &dataset(), &PredictionColumnNames::default())
            .unwrap_err();
        assert!(matches!(
            err,
            EvalError::MissingColumn { ref column, .. } if column == "row_id"
        ));

        let mut schema = full_schema();
        schema.retain(|a| a.name != "fold");
        let table = predictions(schema);
        let err = PredictionColumns::resolve(&table, &dataset(), &PredictionColumnNames::default())
            .unwrap_err();
        assert!(err.to_string().contains("lacks attribute fold"));
    }

    #[test]
    fn test_resolve_missing_confidence_names_label() {
        let mut schema = full_schema();
        schema.retain(|a| a.name != "confidence.B");
        let table = predictions(schema);
        let err = PredictionColumns::resolve(&table, &dataset(), &PredictionColumnNames::default())
            .unwrap_err();
        assert!(matches!(err, EvalError::MissingConfidence { ref label, .. } if label == "B"));
    }

    #[test]
    fn test_resolve_rejects_numeric_prediction_for_classification() {
        let mut schema = full_schema();
        schema[3] = Attribute::numeric("prediction");
        let table = predictions(schema);
        let err = PredictionColumns::resolve(&table, &dataset(), &PredictionColumnNames::default())
            .unwrap_err();
        assert!(matches!(err, EvalError::ColumnType { .. }));
    }

    #[test]
    fn test_record_maps_labels_by_name() {
        let mut table = predictions(full_schema());
        // "A" is index 1 in the predictions file but class 0 in the dataset
        table
            .push_row(vec![
                Value::Number(0.0),
                Value::Number(1.0),
                Value::Number(1.0),
                Value::Nominal(1),
                Value::Number(0.7),
                Value::Missing,
            ])
            .unwrap();
        let dataset = dataset();
        let columns =
            PredictionColumns::resolve(&table, &dataset, &PredictionColumnNames::default())
                .unwrap();
        let record = columns.record(&table, 0, &dataset).unwrap();
        assert_eq!(record.key, SplitKey::new(0, 1, 1));
        assert_eq!(record.predicted, Predicted::Class(Some(0)));
        assert_eq!(record.confidences, vec![0.7, 0.0]);
    }

    #[test]
    fn test_record_unknown_label() {
        let mut schema = full_schema();
        schema[3] = Attribute::string("prediction");
        let mut table = predictions(schema);
        table
            .push_row(vec![
                Value::Number(0.0),
                Value::Number(0.0),
                Value::Number(0.0),
                Value::Text("C".into()),
                Value::Number(0.5),
                Value::Number(0.5),
            ])
            .unwrap();
        let dataset = dataset();
        let columns =
            PredictionColumns::resolve(&table, &dataset, &PredictionColumnNames::default())
                .unwrap();
        let err = columns.record(&table, 0, &dataset).unwrap_err();
        assert!(matches!(err, EvalError::UnknownLabel { record: 0, .. }));
    }

    #[test]
    fn test_record_invalid_identifier() {
        let mut table = predictions(full_schema());
        table
            .push_row(vec![
                Value::Missing,
                Value::Number(0.0),
                Value::Number(0.0),
                Value::Nominal(0),
                Value::Number(0.5),
                Value::Number(0.5),
            ])
            .unwrap();
        let dataset = dataset();
        let columns =
            PredictionColumns::resolve(&table, &dataset, &PredictionColumnNames::default())
                .unwrap();
        let err = columns.record(&table, 0, &dataset).unwrap_err();
        assert!(matches!(
            err,
            EvalError::InvalidIdentifier { ref column, .. } if column == "repeat"
        ));
    }
}

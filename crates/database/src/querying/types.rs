use anyhow::Error;
use serde_json::{Map, Value};
use std::path::Path;

pub trait QueryingService: Send + Sync {
    fn execute_query(
        &self,
        database_path: &Path,
        query: &str,
        params: Map<String, Value>,
    ) -> Result<QueryRows, Error>;
}

/// Fully materialized result of an ad-hoc query.
#[derive(Debug, Clone)]
pub struct QueryRows {
    pub column_names: Vec<String>,
    pub rows: Vec<Vec<kuzu::Value>>,
}

impl QueryRows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as JSON objects keyed by column name.
    pub fn to_json(&self) -> Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let object = self
                    .column_names
                    .iter()
                    .zip(row)
                    .map(|(column, value)| (column.clone(), kuzu_value_to_json(value)))
                    .collect::<Map<_, _>>();
                Value::Object(object)
            })
            .collect();
        Value::Array(rows)
    }
}

fn kuzu_value_to_json(value: &kuzu::Value) -> Value {
    match value {
        kuzu::Value::Null(_) => Value::Null,
        kuzu::Value::Bool(b) => Value::Bool(*b),
        kuzu::Value::Int64(i) => Value::from(*i),
        kuzu::Value::Int32(i) => Value::from(*i),
        kuzu::Value::Double(d) => Value::from(*d),
        kuzu::Value::String(s) => Value::from(s.as_str()),
        kuzu::Value::List(_, items) => Value::Array(items.iter().map(kuzu_value_to_json).collect()),
        other => Value::from(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_to_json() {
        let rows = QueryRows {
            column_names: vec!["c.fullName".to_string(), "count".to_string()],
            rows: vec![vec![
                kuzu::Value::String("p.A".to_string()),
                kuzu::Value::Int64(3),
            ]],
        };

        assert_eq!(
            rows.to_json(),
            serde_json::json!([{ "c.fullName": "p.A", "count": 3 }])
        );
    }
}

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};

/// One row of tabular data: column name -> scalar value.
/// Key order is preserved, so the first record defines the column order.
pub type Record = Map<String, Value>;

/// The bundled demo dataset (same rows the UI offers as "use sample").
pub const SAMPLE_CSV: &str = "\
Date,Sales,Region,Category,Price
2024-01-01,120,North,A,9.99
2024-01-02,150,North,B,12.50
2024-01-03,170,South,A,8.75
2024-01-04,80,East,B,7.00
2024-01-05,200,West,A,11.30
2024-01-06,90,South,B,6.50
2024-01-07,220,East,A,13.00
2024-01-08,180,West,B,10.25
";

/// An immutable, ordered collection of records. A new prompt resolution
/// never mutates a dataset; switching datasets is a plain reassignment.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

/// Ordered column names plus a per-column numeric-like classification,
/// both taken from the dataset's first record.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    pub names: Vec<String>,
    pub numeric_like: Vec<bool>,
}

impl Dataset {
    /// Parse CSV text (first line = header) with dynamic typing: fields that
    /// look numeric become JSON numbers, empty fields become null.
    pub fn from_csv_str(text: &str, name: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| anyhow!("Failed to read CSV header: {}", e))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.is_empty() {
            return Err(anyhow!("CSV input has no header row"));
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| anyhow!("Failed to read CSV row: {}", e))?;
            let mut record = Record::new();
            for (header, field) in headers.iter().zip(row.iter()) {
                record.insert(header.clone(), type_field(field));
            }
            records.push(record);
        }

        Ok(Dataset {
            name: name.to_string(),
            headers,
            records,
        })
    }

    /// Build a dataset from a JSON array of record objects (the shape the
    /// suggest endpoint receives). Headers come from the first record.
    pub fn from_rows(name: &str, records: Vec<Record>) -> Self {
        let headers = records
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default();
        Dataset {
            name: name.to_string(),
            headers,
            records,
        }
    }

    pub fn sample() -> Result<Self> {
        Dataset::from_csv_str(SAMPLE_CSV, "sample")
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_set(&self) -> ColumnSet {
        let numeric_like = match self.records.first() {
            Some(first) => self
                .headers
                .iter()
                .map(|h| first.get(h).map(is_numeric_like).unwrap_or(false))
                .collect(),
            None => vec![false; self.headers.len()],
        };
        ColumnSet {
            names: self.headers.clone(),
            numeric_like,
        }
    }
}

/// Numeric-like follows the original's loose number coercion: numbers,
/// booleans, nulls and empty strings all coerce cleanly, everything else
/// must parse as a float.
pub fn is_numeric_like(value: &Value) -> bool {
    match value {
        Value::Number(_) | Value::Bool(_) | Value::Null => true,
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.is_empty() || trimmed.parse::<f64>().is_ok()
        }
        _ => false,
    }
}

/// Extract a numeric value, coercing anything non-numeric to 0.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Render a scalar as an axis label.
pub fn value_to_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn type_field(field: &str) -> Value {
    if field.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = field.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = field.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(field.to_string())
}

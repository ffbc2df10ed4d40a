//! FILENAME: table/src/dataset.rs
//! PURPOSE: Column-oriented dataset with a fixed schema.
//! CONTEXT: A `Dataset` is built once (usually by the persistence crate) and
//! never mutated afterwards. Filtering produces a new dataset that shares the
//! schema but owns only the surviving rows.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::TableError;
use crate::value::{StorageType, Value};

/// A named column of values with a single storage type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub storage: StorageType,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, storage: StorageType, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            storage,
            values,
        }
    }

    pub fn integers<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<i64>>,
    {
        Column::new(
            name,
            StorageType::Integer,
            values.into_iter().map(Value::from).collect(),
        )
    }

    pub fn floats<I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Column::new(
            name,
            StorageType::Float,
            values.into_iter().map(Value::from).collect(),
        )
    }

    pub fn texts<'a, I>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        Column::new(
            name,
            StorageType::Text,
            values.into_iter().map(Value::from).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the values that are not missing.
    pub fn present_values(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_missing())
    }
}

/// An immutable table of rows stored column by column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    row_count: usize,
}

impl Dataset {
    /// Builds a dataset. All columns must have the same length and distinct names.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut index = HashMap::with_capacity(columns.len());

        for (i, column) in columns.iter().enumerate() {
            if column.len() != row_count {
                return Err(TableError::RaggedColumn {
                    name: column.name.clone(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
            if index.insert(column.name.clone(), i).is_some() {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Dataset {
            columns,
            index,
            row_count,
        })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the value at `row` in column `name`, if both exist.
    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        self.column(name).and_then(|c| c.values.get(row))
    }

    /// Keeps the rows whose mask entry is `true`, in their original order.
    pub fn filter(&self, mask: &[bool]) -> Result<Dataset, TableError> {
        if mask.len() != self.row_count {
            return Err(TableError::MaskLength {
                expected: self.row_count,
                actual: mask.len(),
            });
        }

        let columns = self
            .columns
            .iter()
            .map(|column| Column {
                name: column.name.clone(),
                storage: column.storage,
                values: column
                    .values
                    .iter()
                    .zip(mask)
                    .filter(|&(_, &keep)| keep)
                    .map(|(v, _)| v.clone())
                    .collect(),
            })
            .collect();

        Ok(Dataset {
            columns,
            index: self.index.clone(),
            row_count: mask.iter().filter(|&&keep| keep).count(),
        })
    }
}

//! FILENAME: persistence/src/csv_reader.rs
//! PURPOSE: Reads a delimited text file into an immutable `Dataset`.
//! CONTEXT: Column types are inferred by the arrow CSV reader. Integer and
//! float columns keep numeric storage; booleans stay booleans; every other
//! type (dates, strings) is stored as text in arrow's display form. A column
//! with rows but no values at all is stored as a float column.

use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use table::{Column, Dataset, StorageType, Value};

use crate::error::PersistenceError;

/// How a delimited file is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    pub delimiter: u8,

    /// Lower-case every column name after reading the header.
    pub lowercase_headers: bool,

    /// Rows sampled for type inference. `None` reads the whole file.
    pub infer_rows: Option<usize>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            lowercase_headers: true,
            infer_rows: None,
        }
    }
}

/// Loads a dataset from a file on disk.
pub fn load_csv(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Dataset, PersistenceError> {
    let path = path.as_ref();
    let dataset = read_csv(File::open(path)?, options)?;
    info!(
        "loaded {} rows x {} columns from {:?}",
        dataset.row_count(),
        dataset.column_count(),
        path
    );
    Ok(dataset)
}

/// Reads a dataset from any byte source. The first line is the header.
pub fn read_csv<R: Read>(mut reader: R, options: &CsvOptions) -> Result<Dataset, PersistenceError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let format = Format::default()
        .with_header(true)
        .with_delimiter(options.delimiter);
    let (schema, sampled) = format.infer_schema(Cursor::new(&bytes), options.infer_rows)?;
    if schema.fields().is_empty() {
        return Err(PersistenceError::Empty);
    }
    debug!("inferred {} columns from {} rows", schema.fields().len(), sampled);

    let schema = Arc::new(schema);
    let batches = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_delimiter(options.delimiter)
        .build(Cursor::new(&bytes))?
        .collect::<Result<Vec<RecordBatch>, ArrowError>>()?;

    let row_count: usize = batches.iter().map(RecordBatch::num_rows).sum();
    let mut columns = Vec::with_capacity(schema.fields().len());
    for (i, field) in schema.fields().iter().enumerate() {
        let all_null = row_count > 0
            && batches.iter().all(|b| b.column(i).null_count() == b.num_rows());
        let storage = if all_null && *field.data_type() == DataType::Utf8 {
            // Inference falls back to Utf8 when it never saw a value.
            StorageType::Float
        } else {
            storage_type(field.data_type())
        };
        let mut values = Vec::new();
        for batch in &batches {
            append_values(batch.column(i), storage, &mut values)?;
        }

        let name = if options.lowercase_headers {
            field.name().to_lowercase()
        } else {
            field.name().clone()
        };
        columns.push(Column::new(name, storage, values));
    }

    Ok(Dataset::new(columns)?)
}

fn storage_type(data_type: &DataType) -> StorageType {
    if data_type.is_integer() {
        StorageType::Integer
    } else if data_type.is_floating() {
        StorageType::Float
    } else if *data_type == DataType::Boolean {
        StorageType::Boolean
    } else {
        StorageType::Text
    }
}

/// Converts one arrow array into values, nulls becoming `Value::Empty`.
fn append_values(
    array: &ArrayRef,
    storage: StorageType,
    out: &mut Vec<Value>,
) -> Result<(), ArrowError> {
    match storage {
        StorageType::Integer => {
            let ints = cast(array, &DataType::Int64)?;
            out.extend(ints.as_primitive::<Int64Type>().iter().map(Value::from));
        }
        StorageType::Float => {
            let floats = cast(array, &DataType::Float64)?;
            out.extend(floats.as_primitive::<Float64Type>().iter().map(Value::from));
        }
        StorageType::Boolean => {
            out.extend(array.as_boolean().iter().map(Value::from));
        }
        StorageType::Text => {
            let format_options = FormatOptions::default();
            let formatter = ArrayFormatter::try_new(array.as_ref(), &format_options)?;
            for row in 0..array.len() {
                if array.is_null(row) {
                    out.push(Value::Empty);
                } else {
                    out.push(Value::Text(formatter.value(row).to_string()));
                }
            }
        }
    }
    Ok(())
}

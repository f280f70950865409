//! CSV loading of applicant records for batch prediction
//!
//! Headers are the form labels ("Age", "Income in Lakhs", ...). Columns that
//! are absent from the file, and empty cells, load as missing fields. A
//! numeric cell that is present but not a non-negative whole number fails its
//! row; it is never rounded or dropped.

use polars::prelude::*;
use std::path::Path;

use crate::error::CellError;
use crate::models::{CategoricalField, InputRecord};

/// Parsed numeric column: `None` for empty cells, `Err` for malformed ones
type IntegerColumn = Vec<Option<Result<u32, CellError>>>;

/// Applicant rows loaded from a CSV file
pub struct RecordBatch {
    rows: Vec<Result<InputRecord, CellError>>,
}

impl RecordBatch {
    /// Load rows from a CSV file
    pub fn load<P: AsRef<Path>>(csv_path: P) -> Result<Self, PolarsError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(csv_path.as_ref().to_path_buf()))?
            .finish()?;

        let rows = Self::dataframe_to_rows(&df)?;
        Ok(Self { rows })
    }

    /// Rows in file order; a row with a malformed numeric cell is an error
    pub fn rows(&self) -> &[Result<InputRecord, CellError>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Result<InputRecord, CellError>> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert DataFrame rows to records
    fn dataframe_to_rows(
        df: &DataFrame,
    ) -> Result<Vec<Result<InputRecord, CellError>>, PolarsError> {
        let age = Self::integer_column(df, "Age")?;
        let dependants = Self::integer_column(df, "Number of Dependants")?;
        let income = Self::integer_column(df, "Income in Lakhs")?;
        let genetical_risk = Self::integer_column(df, "Genetical Risk")?;

        let mut categorical = Vec::with_capacity(CategoricalField::ALL.len());
        for field in CategoricalField::ALL {
            categorical.push((field, Self::text_column(df, field.label())?));
        }

        let row = |i: usize| -> Result<InputRecord, CellError> {
            let mut record = InputRecord {
                age: Self::cell(&age, i).transpose()?,
                number_of_dependants: Self::cell(&dependants, i).transpose()?,
                income_lakhs: Self::cell(&income, i).transpose()?,
                genetical_risk: Self::cell(&genetical_risk, i).transpose()?,
                ..Default::default()
            };
            for (field, values) in &categorical {
                record.set_categorical(*field, Self::cell(values, i));
            }
            Ok(record)
        };

        Ok((0..df.height()).map(row).collect())
    }

    fn cell<T: Clone>(column: &Option<Vec<Option<T>>>, row: usize) -> Option<T> {
        column.as_ref()?.get(row)?.clone()
    }

    /// Non-negative whole-number column
    fn integer_column(
        df: &DataFrame,
        name: &'static str,
    ) -> Result<Option<IntegerColumn>, PolarsError> {
        let Ok(series) = df.column(name) else {
            return Ok(None);
        };
        let text = series.cast(&DataType::String)?;
        let numbers = series.cast(&DataType::Float64)?;

        let values = text
            .str()?
            .into_iter()
            .zip(numbers.f64()?.into_iter())
            .map(|(raw, number)| {
                let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;
                Some(Self::whole_number(name, raw, number))
            })
            .collect();
        Ok(Some(values))
    }

    fn whole_number(field: &'static str, raw: &str, number: Option<f64>) -> Result<u32, CellError> {
        match number {
            Some(x) if x >= 0.0 && x.fract() == 0.0 && x <= u32::MAX as f64 => Ok(x as u32),
            _ => Err(CellError {
                field,
                value: raw.to_string(),
            }),
        }
    }

    fn text_column(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<String>>>, PolarsError> {
        let Ok(series) = df.column(name) else {
            return Ok(None);
        };
        let series = series.cast(&DataType::String)?;
        let values = series
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()))
            .collect();
        Ok(Some(values))
    }
}

//! CSV persistence for the training dataset

use crate::error::{PredictorError, Result};
use crate::models::DatasetRow;
use std::path::Path;
use tracing::info;

/// Write dataset rows to a CSV file, overwriting any existing file
pub fn write_csv(path: impl AsRef<Path>, rows: &[DatasetRow]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "Dataset written");
    Ok(())
}

/// Read dataset rows from a CSV file; empty files are an error
pub fn read_csv(path: impl AsRef<Path>) -> Result<Vec<DatasetRow>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<DatasetRow>, csv::Error>>()?;

    if rows.is_empty() {
        return Err(PredictorError::EmptyDataset);
    }

    info!(path = %path.display(), rows = rows.len(), "Dataset loaded");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetGenerator;

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");

        let rows = DatasetGenerator::new(42).generate(25);
        write_csv(&path, &rows).unwrap();
        let loaded = read_csv(&path).unwrap();

        assert_eq!(loaded.len(), rows.len());
        assert_eq!(loaded[0].project_id, rows[0].project_id);
        assert_eq!(loaded[10].delay_days, rows[10].delay_days);
        assert_eq!(loaded[10].features(), rows[10].features());
    }

    #[test]
    fn test_empty_csv_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv(&path, &[]).unwrap();

        assert!(matches!(read_csv(&path), Err(PredictorError::EmptyDataset)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(read_csv("/nonexistent/dataset.csv").is_err());
    }
}

use std::path::PathBuf;
use thiserror::Error;

/// Failures while turning a city's CSV file into a [`Dataset`](crate::dataset::Dataset).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("No data file registered for city '{0}'")]
    UnregisteredCity(String),

    #[error("Data for '{city}' not found at {}: {source}", .path.display())]
    DataNotFound {
        city: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Malformed record at row {row}: column '{column}' has value '{value}'")]
    MalformedRecord {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LoadError {
    /// True for the errors that mean the city has no usable backing file.
    pub fn is_data_not_found(&self) -> bool {
        matches!(
            self,
            LoadError::UnregisteredCity(_) | LoadError::DataNotFound { .. }
        )
    }
}

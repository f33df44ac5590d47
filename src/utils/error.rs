use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog unavailable from {location}: {reason}")]
    CatalogUnavailable { location: String, reason: String },

    #[error("Failed to persist '{key}': {reason}")]
    PersistenceError { key: String, reason: String },

    #[error("Unknown module reference: {technology}/{identifier}")]
    UnknownModuleReference {
        technology: String,
        identifier: String,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Catalog,
    Persistence,
    Reference,
    Io,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CatalogError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CatalogError::CatalogUnavailable { .. } | CatalogError::ApiError(_) => {
                ErrorCategory::Catalog
            }
            CatalogError::PersistenceError { .. } => ErrorCategory::Persistence,
            CatalogError::UnknownModuleReference { .. } => ErrorCategory::Reference,
            CatalogError::IoError(_) => ErrorCategory::Io,
            CatalogError::CsvError(_) | CatalogError::SerializationError(_) => {
                ErrorCategory::Data
            }
            CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    /// Everything the session can recover from is Low or Medium; only bad
    /// configuration stops the CLI.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Reference => ErrorSeverity::Low,
            ErrorCategory::Catalog | ErrorCategory::Persistence => ErrorSeverity::Medium,
            ErrorCategory::Io | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.severity() <= ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CatalogError::CatalogUnavailable { location, .. } => format!(
                "Check that {} is reachable and contains a valid catalog document; the cart is still usable",
                location
            ),
            CatalogError::PersistenceError { .. } => {
                "Free some space in the data directory; your selection is kept for this session".to_string()
            }
            CatalogError::UnknownModuleReference { .. } => {
                "Run the `modules` command to see the identifiers in the current catalog".to_string()
            }
            CatalogError::ApiError(_) => "Check the network connection and the catalog URL".to_string(),
            CatalogError::IoError(_) => "Check file permissions and that the path exists".to_string(),
            CatalogError::CsvError(_) | CatalogError::SerializationError(_) => {
                "The data is malformed; regenerate it or remove the offending file".to_string()
            }
            CatalogError::ConfigError { .. }
            | CatalogError::ConfigValidationError { .. }
            | CatalogError::InvalidConfigValueError { .. }
            | CatalogError::MissingConfigError { .. } => {
                "Fix the configuration file or command-line arguments and try again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CatalogError::CatalogUnavailable { .. } => {
                "The module catalog could not be loaded. Your saved selection is still available.".to_string()
            }
            CatalogError::PersistenceError { .. } => {
                "Your selection could not be saved. Changes are kept until you exit.".to_string()
            }
            CatalogError::UnknownModuleReference { identifier, .. } => {
                format!("There is no module called '{}' in the catalog.", identifier)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

use crate::utils::error::{CatalogError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CatalogError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// A catalog location is either an http(s) URL or a local path.
pub fn validate_catalog_location(field_name: &str, location: &str) -> Result<()> {
    if is_remote_location(location) {
        validate_url(field_name, location)
    } else {
        validate_path(field_name, location)
    }
}

pub fn is_remote_location(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Namespaces end up in file names, so keep them to a safe alphabet.
pub fn validate_namespace(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(CatalogError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Character '{}' is not allowed in a namespace", bad),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("catalog.source", "https://example.com/modules.json").is_ok());
        assert!(validate_url("catalog.source", "http://example.com").is_ok());
        assert!(validate_url("catalog.source", "").is_err());
        assert!(validate_url("catalog.source", "invalid-url").is_err());
        assert!(validate_url("catalog.source", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_catalog_location() {
        assert!(validate_catalog_location("catalog.source", "./data/modules.json").is_ok());
        assert!(validate_catalog_location("catalog.source", "https://example.com/m.json").is_ok());
        assert!(validate_catalog_location("catalog.source", "https://").is_err());
        assert!(validate_catalog_location("catalog.source", "").is_err());
    }

    #[test]
    fn test_validate_namespace() {
        assert!(validate_namespace("storage.namespace", "learning-catalog").is_ok());
        assert!(validate_namespace("storage.namespace", "my.app_1").is_ok());
        assert!(validate_namespace("storage.namespace", "   ").is_err());
        assert!(validate_namespace("storage.namespace", "../escape").is_err());
    }
}

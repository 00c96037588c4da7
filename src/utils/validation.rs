use crate::utils::error::{FxError, Result};
use chrono::NaiveDate;
use url::Url;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(FxError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(FxError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(FxError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(FxError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(FxError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(FxError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// 貨幣代碼必須是三個大寫 ASCII 字母 (ISO 4217 形式)
pub fn validate_currency_code(field_name: &str, code: &str) -> Result<()> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(FxError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: code.to_string(),
            reason: "Currency code must be three uppercase letters, e.g. EUR".to_string(),
        });
    }
    Ok(())
}

/// Rejects an absent query parameter as invalid input.
pub fn require_param<'a>(field_name: &str, value: Option<&'a str>) -> Result<&'a str> {
    value.ok_or_else(|| FxError::InvalidInput {
        field: field_name.to_string(),
        value: String::new(),
        reason: format!("Missing required parameter: {}", field_name),
    })
}

/// Parses a caller-supplied `YYYY-MM-DD` date.
pub fn parse_iso_date(field_name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| FxError::InvalidInput {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: format!("Invalid date format. Use YYYY-MM-DD: {}", e),
    })
}

pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(FxError::InvalidInput {
            field: "start".to_string(),
            value: format!("{}..{}", start, end),
            reason: "Start date must be before or equal to end date".to_string(),
        });
    }
    Ok(())
}

use crate::utils::error::{ClientError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ClientError::validation(field_name, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ClientError::validation(
                field_name,
                format!("Unsupported URL scheme `{}` in {}", scheme, url_str),
            )),
        },
        Err(e) => Err(ClientError::validation(
            field_name,
            format!("Invalid URL format `{}`: {}", url_str, e),
        )),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::validation(
            field_name,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_length(field_name: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ClientError::validation(
            field_name,
            format!("Length must be between {} and {}, got {}", min, max, len),
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ClientError::validation(
            field_name,
            format!("Value {} must be between {} and {}", value, min, max),
        ));
    }
    Ok(())
}

pub fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ClientError::validation(
            field_name,
            format!(
                "AWS region `{}` can only contain lowercase letters, numbers, and hyphens",
                region
            ),
        ));
    }

    Ok(())
}

pub fn validate_arn(field_name: &str, arn: &str) -> Result<()> {
    validate_length(field_name, arn, 1, 2048)?;
    if !arn.starts_with("arn:") {
        return Err(ClientError::validation(
            field_name,
            format!("`{}` is not an ARN", arn),
        ));
    }
    Ok(())
}

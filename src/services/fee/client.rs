use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::models::settings::FeeSettings;

use super::{FeeLookup, FeeLookupError, FeeRequest, FeeResponse};

/// Posts the zip and delivery date as a form to the fee endpoint.
pub struct HttpFeeLookup {
    client: Client,
    url: String,
    data: BTreeMap<String, String>,
}

impl HttpFeeLookup {
    pub fn new(url: &str, data: BTreeMap<String, String>, timeout: Duration) -> Result<Self> {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(anyhow!("Fee URL must use HTTP(S): {}", url));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build fee lookup HTTP client")?;

        Ok(Self {
            client,
            url: url.to_string(),
            data,
        })
    }

    pub fn from_settings(settings: &FeeSettings) -> Result<Self> {
        let url = settings
            .url
            .as_deref()
            .ok_or_else(|| anyhow!("No fee lookup URL configured"))?;
        Self::new(
            url,
            settings.data.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    fn form(&self, request: &FeeRequest) -> BTreeMap<String, String> {
        let mut form = self.data.clone();
        form.insert("zip".to_string(), request.zip.clone());
        if let Some(date) = &request.delivery_date {
            form.insert("delivery_date".to_string(), date.clone());
        }
        form
    }
}

impl FeeLookup for HttpFeeLookup {
    fn lookup(&self, request: &FeeRequest) -> Result<FeeResponse, FeeLookupError> {
        let response = self.client.post(&self.url).form(&self.form(request)).send()?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FeeLookupError::Status(status.as_u16()));
        }

        let body = response.text()?;
        parse_response(&body)
    }
}

/// Parses a fee endpoint body; `success: false` is an error.
pub fn parse_response(body: &str) -> Result<FeeResponse, FeeLookupError> {
    let response: FeeResponse = serde_json::from_str(body)?;
    if !response.success {
        return Err(FeeLookupError::Unsuccessful);
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let response = parse_response(
            r#"{"success":true,"delivery":true,"fee":9.95,"zone_disabled":false,
                "box":true,"same_day_available":true,"cutoff_timestamp":1709672400000}"#,
        )
        .unwrap();

        assert!(response.is_box);
        assert_eq!(response.fee, Some(9.95));
        assert_eq!(response.cutoff_timestamp, Some(1_709_672_400_000));
    }

    #[test]
    fn test_parse_tolerates_missing_fields() {
        let response = parse_response(r#"{"success":true,"delivery":false}"#).unwrap();
        assert!(!response.same_day_available);
        assert_eq!(response.fee, None);
        assert_eq!(response.cutoff(), None);
    }

    #[test]
    fn test_parse_rejects_failure_and_garbage() {
        assert!(matches!(
            parse_response(r#"{"success":false}"#),
            Err(FeeLookupError::Unsuccessful)
        ));
        assert!(matches!(parse_response("<html>"), Err(FeeLookupError::Body(_))));
    }

    #[test]
    fn test_form_carries_extra_data() {
        let mut data = BTreeMap::new();
        data.insert("product_id".to_string(), "42".to_string());
        let lookup = HttpFeeLookup::new("https://shop.test/fee", data, Duration::from_secs(1)).unwrap();

        let form = lookup.form(&FeeRequest {
            zip: "90210".to_string(),
            delivery_date: Some("03/05/2024".to_string()),
        });
        assert_eq!(form.get("product_id").map(String::as_str), Some("42"));
        assert_eq!(form.get("zip").map(String::as_str), Some("90210"));
        assert_eq!(form.get("delivery_date").map(String::as_str), Some("03/05/2024"));
    }

    #[test]
    fn test_requires_url() {
        assert!(HttpFeeLookup::from_settings(&FeeSettings::default()).is_err());
        assert!(HttpFeeLookup::new("ftp://shop.test", BTreeMap::new(), Duration::from_secs(1)).is_err());
    }
}

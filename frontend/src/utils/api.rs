use gloo_net::http::{Request, Response};

use crate::error::{Result, SiteError};

/// Thin client for the third-party form service.
pub struct Api;

/// Request wrapper that keeps the encoded body around for logging and maps
/// non-ok statuses into errors.
pub struct RequestWrapper {
    request: Request,
    url: String,
    body_data: Option<String>,
}

impl RequestWrapper {
    fn new(url: &str) -> Self {
        Self {
            request: Request::post(url),
            url: url.to_string(),
            body_data: None,
        }
    }

    /// Add a header to the request
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.request = self.request.header(name, value);
        self
    }

    /// Set the body as `application/x-www-form-urlencoded` pairs
    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        let body_string = encode_form(fields);
        self.request = self
            .request
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body_string.clone());
        self.body_data = Some(body_string);
        self
    }

    /// Send the request. Any non-2xx answer comes back as `SiteError::Status`.
    pub async fn send(self) -> Result<Response> {
        gloo_console::log!(
            "POST",
            &self.url,
            self.body_data.as_ref().map(|b| b.len()).unwrap_or(0),
            "bytes"
        );
        let response = self.request.send().await?;
        if response.ok() {
            Ok(response)
        } else {
            Err(SiteError::Status(response.status()))
        }
    }
}

impl Api {
    /// Create a POST request that asks the service for a JSON answer
    pub fn post(url: &str) -> RequestWrapper {
        RequestWrapper::new(url).header("Accept", "application/json")
    }
}

pub fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

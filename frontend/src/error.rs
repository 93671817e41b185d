use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("DOM error: {0}")]
    Dom(String),

    #[error("Request failed: {0}")]
    Network(String),

    #[error("Form endpoint returned status {0}")]
    Status(u16),

    #[error("Invalid property configuration: {0}")]
    Config(String),
}

impl From<gloo_net::Error> for SiteError {
    fn from(err: gloo_net::Error) -> Self {
        SiteError::Network(err.to_string())
    }
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        SiteError::Dom(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        SiteError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;

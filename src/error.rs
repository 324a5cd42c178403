use thiserror::Error;

pub type Result<T> = std::result::Result<T, DndError>;

#[derive(Debug, Error)]
pub enum DndError {
    #[error("Invalid drag-and-drop configuration: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Host error: {0}")]
    HostError(String),
}

#[cfg(feature = "web")]
impl From<wasm_bindgen::JsValue> for DndError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::HostError(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

#[cfg(feature = "web")]
impl From<DndError> for wasm_bindgen::JsValue {
    fn from(err: DndError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

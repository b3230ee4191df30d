//! QR label generation
//!
//! Labels encode the creation transaction hash, the batch id and the
//! manufacturer address as a JSON payload, rendered to a PNG data URI that is
//! stored alongside the metadata row. Decoding camera frames happens in the
//! scanning client; this side only produces labels and parses the JSON string
//! a scanner yields.

use base64::Engine as _;
use image::DynamicImage;
use qrcode::QrCode;
use serde::{Deserialize, Serialize};

use crate::models::chain::ScanPayload;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub transaction_hash: String,
    pub batch_id: String,
    pub manufacturer: String,
}

/// Error types for label generation
#[derive(Debug)]
pub enum QrError {
    Encode(String),
    Render(String),
}

impl std::fmt::Display for QrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QrError::Encode(msg) => write!(f, "QR encode error: {}", msg),
            QrError::Render(msg) => write!(f, "QR render error: {}", msg),
        }
    }
}

impl std::error::Error for QrError {}

/// Render the payload as a `data:image/png;base64,…` URI.
pub fn encode_label(payload: &QrPayload) -> Result<String, QrError> {
    let json = serde_json::to_string(payload)
        .map_err(|e| QrError::Encode(format!("payload serialization failed: {}", e)))?;

    let code = QrCode::new(json.as_bytes())
        .map_err(|e| QrError::Encode(format!("payload does not fit a QR code: {}", e)))?;

    let luma = code
        .render::<image::Luma<u8>>()
        .min_dimensions(256, 256)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(luma)
        .write_to(
            &mut std::io::Cursor::new(&mut png),
            image::ImageFormat::Png,
        )
        .map_err(|e| QrError::Render(format!("PNG encoding failed: {}", e)))?;

    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}

/// Parse the string a QR scanner yields back into a scan payload.
pub fn parse_scan(data: &str) -> Result<ScanPayload, QrError> {
    serde_json::from_str(data)
        .map_err(|e| QrError::Encode(format!("invalid scan payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    fn payload() -> QrPayload {
        QrPayload {
            transaction_hash: "0xabc123".to_string(),
            batch_id: "BATCH-2025-001".to_string(),
            manufacturer: "0xAAA".to_string(),
        }
    }

    #[test]
    fn label_is_a_png_data_uri() {
        let uri = encode_label(&payload()).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));

        let body = uri.trim_start_matches("data:image/png;base64,");
        let bytes = base64::engine::general_purpose::STANDARD.decode(body).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn scan_payload_round_trips_through_json() {
        let json = serde_json::to_string(&payload()).unwrap();
        let scan = parse_scan(&json).unwrap();
        assert_eq!(scan.transaction_hash.as_deref(), Some("0xabc123"));
        assert_eq!(scan.batch_id.as_deref(), Some("BATCH-2025-001"));
        assert_eq!(scan.id, None);
    }

    #[test]
    fn unknown_scan_fields_are_tolerated() {
        let scan = parse_scan(r#"{"transactionHash":"0xabc","vendor":"x"}"#).unwrap();
        assert_eq!(scan.transaction_hash.as_deref(), Some("0xabc"));
    }

    #[test]
    fn malformed_scan_is_an_error() {
        assert!(parse_scan("not json").is_err());
    }
}

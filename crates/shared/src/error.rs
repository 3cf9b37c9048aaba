use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: String,
}

impl ApiError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<ApiError>(body) {
            Ok(parsed) => parsed,
            Err(_) => Self::new(body.trim()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_detail_field_or_falls_back_to_raw_text() {
        let parsed = ApiError::from_body(r#"{"detail":"Session expired"}"#);
        assert_eq!(parsed.detail, "Session expired");

        let raw = ApiError::from_body("  bad gateway \n");
        assert_eq!(raw.detail, "bad gateway");
    }
}

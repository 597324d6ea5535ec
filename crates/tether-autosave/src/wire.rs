//! JSON shapes of the save endpoint
//!
//! Request: `POST /tasks/{taskId}/save` with
//! `{ "draftData": {...}, "businessId": "..." }` (`businessId` omitted when
//! absent).
//!
//! Response: `{ "success": true, "data": { "savedAt": "<ISO-8601>" } }`.
//! Anything else counts as a failed save.

use crate::draft::Draft;
use crate::store::SaveReceipt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tether_core::SaveError;

/// Request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDraftBody<'a> {
    /// Merged draft
    pub draft_data: &'a Draft,
    /// Owning business
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_id: Option<&'a str>,
}

/// Response envelope
#[derive(Debug, Deserialize)]
pub struct SaveDraftResponse {
    /// Server-side success flag
    pub success: bool,
    /// Payload on success
    #[serde(default)]
    pub data: Option<SavedData>,
}

/// Response payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedData {
    /// Server timestamp of the save
    pub saved_at: DateTime<Utc>,
}

impl SaveDraftResponse {
    /// Parse a raw response body
    ///
    /// # Errors
    /// `SaveError::Rejected` when the body is not the expected envelope, the
    /// flag is false, or the payload is missing
    pub fn parse(body: &str) -> Result<SaveReceipt, SaveError> {
        let response: Self = serde_json::from_str(body)
            .map_err(|e| SaveError::Rejected(format!("unexpected response shape: {e}")))?;
        response.into_receipt()
    }

    /// Convert into a receipt
    ///
    /// # Errors
    /// `SaveError::Rejected` unless `success` is true and `data` is present
    pub fn into_receipt(self) -> Result<SaveReceipt, SaveError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(SaveReceipt {
                saved_at: data.saved_at,
            }),
            (true, None) => Err(SaveError::Rejected("response has no data".into())),
            (false, _) => Err(SaveError::Rejected("server reported success=false".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_uses_camel_case_and_omits_missing_business() {
        let draft = Draft::new().with("title", "x");
        let body = SaveDraftBody {
            draft_data: &draft,
            business_id: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "draftData": { "title": "x" } })
        );

        let body = SaveDraftBody {
            draft_data: &draft,
            business_id: Some("biz-9"),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "draftData": { "title": "x" }, "businessId": "biz-9" })
        );
    }

    #[test]
    fn success_envelope_yields_receipt() {
        let body = r#"{"success":true,"data":{"savedAt":"2024-05-01T12:30:00Z"}}"#;
        let receipt = SaveDraftResponse::parse(body).unwrap();
        assert_eq!(receipt.saved_at.to_rfc3339(), "2024-05-01T12:30:00+00:00");
    }

    #[test]
    fn other_shapes_are_failures() {
        for body in [
            r#"{"success":false}"#,
            r#"{"success":true}"#,
            r#"{"ok":true}"#,
            r#"{"success":true,"data":{"savedAt":"yesterday"}}"#,
            "not json",
        ] {
            assert!(
                matches!(SaveDraftResponse::parse(body), Err(SaveError::Rejected(_))),
                "{body} should be rejected"
            );
        }
    }
}

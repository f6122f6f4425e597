//! Registration and wishlist collaborator payloads

use serde::{Deserialize, Serialize};

/// Body for starting a course registration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub student_id: u64,
    pub college_course_id: u64,
    pub intake_session: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RegistrationResponse {
    pub success: bool,
    #[serde(default)]
    pub response: Option<RegistrationAck>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Registration identifier; backends send it as either a number or a string
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationAck {
    #[serde(default, alias = "registration_id")]
    pub registration_id: serde_json::Value,
}

impl RegistrationAck {
    pub fn id_string(&self) -> Option<String> {
        match &self.registration_id {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    pub course_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WishlistResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_request_omits_empty_remarks() {
        let request = RegistrationRequest {
            student_id: 42,
            college_course_id: 7,
            intake_session: "SEP 2025".to_string(),
            remarks: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["intake_session"], "SEP 2025");
        assert!(json.get("remarks").is_none());
    }

    #[test]
    fn test_registration_ack_accepts_numeric_and_string_ids() {
        let numeric: RegistrationResponse =
            serde_json::from_str(r#"{"success":true,"response":{"registrationId":981}}"#).unwrap();
        assert_eq!(numeric.response.unwrap().id_string(), Some("981".to_string()));

        let text: RegistrationResponse =
            serde_json::from_str(r#"{"success":true,"response":{"registrationId":"REG-1"}}"#).unwrap();
        assert_eq!(text.response.unwrap().id_string(), Some("REG-1".to_string()));

        let missing: RegistrationResponse = serde_json::from_str(r#"{"success":false,"message":"nope"}"#).unwrap();
        assert!(missing.response.is_none());
        assert_eq!(missing.message.as_deref(), Some("nope"));
    }
}

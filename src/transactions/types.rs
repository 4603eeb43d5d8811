//! Wire types for the transaction status API.

use serde::{Deserialize, Serialize};

use crate::config::Config;

pub const COMMAND_ID: &str = "TransactionStatusQuery";

/// `4` identifies the party as an organisation shortcode.
pub const IDENTIFIER_TYPE: &str = "4";

pub const DEFAULT_REMARKS: &str = "Status Check";
pub const DEFAULT_OCCASION: &str = "Verification";

/// Body of `POST /mpesa/transactionstatus/v1/query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatusRequest {
    #[serde(rename = "Initiator")]
    pub initiator: String,
    #[serde(rename = "SecurityCredential")]
    pub security_credential: String,
    #[serde(rename = "CommandID")]
    pub command_id: String,
    #[serde(rename = "TransactionID")]
    pub transaction_id: String,
    #[serde(rename = "PartyA")]
    pub party_a: String,
    #[serde(rename = "IdentifierType")]
    pub identifier_type: String,
    #[serde(rename = "ResultURL")]
    pub result_url: String,
    #[serde(rename = "QueueTimeOutURL")]
    pub queue_timeout_url: String,
    #[serde(rename = "Remarks")]
    pub remarks: String,
    #[serde(rename = "Occasion")]
    pub occasion: String,
}

impl TransactionStatusRequest {
    /// Build the request for `transaction_id` from the resolved config.
    ///
    /// The security credential is sent exactly as configured.
    pub fn new(transaction_id: &str, config: &Config) -> Self {
        Self {
            initiator: config.initiator.clone(),
            security_credential: config.security_credential.clone(),
            command_id: COMMAND_ID.to_string(),
            transaction_id: transaction_id.to_string(),
            party_a: config.business_shortcode.clone(),
            identifier_type: IDENTIFIER_TYPE.to_string(),
            result_url: config.result_url.clone(),
            queue_timeout_url: config.queue_timeout_url.clone(),
            remarks: DEFAULT_REMARKS.to_string(),
            occasion: DEFAULT_OCCASION.to_string(),
        }
    }
}

/// Synchronous acknowledgement of a status query. The final result is
/// delivered later to `ResultURL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatus {
    #[serde(rename = "ConversationID")]
    pub conversation_id: String,
    #[serde(rename = "OriginatorConversationID")]
    pub originator_conversation_id: String,
    #[serde(rename = "ResponseCode")]
    pub response_code: String,
    #[serde(rename = "ResponseDescription")]
    pub response_description: String,
}

impl TransactionStatus {
    /// Daraja uses `"0"` for an accepted request.
    pub fn is_accepted(&self) -> bool {
        self.response_code == "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_config() {
        let config = Config::sandbox_defaults();
        let request = TransactionStatusRequest::new("TX99", &config);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["Initiator"], "testapi");
        assert_eq!(json["SecurityCredential"], "YourSecurityCredential");
        assert_eq!(json["CommandID"], "TransactionStatusQuery");
        assert_eq!(json["TransactionID"], "TX99");
        assert_eq!(json["PartyA"], "600986");
        assert_eq!(json["IdentifierType"], "4");
        assert_eq!(json["ResultURL"], "https://domain.com/result");
        assert_eq!(json["QueueTimeOutURL"], "https://domain.com/timeout");
        assert_eq!(json["Remarks"], "Status Check");
        assert_eq!(json["Occasion"], "Verification");
        assert_eq!(json.as_object().unwrap().len(), 10);
    }

    #[test]
    fn test_status_from_api_json() {
        let status: TransactionStatus = serde_json::from_str(
            r#"{"ConversationID":"C1","OriginatorConversationID":"O1","ResponseCode":"0","ResponseDescription":"OK"}"#,
        )
        .unwrap();

        assert_eq!(status.conversation_id, "C1");
        assert_eq!(status.originator_conversation_id, "O1");
        assert!(status.is_accepted());
    }
}

use serde::{Deserialize, Serialize};

pub const TRANSACTION_APPROVED_MSG: &str = "Transaction approved";
pub const TRANSACTION_DECLINED_MSG: &str = "Transaction declined";
const SUPPORT_CONTACT: &str = "support@optimizerhq.com";

/// Top level envelope shared by every Swipe API reply
#[derive(Debug, Deserialize, Serialize)]
pub struct SwipeReply<T> {
    pub response_code: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TransactionData {
    pub result: TransactionResult,
    #[serde(default, deserialize_with = "lenient_string")]
    pub transaction_id: Option<String>,
}

/// Accepts strings, numbers and booleans as text; anything else reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionResult {
    Accepted,
    Declined,
    TestAccepted,
    TestDeclined,
    #[serde(other)]
    Unknown,
}

impl TransactionResult {
    pub fn is_accepted(self, test: bool) -> bool {
        match self {
            Self::Accepted => true,
            Self::TestAccepted => test,
            Self::Declined | Self::TestDeclined | Self::Unknown => false,
        }
    }
}

/// Currency codes come back either as a list or as an index keyed object.
#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CurrencyList {
    List(Vec<String>),
    Indexed(serde_json::Map<String, serde_json::Value>),
}

impl CurrencyList {
    pub fn into_codes(self) -> Vec<String> {
        match self {
            Self::List(codes) => codes,
            Self::Indexed(map) => map
                .into_values()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Approved,
    Declined,
    Error,
}

/// Normalized result of a gateway call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayResponse {
    pub outcome: Outcome,
    pub message: String,
    /// Decoded reply body, `Null` when nothing usable came back
    pub params: serde_json::Value,
    pub authorization: Option<String>,
    pub test: bool,
}

impl GatewayResponse {
    pub fn success(&self) -> bool {
        self.outcome == Outcome::Approved
    }

    pub fn error(message: impl Into<String>, params: serde_json::Value, test: bool) -> Self {
        Self {
            outcome: Outcome::Error,
            message: message.into(),
            params,
            authorization: None,
            test,
        }
    }
}

pub fn invalid_response_message(raw: &str) -> String {
    format!(
        "Invalid response received from the Swipe Checkout API. \
        Please contact {SUPPORT_CONTACT} if you continue to receive this message. \
        (The raw response returned by the API was {raw:?})"
    )
}

/// Turn a raw transaction reply body into a [GatewayResponse].
pub fn classify(raw: &str, test: bool) -> GatewayResponse {
    let Ok(params) = serde_json::from_str::<serde_json::Value>(raw) else {
        return GatewayResponse::error(invalid_response_message(raw), serde_json::Value::Null, test);
    };
    let Ok(reply) = serde_json::from_value::<SwipeReply<serde_json::Value>>(params.clone()) else {
        return GatewayResponse::error(invalid_response_message(raw), params, test);
    };
    if reply.response_code != 200 {
        let message = reply
            .message
            .unwrap_or_else(|| format!("Swipe API error {}", reply.response_code));
        return GatewayResponse::error(message, params, test);
    }
    let Some(data) = reply
        .data
        .and_then(|d| serde_json::from_value::<TransactionData>(d).ok())
    else {
        return GatewayResponse::error(invalid_response_message(raw), params, test);
    };

    let (outcome, message) = if data.result.is_accepted(test) {
        (Outcome::Approved, TRANSACTION_APPROVED_MSG)
    } else {
        (Outcome::Declined, TRANSACTION_DECLINED_MSG)
    };
    GatewayResponse {
        outcome,
        message: message.to_owned(),
        params,
        authorization: data.transaction_id,
        test,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCEPTED: &str =
        r#"{"response_code":200,"message":"OK","data":{"result":"accepted","transaction_id":"00000000000000001"}}"#;
    const DECLINED: &str =
        r#"{"response_code":200,"message":"OK","data":{"result":"declined","transaction_id":"00000000000000002"}}"#;
    const TEST_ACCEPTED: &str =
        r#"{"response_code":200,"message":"OK","data":{"result":"test-accepted","transaction_id":""}}"#;
    const TEST_DECLINED: &str =
        r#"{"response_code":200,"message":"OK","data":{"result":"test-declined","transaction_id":""}}"#;

    #[test]
    fn accepted_is_approved() {
        let res = classify(ACCEPTED, false);
        assert!(res.success());
        assert_eq!(res.message, TRANSACTION_APPROVED_MSG);
        assert_eq!(res.authorization.as_deref(), Some("00000000000000001"));
        assert_eq!(res.params["data"]["result"], "accepted");
    }

    #[test]
    fn minimal_accepted_reply() {
        let res = classify(
            r#"{"response_code":200,"message":"OK","data":{"result":"accepted"}}"#,
            false,
        );
        assert!(res.success());
        assert_eq!(res.message, "Transaction approved");
        assert_eq!(res.authorization, None);
    }

    #[test]
    fn declined_is_not_success() {
        let res = classify(DECLINED, true);
        assert!(!res.success());
        assert_eq!(res.outcome, Outcome::Declined);
        assert_eq!(res.message, TRANSACTION_DECLINED_MSG);
    }

    #[test]
    fn test_accepted_only_counts_in_test_mode() {
        let test = classify(TEST_ACCEPTED, true);
        assert!(test.success());
        assert!(test.test);

        let live = classify(TEST_ACCEPTED, false);
        assert!(!live.success());
        assert_eq!(live.message, TRANSACTION_DECLINED_MSG);
    }

    #[test]
    fn test_declined_is_declined() {
        let res = classify(TEST_DECLINED, true);
        assert_eq!(res.outcome, Outcome::Declined);
    }

    #[test]
    fn unknown_result_is_declined() {
        let res = classify(
            r#"{"response_code":200,"message":"OK","data":{"result":"pending"}}"#,
            false,
        );
        assert_eq!(res.outcome, Outcome::Declined);
    }

    #[test]
    fn error_codes_use_remote_message() {
        for (code, message) in [
            (400, "System error"),
            (402, "Not enough parameters"),
            (403, "Access Denied"),
            (302, "Invalid currency"),
            (303, "Invalid amount"),
        ] {
            let raw = format!(r#"{{"response_code":{code},"message":"{message}"}}"#);
            let res = classify(&raw, false);
            assert!(!res.success());
            assert_eq!(res.outcome, Outcome::Error);
            assert_eq!(res.message, message);
        }
    }

    #[test]
    fn not_enough_parameters() {
        let res = classify(
            r#"{"response_code":403,"message":"Not enough parameters"}"#,
            false,
        );
        assert!(!res.success());
        assert_eq!(res.message, "Not enough parameters");
    }

    #[test]
    fn numeric_transaction_id_is_still_approved() {
        let res = classify(
            r#"{"response_code":200,"message":"OK","data":{"result":"accepted","transaction_id":12345}}"#,
            false,
        );
        assert!(res.success());
        assert_eq!(res.message, TRANSACTION_APPROVED_MSG);
        assert_eq!(res.authorization.as_deref(), Some("12345"));

        let res = classify(
            r#"{"response_code":200,"data":{"result":"accepted","transaction_id":{"id":1}}}"#,
            false,
        );
        assert!(res.success());
        assert_eq!(res.authorization, None);
    }

    #[test]
    fn null_message_is_still_a_remote_error() {
        let res = classify(r#"{"response_code":402,"message":null}"#, false);
        assert_eq!(res.outcome, Outcome::Error);
        assert_eq!(res.message, "Swipe API error 402");
        assert!(!res.message.contains("support@optimizerhq.com"));
    }

    #[test]
    fn malformed_body_embeds_raw_response() {
        for raw in [r#"{"response_code":200,"mess"#, "<html>502</html>", ""] {
            let res = classify(raw, false);
            assert!(!res.success());
            assert!(res.message.contains("support@optimizerhq.com"));
            assert!(res.message.contains(&format!("{raw:?}")));
            assert_eq!(res.params, serde_json::Value::Null);
        }
    }

    #[test]
    fn success_code_without_result_is_malformed() {
        let res = classify(r#"{"response_code":200,"message":"OK"}"#, false);
        assert_eq!(res.outcome, Outcome::Error);
        assert!(res.message.starts_with("Invalid response received"));
    }

    #[test]
    fn currency_list_shapes() {
        let list: SwipeReply<CurrencyList> =
            serde_json::from_str(r#"{"response_code":200,"message":"OK","data":["NZD","USD"]}"#)
                .unwrap();
        assert_eq!(list.data.unwrap().into_codes(), ["NZD", "USD"]);

        let indexed: SwipeReply<CurrencyList> = serde_json::from_str(
            r#"{"response_code":200,"message":"OK","data":{"0":"NZD","1":"AUD"}}"#,
        )
        .unwrap();
        let mut codes = indexed.data.unwrap().into_codes();
        codes.sort();
        assert_eq!(codes, ["AUD", "NZD"]);
    }
}

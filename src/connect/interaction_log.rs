use std::time::Instant;

use serde::Serialize;
use time::OffsetDateTime;

use crate::gateway::region::DISPLAY_NAME;

#[derive(Debug, Serialize)]
struct Request {
    url: String,
    params: serde_json::Value,
}

/// Record of one round trip to the external gateway, returned to the platform.
#[derive(Debug, Serialize)]
pub struct InteractionLog {
    gateway: &'static str,
    request: Option<Request>,
    status: Option<u16>,
    response: Option<serde_json::Value>,
    kind: String,
    #[serde(with = "time::serde::rfc3339")]
    created_at: time::OffsetDateTime,
    duration: f32,
}

impl InteractionLog {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

#[derive(Debug)]
pub struct InteractionSpan {
    created: Instant,
    request: Option<Request>,
    response: Option<serde_json::Value>,
    response_status: Option<u16>,
}

impl InteractionSpan {
    pub fn enter() -> Self {
        Self {
            created: Instant::now(),
            request: None,
            response: None,
            response_status: None,
        }
    }

    /// `params` must already be masked
    pub fn set_request(&mut self, url: String, params: serde_json::Value) {
        self.request = Some(Request { url, params });
    }

    pub fn set_response(&mut self, res: serde_json::Value) {
        self.response = Some(res);
    }

    pub fn set_response_status(&mut self, status: u16) {
        self.response_status = Some(status);
    }

    pub fn interaction_log(self, kind: &str) -> InteractionLog {
        InteractionLog {
            gateway: DISPLAY_NAME,
            request: self.request,
            status: self.response_status,
            response: self.response,
            kind: kind.into(),
            created_at: OffsetDateTime::now_utc(),
            duration: self.created.elapsed().as_secs_f32(),
        }
    }
}

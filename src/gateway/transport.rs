use std::{fmt::Display, time::Duration};

/// Ordered form fields of an outbound request.
pub type Form = Vec<(&'static str, String)>;

/// Raw reply of a successful round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

#[derive(Debug)]
pub enum TransportError {
    /// Request could not be sent or the body could not be read
    Request(reqwest::Error),
    /// Remote answered with a non-success HTTP status
    Status { status: u16, body: String },
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::Status { status, .. } => Some(*status),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        Self::Request(value)
    }
}

impl std::error::Error for TransportError {}

impl Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Request(e) => write!(f, "http request error: {e}"),
            TransportError::Status { status, body } => {
                write!(f, "http status {status} with body {body:?}")
            }
        }
    }
}

/// Outbound HTTP capability used by the gateway.
pub trait Transport: Send + Sync {
    /// Submit a form-encoded POST and return the body of a 2xx reply.
    fn post_form(
        &self,
        url: &str,
        form: &Form,
    ) -> impl Future<Output = Result<Reply, TransportError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn post_form(&self, url: &str, form: &Form) -> Result<Reply, TransportError> {
        let res = self.client.post(url).form(form).send().await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(Reply {
            status: status.as_u16(),
            body,
        })
    }
}

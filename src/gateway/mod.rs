use crate::{
    connect::interaction_log::{InteractionLog, InteractionSpan},
    gateway::{
        purchase::{CreditCard, Money, PurchaseOptions, PurchaseRequest},
        region::{Region, RegionProfile},
        response::{CurrencyList, GatewayResponse, SwipeReply},
        transport::{Form, Reply, Transport, TransportError},
    },
};

pub use error::GatewayError;

mod error;
/// Type conversions between the connect API and the gateway
mod from;
/// Requisite masking
pub mod mask;
/// Outbound transaction form
pub mod purchase;
/// Per region endpoints and field names
pub mod region;
/// Swipe reply envelope and classification
pub mod response;
pub mod transport;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    login: String,
    api_key: String,
}

impl Credentials {
    pub fn new(login: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let login = login.into();
        let api_key = api_key.into();
        if login.trim().is_empty() {
            return Err(GatewayError::MissingCredential("login"));
        }
        if api_key.trim().is_empty() {
            return Err(GatewayError::MissingCredential("api_key"));
        }
        Ok(Self { login, api_key })
    }

    pub fn login(&self) -> &str {
        &self.login
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("api_key", &"***")
            .finish()
    }
}

/// Immutable adapter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GatewaySettings {
    pub region: Region,
    /// Sandbox endpoint, `test=true` on every call, `test-accepted` counts as approved
    pub test: bool,
    /// Check the currency against the merchant's supported list before charging
    pub verify_currency: bool,
}

/// Swipe Checkout adapter. Only purchases are supported by the remote API.
#[derive(Debug, Clone)]
pub struct SwipeGateway<T> {
    transport: T,
    credentials: Credentials,
    settings: GatewaySettings,
    profile: &'static RegionProfile,
}

impl<T: Transport> SwipeGateway<T> {
    pub fn new(transport: T, credentials: Credentials, settings: GatewaySettings) -> Self {
        Self {
            transport,
            credentials,
            profile: RegionProfile::get(settings.region),
            settings,
        }
    }

    pub fn test(&self) -> bool {
        self.settings.test
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.profile.base_url(self.test()), path)
    }

    fn authenticate(&self, form: &mut Form) {
        let fields = self.profile.fields;
        form.push((fields.merchant_id, self.credentials.login.clone()));
        form.push((fields.api_key, self.credentials.api_key.clone()));
        if self.test() {
            form.push((fields.test, "true".into()));
        }
    }

    /// Charge the card. Every failure, including transport errors, comes back as a
    /// non-successful [GatewayResponse].
    pub async fn purchase(
        &self,
        money: &Money,
        card: &CreditCard,
        options: &PurchaseOptions,
        logs: &mut Vec<InteractionLog>,
    ) -> GatewayResponse {
        let currency = options
            .currency
            .as_deref()
            .or(money.currency.as_deref())
            .unwrap_or(self.profile.default_currency);

        if self.settings.verify_currency {
            if let Some(rejection) = self.check_currency(currency, logs).await {
                return rejection;
            }
        }

        let mut request = PurchaseRequest::new(self.profile.fields);
        request.add_invoice(options);
        request.add_credit_card(card);
        request.add_customer_data(options);
        request.add_amount(money, currency);

        self.commit(request.into_form(), logs).await
    }

    /// Currency codes the merchant account accepts.
    pub async fn supported_currencies(
        &self,
        logs: &mut Vec<InteractionLog>,
    ) -> Result<Vec<String>> {
        let reply = self
            .call_api(self.profile.currencies_path, Form::new(), "currencies", logs)
            .await?;
        let reply: SwipeReply<CurrencyList> = serde_json::from_str(&reply.body)?;
        if reply.response_code != 200 {
            return Err(GatewayError::Api {
                code: reply.response_code,
                message: reply.message.unwrap_or_default(),
            });
        }
        Ok(reply.data.map(CurrencyList::into_codes).unwrap_or_default())
    }

    async fn check_currency(
        &self,
        currency: &str,
        logs: &mut Vec<InteractionLog>,
    ) -> Option<GatewayResponse> {
        match self.supported_currencies(logs).await {
            Ok(codes) if codes.iter().any(|c| c.eq_ignore_ascii_case(currency)) => None,
            Ok(codes) => {
                tracing::info!(%currency, supported = ?codes, "Currency is not supported by merchant");
                Some(GatewayResponse::error(
                    format!("Unsupported currency \"{currency}\""),
                    serde_json::Value::Null,
                    self.test(),
                ))
            }
            Err(e) => {
                tracing::error!("Failed to fetch supported currencies: {e}");
                Some(GatewayResponse::error(
                    format!("Failed to fetch supported currencies: {e}"),
                    serde_json::Value::Null,
                    self.test(),
                ))
            }
        }
    }

    async fn commit(&self, form: Form, logs: &mut Vec<InteractionLog>) -> GatewayResponse {
        let path = self.profile.transaction_path;
        match self.call_api(path, form, "payment", logs).await {
            Ok(reply) => {
                let response = response::classify(&reply.body, self.test());
                tracing::info!(
                    outcome = ?response.outcome,
                    authorization = ?response.authorization,
                    "Swipe transaction finished"
                );
                response
            }
            Err(e) => {
                let url = self.url(path);
                tracing::error!(%url, "Swipe transaction request failed: {e}");
                GatewayResponse::error(
                    format!("request to {url} failed: {e}"),
                    serde_json::Value::Null,
                    self.test(),
                )
            }
        }
    }

    async fn call_api(
        &self,
        path: &str,
        mut form: Form,
        kind: &str,
        logs: &mut Vec<InteractionLog>,
    ) -> std::result::Result<Reply, TransportError> {
        self.authenticate(&mut form);
        let url = self.url(path);
        let mut span = InteractionSpan::enter();
        let secured_request = mask::secure_form(&form);
        tracing::debug!(%url, data = %secured_request, "Gateway API request");
        span.set_request(url.clone(), secured_request);

        let result = self.transport.post_form(&url, &form).await;
        match &result {
            Ok(reply) => {
                span.set_response_status(reply.status);
                let secured_response = secure_body(&reply.body);
                tracing::debug!(data = %secured_response, status = reply.status, "Gateway API response");
                span.set_response(secured_response);
            }
            Err(e) => {
                if let Some(status) = e.status() {
                    span.set_response_status(status);
                }
                if let TransportError::Status { body, .. } = e {
                    span.set_response(secure_body(body));
                }
            }
        }
        logs.push(span.interaction_log(kind));
        result
    }
}

fn secure_body(body: &str) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => mask::secure_value(&value),
        Err(_) => serde_json::Value::String(body.to_owned()),
    }
}

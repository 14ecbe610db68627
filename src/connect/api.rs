use axum::{
    extract::{FromRequest, State},
    response::IntoResponse,
    routing::post,
};
use serde::Serialize;
use tracing::instrument;

use crate::{
    connect::{GwConnectErrorResponse, Result, interaction_log::InteractionLog},
    gateway::{
        Credentials, GatewaySettings, SwipeGateway,
        purchase::{CreditCard, Money, PurchaseOptions},
        response::Outcome,
        transport::Transport,
    },
    state::AppState,
};

/// Only purchases are routed, Swipe has no authorize, capture, void, credit or unstore.
#[instrument(skip_all)]
pub async fn pay<T: Transport + Clone>(
    State(AppState { transport, settings }): State<AppState<T>>,
    Json(payment): Json<payment::GwConnectPurchaseRequest>,
) -> Result<GwConnectResponse<GwConnectPurchaseResponse>> {
    let credentials = Credentials::new(
        &payment.settings.merchant_id,
        &payment.settings.api_key,
    )
    .map_err(|e| GwConnectErrorResponse::new(e.to_string(), vec![]))?;
    let card = CreditCard::try_from(&payment.params.card)
        .map_err(|e| GwConnectErrorResponse::new(e.to_string(), vec![]))?;
    let money = Money::from(&payment.payment);
    let options = PurchaseOptions::from(&payment);
    let settings = GatewaySettings {
        region: payment.settings.region.unwrap_or(settings.region),
        ..settings
    };

    tracing::debug!(
        merchant = %credentials.login(),
        region = %settings.region,
        amount = money.cents,
        "Connect API purchase request"
    );
    let gate = SwipeGateway::new(transport, credentials, settings);
    let mut logs = Vec::new();
    let response = gate.purchase(&money, &card, &options, &mut logs).await;
    match response.outcome {
        Outcome::Approved | Outcome::Declined => {
            tracing::info!(outcome = ?response.outcome, "Processed purchase");
            Ok(GwConnectResponse::new(response.into(), logs))
        }
        Outcome::Error => {
            tracing::error!("Failed to process purchase: {}", response.message);
            Err(GwConnectErrorResponse::new(response.message, logs))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GwConnectResponse<T> {
    result: bool,
    logs: Vec<InteractionLog>,
    #[serde(flatten)]
    data: T,
}

impl<T> GwConnectResponse<T> {
    pub fn new(data: T, logs: Vec<InteractionLog>) -> Self {
        Self {
            result: true,
            logs,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for GwConnectResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let value = crate::gateway::mask::secure_serializable(&self);
        tracing::debug!(data = %value, "Connect API response payload");
        axum::Json(self).into_response()
    }
}

pub mod payment {

    use serde::Deserialize;

    use crate::gateway::{purchase::Address, region::Region};

    #[derive(Debug, Deserialize, Clone)]
    pub struct GwConnectPurchaseRequest {
        pub payment: Payment,
        pub params: PurchaseParams,
        pub settings: Settings,
    }

    #[derive(Debug, Deserialize, Clone)]
    pub struct PurchaseParams {
        #[serde(flatten)]
        pub card: CardParams,
        pub billing_address: Option<Address>,
        pub email: Option<String>,
    }

    #[derive(Clone)]
    pub struct CardParams {
        pub pan: String,
        pub cvv: Option<String>,
        /// `MM/YYYY` or `MM/YY`
        pub expires: String,
        pub holder: String,
        pub brand: Option<String>,
    }

    impl std::fmt::Debug for CardParams {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("CardParams")
                .field("brand", &self.brand)
                .finish_non_exhaustive()
        }
    }

    // Implement deserialize manually to conceal any "helpful" error messages that can leak
    // sensitive data
    impl<'de> serde::de::Deserialize<'de> for CardParams {
        fn deserialize<D>(deserializer: D) -> Result<CardParams, D::Error>
        where
            D: serde::de::Deserializer<'de>,
        {
            #[derive(Deserialize)]
            struct CardParamsShadow {
                pan: String,
                cvv: Option<String>,
                expires: String,
                holder: String,
                brand: Option<String>,
            }

            CardParamsShadow::deserialize(deserializer)
                .map(|shadow| CardParams {
                    pan: shadow.pan,
                    cvv: shadow.cvv,
                    expires: shadow.expires,
                    holder: shadow.holder,
                    brand: shadow.brand,
                })
                .map_err(|_| serde::de::Error::custom("failed to deserialize card data"))
        }
    }

    #[derive(Debug, Deserialize, Clone)]
    pub struct Payment {
        /// Minor units
        pub amount: u64,
        pub currency: Option<String>,
        pub order_id: Option<String>,
        pub description: Option<String>,
        pub ip: Option<String>,
    }

    #[derive(Deserialize, Clone)]
    pub struct Settings {
        pub merchant_id: String,
        pub api_key: String,
        pub region: Option<Region>,
    }

    impl std::fmt::Debug for Settings {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Settings")
                .field("merchant_id", &self.merchant_id)
                .field("region", &self.region)
                .finish_non_exhaustive()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GwConnectPurchaseResponse {
    pub status: super::Status,
    pub message: String,
    pub gateway_token: Option<String>,
    pub test: bool,
}

pub fn router<T>() -> axum::Router<AppState<T>>
where
    T: Transport + Clone + 'static,
{
    axum::Router::new().route("/pay", post(pay::<T>))
}

/// `Json` extractor wrapper that customizes the error from `axum::extract::Json`
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    T: serde::de::DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = axum::Json<GwConnectErrorResponse>;

    async fn from_request(
        req: axum::http::Request<axum::body::Body>,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let rejection = match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => return Ok(Self(value)),
            Err(e) => e.body_text(),
        };
        Err(axum::Json(GwConnectErrorResponse::new(rejection, vec![])))
    }
}

use crate::{
    connect::{
        self,
        api::{
            GwConnectPurchaseResponse,
            payment::{CardParams, GwConnectPurchaseRequest, Payment},
        },
    },
    gateway::{
        GatewayError,
        purchase::{CreditCard, Money, PurchaseOptions},
        response::{GatewayResponse, Outcome},
    },
};

impl From<&Payment> for Money {
    fn from(value: &Payment) -> Self {
        Self {
            cents: value.amount,
            currency: value.currency.clone(),
        }
    }
}

impl From<&GwConnectPurchaseRequest> for PurchaseOptions {
    fn from(
        GwConnectPurchaseRequest {
            payment, params, ..
        }: &GwConnectPurchaseRequest,
    ) -> Self {
        Self {
            billing_address: params.billing_address.clone(),
            address: None,
            email: params.email.clone(),
            ip: payment.ip.clone(),
            order_id: payment.order_id.clone(),
            description: payment.description.clone(),
            // Currency travels with the amount
            currency: None,
        }
    }
}

impl TryFrom<&CardParams> for CreditCard {
    type Error = GatewayError;

    fn try_from(value: &CardParams) -> Result<Self, Self::Error> {
        let (month, year) = value
            .expires
            .split_once('/')
            .ok_or(GatewayError::InvalidCard("expiry must be MM/YYYY"))?;
        let month = month
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|m| (1..=12).contains(m))
            .ok_or(GatewayError::InvalidCard("expiry month must be 01-12"))?;
        let year = year.trim();
        let year: u16 = match year.len() {
            2 | 4 => year
                .parse::<u16>()
                .map_err(|_| GatewayError::InvalidCard("expiry year must be numeric"))?,
            _ => return Err(GatewayError::InvalidCard("expiry must be MM/YYYY")),
        };
        let (first_name, last_name) = match value.holder.trim().split_once(' ') {
            Some((first, last)) => (first.to_owned(), last.trim_start().to_owned()),
            None => (value.holder.trim().to_owned(), String::new()),
        };
        Ok(Self {
            number: value.pan.clone(),
            brand: value.brand.as_ref().map(|b| b.to_lowercase()),
            first_name,
            last_name,
            month,
            year,
            verification_value: value.cvv.clone(),
        })
    }
}

impl From<GatewayResponse> for GwConnectPurchaseResponse {
    fn from(value: GatewayResponse) -> Self {
        let status = match value.outcome {
            Outcome::Approved => connect::Status::Approved,
            Outcome::Declined | Outcome::Error => connect::Status::Declined,
        };
        Self {
            status,
            message: value.message,
            gateway_token: value.authorization,
            test: value.test,
        }
    }
}

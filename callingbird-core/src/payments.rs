use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

const MOLLIE_BASE_URL: &str = "https://api.mollie.com/v2";

/// Error from the payment provider.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// A payment as known to the provider.
#[derive(Debug, Clone)]
pub struct Payment {
    pub id: String,
    /// Provider status vocabulary (`open`, `paid`, `authorized`, ...)
    pub status: String,
    pub checkout_url: Option<String>,
}

/// Fields for creating a payment request.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub customer_id: String,
    /// Present when the customer has a recurring-payment mandate
    pub mandate_id: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub metadata: Value,
}

/// Mollie-like payment provider: synchronous create/fetch, webhook-driven
/// status updates.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_customer(&self, name: &str, email: &str) -> Result<String, PaymentError>;

    async fn create_mandate(&self, customer_id: &str) -> Result<String, PaymentError>;

    async fn create_payment(&self, request: PaymentRequest) -> Result<Payment, PaymentError>;

    async fn get_payment(&self, payment_id: &str) -> Result<Payment, PaymentError>;
}

#[derive(Debug, Deserialize)]
struct MollieId {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MollieLink {
    href: String,
}

#[derive(Debug, Deserialize)]
struct MollieLinks {
    checkout: Option<MollieLink>,
}

#[derive(Debug, Deserialize)]
struct MolliePayment {
    id: String,
    status: String,
    #[serde(rename = "_links")]
    links: Option<MollieLinks>,
}

impl From<MolliePayment> for Payment {
    fn from(p: MolliePayment) -> Self {
        Payment {
            id: p.id,
            status: p.status,
            checkout_url: p.links.and_then(|l| l.checkout).map(|c| c.href),
        }
    }
}

/// Mollie REST client.
pub struct MollieClient {
    http: reqwest::Client,
    api_key: String,
}

impl MollieClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }

    async fn post(&self, path: &str, body: Value) -> Result<reqwest::Response, PaymentError> {
        let response = self
            .http
            .post(format!("{MOLLIE_BASE_URL}{path}"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, PaymentError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(PaymentError::Api { status, message })
    }
}

#[async_trait]
impl PaymentProvider for MollieClient {
    async fn create_customer(&self, name: &str, email: &str) -> Result<String, PaymentError> {
        let response = self
            .post("/customers", json!({ "name": name, "email": email }))
            .await?;
        Ok(response.json::<MollieId>().await?.id)
    }

    async fn create_mandate(&self, customer_id: &str) -> Result<String, PaymentError> {
        let response = self
            .post(
                &format!("/customers/{customer_id}/mandates"),
                json!({ "method": "directdebit" }),
            )
            .await?;
        Ok(response.json::<MollieId>().await?.id)
    }

    async fn create_payment(&self, request: PaymentRequest) -> Result<Payment, PaymentError> {
        // A mandate makes this a recurring charge; otherwise it is the first
        // payment of a sequence and the customer pays via the checkout link.
        let sequence_type = if request.mandate_id.is_some() {
            "recurring"
        } else {
            "first"
        };

        let mut body = json!({
            "amount": {
                "currency": request.currency,
                "value": format!("{:.2}", request.amount),
            },
            "customerId": request.customer_id,
            "sequenceType": sequence_type,
            "description": request.description,
            "metadata": request.metadata,
        });
        if let Some(mandate_id) = &request.mandate_id {
            body["mandateId"] = json!(mandate_id);
        }

        let response = self.post("/payments", body).await?;
        Ok(response.json::<MolliePayment>().await?.into())
    }

    async fn get_payment(&self, payment_id: &str) -> Result<Payment, PaymentError> {
        let response = self
            .http
            .get(format!("{MOLLIE_BASE_URL}/payments/{payment_id}"))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json::<MolliePayment>().await?.into())
    }
}

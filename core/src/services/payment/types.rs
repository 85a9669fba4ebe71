use serde::{Deserialize, Serialize};

/// What the customer is about to pay for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutRequest {
    /// Passed back as `client_reference_id`
    pub tour_id: String,
    pub tour_name: String,
    pub tour_summary: String,
    pub image_url: String,
    /// Price in major currency units
    pub price: f64,
    pub customer_email: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutRequest {
    /// Price in minor units (cents)
    pub fn unit_amount(&self) -> i64 {
        (self.price * 100.0).round() as i64
    }
}

/// Hosted checkout page returned by the processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Payload of a `checkout.session.completed` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedCheckout {
    #[serde(rename = "id")]
    pub session_id: String,
    pub client_reference_id: String,
    pub customer_email: String,
    /// Amount in minor units
    pub amount_total: i64,
}

impl CompletedCheckout {
    pub fn price(&self) -> f64 {
        self.amount_total as f64 / 100.0
    }
}

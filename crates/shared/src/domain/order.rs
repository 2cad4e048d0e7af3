use crate::errors::ServiceError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use validator::Validate;

/// Fulfilment states, in the order an order moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    #[serde(rename = "Order Placed")]
    OrderPlaced,
    #[serde(rename = "Packing")]
    Packing,
    #[serde(rename = "Shipped")]
    Shipped,
    #[serde(rename = "Out for delivery")]
    OutForDelivery,
    #[serde(rename = "Delivered")]
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::OrderPlaced,
        OrderStatus::Packing,
        OrderStatus::Shipped,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::OrderPlaced => "Order Placed",
            OrderStatus::Packing => "Packing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::OutForDelivery => "Out for delivery",
            OrderStatus::Delivered => "Delivered",
        }
    }

    /// Status updates never move an order backwards. Re-applying the current
    /// status is accepted so repeated admin submissions are harmless.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        next >= *self
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ServiceError::validation(format!("Unknown order status: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum PaymentMethod {
    #[serde(rename = "COD", alias = "cod")]
    Cod,
    #[serde(rename = "Stripe", alias = "stripe")]
    Stripe,
    #[serde(rename = "Razorpay", alias = "razorpay")]
    Razorpay,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cod => "COD",
            PaymentMethod::Stripe => "Stripe",
            PaymentMethod::Razorpay => "Razorpay",
        }
    }

    /// Only cash on delivery is wired up; card gateways are stubs.
    pub fn ensure_available(&self) -> Result<(), ServiceError> {
        match self {
            PaymentMethod::Cod => Ok(()),
            other => Err(ServiceError::PaymentUnavailable(other.as_str().to_string())),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COD" | "cod" => Ok(PaymentMethod::Cod),
            "Stripe" | "stripe" => Ok(PaymentMethod::Stripe),
            "Razorpay" | "razorpay" => Ok(PaymentMethod::Razorpay),
            other => Err(ServiceError::validation(format!(
                "Unknown payment method: {other}"
            ))),
        }
    }
}

/// Delivery address captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct Address {
    #[validate(length(min = 1, message = "First name is required"))]
    #[schema(example = "Asha")]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    #[schema(example = "Rao")]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "asha@example.com")]
    pub email: String,

    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,

    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,

    #[serde(default)]
    pub state: String,

    #[validate(length(min = 1, message = "Zipcode is required"))]
    pub zipcode: String,

    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,

    #[validate(length(min = 5, max = 20, message = "Phone must be 5 to 20 characters"))]
    pub phone: String,
}

/// Product line frozen into an order at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub product_id: i32,
    pub name: String,
    pub price: i64,
    pub image: Option<String>,
    pub size: String,
    pub quantity: i32,
}

impl OrderItem {
    pub fn line_total(&self) -> Option<i64> {
        self.price.checked_mul(i64::from(self.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testresult::TestResult;

    #[test]
    fn statuses_only_move_forward() {
        assert!(OrderStatus::OrderPlaced.can_transition_to(OrderStatus::Packing));
        assert!(OrderStatus::Packing.can_transition_to(OrderStatus::OutForDelivery));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Packing));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::OrderPlaced));
    }

    #[test]
    fn status_round_trips_through_display_strings() -> TestResult {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>()?, status);
        }
        assert!("Lost".parse::<OrderStatus>().is_err());
        Ok(())
    }

    #[test]
    fn status_serializes_as_display_string() -> TestResult {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery)?;
        assert_eq!(json, "\"Out for delivery\"");
        Ok(())
    }

    #[test]
    fn only_cash_on_delivery_is_available() {
        assert!(PaymentMethod::Cod.ensure_available().is_ok());
        assert!(matches!(
            PaymentMethod::Stripe.ensure_available(),
            Err(ServiceError::PaymentUnavailable(_))
        ));
        assert!(PaymentMethod::Razorpay.ensure_available().is_err());
    }

    #[test]
    fn payment_method_accepts_storefront_spelling() -> TestResult {
        let method: PaymentMethod = serde_json::from_str("\"cod\"")?;
        assert_eq!(method, PaymentMethod::Cod);
        Ok(())
    }
}

//! Status enums for orders and checkout.

use serde::{Deserialize, Serialize};

/// Order lifecycle status as stored in the `orders` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Capitalized label for display (e.g., "Shipped").
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cod,
    /// UPI or card, paid up front.
    Online,
    /// Transfer to the shop's bank account.
    Bank,
}

impl PaymentMethod {
    /// All methods in the order the checkout offers them.
    pub const ALL: [Self; 3] = [Self::Cod, Self::Online, Self::Bank];

    /// Human-readable name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Cod => "Cash on Delivery",
            Self::Online => "Online Payment",
            Self::Bank => "Bank Transfer",
        }
    }

    /// One-line description shown next to the name.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Cod => "Pay when you receive your order",
            Self::Online => "Pay now with UPI/Card",
            Self::Bank => "Transfer to our bank account",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cod => write!(f, "cod"),
            Self::Online => write!(f, "online"),
            Self::Bank => write!(f, "bank"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cod" => Ok(Self::Cod),
            "online" => Ok(Self::Online),
            "bank" => Ok(Self::Bank),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

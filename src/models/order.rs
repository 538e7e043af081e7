// src/models/order.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::product::Product;
use crate::models::user::UserSummary;

// ---
// Método de pagamento: tokens simbólicos, nenhum dinheiro envolvido.
// Por isso payment_status é sempre forçado a 'completed' no checkout.
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Beso,
    Baila,
    Foto,
    Abrazo,
    Sonrisa,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Beso => "beso",
            PaymentMethod::Baila => "baila",
            PaymentMethod::Foto => "foto",
            PaymentMethod::Abrazo => "abrazo",
            PaymentMethod::Sonrisa => "sonrisa",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beso" => Ok(PaymentMethod::Beso),
            "baila" => Ok(PaymentMethod::Baila),
            "foto" => Ok(PaymentMethod::Foto),
            "abrazo" => Ok(PaymentMethod::Abrazo),
            "sonrisa" => Ok(PaymentMethod::Sonrisa),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

// ---
// Ciclo de vida do pedido:
//   processing -> confirmed | cancelled
//   confirmed  -> shipped   | cancelled
//   shipped    -> delivered
//   delivered, cancelled -> terminais
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Processing,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "processing",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Transições permitidas da máquina de estados.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Processing, Confirmed)
                | (Processing, Cancelled)
                | (Confirmed, Shipped)
                | (Confirmed, Cancelled)
                | (Shipped, Delivered)
        )
    }

    /// Cancelar só é possível antes do envio.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, OrderStatus::Processing | OrderStatus::Confirmed)
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(OrderStatus::Processing),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    // Carrinho que originou este pedido.
    pub cart_id: Uuid,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    // Cópia desnormalizada do produto no momento da compra. O histórico
    // do pedido não muda quando o catálogo é editado.
    pub product_snapshot: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados do produto congelados dentro de order_items.product_snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub surprise: String,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
            surprise: product.surprise.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub user: Option<UserSummary>,
}

// Linha de GET /orders/stats: agregado por status.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderStat {
    pub status: OrderStatus,
    pub count: i64,
    pub total_amount: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn payment_methods_parse_from_wire_names() {
        for name in ["beso", "baila", "foto", "abrazo", "sonrisa"] {
            let method: PaymentMethod = name.parse().expect("método válido");
            assert_eq!(method.as_str(), name);
        }
    }

    #[test]
    fn unknown_payment_method_is_rejected() {
        assert!("efectivo".parse::<PaymentMethod>().is_err());
        assert!("BESO".parse::<PaymentMethod>().is_err());
        assert!("".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn processing_can_confirm_or_cancel() {
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Processing.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn confirmed_can_ship_or_cancel() {
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn shipped_only_delivers() {
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Confirmed));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for next in [
            OrderStatus::Processing,
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert!(!OrderStatus::Delivered.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn cancellable_only_before_shipping() {
        assert!(OrderStatus::Processing.is_cancellable());
        assert!(OrderStatus::Confirmed.is_cancellable());
        assert!(!OrderStatus::Shipped.is_cancellable());
        assert!(!OrderStatus::Delivered.is_cancellable());
        assert!(!OrderStatus::Cancelled.is_cancellable());
    }

    #[test]
    fn snapshot_copies_catalog_fields() {
        let product = Product {
            id: Uuid::new_v4(),
            title: "Oso de peluche".into(),
            price: dec!(25.00),
            image: "/img/oso.png".into(),
            description: "Un oso suave".into(),
            surprise: "Abrazo gigante".into(),
            category: "peluches".into(),
            stock: 5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let snapshot = ProductSnapshot::from(&product);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["title"], "Oso de peluche");
        assert_eq!(json["category"], "peluches");
        assert_eq!(json["surprise"], "Abrazo gigante");
        // O snapshot não carrega preço nem estoque: ficam no order_item/produto.
        assert!(json.get("price").is_none());
        assert!(json.get("stock").is_none());
    }
}

//! Domain models shared across the PizzaDronz system.
//!
//! These structs double as the REST wire types: field names follow the
//! API's camelCase convention via serde renames.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Delivery charge added to every order, in pence.
pub const ORDER_CHARGE_IN_PENCE: u32 = 100;

/// Maximum number of pizzas a single order may contain.
pub const MAX_PIZZAS_PER_ORDER: usize = 4;

/// A point on the longitude/latitude plane.
///
/// The plane is treated as Euclidean x/y; equality is bit-for-bit value
/// equality, proximity goes through [`crate::geometry::is_close`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl std::fmt::Display for LngLat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lng, self.lat)
    }
}

/// A named closed polygon (implicit edge from the last vertex back to the
/// first). No-fly zones and the central area are both regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRegion {
    pub name: String,
    pub vertices: Vec<LngLat>,
}

impl NamedRegion {
    pub fn new(name: impl Into<String>, vertices: Vec<LngLat>) -> Self {
        Self {
            name: name.into(),
            vertices,
        }
    }
}

/// A menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pizza {
    pub name: String,
    #[serde(rename = "priceInPence")]
    pub price_in_pence: u32,
}

/// Payment card details attached to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardInformation {
    pub credit_card_number: String,
    /// Expiry in MM/yy format.
    pub credit_card_expiry: String,
    pub cvv: String,
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Not yet handled by the system
    #[default]
    Undefined,
    /// Passed validation, awaiting delivery
    ValidButNotDelivered,
    /// Route computed and flown
    Delivered,
    /// Failed validation
    Invalid,
}

/// Outcome of order validation. `NoError` means the order is deliverable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderValidationCode {
    #[default]
    Undefined,
    NoError,
    CardNumberInvalid,
    ExpiryDateInvalid,
    CvvInvalid,
    TotalIncorrect,
    PizzaNotDefined,
    MaxPizzaCountExceeded,
    PizzaFromMultipleRestaurants,
    RestaurantClosed,
}

/// An order placed for a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_no: String,
    pub order_date: NaiveDate,
    #[serde(default)]
    pub order_status: OrderStatus,
    #[serde(default)]
    pub order_validation_code: OrderValidationCode,
    pub price_total_in_pence: u32,
    pub pizzas_in_order: Vec<Pizza>,
    pub credit_card_information: CreditCardInformation,
}

/// A restaurant participating in the scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub name: String,
    pub location: LngLat,
    pub opening_days: Vec<Weekday>,
    pub menu: Vec<Pizza>,
}

impl Restaurant {
    /// Whether any menu item matches the given pizza name.
    pub fn serves(&self, pizza_name: &str) -> bool {
        self.menu.iter().any(|pizza| pizza.name == pizza_name)
    }

    /// Whether the restaurant is open on the given day.
    pub fn is_open_on(&self, day: Weekday) -> bool {
        self.opening_days.contains(&day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_deserializes_from_api_json() {
        let json = r#"{
            "orderNo": "5F1179CB",
            "orderDate": "2025-01-06",
            "orderStatus": "UNDEFINED",
            "orderValidationCode": "UNDEFINED",
            "priceTotalInPence": 2400,
            "pizzasInOrder": [
                { "name": "R1: Margarita", "priceInPence": 1000 },
                { "name": "R1: Calzone", "priceInPence": 1300 }
            ],
            "creditCardInformation": {
                "creditCardNumber": "4485959141852684",
                "creditCardExpiry": "11/28",
                "cvv": "838"
            }
        }"#;

        let order: Order = serde_json::from_str(json).expect("order should deserialize");
        assert_eq!(order.order_no, "5F1179CB");
        assert_eq!(order.order_status, OrderStatus::Undefined);
        assert_eq!(order.order_validation_code, OrderValidationCode::Undefined);
        assert_eq!(order.pizzas_in_order.len(), 2);
        assert_eq!(order.price_total_in_pence, 2400);
    }

    #[test]
    fn restaurant_deserializes_with_opening_days() {
        let json = r#"{
            "name": "Civerinos Slice",
            "location": { "lng": -3.1912869215011597, "lat": 55.945535152517735 },
            "openingDays": ["MONDAY", "TUESDAY", "FRIDAY"],
            "menu": [ { "name": "R1: Margarita", "priceInPence": 1000 } ]
        }"#;

        let restaurant: Restaurant = serde_json::from_str(json).expect("restaurant should deserialize");
        assert!(restaurant.is_open_on(Weekday::Mon));
        assert!(!restaurant.is_open_on(Weekday::Sun));
        assert!(restaurant.serves("R1: Margarita"));
        assert!(!restaurant.serves("R9: Unknown"));
    }

    #[test]
    fn named_region_round_trips() {
        let region = NamedRegion::new(
            "central",
            vec![
                LngLat::new(-3.192473, 55.946233),
                LngLat::new(-3.192473, 55.942617),
                LngLat::new(-3.184319, 55.942617),
            ],
        );
        let json = serde_json::to_string(&region).unwrap();
        let back: NamedRegion = serde_json::from_str(&json).unwrap();
        assert_eq!(region, back);
    }
}

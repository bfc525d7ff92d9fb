//! Order validation rules.
//!
//! Validation runs in stages (context, card, restaurant, total); the first
//! failing stage determines the validation code and the order is marked
//! invalid. Date-sensitive checks (card expiry, opening days) are evaluated
//! against the order date so a batch re-run for a past date is
//! deterministic.

use chrono::{Datelike, NaiveDate};

use crate::models::{
    CreditCardInformation, Order, OrderStatus, OrderValidationCode, Pizza, Restaurant,
    MAX_PIZZAS_PER_ORDER, ORDER_CHARGE_IN_PENCE,
};

/// Validates an order against the defined restaurants and returns it with
/// its status and validation code set.
pub fn validate_order(order: &Order, restaurants: &[Restaurant]) -> Order {
    let mut validated = order.clone();

    if !has_valid_context(order) {
        return invalidate(validated, OrderValidationCode::Undefined);
    }

    let code = validate_card(&order.credit_card_information, order.order_date);
    if code != OrderValidationCode::NoError {
        return invalidate(validated, code);
    }

    let code = validate_restaurant(order, restaurants);
    if code != OrderValidationCode::NoError {
        return invalidate(validated, code);
    }

    let code = validate_total(&order.pizzas_in_order, order.price_total_in_pence);
    if code != OrderValidationCode::NoError {
        return invalidate(validated, code);
    }

    validated.order_status = OrderStatus::ValidButNotDelivered;
    validated.order_validation_code = OrderValidationCode::NoError;
    validated
}

/// The order carries a number and has not been handled yet.
fn has_valid_context(order: &Order) -> bool {
    !order.order_no.is_empty()
        && order.order_status == OrderStatus::Undefined
        && order.order_validation_code == OrderValidationCode::Undefined
}

fn validate_card(card: &CreditCardInformation, order_date: NaiveDate) -> OrderValidationCode {
    if !is_digits(&card.cvv, 3) {
        return OrderValidationCode::CvvInvalid;
    }

    if !is_digits(&card.credit_card_number, 16) {
        return OrderValidationCode::CardNumberInvalid;
    }

    match parse_expiry(&card.credit_card_expiry) {
        // Valid through the last day of the expiry month.
        Some((year, month)) => {
            if (year, month) < (order_date.year(), order_date.month()) {
                return OrderValidationCode::ExpiryDateInvalid;
            }
        }
        None => return OrderValidationCode::ExpiryDateInvalid,
    }

    OrderValidationCode::NoError
}

fn validate_restaurant(order: &Order, restaurants: &[Restaurant]) -> OrderValidationCode {
    let items = &order.pizzas_in_order;
    if items.is_empty() {
        return OrderValidationCode::PizzaNotDefined;
    }
    if items.len() > MAX_PIZZAS_PER_ORDER {
        return OrderValidationCode::MaxPizzaCountExceeded;
    }

    // All items must come from the restaurant serving the first one.
    let Some(restaurant) = restaurants.iter().find(|r| r.serves(&items[0].name)) else {
        return OrderValidationCode::PizzaNotDefined;
    };

    if !restaurant.is_open_on(order.order_date.weekday()) {
        return OrderValidationCode::RestaurantClosed;
    }

    for item in &items[1..] {
        if !restaurant.serves(&item.name) {
            return OrderValidationCode::PizzaFromMultipleRestaurants;
        }
    }

    OrderValidationCode::NoError
}

fn validate_total(items: &[Pizza], actual_total_in_pence: u32) -> OrderValidationCode {
    let total: u32 = items
        .iter()
        .map(|pizza| pizza.price_in_pence)
        .sum::<u32>()
        + ORDER_CHARGE_IN_PENCE;

    if total != actual_total_in_pence {
        return OrderValidationCode::TotalIncorrect;
    }
    OrderValidationCode::NoError
}

fn invalidate(mut order: Order, code: OrderValidationCode) -> Order {
    order.order_status = OrderStatus::Invalid;
    order.order_validation_code = code;
    order
}

fn is_digits(value: &str, expected_len: usize) -> bool {
    value.len() == expected_len && value.bytes().all(|b| b.is_ascii_digit())
}

/// Parses an MM/yy expiry into (year, month); `None` on malformed input.
fn parse_expiry(expiry: &str) -> Option<(i32, u32)> {
    let (month, year) = expiry.split_once('/')?;
    if month.len() != 2 || year.len() != 2 {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    Some((2000 + year, month))
}

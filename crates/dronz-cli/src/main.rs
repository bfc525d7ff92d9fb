//! PizzaDronz batch runner.
//!
//! Fetches the day's orders and airspace data from the delivery service
//! API, validates the orders, plans a two-leg flight (base → restaurant →
//! base) for each deliverable one, and writes the deliveries, flightpath
//! and GeoJSON result files.

mod output;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dronz_api::ApiClient;
use dronz_core::geometry::APPLETON_TOWER;
use dronz_core::models::{LngLat, Order, OrderStatus, OrderValidationCode, Restaurant};
use dronz_core::pathfinder::{PathFinder, RouteResult};
use dronz_core::validation::validate_order;

use crate::output::OutputWriter;

#[derive(Parser, Debug)]
#[command(name = "dronz", version, about = "PizzaDronz daily delivery batch")]
struct Args {
    /// Date to process orders for (YYYY-MM-DD)
    date: NaiveDate,

    /// Base URL of the delivery service REST API
    url: String,

    /// Directory for the result files
    #[arg(long, default_value = "resultfiles")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dronz=info".parse()?)
                .add_directive("dronz_core=info".parse()?)
                .add_directive("dronz_api=info".parse()?),
        )
        .init();

    let args = Args::parse();
    if !args.url.starts_with("http://") && !args.url.starts_with("https://") {
        bail!("'{}' is not an http(s) URL", args.url);
    }

    tracing::info!(date = %args.date, url = %args.url, "starting PizzaDronz");

    let api = ApiClient::new(&args.url)?;
    if !api.is_alive().await.context("API health check failed")? {
        bail!("API reported itself as not alive");
    }

    let restaurants = api.restaurants().await?;
    // Menu item → restaurant index, so each order resolves its restaurant
    // in O(1) instead of a per-order linear scan.
    let restaurant_by_item: HashMap<&str, &Restaurant> = restaurants
        .iter()
        .flat_map(|restaurant| {
            restaurant
                .menu
                .iter()
                .map(move |pizza| (pizza.name.as_str(), restaurant))
        })
        .collect();

    let orders = api.orders_by_date(args.date).await?;
    if orders.is_empty() {
        tracing::info!(date = %args.date, "no orders to process");
        return Ok(());
    }
    tracing::info!(count = orders.len(), "processing orders");

    let mut processed: Vec<Order> = orders
        .iter()
        .map(|order| {
            let validated = validate_order(order, &restaurants);
            if validated.order_validation_code != OrderValidationCode::NoError {
                tracing::warn!(
                    order_no = %validated.order_no,
                    code = ?validated.order_validation_code,
                    "order failed validation, skipping"
                );
            }
            validated
        })
        .collect();

    let central_area = api.central_area().await?;
    tracing::info!(name = %central_area.name, "central area loaded");
    let no_fly_zones = api.no_fly_zones().await?;
    tracing::info!(count = no_fly_zones.len(), "no-fly zones loaded");

    let finder = PathFinder::new(no_fly_zones);
    let mut flights: Vec<RouteResult> = Vec::new();

    for order in &mut processed {
        if order.order_validation_code != OrderValidationCode::NoError {
            continue;
        }
        // Single-restaurant membership was established during validation.
        let Some(&restaurant) = restaurant_by_item.get(order.pizzas_in_order[0].name.as_str())
        else {
            tracing::warn!(order_no = %order.order_no, "validated order has no restaurant");
            continue;
        };

        match plan_delivery(&finder, restaurant.location, &order.order_no) {
            Ok(Some((outbound, inbound))) => {
                order.order_status = OrderStatus::Delivered;
                flights.push(outbound);
                flights.push(inbound);
            }
            Ok(None) => {
                tracing::warn!(
                    order_no = %order.order_no,
                    restaurant = %restaurant.name,
                    "destination unreachable, order not delivered"
                );
            }
            Err(error) => {
                tracing::warn!(
                    order_no = %order.order_no,
                    %error,
                    "route computation rejected, order not delivered"
                );
            }
        }
    }

    let writer = OutputWriter::new(args.date, &args.out_dir)?;
    writer.write_deliveries(&processed)?;
    writer.write_flightpath(&flights)?;
    writer.write_geojson(&flights)?;

    tracing::info!(
        delivered = flights.len() / 2,
        total = processed.len(),
        "batch complete"
    );
    Ok(())
}

/// Plans the outbound and return legs for one order. `None` means one of
/// the legs had no route; errors are invalid-input rejections from the
/// route finder.
fn plan_delivery(
    finder: &PathFinder,
    restaurant: LngLat,
    order_no: &str,
) -> Result<Option<(RouteResult, RouteResult)>, dronz_core::CoreError> {
    let outbound = finder
        .find_route(APPLETON_TOWER, restaurant)?
        .with_order_no(order_no);
    if !outbound.ok {
        return Ok(None);
    }

    let inbound = finder
        .find_route(restaurant, APPLETON_TOWER)?
        .with_order_no(order_no);
    if !inbound.ok {
        return Ok(None);
    }

    Ok(Some((outbound, inbound)))
}

//! Result-file writers: deliveries, flightpath and GeoJSON.
//!
//! File names and field names follow the legacy output format, including
//! the 999 hover angle in flightpath records.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dronz_core::models::Order;
use dronz_core::pathfinder::RouteResult;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// One drone move in the flightpath file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightMove {
    pub order_no: String,
    pub from_longitude: f64,
    pub from_latitude: f64,
    pub angle: f64,
    pub to_longitude: f64,
    pub to_latitude: f64,
    pub ticks_since_start_of_calculation: u64,
}

/// One order in the deliveries file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    pub order_no: String,
    pub order_status: dronz_core::models::OrderStatus,
    pub order_validation_code: dronz_core::models::OrderValidationCode,
    pub cost_in_pence: u32,
}

impl From<&Order> for DeliveryRecord {
    fn from(order: &Order) -> Self {
        Self {
            order_no: order.order_no.clone(),
            order_status: order.order_status,
            order_validation_code: order.order_validation_code,
            cost_in_pence: order.price_total_in_pence,
        }
    }
}

#[derive(Debug, Serialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: &'static str,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    properties: serde_json::Map<String, serde_json::Value>,
    geometry: LineString,
}

#[derive(Debug, Serialize)]
struct LineString {
    #[serde(rename = "type")]
    kind: &'static str,
    coordinates: Vec<[f64; 2]>,
}

/// Flattens per-order route results into chronological flightpath records.
///
/// Each record is the edge between two consecutive directions; the leading
/// start hover contributes no record of its own, the terminal hover becomes
/// a 999-angle record whose endpoints are (near-)identical.
pub fn flatten_moves(results: &[RouteResult]) -> Vec<FlightMove> {
    let mut moves = Vec::new();
    for result in results {
        for pair in result.route.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            moves.push(FlightMove {
                order_no: result.order_no.clone(),
                from_longitude: from.position.lng,
                from_latitude: from.position.lat,
                angle: to.bearing.legacy_angle(),
                to_longitude: to.position.lng,
                to_latitude: to.position.lat,
                ticks_since_start_of_calculation: to.ticks_since_start,
            });
        }
    }
    moves
}

/// Writes the daily output files under a single directory.
pub struct OutputWriter {
    date: NaiveDate,
    dir: PathBuf,
}

impl OutputWriter {
    /// Creates the output directory if needed.
    pub fn new(date: NaiveDate, dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
        Ok(Self { date, dir })
    }

    /// `deliveries-DATE.json`: every processed order with its final status
    /// and validation code.
    pub fn write_deliveries(&self, orders: &[Order]) -> Result<PathBuf> {
        let records: Vec<DeliveryRecord> = orders.iter().map(DeliveryRecord::from).collect();
        self.write_json(&format!("deliveries-{}.json", self.date), &records)
    }

    /// `flightpath-DATE.json`: one record per drone move, all orders
    /// flattened in flight order.
    pub fn write_flightpath(&self, results: &[RouteResult]) -> Result<PathBuf> {
        self.write_json(
            &format!("flightpath-{}.json", self.date),
            &flatten_moves(results),
        )
    }

    /// `drone-DATE.geojson`: the whole day's flight as a single LineString.
    pub fn write_geojson(&self, results: &[RouteResult]) -> Result<PathBuf> {
        let coordinates: Vec<[f64; 2]> = results
            .iter()
            .flat_map(|result| &result.route)
            .map(|direction| [direction.position.lng, direction.position.lat])
            .collect();

        let collection = FeatureCollection {
            kind: "FeatureCollection",
            features: vec![Feature {
                kind: "Feature",
                properties: serde_json::Map::new(),
                geometry: LineString {
                    kind: "LineString",
                    coordinates,
                },
            }],
        };

        self.write_json(&format!("drone-{}.geojson", self.date), &collection)
    }

    fn write_json<T: Serialize>(&self, file_name: &str, data: &T) -> Result<PathBuf> {
        let path = self.dir.join(file_name);
        let json = serde_json::to_string_pretty(data)
            .with_context(|| format!("failed to serialize '{file_name}'"))?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        tracing::info!(path = %path.display(), "wrote output file");
        Ok(path)
    }
}

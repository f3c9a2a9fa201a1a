//! Data models for the water-sensor query API.

use serde::Serialize;

// ---

/// One row from the `water_data` table.
///
/// `timestamp` is kept as the raw stored string: grouping keys on the exact
/// string value, and serialization passes it through unmodified. Rows are
/// never mutated after being fetched; the grouping engine only regroups them.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct WaterReading {
    // ---
    pub id: i32,
    pub timestamp: String,
    pub location: String,
    pub water_level: f64,
}

/// Min/max aggregate over `water_level`, as returned by `/api/water-levels`.
///
/// Both bounds are `None` when the table is empty (SQL aggregates over zero
/// rows yield NULL), which serializes to JSON `null`.
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WaterLevelRange {
    // ---
    pub min_water_level: Option<f64>,
    pub max_water_level: Option<f64>,
}

/// Distinct-location count, as returned by `/api/unique-locations`.
#[derive(Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LocationCount {
    // ---
    pub unique_count: i64,
}

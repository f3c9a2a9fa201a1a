//! Read-only query endpoints over the `water_data` table.
//!
//! Every route here is a fixed SQL query returning JSON; `/api/day` is the
//! one exception, piping all rows through the grouping engine to return the
//! earliest day's readings. Data-source failures surface as 500 with the
//! underlying error message; a missing `date` parameter on `/api/timestamp`
//! is the only client error (400).

use axum::{
    extract::Query, extract::State, http::StatusCode, response::IntoResponse, response::Response,
    routing::get, Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use tracing::{error, info};

use crate::{grouping, LocationCount, WaterLevelRange, WaterReading};

// ---

pub fn router() -> Router<PgPool> {
    // ---
    Router::new()
        .route("/api/data", get(all_readings))
        .route("/api/timestamp", get(readings_for_date))
        .route("/api/day", get(earliest_day_readings))
        .route("/api/unique-locations", get(unique_locations))
        .route("/api/water-levels", get(water_levels))
}

/// Handle `GET /api/data` — every row in the table, unfiltered.
async fn all_readings(State(pool): State<PgPool>) -> Response {
    // ---
    match fetch_all_readings(&pool).await {
        Ok(rows) => {
            info!("GET /api/data - returning {} readings", rows.len());
            (StatusCode::OK, Json(json!({ "data": rows }))).into_response()
        }
        Err(e) => db_error("GET /api/data", e),
    }
}

/// Query parameters for the date filter endpoint.
///
/// `date` deserializes through [`NaiveDate`], so a present-but-malformed
/// value is rejected by the extractor with a 400 before the handler runs.
#[derive(Debug, Deserialize)]
struct DateQuery {
    date: Option<NaiveDate>,
}

/// Handle `GET /api/timestamp?date=YYYY-MM-DD` — rows for one calendar date.
async fn readings_for_date(
    Query(params): Query<DateQuery>,
    State(pool): State<PgPool>,
) -> Response {
    // ---
    let Some(date) = params.date else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Date query parameter is required" })),
        )
            .into_response();
    };

    // The date key of a stored ISO-8601-like timestamp string is its first
    // ten characters ("YYYY-MM-DD").
    let result = sqlx::query_as::<_, WaterReading>(
        r#"
        SELECT id, "timestamp", location, water_level
        FROM water_data
        WHERE left("timestamp", 10) = $1
        "#,
    )
    .bind(date.format("%Y-%m-%d").to_string())
    .fetch_all(&pool)
    .await;

    match result {
        Ok(rows) => {
            info!("GET /api/timestamp - {} readings for {}", rows.len(), date);
            (StatusCode::OK, Json(json!({ "data": rows }))).into_response()
        }
        Err(e) => db_error("GET /api/timestamp", e),
    }
}

/// Handle `GET /api/day` — readings sharing the chronologically earliest
/// timestamp key, or JSON `null` when the table is empty.
async fn earliest_day_readings(State(pool): State<PgPool>) -> Response {
    // ---
    let rows = match fetch_all_readings(&pool).await {
        Ok(rows) => rows,
        Err(e) => return db_error("GET /api/day", e),
    };

    let earliest = grouping::earliest_group_by(rows, |r: &WaterReading| r.timestamp.clone());
    match &earliest {
        Some(group) => info!("GET /api/day - earliest group has {} readings", group.len()),
        None => info!("GET /api/day - no data"),
    }

    // `None` serializes as null under "data", the explicit no-data marker.
    (StatusCode::OK, Json(json!({ "data": earliest }))).into_response()
}

/// Handle `GET /api/unique-locations` — count of distinct `location` values.
async fn unique_locations(State(pool): State<PgPool>) -> Response {
    // ---
    let result = sqlx::query_as::<_, LocationCount>(
        r#"SELECT COUNT(DISTINCT location) AS unique_count FROM water_data"#,
    )
    .fetch_one(&pool)
    .await;

    match result {
        Ok(count) => (StatusCode::OK, Json(count)).into_response(),
        Err(e) => db_error("GET /api/unique-locations", e),
    }
}

/// Handle `GET /api/water-levels` — min and max `water_level` over the table.
async fn water_levels(State(pool): State<PgPool>) -> Response {
    // ---
    let result = sqlx::query_as::<_, WaterLevelRange>(
        r#"
        SELECT MIN(water_level) AS min_water_level,
               MAX(water_level) AS max_water_level
        FROM water_data
        "#,
    )
    .fetch_one(&pool)
    .await;

    match result {
        Ok(range) => (StatusCode::OK, Json(range)).into_response(),
        Err(e) => db_error("GET /api/water-levels", e),
    }
}

// ---

/// Fetch every row, in whatever order the store provides.
///
/// No ordering is assumed downstream; the grouping engine derives its own.
async fn fetch_all_readings(pool: &PgPool) -> Result<Vec<WaterReading>, sqlx::Error> {
    // ---
    sqlx::query_as::<_, WaterReading>(
        r#"SELECT id, "timestamp", location, water_level FROM water_data"#,
    )
    .fetch_all(pool)
    .await
}

/// Build a 500 response carrying the data-source error message.
fn db_error(route: &str, e: sqlx::Error) -> Response {
    // ---
    error!("{} - database query failed: {}", route, e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
        .into_response()
}

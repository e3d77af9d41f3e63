use axum::extract::Query;
use axum::Json;
use serde::Deserialize;

use crate::services::pickup;

#[derive(Deserialize)]
pub struct PickupQuery {
    pub facility: Option<String>,
}

// GET /api/pickup-locations
pub async fn pickup_locations(Query(query): Query<PickupQuery>) -> Json<serde_json::Value> {
    match query.facility.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
        Some(facility) => {
            let region = pickup::region_for(facility);
            Json(serde_json::json!({
                "success": true,
                "facility": facility,
                "region": region,
                "timeBand": region.map(|r| r.time_band()),
                "locations": pickup::pickup_options_for(facility),
            }))
        }
        None => Json(serde_json::json!({
            "success": true,
            "facilities": pickup::facilities().collect::<Vec<_>>(),
        })),
    }
}

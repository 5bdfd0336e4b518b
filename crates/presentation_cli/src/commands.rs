//! Command implementations
//!
//! Each command returns the JSON document printed by `main`.

use std::sync::Arc;

use anyhow::Context;
use application::{
    AppContext, AppPorts, DirectionsPort, LocationSensorPort, PermissionPort, ReverseGeocoder,
    RouteResolver, RouteUpdate, SearchSettings,
};
use chrono::{DateTime, Utc};
use domain::{Coordinate, PassengerMode, PickupTimeMode, polyline};
use infrastructure::{
    AppConfig, FixedPermission, MapsAdapter, RecordingBookingAdapter, SimulatedSensor,
};
use serde_json::{Value, json};
use tracing::info;

pub fn maps_adapter(config: &AppConfig) -> anyhow::Result<Arc<MapsAdapter>> {
    let adapter = MapsAdapter::from_config(&config.maps)
        .context("failed to create maps client")?
        .with_retry(config.retry.to_retry_config());
    Ok(Arc::new(adapter))
}

fn search_settings(config: &AppConfig) -> SearchSettings {
    config
        .search
        .to_settings(&config.maps.language, config.maps.region())
}

pub async fn reverse(maps: Arc<MapsAdapter>, at: Coordinate) -> anyhow::Result<Value> {
    let address = ReverseGeocoder::new(maps).resolve_address(&at).await;
    Ok(json!({
        "coordinate": at,
        "label": address.label(),
        "components": address.components(),
        "degraded": address.is_degraded(),
    }))
}

pub async fn search(maps: Arc<MapsAdapter>, config: &AppConfig, query: &str) -> anyhow::Result<Value> {
    let controller = application::PlaceSearchController::new(maps, search_settings(config));
    let suggestions = controller.search_now(query).await?;
    Ok(json!({ "query": query, "suggestions": suggestions }))
}

pub async fn details(
    maps: Arc<MapsAdapter>,
    config: &AppConfig,
    place_id: &str,
) -> anyhow::Result<Value> {
    let controller = application::PlaceSearchController::new(maps, search_settings(config));
    let place = controller.fetch_details(place_id).await?;
    Ok(serde_json::to_value(place)?)
}

pub async fn route(maps: Arc<MapsAdapter>, from: Coordinate, to: Coordinate) -> anyhow::Result<Value> {
    let directions: Arc<dyn DirectionsPort> = maps;
    let route = RouteResolver::new(directions).compute_route(&from, &to).await?;
    Ok(serde_json::to_value(route)?)
}

pub fn decode(encoded: &str) -> anyhow::Result<Value> {
    let path = polyline::decode(encoded).context("invalid polyline")?;
    Ok(json!({ "points": path.len(), "path": path }))
}

/// Inputs for a scripted reservation
#[derive(Debug)]
pub struct ReserveRequest {
    pub device_position: Option<Coordinate>,
    pub deny_location: bool,
    pub destination: String,
    pub later: Option<DateTime<Utc>>,
    pub passenger_name: Option<String>,
    pub passenger_phone: Option<String>,
}

impl ReserveRequest {
    fn pickup_time_mode(&self) -> PickupTimeMode {
        self.later
            .map_or(PickupTimeMode::Now, |at| PickupTimeMode::Later { at })
    }

    fn passenger_mode(&self) -> PassengerMode {
        match &self.passenger_name {
            Some(name) => PassengerMode::Other {
                name: name.clone(),
                phone: self.passenger_phone.clone(),
            },
            None => PassengerMode::Myself,
        }
    }
}

pub async fn reserve(
    maps: Arc<MapsAdapter>,
    config: &AppConfig,
    request: ReserveRequest,
) -> anyhow::Result<Value> {
    let sensor: Arc<dyn LocationSensorPort> = Arc::new(
        request
            .device_position
            .map_or_else(SimulatedSensor::unavailable, SimulatedSensor::at),
    );
    let permission: Arc<dyn PermissionPort> = Arc::new(if request.deny_location {
        FixedPermission::denied()
    } else {
        FixedPermission::granted()
    });
    let booking = Arc::new(RecordingBookingAdapter::new());

    let ports = AppPorts {
        permission,
        sensor,
        geocoding: maps.clone(),
        directions: maps,
        booking,
    };
    let ctx = AppContext::new(ports, config.to_context_config()?);
    let reservation = ctx.begin_reservation();

    let pickup = reservation.initialize().await?;
    info!(pickup = %pickup.label, "Pickup established");
    reservation.confirm_pickup()?;

    let suggestions = reservation.search().search_now(&request.destination).await?;
    let first = suggestions
        .first()
        .with_context(|| format!("no places match \"{}\"", request.destination))?;
    let destination = reservation.choose_destination(&first.id).await?;

    let route = match reservation.update_route().await {
        RouteUpdate::Computed(route) => json!(route),
        RouteUpdate::Retained { notice, .. } => json!({ "notice": notice }),
        RouteUpdate::NotReady => Value::Null,
    };

    reservation.set_pickup_time_mode(request.pickup_time_mode())?;
    reservation.set_passenger_mode(request.passenger_mode())?;
    reservation.confirm_preferences()?;

    let payload = reservation.snapshot().finalize()?;
    let reference = reservation.submit().await?;
    ctx.shutdown();

    Ok(json!({
        "reference": reference,
        "pickup": pickup,
        "destination": destination,
        "route": route,
        "booking": payload,
    }))
}

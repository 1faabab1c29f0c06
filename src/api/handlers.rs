use crate::network::{DeviceSnapshot, Network};
use crate::ran::CellSnapshot;
use crate::smf::SessionSnapshot;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

pub async fn list_cells(State(network): State<Arc<Network>>) -> Json<Vec<CellSnapshot>> {
    Json(network.cells())
}

pub async fn list_devices(State(network): State<Arc<Network>>) -> Json<Vec<DeviceSnapshot>> {
    Json(network.devices())
}

pub async fn list_sessions(State(network): State<Arc<Network>>) -> Json<Vec<SessionSnapshot>> {
    Json(network.sessions())
}

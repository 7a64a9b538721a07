#![cfg(feature = "web")]

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use log::info;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::cell::{cell_name, parse_cell_name};
use crate::config::GridConfig;
use crate::error::GridError;
use crate::spreadsheet::Spreadsheet;
use crate::tables::{StoredTable, TableStore};

/// Shared server state: one grid and the table storage, each behind its own lock.
pub struct AppState {
    sheet: Mutex<Spreadsheet>,
    tables: Mutex<TableStore>,
}

impl AppState {
    pub fn new(config: &GridConfig) -> Self {
        AppState {
            sheet: Mutex::new(Spreadsheet::from_config(config)),
            tables: Mutex::new(TableStore::new()),
        }
    }

    fn sheet(&self) -> MutexGuard<'_, Spreadsheet> {
        self.sheet.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tables(&self) -> MutexGuard<'_, TableStore> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Deserialize)]
struct CellUpdate {
    cell: String,
    value: String,
}

#[derive(Serialize)]
struct CellResponse {
    status: String,
    value: String,
    width: u32,
}

#[derive(Deserialize)]
struct ResizeRequest {
    col: usize,
    width: u32,
}

#[derive(Deserialize)]
struct RenameRequest {
    name: String,
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

impl StatusResponse {
    fn ok() -> Self {
        StatusResponse {
            status: "ok".to_string(),
            message: None,
        }
    }
}

impl IntoResponse for GridError {
    fn into_response(self) -> Response {
        let status = match &self {
            GridError::OutOfRange { .. }
            | GridError::ColumnOutOfRange { .. }
            | GridError::InvalidCellName(_)
            | GridError::InvalidCommand(_)
            | GridError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            GridError::TableNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = StatusResponse {
            status: "error".to_string(),
            message: Some(self.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/sheet", get(get_sheet_data))
        .route("/api/cell/:cell_name", get(get_cell))
        .route("/api/update_cell", post(update_cell))
        .route("/api/resize", post(resize_column))
        .route("/api/clear", post(clear_sheet))
        .route("/api/rename", post(rename_sheet))
        .route("/api/export/csv", get(export_csv))
        .route("/api/export/png", get(export_png))
        .route("/api/export/xlsx", get(export_xlsx))
        .route("/api/tables", get(list_tables).post(create_table))
        .route("/api/tables/:id", put(update_table))
        .route("/api/tables/:id/open", post(open_table))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(config: GridConfig, addr: SocketAddr) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let app_state = Arc::new(AppState::new(&config));
    let app = router(app_state);

    let listener = TcpListener::bind(addr).await?;
    info!(
        "serving {}x{} grid {:?} on http://{}",
        config.rows, config.cols, config.name, addr
    );
    axum::serve(listener, app).await?;

    Ok(())
}

async fn get_sheet_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (snapshot, manual) = {
        let sheet = state.sheet();
        (sheet.snapshot(), sheet.manual_columns())
    };

    let cell_data: Vec<_> = snapshot
        .cells
        .iter_row_major()
        .filter(|(_, _, value)| !value.is_empty())
        .map(|(r, c, value)| {
            serde_json::json!({
                "row": r,
                "col": c,
                "name": cell_name(r, c),
                "value": value,
            })
        })
        .collect();

    Json(serde_json::json!({
        "name": snapshot.name,
        "rows": snapshot.cells.rows(),
        "cols": snapshot.cells.cols(),
        "widths": snapshot.widths,
        "manual_columns": manual,
        "cells": cell_data,
    }))
}

async fn get_cell(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, GridError> {
    let sheet = state.sheet();
    let (row, col) = parse_cell_name(&name, sheet.rows(), sheet.cols())?;
    Ok(Json(serde_json::json!({
        "name": cell_name(row, col),
        "row": row,
        "col": col,
        "value": sheet.get_cell(row, col)?,
        "width": sheet.width_of(col)?,
    })))
}

async fn update_cell(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CellUpdate>,
) -> Result<Json<CellResponse>, GridError> {
    let mut sheet = state.sheet();
    let (row, col) = parse_cell_name(&payload.cell, sheet.rows(), sheet.cols())?;
    sheet.set_cell(row, col, &payload.value)?;

    Ok(Json(CellResponse {
        status: "ok".to_string(),
        value: sheet.get_cell(row, col)?.to_string(),
        width: sheet.width_of(col)?,
    }))
}

async fn resize_column(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResizeRequest>,
) -> Result<impl IntoResponse, GridError> {
    let width = state.sheet().resize_column(payload.col, payload.width)?;
    Ok(Json(serde_json::json!({ "status": "ok", "col": payload.col, "width": width })))
}

async fn clear_sheet(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    state.sheet().clear();
    Json(StatusResponse::ok())
}

async fn rename_sheet(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RenameRequest>,
) -> Json<StatusResponse> {
    state.sheet().rename(&payload.name);
    Json(StatusResponse::ok())
}

fn attachment(content_type: &'static str, filename: &str, body: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", filename.replace('"', "'"));
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

// Exports copy the grid under the lock and encode after releasing it.

async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.sheet().snapshot();
    attachment(
        "text/csv; charset=utf-8",
        &snapshot.csv_filename(),
        snapshot.to_csv().into_bytes(),
    )
}

async fn export_png(State(state): State<Arc<AppState>>) -> Result<Response, GridError> {
    let snapshot = state.sheet().snapshot();
    let png = snapshot.to_png()?;
    Ok(attachment("image/png", &snapshot.png_filename(), png))
}

async fn export_xlsx(State(state): State<Arc<AppState>>) -> Result<Response, GridError> {
    let snapshot = state.sheet().snapshot();
    let xlsx = snapshot.to_xlsx()?;
    Ok(attachment(
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        &snapshot.xlsx_filename(),
        xlsx,
    ))
}

async fn list_tables(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let tables = state.tables();
    let listed: Vec<&StoredTable> = tables.list();
    Json(serde_json::json!({ "tables": listed }))
}

async fn create_table(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let payload = state.sheet().to_payload();
    let table = state.tables().create(payload);
    Json(serde_json::json!({
        "table": { "id": table.id, "name": table.name, "created_at": table.created_at }
    }))
}

async fn update_table(
    Path(id): Path<u64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, GridError> {
    let payload = state.sheet().to_payload();
    state.tables().update(id, payload)?;
    Ok(Json(StatusResponse::ok()))
}

async fn open_table(
    Path(id): Path<u64>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, GridError> {
    let payload = state.tables().get(id)?.payload();
    let applied = state.sheet().load_payload(&payload);
    Ok(Json(serde_json::json!({ "status": "ok", "cells": applied })))
}

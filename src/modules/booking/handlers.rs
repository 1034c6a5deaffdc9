use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::{BookAppointmentPayload, SetAvailabilityPayload};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}

pub async fn set_availability(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<SetAvailabilityPayload>,
) -> AppResult<impl IntoResponse> {
    caller.require_professor()?;
    let record = state
        .engine
        .set_availability(caller.id, &payload.date, payload.slots)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_availability(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(professor_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<impl IntoResponse> {
    let records = state
        .engine
        .get_availability(professor_id, query.date.as_deref())
        .await?;
    Ok(Json(records))
}

pub async fn book_appointment(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<BookAppointmentPayload>,
) -> AppResult<impl IntoResponse> {
    caller.require_student()?;
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let appointment = state
        .engine
        .book(caller.id, payload.professor_id, &payload.date, &payload.time_slot)
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

pub async fn my_appointments(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<impl IntoResponse> {
    let appointments = state.engine.list_mine(caller.id, caller.role).await?;
    Ok(Json(appointments))
}

pub async fn professor_appointments(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<impl IntoResponse> {
    caller.require_professor()?;
    let appointments = state.engine.list_for_professor(caller.id).await?;
    Ok(Json(appointments))
}

pub async fn appointment_by_id(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let appointment = state.engine.get_by_id(id, caller.id, caller.role).await?;
    Ok(Json(appointment))
}

pub async fn cancel_appointment(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    caller.require_professor()?;
    let appointment = state.engine.cancel(id, caller.id).await?;
    Ok(Json(appointment))
}

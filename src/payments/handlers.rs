use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::error::AppError;
use crate::state::AppState;

use super::dto::{CreatePaymentRequest, ListPaymentsResponse, ListQuery};
use super::export;
use super::method::Method;
use super::repo::{NewPayment, Payment};
use super::summary::summarize;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pagos", post(create_payment).get(list_payments))
        .route("/pagos/dates", get(payment_dates))
        .route("/pagos/download/:date", get(download_payments))
        .route("/pagos/:id", delete(delete_payment))
}

#[instrument(skip(state, payload))]
async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    let method = Method::parse(&payload.method).ok_or_else(|| {
        AppError::Validation(format!("unknown payment method \"{}\"", payload.method))
    })?;
    let amount = payload
        .amount
        .as_decimal()
        .ok_or_else(|| AppError::Validation("amount must be a finite number".into()))?;
    let date = payload.date.trim().to_string();
    let timestamp = OffsetDateTime::parse(&date, &Rfc3339)
        .map_err(|_| AppError::Validation("date must be an ISO-8601 timestamp".into()))?;
    let shift = match payload.shift.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default_shift(timestamp.hour()),
    };

    let new = NewPayment {
        method,
        amount,
        date,
        branch_id: payload.branch_id,
        user: payload.user,
        shift,
    };
    let payment = Payment::record(&state.db, &new).await?;
    info!(
        id = payment.id,
        method = %payment.method,
        branch = %payment.branch_id,
        "payment recorded"
    );
    Ok((StatusCode::CREATED, Json(payment)))
}

#[instrument(skip(state))]
async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListPaymentsResponse>, AppError> {
    let date = parse_day(&query.date)?;
    let data = Payment::list_for_date_and_branch(&state.db, &date, &query.branch).await?;
    let totals = summarize(&data).into();
    Ok(Json(ListPaymentsResponse { data, totals }))
}

#[instrument(skip(state))]
async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    Payment::soft_delete(&state.db, id).await?;
    info!(id, "payment soft-deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn payment_dates(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(Payment::list_distinct_dates(&state.db).await?))
}

#[instrument(skip(state))]
async fn download_payments(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_day(&date)?;
    let rows = Payment::list_for_date(&state.db, &date).await?;
    let body = export::to_csv(&rows)?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"pagos-{date}.csv\""),
        ),
    ];
    Ok((headers, body))
}

/// Registers run a split day; anything before 14:00 counts as the morning
/// shift.
fn default_shift(hour: u8) -> String {
    if hour < 14 {
        "morning".into()
    } else {
        "afternoon".into()
    }
}

fn parse_day(raw: &str) -> Result<String, AppError> {
    let raw = raw.trim();
    time::Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|_| AppError::Validation("date must look like YYYY-MM-DD".into()))?;
    Ok(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_parsing_accepts_calendar_dates_only() {
        assert!(parse_day("2024-05-01").is_ok());
        assert!(parse_day(" 2024-05-01 ").is_ok());
        assert!(parse_day("2024-13-01").is_err());
        assert!(parse_day("01/05/2024").is_err());
        assert!(parse_day("2024-05-01T10:00:00Z").is_err());
    }

    #[test]
    fn shift_defaults_split_at_two_pm() {
        assert_eq!(default_shift(9), "morning");
        assert_eq!(default_shift(13), "morning");
        assert_eq!(default_shift(14), "afternoon");
        assert_eq!(default_shift(22), "afternoon");
    }
}

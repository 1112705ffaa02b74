use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use volt_core::{
    AmenityCatalog, BookingDraft, BookingRecord, BookingStep, BookingWizard, CostBreakdown,
    PaymentMethod, PaymentOption,
};
use volt_engine::Confirmation;

use crate::app_state::SharedState;
use crate::error::ApiError;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBookingRequest {
    pub station_id: String,
}

/// Slot fields left out are kept as they are
#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRequest {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodRequest {
    pub method: PaymentMethod,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardResponse {
    pub wizard_id: Uuid,
    pub station_id: String,
    pub step: BookingStep,
    pub draft: BookingDraft,
    pub can_advance: bool,
    pub payment_method: PaymentMethod,
    /// Absent when the station cannot be priced
    pub breakdown: Option<CostBreakdown>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodsResponse {
    pub total: u64,
    pub wallet_balance: u64,
    pub options: Vec<PaymentOption>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsResponse {
    pub bookings: Vec<BookingRecord>,
}

fn wizard_response(
    wizard_id: Uuid,
    wizard: &BookingWizard,
    catalog: &AmenityCatalog,
) -> WizardResponse {
    WizardResponse {
        wizard_id,
        station_id: wizard.station().id.clone(),
        step: wizard.step(),
        draft: wizard.draft().clone(),
        can_advance: wizard.can_advance(),
        payment_method: wizard.payment_method(),
        breakdown: wizard.quote(catalog).ok(),
    }
}

/// Open a booking flow for a station
pub async fn start_booking(
    State(app_state): State<SharedState>,
    Json(payload): Json<StartBookingRequest>,
) -> Result<(StatusCode, Json<WizardResponse>), ApiError> {
    let mut marketplace = app_state.lock()?;
    let wizard_id = marketplace.open_wizard(&payload.station_id, Utc::now())?;
    let wizard = marketplace.wizard(wizard_id)?;
    tracing::info!(
        "Starting booking {} for station {}",
        wizard_id,
        payload.station_id
    );
    Ok((
        StatusCode::CREATED,
        Json(wizard_response(wizard_id, wizard, &marketplace.catalog)),
    ))
}

pub async fn get_booking(
    State(app_state): State<SharedState>,
    Path(wizard_id): Path<Uuid>,
) -> Result<Json<WizardResponse>, ApiError> {
    let marketplace = app_state.lock()?;
    let wizard = marketplace.wizard(wizard_id)?;
    Ok(Json(wizard_response(wizard_id, wizard, &marketplace.catalog)))
}

/// Set the date, time and duration of the session
pub async fn update_slot(
    State(app_state): State<SharedState>,
    Path(wizard_id): Path<Uuid>,
    Json(payload): Json<SlotRequest>,
) -> Result<Json<WizardResponse>, ApiError> {
    let mut marketplace = app_state.lock()?;
    let today = Utc::now().date_naive();
    marketplace.wizard_mut(wizard_id)?.select_slot(
        payload.date,
        payload.time,
        payload.duration_minutes,
        today,
    )?;

    let wizard = marketplace.wizard(wizard_id)?;
    Ok(Json(wizard_response(wizard_id, wizard, &marketplace.catalog)))
}

pub async fn advance(
    State(app_state): State<SharedState>,
    Path(wizard_id): Path<Uuid>,
) -> Result<Json<WizardResponse>, ApiError> {
    let mut marketplace = app_state.lock()?;
    marketplace.wizard_mut(wizard_id)?.advance()?;
    let wizard = marketplace.wizard(wizard_id)?;
    Ok(Json(wizard_response(wizard_id, wizard, &marketplace.catalog)))
}

pub async fn back(
    State(app_state): State<SharedState>,
    Path(wizard_id): Path<Uuid>,
) -> Result<Json<WizardResponse>, ApiError> {
    let mut marketplace = app_state.lock()?;
    marketplace.wizard_mut(wizard_id)?.back()?;
    let wizard = marketplace.wizard(wizard_id)?;
    Ok(Json(wizard_response(wizard_id, wizard, &marketplace.catalog)))
}

/// Add or remove an amenity from the booking
pub async fn toggle_amenity(
    State(app_state): State<SharedState>,
    Path((wizard_id, amenity_id)): Path<(Uuid, String)>,
) -> Result<Json<WizardResponse>, ApiError> {
    let mut marketplace = app_state.lock()?;
    let marketplace = &mut *marketplace;
    let wizard = marketplace
        .wizards
        .get_mut(&wizard_id)
        .map(|open| &mut open.wizard)
        .ok_or(ApiError::WizardNotFound { wizard_id })?;
    wizard.toggle_amenity(&amenity_id, &marketplace.catalog)?;
    Ok(Json(wizard_response(wizard_id, wizard, &marketplace.catalog)))
}

pub async fn payment_methods(
    State(app_state): State<SharedState>,
    Path(wizard_id): Path<Uuid>,
) -> Result<Json<PaymentMethodsResponse>, ApiError> {
    let marketplace = app_state.lock()?;
    let wizard = marketplace.wizard(wizard_id)?;
    let wallet_balance = marketplace.wallet.balance();
    let total = wizard.quote(&marketplace.catalog)?.total;
    Ok(Json(PaymentMethodsResponse {
        total,
        wallet_balance,
        options: wizard.payment_options(&marketplace.catalog, wallet_balance)?,
    }))
}

pub async fn select_payment_method(
    State(app_state): State<SharedState>,
    Path(wizard_id): Path<Uuid>,
    Json(payload): Json<PaymentMethodRequest>,
) -> Result<Json<WizardResponse>, ApiError> {
    let mut marketplace = app_state.lock()?;
    let marketplace = &mut *marketplace;
    let wallet_balance = marketplace.wallet.balance();
    let wizard = marketplace
        .wizards
        .get_mut(&wizard_id)
        .map(|open| &mut open.wizard)
        .ok_or(ApiError::WizardNotFound { wizard_id })?;
    wizard.select_payment_method(payload.method, &marketplace.catalog, wallet_balance)?;
    Ok(Json(wizard_response(wizard_id, wizard, &marketplace.catalog)))
}

/// Pay for the booking and store it.
///
/// The state lock is released while the payment is in flight.
pub async fn submit(
    State(app_state): State<SharedState>,
    Path(wizard_id): Path<Uuid>,
) -> Result<Json<Confirmation>, ApiError> {
    let checkout = {
        let marketplace = app_state.lock()?;
        let wizard = marketplace.wizard(wizard_id)?;
        app_state
            .service
            .prepare(wizard, &marketplace.catalog, &marketplace.wallet)?
    };

    app_state.service.process(&checkout).await?;

    let mut marketplace = app_state.lock()?;
    let marketplace = &mut *marketplace;
    let wizard = marketplace
        .wizards
        .get_mut(&wizard_id)
        .map(|open| &mut open.wizard)
        .ok_or(ApiError::WizardNotFound { wizard_id })?;
    let confirmation =
        app_state
            .service
            .finalize(wizard, &mut marketplace.wallet, checkout, Utc::now())?;
    marketplace.close_wizard(wizard_id);
    Ok(Json(confirmation))
}

/// Stored bookings, newest first
pub async fn list_bookings(
    State(app_state): State<SharedState>,
) -> Result<Json<BookingsResponse>, ApiError> {
    Ok(Json(BookingsResponse {
        bookings: app_state.service.bookings()?,
    }))
}

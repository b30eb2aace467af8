use std::sync::Mutex;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rusqlite::{Connection, TransactionBehavior};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, Dashboard, DashboardStatus, PackageType};
use crate::services::payments::{ChargeRequest, PaymentProvider};

pub const CURRENCY: &str = "USD";

pub struct HoldRequest {
    pub event_date: NaiveDate,
    pub package_type: PackageType,
    pub client_email: String,
    pub client_name: Option<String>,
    pub hold_hours: i64,
}

#[derive(Debug)]
pub struct HoldOutcome {
    pub booking: Booking,
    pub dashboard: Dashboard,
}

/// Reserve a calendar date for `hold_hours` before any money moves.
///
/// The availability check and the insert run in one IMMEDIATE transaction.
/// The check is only the friendly fast path; the UNIQUE index on
/// `bookings.event_date` decides the race when two requests arrive for the
/// same unheld date, and losing that race surfaces as a conflict.
pub fn request_hold(
    conn: &mut Connection,
    request: &HoldRequest,
    now: NaiveDateTime,
) -> Result<HoldOutcome, AppError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let client = queries::find_or_create_user(
        &tx,
        &request.client_email,
        request.client_name.as_deref(),
    )?;

    if let Some(existing) = queries::get_booking_by_date(&tx, request.event_date)? {
        if existing.blocks_date_at(now) {
            return Err(AppError::Conflict);
        }
        // Hold expired and deposit never paid: the stale row gives up the
        // slot so the fresh insert can satisfy the unique index.
        tracing::info!(
            booking_id = %existing.id,
            event_date = %request.event_date,
            "superseding expired hold"
        );
        queries::delete_booking(&tx, &existing.id)?;
    }

    let costs = request.package_type.base_costs();
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        client_id: client.id.clone(),
        event_date: request.event_date,
        package_type: request.package_type,
        total_cost: costs.total,
        deposit_amount: costs.deposit,
        balance_amount: costs.balance,
        deposit_paid: false,
        deposit_payment_id: None,
        balance_payment_id: None,
        held_until: Some(now + Duration::hours(request.hold_hours)),
        status: BookingStatus::PendingDeposit,
        created_at: now,
        updated_at: now,
    };

    if let Err(e) = queries::create_booking(&tx, &booking) {
        if is_unique_violation(&e) {
            return Err(AppError::Conflict);
        }
        return Err(e.into());
    }

    let dashboard = Dashboard {
        id: Uuid::new_v4().to_string(),
        booking_id: booking.id.clone(),
        client_id: client.id,
        total_cost: 0,
        status: DashboardStatus::Building,
        questionnaire: serde_json::json!({}),
        created_at: now,
        updated_at: now,
    };
    queries::create_dashboard(&tx, &dashboard)?;

    tx.commit()?;

    tracing::info!(
        booking_id = %booking.id,
        event_date = %booking.event_date,
        package = request.package_type.as_str(),
        "date held"
    );

    Ok(HoldOutcome { booking, dashboard })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Charge the fixed deposit and confirm the booking.
///
/// A declined or failed charge leaves the booking untouched; the hold keeps
/// its original expiry, so the client can retry until the window closes.
pub async fn pay_deposit(
    db: &Mutex<Connection>,
    payments: &dyn PaymentProvider,
    booking_id: &str,
    source_id: &str,
    now: NaiveDateTime,
) -> Result<String, AppError> {
    let booking = {
        let conn = db.lock().unwrap();
        queries::get_booking_by_id(&conn, booking_id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?
    };

    if booking.deposit_paid {
        return Err(AppError::AlreadyPaid);
    }

    // Each submission is a fresh attempt with its own idempotency key.
    let charge = payments
        .charge(&ChargeRequest {
            amount_minor: booking.deposit_amount,
            currency: CURRENCY,
            source_id: source_id.to_string(),
            idempotency_key: Uuid::new_v4().to_string(),
        })
        .await?;

    let conn = db.lock().unwrap();
    if let Err(e) =
        queries::record_payment_marker(&conn, &booking.id, "deposit", booking.deposit_amount, &charge.payment_id)
    {
        tracing::error!(
            booking_id = %booking.id,
            payment_id = %charge.payment_id,
            error = %e,
            "deposit charged but audit marker write failed; reconcile manually"
        );
        return Err(e.into());
    }
    if let Err(e) = queries::mark_deposit_paid(&conn, &booking.id, &charge.payment_id, now) {
        // Money moved but the booking row did not. The marker stays
        // 'pending' so the orphaned charge shows up in reconciliation.
        tracing::error!(
            booking_id = %booking.id,
            payment_id = %charge.payment_id,
            error = %e,
            "deposit charged but booking update failed; reconcile manually"
        );
        return Err(e.into());
    }
    queries::mark_payment_applied(&conn, &charge.payment_id)?;

    tracing::info!(booking_id = %booking.id, payment_id = %charge.payment_id, "deposit paid");
    Ok(charge.payment_id)
}

/// Charge the remaining balance and finalize the companion dashboard.
/// Fast packages owe their fixed balance; custom packages owe whatever the
/// dashboard's selected services add up to.
pub async fn pay_balance(
    db: &Mutex<Connection>,
    payments: &dyn PaymentProvider,
    booking_id: &str,
    source_id: &str,
    now: NaiveDateTime,
) -> Result<String, AppError> {
    let (booking, dashboard) = {
        let conn = db.lock().unwrap();
        let booking = queries::get_booking_by_id(&conn, booking_id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;
        let dashboard = queries::get_dashboard_by_booking(&conn, booking_id)?;
        (booking, dashboard)
    };

    if !booking.deposit_paid {
        return Err(AppError::InvalidState(
            "deposit has not been paid".to_string(),
        ));
    }
    if booking.status == BookingStatus::BalancePaid {
        return Err(AppError::InvalidState("balance already paid".to_string()));
    }

    let amount = match booking.package_type {
        PackageType::Fast => booking.balance_amount,
        PackageType::Custom => dashboard.as_ref().map(|d| d.total_cost).unwrap_or(0),
    };
    if amount <= 0 {
        return Err(AppError::InvalidState("no balance due".to_string()));
    }

    let charge = payments
        .charge(&ChargeRequest {
            amount_minor: amount,
            currency: CURRENCY,
            source_id: source_id.to_string(),
            idempotency_key: Uuid::new_v4().to_string(),
        })
        .await?;

    let conn = db.lock().unwrap();
    if let Err(e) =
        queries::record_payment_marker(&conn, &booking.id, "balance", amount, &charge.payment_id)
    {
        tracing::error!(
            booking_id = %booking.id,
            payment_id = %charge.payment_id,
            error = %e,
            "balance charged but audit marker write failed; reconcile manually"
        );
        return Err(e.into());
    }
    if let Err(e) = queries::mark_balance_paid(&conn, &booking.id, &charge.payment_id, amount, now)
    {
        tracing::error!(
            booking_id = %booking.id,
            payment_id = %charge.payment_id,
            error = %e,
            "balance charged but booking update failed; reconcile manually"
        );
        return Err(e.into());
    }
    if let Some(dashboard) = &dashboard {
        queries::set_dashboard_status(&conn, &dashboard.id, &DashboardStatus::Finalized, now)?;
    }
    queries::mark_payment_applied(&conn, &charge.payment_id)?;

    tracing::info!(booking_id = %booking.id, payment_id = %charge.payment_id, amount, "balance paid");
    Ok(charge.payment_id)
}

/// Give the date back. Only the owner may release, and only while the
/// deposit is unpaid; the dashboard and its rows go with the booking.
pub fn release_hold(
    conn: &Connection,
    booking_id: &str,
    requester_email: &str,
) -> Result<(), AppError> {
    let booking = queries::get_booking_by_id(conn, booking_id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;

    let owner = queries::get_user_by_id(conn, &booking.client_id)?;
    match owner {
        Some(user) if user.email == requester_email => {}
        _ => return Err(AppError::Forbidden),
    }

    if booking.deposit_paid {
        return Err(AppError::InvalidState(
            "cannot release a date after the deposit is paid".to_string(),
        ));
    }

    queries::delete_booking(conn, booking_id)?;
    tracing::info!(booking_id = %booking.id, event_date = %booking.event_date, "date released");
    Ok(())
}

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::models::{
    Booking, BookingStatus, Dashboard, DashboardService, DashboardStatus, Message, PackageType,
    Role, User, Vendor,
};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

fn fmt_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).unwrap_or_else(|_| Utc::now().naive_utc())
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap_or_else(|_| Utc::now().date_naive())
}

// ── Users ──

pub fn get_user_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, email, full_name, role, created_at FROM users WHERE email = ?1",
        params![email],
        parse_user_row,
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<User>> {
    let result = conn.query_row(
        "SELECT id, email, full_name, role, created_at FROM users WHERE id = ?1",
        params![id],
        parse_user_row,
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Clients are provisioned lazily the first time an identity shows up,
/// the same way the original signup-less hold flow worked.
pub fn find_or_create_user(
    conn: &Connection,
    email: &str,
    full_name: Option<&str>,
) -> rusqlite::Result<User> {
    if let Some(user) = get_user_by_email(conn, email)? {
        return Ok(user);
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        full_name: full_name.unwrap_or("").to_string(),
        role: Role::Client,
        created_at: fmt_datetime(&Utc::now().naive_utc()),
    };

    conn.execute(
        "INSERT INTO users (id, email, full_name, role, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user.id,
            user.email,
            user.full_name,
            user.role.as_str(),
            user.created_at
        ],
    )?;
    Ok(user)
}

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let role: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        role: Role::parse(&role),
        created_at: row.get(4)?,
    })
}

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, client_id, event_date, package_type, total_cost, deposit_amount,
                               balance_amount, deposit_paid, deposit_payment_id, balance_payment_id,
                               held_until, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            booking.id,
            booking.client_id,
            booking.event_date.format(DATE_FORMAT).to_string(),
            booking.package_type.as_str(),
            booking.total_cost,
            booking.deposit_amount,
            booking.balance_amount,
            booking.deposit_paid as i32,
            booking.deposit_payment_id,
            booking.balance_payment_id,
            booking.held_until.as_ref().map(fmt_datetime),
            booking.status.as_str(),
            fmt_datetime(&booking.created_at),
            fmt_datetime(&booking.updated_at),
        ],
    )?;
    Ok(())
}

const BOOKING_COLUMNS: &str = "id, client_id, event_date, package_type, total_cost, deposit_amount, \
     balance_amount, deposit_paid, deposit_payment_id, balance_payment_id, held_until, status, \
     created_at, updated_at";

pub fn get_booking_by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        parse_booking_row,
    );

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn get_booking_by_date(conn: &Connection, date: NaiveDate) -> rusqlite::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE event_date = ?1"),
        params![date.format(DATE_FORMAT).to_string()],
        parse_booking_row,
    );

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn get_all_bookings(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> rusqlite::Result<Vec<Booking>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            format!(
                "SELECT {BOOKING_COLUMNS} FROM bookings WHERE status = ?1 \
                 ORDER BY event_date ASC LIMIT ?2"
            ),
            vec![
                Box::new(status.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            format!("SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY event_date ASC LIMIT ?1"),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

pub fn delete_booking(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn mark_deposit_paid(
    conn: &Connection,
    id: &str,
    payment_id: &str,
    now: NaiveDateTime,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET deposit_paid = 1, deposit_payment_id = ?2,
                status = 'deposit_paid', held_until = NULL, updated_at = ?3
         WHERE id = ?1",
        params![id, payment_id, fmt_datetime(&now)],
    )?;
    Ok(count > 0)
}

pub fn mark_balance_paid(
    conn: &Connection,
    id: &str,
    payment_id: &str,
    amount: i64,
    now: NaiveDateTime,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = 'balance_paid', balance_payment_id = ?2,
                balance_amount = ?3, total_cost = deposit_amount + ?3, updated_at = ?4
         WHERE id = ?1",
        params![id, payment_id, amount, fmt_datetime(&now)],
    )?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let event_date: String = row.get(2)?;
    let package_type: String = row.get(3)?;
    let held_until: Option<String> = row.get(10)?;
    let status: String = row.get(11)?;
    let created_at: String = row.get(12)?;
    let updated_at: String = row.get(13)?;

    Ok(Booking {
        id: row.get(0)?,
        client_id: row.get(1)?,
        event_date: parse_date(&event_date),
        package_type: PackageType::parse(&package_type),
        total_cost: row.get(4)?,
        deposit_amount: row.get(5)?,
        balance_amount: row.get(6)?,
        deposit_paid: row.get::<_, i32>(7)? != 0,
        deposit_payment_id: row.get(8)?,
        balance_payment_id: row.get(9)?,
        held_until: held_until.as_deref().map(parse_datetime),
        status: BookingStatus::parse(&status),
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

// ── Dashboards ──

pub fn create_dashboard(conn: &Connection, dashboard: &Dashboard) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO dashboards (id, booking_id, client_id, total_cost, status, questionnaire,
                                 created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            dashboard.id,
            dashboard.booking_id,
            dashboard.client_id,
            dashboard.total_cost,
            dashboard.status.as_str(),
            dashboard.questionnaire.to_string(),
            fmt_datetime(&dashboard.created_at),
            fmt_datetime(&dashboard.updated_at),
        ],
    )?;
    Ok(())
}

const DASHBOARD_COLUMNS: &str =
    "id, booking_id, client_id, total_cost, status, questionnaire, created_at, updated_at";

pub fn get_dashboard_by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<Dashboard>> {
    let result = conn.query_row(
        &format!("SELECT {DASHBOARD_COLUMNS} FROM dashboards WHERE id = ?1"),
        params![id],
        parse_dashboard_row,
    );

    match result {
        Ok(dashboard) => Ok(Some(dashboard)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn get_dashboard_by_booking(
    conn: &Connection,
    booking_id: &str,
) -> rusqlite::Result<Option<Dashboard>> {
    let result = conn.query_row(
        &format!("SELECT {DASHBOARD_COLUMNS} FROM dashboards WHERE booking_id = ?1"),
        params![booking_id],
        parse_dashboard_row,
    );

    match result {
        Ok(dashboard) => Ok(Some(dashboard)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn update_dashboard(
    conn: &Connection,
    id: &str,
    status: Option<&DashboardStatus>,
    questionnaire: Option<&serde_json::Value>,
    now: NaiveDateTime,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE dashboards SET status = COALESCE(?2, status),
                questionnaire = COALESCE(?3, questionnaire), updated_at = ?4
         WHERE id = ?1",
        params![
            id,
            status.map(|s| s.as_str()),
            questionnaire.map(|q| q.to_string()),
            fmt_datetime(&now),
        ],
    )?;
    Ok(count > 0)
}

pub fn set_dashboard_status(
    conn: &Connection,
    id: &str,
    status: &DashboardStatus,
    now: NaiveDateTime,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE dashboards SET status = ?2, updated_at = ?3 WHERE id = ?1",
        params![id, status.as_str(), fmt_datetime(&now)],
    )?;
    Ok(count > 0)
}

fn parse_dashboard_row(row: &rusqlite::Row) -> rusqlite::Result<Dashboard> {
    let status: String = row.get(4)?;
    let questionnaire: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(Dashboard {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        client_id: row.get(2)?,
        total_cost: row.get(3)?,
        status: DashboardStatus::parse(&status),
        questionnaire: serde_json::from_str(&questionnaire).unwrap_or(serde_json::json!({})),
        created_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
    })
}

// ── Dashboard services ──

pub fn insert_dashboard_service(
    conn: &Connection,
    service: &DashboardService,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO dashboard_services (id, dashboard_id, vendor_id, service, description, cost,
                                         created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            service.id,
            service.dashboard_id,
            service.vendor_id,
            service.service,
            service.description,
            service.cost,
            service.created_at,
        ],
    )?;
    Ok(())
}

pub fn delete_dashboard_service(
    conn: &Connection,
    dashboard_id: &str,
    service_id: &str,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "DELETE FROM dashboard_services WHERE id = ?1 AND dashboard_id = ?2",
        params![service_id, dashboard_id],
    )?;
    Ok(count > 0)
}

pub fn get_dashboard_services(
    conn: &Connection,
    dashboard_id: &str,
) -> rusqlite::Result<Vec<DashboardService>> {
    let mut stmt = conn.prepare(
        "SELECT id, dashboard_id, vendor_id, service, description, cost, created_at
         FROM dashboard_services WHERE dashboard_id = ?1 ORDER BY created_at ASC",
    )?;

    let rows = stmt.query_map(params![dashboard_id], |row| {
        Ok(DashboardService {
            id: row.get(0)?,
            dashboard_id: row.get(1)?,
            vendor_id: row.get(2)?,
            service: row.get(3)?,
            description: row.get(4)?,
            cost: row.get(5)?,
            created_at: row.get(6)?,
        })
    })?;

    let mut services = vec![];
    for row in rows {
        services.push(row?);
    }
    Ok(services)
}

/// Keeps the dashboard total in sync with its service rows.
pub fn recalc_dashboard_total(
    conn: &Connection,
    dashboard_id: &str,
    now: NaiveDateTime,
) -> rusqlite::Result<i64> {
    conn.execute(
        "UPDATE dashboards
         SET total_cost = (SELECT COALESCE(SUM(cost), 0) FROM dashboard_services
                           WHERE dashboard_id = ?1),
             updated_at = ?2
         WHERE id = ?1",
        params![dashboard_id, fmt_datetime(&now)],
    )?;

    conn.query_row(
        "SELECT total_cost FROM dashboards WHERE id = ?1",
        params![dashboard_id],
        |row| row.get(0),
    )
}

// ── Vendors ──

pub fn create_vendor(conn: &Connection, vendor: &Vendor) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO vendors (id, business_name, category, description, base_price, contact_email,
                              contact_phone, website, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            vendor.id,
            vendor.business_name,
            vendor.category,
            vendor.description,
            vendor.base_price,
            vendor.contact_email,
            vendor.contact_phone,
            vendor.website,
            vendor.is_active as i32,
            vendor.created_at,
        ],
    )?;
    Ok(())
}

pub fn update_vendor(conn: &Connection, vendor: &Vendor) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE vendors SET business_name = ?2, category = ?3, description = ?4, base_price = ?5,
                contact_email = ?6, contact_phone = ?7, website = ?8, is_active = ?9
         WHERE id = ?1",
        params![
            vendor.id,
            vendor.business_name,
            vendor.category,
            vendor.description,
            vendor.base_price,
            vendor.contact_email,
            vendor.contact_phone,
            vendor.website,
            vendor.is_active as i32,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_vendor(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM vendors WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn get_vendor_by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<Vendor>> {
    let result = conn.query_row(
        "SELECT id, business_name, category, description, base_price, contact_email,
                contact_phone, website, is_active, created_at
         FROM vendors WHERE id = ?1",
        params![id],
        parse_vendor_row,
    );

    match result {
        Ok(vendor) => Ok(Some(vendor)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn list_vendors(conn: &Connection, active_only: bool) -> rusqlite::Result<Vec<Vendor>> {
    let sql = if active_only {
        "SELECT id, business_name, category, description, base_price, contact_email,
                contact_phone, website, is_active, created_at
         FROM vendors WHERE is_active = 1 ORDER BY category, business_name"
    } else {
        "SELECT id, business_name, category, description, base_price, contact_email,
                contact_phone, website, is_active, created_at
         FROM vendors ORDER BY category, business_name"
    };

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], parse_vendor_row)?;

    let mut vendors = vec![];
    for row in rows {
        vendors.push(row?);
    }
    Ok(vendors)
}

fn parse_vendor_row(row: &rusqlite::Row) -> rusqlite::Result<Vendor> {
    Ok(Vendor {
        id: row.get(0)?,
        business_name: row.get(1)?,
        category: row.get(2)?,
        description: row.get(3)?,
        base_price: row.get(4)?,
        contact_email: row.get(5)?,
        contact_phone: row.get(6)?,
        website: row.get(7)?,
        is_active: row.get::<_, i32>(8)? != 0,
        created_at: row.get(9)?,
    })
}

// ── Messages ──

pub fn insert_message(conn: &Connection, message: &Message) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO messages (id, dashboard_id, sender_id, recipient_id, content, is_read,
                               created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            message.id,
            message.dashboard_id,
            message.sender_id,
            message.recipient_id,
            message.content,
            message.is_read as i32,
            message.created_at,
        ],
    )?;
    Ok(())
}

pub fn get_messages_for_dashboard(
    conn: &Connection,
    dashboard_id: &str,
) -> rusqlite::Result<Vec<Message>> {
    let mut stmt = conn.prepare(
        "SELECT id, dashboard_id, sender_id, recipient_id, content, is_read, created_at
         FROM messages WHERE dashboard_id = ?1 ORDER BY created_at ASC, id ASC",
    )?;

    let rows = stmt.query_map(params![dashboard_id], |row| {
        Ok(Message {
            id: row.get(0)?,
            dashboard_id: row.get(1)?,
            sender_id: row.get(2)?,
            recipient_id: row.get(3)?,
            content: row.get(4)?,
            is_read: row.get::<_, i32>(5)? != 0,
            created_at: row.get(6)?,
        })
    })?;

    let mut messages = vec![];
    for row in rows {
        messages.push(row?);
    }
    Ok(messages)
}

pub fn mark_messages_read(
    conn: &Connection,
    dashboard_id: &str,
    recipient_id: &str,
) -> rusqlite::Result<usize> {
    let count = conn.execute(
        "UPDATE messages SET is_read = 1
         WHERE dashboard_id = ?1 AND recipient_id = ?2 AND is_read = 0",
        params![dashboard_id, recipient_id],
    )?;
    Ok(count)
}

// ── Payment audit ──

/// Written after a successful charge and before the booking mutation, so a
/// crash between the two leaves a durable trace of the orphaned charge.
pub fn record_payment_marker(
    conn: &Connection,
    booking_id: &str,
    kind: &str,
    amount: i64,
    payment_id: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO payment_audit (booking_id, kind, amount, payment_id, state)
         VALUES (?1, ?2, ?3, ?4, 'pending')",
        params![booking_id, kind, amount, payment_id],
    )?;
    Ok(())
}

pub fn mark_payment_applied(conn: &Connection, payment_id: &str) -> rusqlite::Result<()> {
    conn.execute(
        "UPDATE payment_audit SET state = 'applied' WHERE payment_id = ?1",
        params![payment_id],
    )?;
    Ok(())
}

pub fn count_pending_payment_markers(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM payment_audit WHERE state = 'pending'",
        [],
        |row| row.get(0),
    )
}

// ── Admin stats ──

pub struct AdminStats {
    pub confirmed_bookings: i64,
    pub active_holds: i64,
    pub pending_reconciliation: i64,
}

pub fn get_admin_stats(conn: &Connection, now: NaiveDateTime) -> rusqlite::Result<AdminStats> {
    let confirmed_bookings: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE deposit_paid = 1",
        [],
        |row| row.get(0),
    )?;

    let active_holds: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings
         WHERE deposit_paid = 0 AND held_until IS NOT NULL AND held_until > ?1",
        params![fmt_datetime(&now)],
        |row| row.get(0),
    )?;

    let pending_reconciliation = count_pending_payment_markers(conn)?;

    Ok(AdminStats {
        confirmed_bookings,
        active_holds,
        pending_reconciliation,
    })
}

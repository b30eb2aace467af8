use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub client_id: String,
    pub event_date: NaiveDate,
    pub package_type: PackageType,
    pub total_cost: i64,
    pub deposit_amount: i64,
    pub balance_amount: i64,
    pub deposit_paid: bool,
    pub deposit_payment_id: Option<String>,
    pub balance_payment_id: Option<String>,
    pub held_until: Option<NaiveDateTime>,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    /// A booking blocks its date while the deposit is paid or the hold
    /// window is still open. An expired unpaid hold gives up the date.
    pub fn blocks_date_at(&self, now: NaiveDateTime) -> bool {
        self.deposit_paid || self.held_until.map_or(false, |held| held > now)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    PendingDeposit,
    DepositPaid,
    BalancePaid,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::PendingDeposit => "pending_deposit",
            BookingStatus::DepositPaid => "deposit_paid",
            BookingStatus::BalancePaid => "balance_paid",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "deposit_paid" => BookingStatus::DepositPaid,
            "balance_paid" => BookingStatus::BalancePaid,
            _ => BookingStatus::PendingDeposit,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Fast,
    Custom,
}

/// All amounts are integer minor units (cents).
pub struct PackageCosts {
    pub total: i64,
    pub deposit: i64,
    pub balance: i64,
}

impl PackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Fast => "fast",
            PackageType::Custom => "custom",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "fast" => PackageType::Fast,
            _ => PackageType::Custom,
        }
    }

    /// Costs at hold time. The custom package starts at zero and is priced
    /// later from the services the client selects on their dashboard.
    pub fn base_costs(&self) -> PackageCosts {
        match self {
            PackageType::Fast => PackageCosts {
                total: 5000,
                deposit: 1000,
                balance: 4000,
            },
            PackageType::Custom => PackageCosts {
                total: 0,
                deposit: 1000,
                balance: 0,
            },
        }
    }
}

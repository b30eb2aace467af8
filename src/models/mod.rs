pub mod booking;
pub mod dashboard;
pub mod message;
pub mod user;
pub mod vendor;

pub use booking::{Booking, BookingStatus, PackageCosts, PackageType};
pub use dashboard::{Dashboard, DashboardService, DashboardStatus};
pub use message::Message;
pub use user::{Role, User};
pub use vendor::Vendor;

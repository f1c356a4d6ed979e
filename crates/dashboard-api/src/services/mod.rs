//! Service layer for the Appwrite Dashboard API.
//!
//! Services encapsulate the aggregation logic and coordinate
//! between handlers and the upstream identity service.

pub mod dashboard;
pub mod sessions;
pub mod users;

pub use dashboard::DashboardService;
pub use sessions::SessionService;
pub use users::UserService;

//! Governance dashboard: wires the balance and proposal aggregators to real
//! clients, publishes their results and keeps the saved default address.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod prefs;

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, ProposalFeed};
pub use error::DashboardError;
pub use prefs::{PreferenceStore, Preferences};

//! Profile and resume management behind the NERV user dashboard.

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod models;
pub mod session;
pub mod store;
pub mod upload;

pub use config::Config;
pub use dashboard::{Dashboard, DashboardSettings, Submission};
pub use errors::DashboardError;

pub mod alarm;
pub mod auth;
pub mod dashboard;
mod de;
pub mod device;
pub mod envelope;
pub mod error;
pub mod flow;
pub mod hierarchy;
pub mod pagination;

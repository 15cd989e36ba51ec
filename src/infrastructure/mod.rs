//! Infrastructure layer - External service implementations

pub mod forecast;
pub mod observability;
pub mod services;
pub mod weather;

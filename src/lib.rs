// Dashboard Calendar Library
// Layout and interaction engine behind the dashboard calendar widget

pub mod models;
pub mod services;
pub mod utils;

pub use services::engine::{CalendarEngine, EngineError};

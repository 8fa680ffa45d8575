// Module exports for models

pub mod event;
pub mod grid;
pub mod palette;
pub mod settings;
pub mod time;

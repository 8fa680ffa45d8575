// Service module exports

pub mod axis;
pub mod clock;
pub mod engine;
pub mod gesture;
pub mod grid;
pub mod overlap;
pub mod seed;
pub mod settings;
pub mod store;
pub mod timers;

// Module exports for models

pub mod availability;
pub mod calendar;
pub mod settings;

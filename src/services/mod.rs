// Service module exports

pub mod availability;
pub mod calendar;
pub mod delivery;
pub mod fee;
pub mod order;
pub mod pricing;
pub mod settings;
pub mod timer;

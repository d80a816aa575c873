//! Domain aggregates exposed by the tracker service layer.

pub mod dish;
pub mod event;
pub mod types;

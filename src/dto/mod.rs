//! Data transfer objects handed from services to templates.

pub mod main;

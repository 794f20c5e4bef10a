//! Core Tech4Bike client library (config, session, transport, API façades, login flow).

pub mod api;
pub mod cep;
pub mod config;
pub mod confirm;
pub mod dashboard;
pub mod logging;
pub mod login;
pub mod maintenance;
pub mod session;

//! Ekranu CRM - record management for a DOOH advertising operation
//!
//! Clients, campaigns, imported kampanijos, screen providers, screens,
//! hourly pricing and DOOH plans with their screen bookings. Served as
//! HTML pages plus a small JSON API for dropdown lookups and partner imports.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Maintenance commands (`migrate`, `config generate`)
//!
//! # Architecture
//! - `storage`: SeaORM backend, reads and transactional writes
//! - `services`: Form parsing and business operations
//! - `api`: HTTP pages, JSON endpoints and middleware
//! - `config`: Static configuration (TOML + `EKR__*` environment)
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging and panic handling

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;

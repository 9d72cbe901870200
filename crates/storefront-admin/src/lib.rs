//! # Storefront Admin
//!
//! The back office of the storefront, built on [`admin_framework`].
//!
//! - **[model]**: typed records ([`model::Product`], [`model::Order`], ...) implementing `Resource`
//! - **[api]**: HTTP implementations of the framework's remote seams
//! - **[clients]**: domain operations over the CRUD stores
//! - **[lifecycle]**: [`lifecycle::AdminSystem`], which starts and stops everything
//! - **[config]**: environment-driven settings

pub mod api;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;

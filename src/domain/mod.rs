//! Domain layer modules
//!
//! - `catalog`: Read-only access to clients, products and orders

pub mod catalog;

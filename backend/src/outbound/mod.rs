//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories and pair directory over Diesel
//! - **push**: Web Push delivery over reqwest
//! - **memory**: process-local adapters for running without a database
//!
//! Adapters translate between domain values and infrastructure
//! representations and hold no interaction rules.

pub mod memory;
pub mod persistence;
pub mod push;

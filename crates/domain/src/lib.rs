//! Domain layer - packing-house pipeline rules with no storage or transport
//!
//! This crate contains:
//! - Entities and status enums of every stage (truck entry to dispatch)
//! - The bin transition table and session timing rules
//! - Code generation rules (`B-2024-0001`, `proceso-003`, ...)
//! - KPIs and field (Campo) aggregates
//! - Repository interfaces (traits) and packing events

#[macro_use]
mod macros;

pub mod clock;
pub mod code;
pub mod error;
pub mod event;
pub mod field;
pub mod kpi;
pub mod packing;
pub mod tenant;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use code::CodeKind;
pub use error::{DomainError, EntityKind, ErrorClass};
pub use event::{EventPublisher, PackingEvent};
pub use tenant::{AccessScope, Role, TenantId};

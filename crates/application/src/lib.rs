//! Application layer - packing-house use cases over the domain ports

pub mod packing;

pub use packing::PackingService;

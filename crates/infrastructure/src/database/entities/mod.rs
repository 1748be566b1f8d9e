pub mod bins;
pub mod boxes;
pub mod chamber_tasks;
pub mod chambers;
pub mod code_sequences;
pub mod dispatch_pallets;
pub mod dispatches;
pub mod pallets;
pub mod preselection_bins;
pub mod preselection_inputs;
pub mod preselection_output_slots;
pub mod preselection_sessions;
pub mod preselection_workers;
pub mod process_bins;
pub mod process_products;
pub mod process_sessions;
pub mod truck_entries;

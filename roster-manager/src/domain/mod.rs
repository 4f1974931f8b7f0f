pub mod roster_batch;
pub mod session_model;
pub mod settings_model;

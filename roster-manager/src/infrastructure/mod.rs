pub mod database;
pub mod roster_repo;
pub mod session_repo;
pub mod settings_repo;

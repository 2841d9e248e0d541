pub mod database;
pub mod refs;
pub mod repository;
pub mod stage;
pub mod workspace;

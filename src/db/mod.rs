pub mod alert_repository;
pub mod budget_repository;
pub mod connection;
pub mod prediction_repository;
pub mod repository;

pub mod alert;
pub mod budget;
pub mod expense;
pub mod forecast;
pub mod transaction;

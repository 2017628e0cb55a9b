pub mod add;
pub mod advisor;
pub mod alerts;
pub mod budget;
pub mod forecast;
pub mod import;
pub mod remove;
pub mod search_by_category;
pub mod summary;
pub mod update;

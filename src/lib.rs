// Library for tests to access modules

pub mod collector;
pub mod config;
pub mod dashboard;
pub mod dataset_repo;
pub mod models;
pub mod registry;
pub mod routes;
pub mod scheduler;
pub mod upstream;

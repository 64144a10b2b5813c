pub mod api;
pub mod config;
pub mod db;
pub mod error;

#[cfg(test)]
mod error_test;

//! HTTP request handlers for the airport API

pub mod airports;
pub mod health;
pub mod upload;

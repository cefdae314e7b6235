//! Daily Digest - a reader for aggregated news stories
//!
//! This crate fetches pre-aggregated stories from a story backend and serves
//! them as a small web site: a front page of expandable story cards, a detail
//! page per story, and an about page.

pub mod client;
pub mod config;
pub mod format;
pub mod model;
pub mod routes;
pub mod store;
pub mod views;

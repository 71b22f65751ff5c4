//! Fetch a GitHub user's starred repositories, sort them into categories and
//! write the result as JSON.

pub mod app;
pub mod category;
pub mod config;
pub mod fetch;
pub mod github;
pub mod http;
pub mod output;
pub mod runtime;

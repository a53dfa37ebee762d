pub mod classify;
pub mod config;
pub mod document;
pub mod eligibility;
pub mod end_time;
pub mod error;
pub mod fields;
pub mod harness;
pub mod input;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod price;
pub mod sanitize;

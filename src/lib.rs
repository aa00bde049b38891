//! searchtable - Read search-index documents as typed rows
//!
//! A data-source adapter letting a distributed SQL engine scan an index
//! like a table: build a scroll request, page through every hit, and
//! project each semi-structured hit onto the engine's column list.

pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod cursor;
pub mod observability;
pub mod scan;

//! # bz-api Handlers
//!
//! These modules coordinate the flow between HTTP requests and Core traits.

pub mod listings;
pub mod users;

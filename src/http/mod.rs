//! HTTP protocol layer module
//!
//! Response builders shared by the API routes, decoupled from business logic.

pub mod response;

pub use response::{
    build_404_response, build_405_response, build_413_response, build_health_response,
    build_html_response, build_options_response, error_response, json_response,
};

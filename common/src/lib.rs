//! Data model shared between the places backend and any client that talks to it.
//!
//! Everything here is plain serde data: the `Place` record, the payloads of the
//! listing/import/duplicate/statistics endpoints and the fixed enumerations a
//! place is validated against.

pub mod constants;
pub mod model;
pub mod requests;

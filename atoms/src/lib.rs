//! Domain atoms for the showcase collection API.
//!
//! Each atom owns one record type and is split the same way:
//! `model` (wire types), `service` (storage logic, no HTTP) and `http`
//! (Lambda handlers). Clients are always passed in by the caller.

pub mod media;
pub mod paging;
pub mod respond;
pub mod users;

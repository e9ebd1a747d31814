//! Records, write payloads, validation rules and repository ports shared by
//! every other crate in the store workspace.

pub mod domain;
pub mod ports;
pub mod validation;

//! Port traits: the seams between the screening core and its collaborators.

pub mod config_port;
pub mod credential_port;
pub mod data_port;

//! idshift identity controller
//!
//! The platform-independent facade: generate, parse, set, randomize,
//! sync-to-MAC, restore and reset the host's DHCPv6 identity.

pub mod controller;

pub use controller::IdentityController;

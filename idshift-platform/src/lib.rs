//! idshift platform layer
//!
//! The original-value store, the per-OS DUID adapters, and the MAC
//! address command glue. Everything above this crate is platform
//! independent; everything below it is an operating-system mechanism.

pub mod adapter;
pub mod mac;
pub mod store;

mod cmd;

pub use adapter::{
    adapter_for_host, best_effort, DuidAdapter, LinuxAdapter, LinuxConfig, MacOsAdapter,
    MacOsConfig, RestoreOutcome, WindowsAdapter, WindowsConfig,
};
pub use store::{OriginalRecord, OriginalStore};

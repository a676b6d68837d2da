//! Lifecycle management subsystem.
//!
//! Startup is linear (config → logging → metrics → listener → serve);
//! shutdown is coordinated through a broadcast channel so the server and
//! tests can stop the gateway deterministically.

pub mod shutdown;

pub use shutdown::Shutdown;

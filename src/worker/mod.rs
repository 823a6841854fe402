//! Background digest computation.
//!
//! Every newly accepted input gets one detached task that:
//! 1. sleeps for the configured latency ([`WorkerConfig::latency`](crate::config::WorkerConfig)),
//! 2. computes the SHA-512/base64 digest with [`sha512_base64`],
//! 3. hands the digest back to the [`Coordinator`](crate::coordinator::Coordinator),
//!    which publishes it and wakes every blocked lookup.
//!
//! Tasks are never joined or cancelled. Under sustained load with many
//! distinct inputs the number of sleeping tasks grows without bound.

pub mod digest;
pub mod executor;

pub use digest::sha512_base64;
pub use executor::DigestExecutor;

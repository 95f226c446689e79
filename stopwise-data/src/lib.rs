//! Service adapters for Stopwise.
//!
//! Responsibilities:
//! - Implement the distance and routing collaborators from `stopwise-core`
//!   over the TomTom Routing API.
//! - Own wire formats, request URLs and HTTP error mapping.
//!
//! Boundaries:
//! - Do not encode ordering or session rules (live in `stopwise-core`).
//! - Never log or return the API credential.
//!
//! Invariants:
//! - No global mutable state; the credential is read once into
//!   [`tomtom::TomTomConfig`].

#![forbid(unsafe_code)]

pub mod tomtom;

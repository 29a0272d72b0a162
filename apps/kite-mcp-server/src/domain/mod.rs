//! Domain Layer - Command, resource and order types.
//!
//! This layer contains the closed set of commands and resources the server
//! exposes, the typed argument structures they are parsed into, and the
//! credentials used to open a brokerage session. Nothing here performs I/O.

/// Typed commands, descriptors and argument validation.
pub mod command;

/// API credentials for a brokerage session.
pub mod credentials;

/// Order request value objects.
pub mod order;

/// Readable resource endpoints.
pub mod resource;

/// The two published tool surfaces.
pub mod toolset;

/// Account entity: balance mutation with the insufficient-funds invariant.
pub mod account;

/// Bank aggregate owning registered accounts and pairing one debit with one
/// credit as a single logical transfer.
pub mod bank;

/// Inbound transfer request validation and the receipt returned to callers.
pub mod request;

/// Persistence contracts for accounts and banks, plus in-memory
/// implementations. The traits are the integration point for swapping the
/// in-memory stores with a real backing store.
pub mod repository;

/// Transfer use-case wiring lookups, the bank aggregate and persistence
/// together.
pub mod service;

/// Could live in its own crate as the bootstrap for the binary; kept in the
/// library so the integration test can reuse it.
pub mod bin_utils;

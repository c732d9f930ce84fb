//! POSIX-family probe for procwatch: headerless `ps` listing, pure finder,
//! and SIGTERM-based best-effort termination.
//!
//! The finder is compiled on every platform so parsing stays testable
//! anywhere; only signal delivery is Unix-gated.

mod finder;
mod probe;

pub use finder::find_in_listing;
pub use probe::UnixProbe;

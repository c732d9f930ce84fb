//! Windows-family probe for procwatch: `tasklist /FO CSV /NH` listing, pure
//! CSV finder, and `taskkill /T /F` tree termination.
//!
//! The finder is compiled on every platform so parsing stays testable
//! anywhere; the listing and kill commands only exist on Windows hosts but
//! build everywhere.

mod finder;
mod probe;

pub use finder::find_in_listing;
pub use probe::WindowsProbe;

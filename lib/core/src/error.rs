//! Error handling foundation for the Magnolia tool gateway.
//!
//! This module provides only the `Result` type alias using rootcause.
//! Each crate defines its own domain-specific error types in its own
//! error module and converts lower-layer failures at its boundary.

use rootcause::Report;

/// A Result type alias using rootcause's Report for error handling.
///
/// The context type names the layer that produced the failure.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_type_works() {
        let ok: Result<i32> = Ok(42);
        assert_eq!(ok.expect("should be ok"), 42);
    }
}

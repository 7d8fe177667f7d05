//! Core domain logic for bookdeal.
//! Books and authors joined by royalty contracts, held in process-wide
//! registries and queried by scanning contracts.

pub mod import;
pub mod logging;
pub mod model;
pub mod registry;
pub mod service;

pub use import::{
    import_file, import_str, import_value, ImportError, ImportResult, ImportedCatalog, Location,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::author::{Author, AuthorId};
pub use model::book::{Book, BookId};
pub use model::contract::{Contract, ContractId};
pub use model::value::{FieldValue, TypeValidationError};
pub use registry::Registry;
pub use service::royalty_service::{AuthorSummary, BookSummary, RoyaltyService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

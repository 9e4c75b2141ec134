//! Infrastructure layer: repository boundary and its in-memory implementation

pub mod di;
pub mod error;
pub mod repository;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use repository::{InMemoryRepository, SiteFile, SiteItem};
pub use traits::ItemRepository;

pub mod network;
pub mod pagination;
pub mod record;
pub mod snapshot;

pub use network::*;
pub use pagination::*;
pub use record::*;
pub use snapshot::*;

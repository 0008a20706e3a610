pub mod network;
pub mod snapshot;
pub mod spec;

pub use network::Network;
pub use snapshot::{ModelSnapshot, SnapshotError};
pub use spec::NetworkSpec;

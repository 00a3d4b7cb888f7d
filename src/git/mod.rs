pub mod commit;
pub mod remote;
pub mod repository;

pub use remote::split_identifier;
pub use repository::{LocalReader, LocalRepository};

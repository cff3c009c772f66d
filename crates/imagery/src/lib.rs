pub mod config;
pub mod date;
pub mod error;
pub mod fetcher;
pub mod gallery;
pub mod model;
pub mod placeholder;
pub mod probe;
pub mod protocol;
pub mod source;

pub use config::*;
pub use date::*;
pub use error::*;
pub use fetcher::*;
pub use gallery::*;
pub use model::*;
pub use placeholder::*;
pub use probe::*;
pub use protocol::*;
pub use source::*;

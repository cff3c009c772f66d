pub mod overlay;
pub mod pulse;
pub mod state;
pub mod status;

pub use overlay::*;
pub use pulse::*;
pub use state::*;
pub use status::*;

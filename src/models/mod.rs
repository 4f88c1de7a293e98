pub mod abi;
pub mod chain;
pub mod estimate;
pub mod request;
pub mod response;

pub use abi::*;
pub use chain::*;
pub use estimate::*;
pub use request::*;
pub use response::*;

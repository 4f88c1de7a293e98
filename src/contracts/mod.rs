pub mod sample;

pub use sample::{sample_request, SAMPLE_ADDRESS, SAMPLE_ERC20_ABI};

//! The ERC-20 subset offered as a starting point for new users.

use crate::models::ParseAbiRequest;

pub const SAMPLE_ADDRESS: &str = "0xA0b86a33E6441b8435b662f98137B4B9c7C8E4B1";

pub const SAMPLE_ERC20_ABI: &str = r#"[
  {
    "name": "transfer",
    "type": "function",
    "inputs": [
      { "name": "to", "type": "address" },
      { "name": "amount", "type": "uint256" }
    ],
    "outputs": [{ "name": "", "type": "bool" }],
    "stateMutability": "nonpayable"
  },
  {
    "name": "balanceOf",
    "type": "function",
    "inputs": [{ "name": "account", "type": "address" }],
    "outputs": [{ "name": "", "type": "uint256" }],
    "stateMutability": "view"
  },
  {
    "name": "approve",
    "type": "function",
    "inputs": [
      { "name": "spender", "type": "address" },
      { "name": "amount", "type": "uint256" }
    ],
    "outputs": [{ "name": "", "type": "bool" }],
    "stateMutability": "nonpayable"
  }
]"#;

pub fn sample_request() -> ParseAbiRequest {
    ParseAbiRequest {
        address: SAMPLE_ADDRESS.to_string(),
        abi: SAMPLE_ERC20_ABI.to_string(),
    }
}

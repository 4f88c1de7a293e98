//! Validation and encoding shared by gas estimation and call simulation.

use crate::{
    error::GasLensError,
    models::{param_key, FunctionDescriptor, ParamValues},
    services::coerce::{coerce, parse_address},
};
use ethers::{
    abi::Function,
    providers::MiddlewareError,
    types::{Address, Bytes},
};
use serde_json::Value;

/// A fully validated contract call, ready to be dispatched.
#[derive(Debug, Clone)]
pub struct PreparedCall {
    pub to: Address,
    pub function: Function,
    pub calldata: Bytes,
}

/// Checks that address and ABI text are present and every input has a value.
///
/// Runs before any network access, returning the raw values in input order.
pub fn require_params<'a>(
    descriptor: &FunctionDescriptor,
    contract_address: &str,
    abi_text: &str,
    params: &'a ParamValues,
) -> Result<Vec<&'a str>, GasLensError> {
    if contract_address.trim().is_empty() {
        return Err(GasLensError::InvalidAddress("contract address is required".to_string()));
    }
    if abi_text.trim().is_empty() {
        return Err(GasLensError::InvalidAbiJson);
    }

    (0..descriptor.inputs.len())
        .map(|index| {
            params
                .get(&param_key(index))
                .map(String::as_str)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| GasLensError::MissingParameter {
                    input_name: descriptor.input_label(index),
                })
        })
        .collect()
}

/// Re-validates address and ABI, coerces every value and encodes the calldata.
pub fn prepare_call(
    descriptor: &FunctionDescriptor,
    contract_address: &str,
    abi_text: &str,
    raw_values: &[&str],
) -> Result<PreparedCall, GasLensError> {
    let to = parse_address(contract_address)
        .ok_or_else(|| GasLensError::InvalidAddress(contract_address.trim().to_string()))?;

    match serde_json::from_str::<Value>(abi_text.trim()) {
        Ok(Value::Array(_)) => {}
        _ => return Err(GasLensError::InvalidAbiJson),
    }

    let function = descriptor
        .to_abi_function()
        .map_err(|e| GasLensError::InvalidAbiShape(e.to_string()))?;

    let tokens = function
        .inputs
        .iter()
        .zip(raw_values)
        .enumerate()
        .map(|(index, (input, raw))| {
            coerce(&input.kind, raw).map_err(|reason| GasLensError::InvalidParameter {
                input_name: descriptor.input_label(index),
                reason,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let calldata = function
        .encode_input(&tokens)
        .map_err(|e| GasLensError::InvalidAbiShape(format!("encoding {}: {}", descriptor.name, e)))?;

    Ok(PreparedCall {
        to,
        function,
        calldata: calldata.into(),
    })
}

/// The node's own error message when there is one, the transport error otherwise.
pub fn node_message<E: MiddlewareError>(err: &E) -> String {
    err.as_error_response()
        .map(|response| response.message.clone())
        .unwrap_or_else(|| err.to_string())
}

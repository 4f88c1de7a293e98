//! Typed conversion of user-entered parameter text into ABI tokens.
//!
//! Every ABI type category has its own accepted syntax:
//!
//! | category      | accepted text                                   |
//! |---------------|-------------------------------------------------|
//! | `uintN`/`intN`| decimal integer (sign allowed for `int`), `0x` hex |
//! | `address`     | 20-byte hex, checksum not enforced              |
//! | `bool`        | `true` / `false`                                |
//! | `bytes`/`bytesN` | hex, exact length for `bytesN`               |
//! | `string`      | taken verbatim                                  |
//! | arrays/tuples | JSON array text, coerced element by element     |

use ethers::{
    abi::{ParamType, Token},
    types::{Address, I256, U256},
};
use serde_json::Value;

/// Parses a checksum-agnostic 20-byte hex address, with or without `0x`.
pub fn parse_address(text: &str) -> Option<Address> {
    let text = text.trim();
    let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).unwrap_or(text);
    if digits.len() != 40 {
        return None;
    }
    hex::decode(digits).ok().map(|bytes| Address::from_slice(&bytes))
}

pub fn coerce(kind: &ParamType, raw: &str) -> Result<Token, String> {
    match kind {
        ParamType::Uint(bits) => coerce_uint(*bits, raw).map(Token::Uint),
        ParamType::Int(bits) => coerce_int(*bits, raw).map(Token::Int),
        ParamType::Address => parse_address(raw)
            .map(Token::Address)
            .ok_or_else(|| format!("expected a 20-byte hex address, got {:?}", raw)),
        ParamType::Bool => match raw.trim() {
            "true" => Ok(Token::Bool(true)),
            "false" => Ok(Token::Bool(false)),
            _ => Err(format!("expected true or false, got {:?}", raw)),
        },
        ParamType::Bytes => decode_hex(raw).map(Token::Bytes),
        ParamType::FixedBytes(size) => {
            let bytes = decode_hex(raw)?;
            if bytes.len() != *size {
                return Err(format!("expected {} bytes, got {}", size, bytes.len()));
            }
            Ok(Token::FixedBytes(bytes))
        }
        ParamType::String => Ok(Token::String(raw.to_string())),
        ParamType::Array(inner) => {
            let items = json_array(raw)?;
            coerce_all(inner, &items).map(Token::Array)
        }
        ParamType::FixedArray(inner, len) => {
            let items = json_array(raw)?;
            if items.len() != *len {
                return Err(format!("expected {} elements, got {}", len, items.len()));
            }
            coerce_all(inner, &items).map(Token::FixedArray)
        }
        ParamType::Tuple(components) => {
            let items = json_array(raw)?;
            if items.len() != components.len() {
                return Err(format!(
                    "expected {} tuple components, got {}",
                    components.len(),
                    items.len()
                ));
            }
            components
                .iter()
                .zip(items.iter())
                .map(|(kind, item)| coerce(kind, &element_text(item)))
                .collect::<Result<Vec<_>, _>>()
                .map(Token::Tuple)
        }
    }
}

fn coerce_uint(bits: usize, raw: &str) -> Result<U256, String> {
    let text = raw.trim();
    let value = match text.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| e.to_string()),
        None if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) => {
            U256::from_dec_str(text).map_err(|e| e.to_string())
        }
        None => Err(format!("expected an unsigned integer, got {:?}", raw)),
    }?;
    if value.bits() > bits {
        return Err(format!("{} does not fit in uint{}", text, bits));
    }
    Ok(value)
}

fn coerce_int(bits: usize, raw: &str) -> Result<U256, String> {
    let text = raw.trim();
    if let Some(hex) = text.strip_prefix("0x") {
        return coerce_int_hex(bits, text, hex);
    }

    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("expected a signed integer, got {:?}", raw));
    }
    let value = I256::from_dec_str(text).map_err(|e| e.to_string())?;

    // |min| == 2^(bits-1), max == 2^(bits-1) - 1
    let limit = U256::one() << (bits - 1);
    let magnitude = value.unsigned_abs();
    let fits = if value.is_negative() { magnitude <= limit } else { magnitude < limit };
    if !fits {
        return Err(format!("{} does not fit in int{}", text, bits));
    }
    Ok(value.into_raw())
}

/// `0x` input is the two's-complement bit pattern at the declared width, so `int8` `0xff` is -1.
fn coerce_int_hex(bits: usize, text: &str, hex: &str) -> Result<U256, String> {
    if hex.is_empty() {
        return Err(format!("expected a signed integer, got {:?}", text));
    }
    let value = U256::from_str_radix(hex, 16).map_err(|e| e.to_string())?;
    if value.bits() > bits {
        return Err(format!("{} does not fit in int{}", text, bits));
    }
    if bits < 256 && value.bit(bits - 1) {
        return Ok(value | (U256::MAX << bits));
    }
    Ok(value)
}

fn decode_hex(raw: &str) -> Result<Vec<u8>, String> {
    let text = raw.trim();
    let digits = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(digits).map_err(|e| format!("expected hex bytes: {}", e))
}

fn json_array(raw: &str) -> Result<Vec<Value>, String> {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(_) => Err("expected a JSON array".to_string()),
        Err(e) => Err(format!("expected a JSON array: {}", e)),
    }
}

fn coerce_all(kind: &ParamType, items: &[Value]) -> Result<Vec<Token>, String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| coerce(kind, &element_text(item)).map_err(|e| format!("element {}: {}", i, e)))
        .collect()
}

/// Strings are unwrapped; numbers, bools and nested arrays keep their JSON text.
fn element_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

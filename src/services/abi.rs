use crate::{
    error::GasLensError,
    models::{AbiEntry, AbiInput, AbiOutput, FunctionDescriptor},
    services::coerce::parse_address,
};
use ethers::abi::{ethabi::param_type::Reader, StateMutability};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct RawParam {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    components: Vec<RawParam>,
    #[serde(default)]
    indexed: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawFunction {
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<RawParam>,
    #[serde(default)]
    outputs: Vec<RawParam>,
    #[serde(rename = "stateMutability", default)]
    state_mutability: Option<StateMutability>,
    // pre-0.5 solc fields
    #[serde(default)]
    constant: Option<bool>,
    #[serde(default)]
    payable: Option<bool>,
}

/// Turns address + ABI text into the contract's callable functions, in ABI order.
///
/// Blank input on either side yields an empty list: nothing has been entered yet.
pub fn parse(address_text: &str, abi_text: &str) -> Result<Vec<FunctionDescriptor>, GasLensError> {
    if address_text.trim().is_empty() || abi_text.trim().is_empty() {
        return Ok(Vec::new());
    }

    if parse_address(address_text).is_none() {
        return Err(GasLensError::InvalidAddress(address_text.trim().to_string()));
    }

    let functions: Vec<FunctionDescriptor> = parse_entries(abi_text)?
        .into_iter()
        .filter_map(|entry| match entry {
            AbiEntry::Function(function) => Some(function),
            _ => None,
        })
        .collect();

    if functions.is_empty() {
        tracing::debug!("ABI parsed but contains no functions");
    }

    Ok(functions)
}

/// Parses and classifies every entry of an ABI array.
pub fn parse_entries(abi_text: &str) -> Result<Vec<AbiEntry>, GasLensError> {
    let json: Value = serde_json::from_str(abi_text.trim())
        .map_err(|e| GasLensError::InvalidJson(e.to_string()))?;

    let Value::Array(entries) = json else {
        return Err(GasLensError::InvalidAbiShape("ABI must be an array".to_string()));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| classify(index, entry))
        .collect()
}

fn classify(index: usize, entry: Value) -> Result<AbiEntry, GasLensError> {
    let shape_error = |reason: String| GasLensError::InvalidAbiShape(format!("entry {}: {}", index, reason));

    if !entry.is_object() {
        return Err(shape_error("expected an object".to_string()));
    }

    // Solidity treats a missing type as a function
    let kind = match entry.get("type") {
        None => "function".to_string(),
        Some(Value::String(kind)) => kind.clone(),
        Some(_) => return Err(shape_error("type must be a string".to_string())),
    };

    match kind.as_str() {
        "function" => {
            let raw: RawFunction =
                serde_json::from_value(entry).map_err(|e| shape_error(e.to_string()))?;
            function_descriptor(raw).map(AbiEntry::Function).map_err(shape_error)
        }
        "event" => Ok(AbiEntry::Event {
            name: entry
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }),
        "constructor" => Ok(AbiEntry::Constructor),
        "fallback" | "receive" | "error" => Ok(AbiEntry::Other(kind.clone())),
        other => Err(shape_error(format!("unknown entry type {:?}", other))),
    }
}

fn function_descriptor(raw: RawFunction) -> Result<FunctionDescriptor, String> {
    if raw.name.trim().is_empty() {
        return Err("function name must not be empty".to_string());
    }

    let mutability = raw.state_mutability.unwrap_or(match (raw.constant, raw.payable) {
        (Some(true), _) => StateMutability::View,
        (_, Some(true)) => StateMutability::Payable,
        _ => StateMutability::NonPayable,
    });

    let inputs = raw
        .inputs
        .iter()
        .map(|input| {
            Ok(AbiInput {
                name: input.name.clone().unwrap_or_default(),
                ty: canonical_type(input)?,
                indexed: input.indexed,
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    let outputs = raw
        .outputs
        .iter()
        .map(|output| {
            Ok(AbiOutput {
                name: output.name.clone().unwrap_or_default(),
                ty: canonical_type(output)?,
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(FunctionDescriptor::new(raw.name, inputs, outputs, mutability))
}

/// Normalizes a type tag (`uint` -> `uint256`, `tuple[]` -> `(address,uint256)[]`).
fn canonical_type(param: &RawParam) -> Result<String, String> {
    let ty = match param.ty.strip_prefix("tuple") {
        Some(suffix) => {
            let components = param
                .components
                .iter()
                .map(canonical_type)
                .collect::<Result<Vec<_>, String>>()?;
            format!("({}){}", components.join(","), suffix)
        }
        None => param.ty.clone(),
    };

    Reader::read(&ty)
        .map(|kind| kind.to_string())
        .map_err(|e| format!("unsupported type {:?}: {}", param.ty, e))
}

/// Looks a function up by full signature, or by bare name when that is unambiguous.
pub fn find_function<'a>(
    functions: &'a [FunctionDescriptor],
    selector: &str,
) -> Result<&'a FunctionDescriptor, GasLensError> {
    let selector: String = selector.chars().filter(|c| !c.is_whitespace()).collect();

    if selector.contains('(') {
        return functions
            .iter()
            .find(|f| f.signature() == selector)
            .ok_or(GasLensError::UnknownFunction(selector));
    }

    let mut matches = functions.iter().filter(|f| f.name == selector);
    match (matches.next(), matches.next()) {
        (Some(function), None) => Ok(function),
        (Some(_), Some(_)) => Err(GasLensError::AmbiguousFunction(selector)),
        (None, _) => Err(GasLensError::UnknownFunction(selector)),
    }
}

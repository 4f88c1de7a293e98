use ethers::abi::{ethabi::param_type::Reader, Function, Param, ParamType, StateMutability};
use serde::{Deserialize, Serialize};

/// One input of a contract function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiInput {
    #[serde(default)]
    pub name: String,
    /// Canonical type tag, e.g. `uint256`, `address[]`, `(address,uint256)`.
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiOutput {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// A callable contract function surfaced from a user-supplied ABI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    /// Always `"function"`.
    pub kind: String,
    pub inputs: Vec<AbiInput>,
    pub outputs: Vec<AbiOutput>,
    pub mutability: StateMutability,
    pub payable: bool,
}

/// Classified ABI array entry. Only functions travel past the parse boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum AbiEntry {
    Function(FunctionDescriptor),
    Event { name: String },
    Constructor,
    /// `fallback`, `receive` and `error` entries.
    Other(String),
}

impl FunctionDescriptor {
    pub fn new(
        name: String,
        inputs: Vec<AbiInput>,
        outputs: Vec<AbiOutput>,
        mutability: StateMutability,
    ) -> Self {
        Self {
            name,
            kind: "function".to_string(),
            inputs,
            outputs,
            payable: mutability == StateMutability::Payable,
            mutability,
        }
    }

    /// `name(type0,type1,...)`, used to tell overloads apart.
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.inputs.iter().map(|i| i.ty.as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.mutability, StateMutability::View | StateMutability::Pure)
    }

    /// Display label for input `index`, falling back to its positional key.
    pub fn input_label(&self, index: usize) -> String {
        match self.inputs.get(index) {
            Some(input) if !input.name.is_empty() => input.name.clone(),
            _ => format!("param{}", index),
        }
    }

    /// Builds the `ethers` function used for calldata encoding and output decoding.
    pub fn to_abi_function(&self) -> Result<Function, ethers::abi::Error> {
        let inputs = self
            .inputs
            .iter()
            .map(|input| Ok(param(&input.name, Reader::read(&input.ty)?)))
            .collect::<Result<Vec<_>, ethers::abi::Error>>()?;
        let outputs = self
            .outputs
            .iter()
            .map(|output| Ok(param(&output.name, Reader::read(&output.ty)?)))
            .collect::<Result<Vec<_>, ethers::abi::Error>>()?;

        #[allow(deprecated)]
        let function = Function {
            name: self.name.clone(),
            inputs,
            outputs,
            constant: None,
            state_mutability: self.mutability,
        };
        Ok(function)
    }
}

fn param(name: &str, kind: ParamType) -> Param {
    Param {
        name: name.to_string(),
        kind,
        internal_type: None,
    }
}

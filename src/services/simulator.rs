use crate::{
    error::GasLensError,
    models::{ChainKey, FunctionDescriptor, ParamValues, SimulationResult},
    services::{
        call::{node_message, prepare_call, require_params, PreparedCall},
        ProviderResolver,
    },
};
use ethers::{
    abi::Token,
    prelude::*,
    types::transaction::eip2718::TypedTransaction,
    utils::parse_ether,
};
use std::sync::Arc;

/// Optional sender and attached value for a simulated call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    pub from: Option<Address>,
    pub value: Option<U256>,
}

impl CallContext {
    /// Builds a context from request fields, `value` given in ether units.
    pub fn parse(from: Option<Address>, value: Option<&str>) -> Result<Self, GasLensError> {
        let value = match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(text) => Some(parse_ether(text).map_err(|e| GasLensError::InvalidParameter {
                input_name: "value".to_string(),
                reason: e.to_string(),
            })?),
            None => None,
        };
        Ok(Self { from, value })
    }
}

pub struct CallSimulator {
    resolver: Arc<ProviderResolver>,
}

impl CallSimulator {
    pub fn new(resolver: Arc<ProviderResolver>) -> Self {
        Self { resolver }
    }

    /// Executes `descriptor` with `eth_call` against the latest state.
    pub async fn simulate(
        &self,
        descriptor: &FunctionDescriptor,
        contract_address: &str,
        abi_text: &str,
        chain: &str,
        params: &ParamValues,
        context: &CallContext,
    ) -> Result<SimulationResult, GasLensError> {
        let raw_values = require_params(descriptor, contract_address, abi_text, params)?;

        let connection = self.resolver.resolve(chain).await?;
        let call = prepare_call(descriptor, contract_address, abi_text, &raw_values)?;

        simulate_with(&connection.provider, connection.chain, &call, context).await
    }
}

pub async fn simulate_with<M: Middleware>(
    client: &M,
    chain: ChainKey,
    call: &PreparedCall,
    context: &CallContext,
) -> Result<SimulationResult, GasLensError> {
    let mut request = TransactionRequest::new().to(call.to).data(call.calldata.clone());
    if let Some(from) = context.from {
        request = request.from(from);
    }
    if let Some(value) = context.value {
        request = request.value(value);
    }
    let tx: TypedTransaction = request.into();

    let outcome = client.call(&tx, None).await;

    let (success, return_values, error) = match outcome {
        Ok(data) => (true, decode_return(call, &data), None),
        Err(e) => {
            let message = node_message(&e);
            tracing::info!("Simulated {} on {} reverted: {}", call.function.name, chain, message);
            (false, Vec::new(), Some(message))
        }
    };

    let gas_used = match client.estimate_gas(&tx, None).await {
        Ok(gas) => Some(gas.to_string()),
        Err(e) => {
            tracing::debug!("Gas estimate for simulated call failed: {}", node_message(&e));
            None
        }
    };

    let block_number = client
        .get_block_number()
        .await
        .map_err(|e| GasLensError::SimulationFailed {
            message: node_message(&e),
        })?
        .as_u64();

    Ok(SimulationResult {
        success,
        return_values,
        gas_used,
        block_number,
        error,
        chain,
    })
}

fn decode_return(call: &PreparedCall, data: &Bytes) -> Vec<String> {
    match call.function.decode_output(data) {
        Ok(tokens) => tokens.iter().map(render_token).collect(),
        Err(e) => {
            tracing::debug!("Could not decode {} output: {}", call.function.name, e);
            vec![format!("0x{}", hex::encode(data))]
        }
    }
}

/// Human-readable form of a decoded value: decimal integers, 0x-prefixed hex for
/// addresses and bytes, bracketed lists for arrays and tuples.
pub fn render_token(token: &Token) -> String {
    match token {
        Token::Address(address) => format!("{:?}", address),
        Token::Uint(value) => value.to_string(),
        Token::Int(raw) => I256::from_raw(*raw).to_string(),
        Token::Bool(value) => value.to_string(),
        Token::String(value) => value.clone(),
        Token::Bytes(bytes) | Token::FixedBytes(bytes) => format!("0x{}", hex::encode(bytes)),
        Token::Array(items) | Token::FixedArray(items) | Token::Tuple(items) => format!(
            "[{}]",
            items.iter().map(render_token).collect::<Vec<_>>().join(",")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AbiInput, AbiOutput};
    use ethers::{
        abi::{encode, StateMutability},
        providers::{JsonRpcError, MockResponse},
    };

    const ADDRESS: &str = "0xA0b86a33E6441b8435b662f98137B4B9c7C8E4B1";

    fn balance_of() -> PreparedCall {
        let descriptor = FunctionDescriptor::new(
            "balanceOf".to_string(),
            vec![AbiInput { name: "account".into(), ty: "address".into(), indexed: None }],
            vec![AbiOutput { name: "".into(), ty: "uint256".into() }],
            StateMutability::View,
        );
        prepare_call(&descriptor, ADDRESS, "[]", &[ADDRESS]).unwrap()
    }

    #[tokio::test]
    async fn decodes_return_values() {
        let (provider, mock) = Provider::mocked();
        // LIFO: eth_call, eth_estimateGas, eth_blockNumber
        mock.push(U64::from(19_000_000u64)).unwrap();
        mock.push(U256::from(24_000u64)).unwrap();
        mock.push::<Bytes, _>(Bytes::from(encode(&[Token::Uint(U256::from(1_500u64))]))).unwrap();

        let result = simulate_with(&provider, ChainKey::Ethereum, &balance_of(), &CallContext::default())
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.return_values, vec!["1500"]);
        assert_eq!(result.gas_used.as_deref(), Some("24000"));
        assert_eq!(result.block_number, 19_000_000);
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn revert_is_reported_not_raised() {
        let (provider, mock) = Provider::mocked();
        let revert = || {
            MockResponse::Error(JsonRpcError {
                code: 3,
                message: "execution reverted: paused".to_string(),
                data: None,
            })
        };
        mock.push(U64::from(7u64)).unwrap();
        mock.push_response(revert());
        mock.push_response(revert());

        let result = simulate_with(&provider, ChainKey::Polygon, &balance_of(), &CallContext::default())
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.return_values.is_empty());
        assert!(result.gas_used.is_none());
        assert_eq!(result.error.as_deref(), Some("execution reverted: paused"));
        assert_eq!(result.block_number, 7);
    }

    #[tokio::test]
    async fn undecodable_output_falls_back_to_hex() {
        let (provider, mock) = Provider::mocked();
        mock.push(U64::from(1u64)).unwrap();
        mock.push(U256::from(21_000u64)).unwrap();
        mock.push::<Bytes, _>(Bytes::from(vec![0xde, 0xad])).unwrap();

        let result = simulate_with(&provider, ChainKey::Ethereum, &balance_of(), &CallContext::default())
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.return_values, vec!["0xdead"]);
    }

    #[test]
    fn value_is_parsed_in_ether() {
        let context = CallContext::parse(None, Some("0.5")).unwrap();
        assert_eq!(context.value, Some(U256::from(500_000_000_000_000_000u64)));
        assert!(CallContext::parse(None, Some("  ")).unwrap().value.is_none());

        let err = CallContext::parse(None, Some("half")).unwrap_err();
        assert!(matches!(err, GasLensError::InvalidParameter { ref input_name, .. } if input_name == "value"));
    }

    #[test]
    fn renders_nested_tokens() {
        let token = Token::Tuple(vec![
            Token::Bool(true),
            Token::Int(I256::from(-5).into_raw()),
            Token::Array(vec![Token::Bytes(vec![0x01, 0xff])]),
        ]);
        assert_eq!(render_token(&token), "[true,-5,[0x01ff]]");
    }
}

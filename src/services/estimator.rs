use crate::{
    config::FallbackPrices,
    error::GasLensError,
    models::{ChainKey, FunctionDescriptor, GasEstimateResult, ParamValues},
    services::{
        call::{node_message, prepare_call, require_params, PreparedCall},
        ProviderResolver,
    },
    units,
};
use ethers::{
    prelude::*,
    types::transaction::eip2718::TypedTransaction,
};
use std::sync::Arc;

pub struct GasEstimator {
    resolver: Arc<ProviderResolver>,
    fallback_prices: FallbackPrices,
}

impl GasEstimator {
    pub fn new(resolver: Arc<ProviderResolver>, fallback_prices: FallbackPrices) -> Self {
        Self {
            resolver,
            fallback_prices,
        }
    }

    pub fn fallback_prices(&self) -> &FallbackPrices {
        &self.fallback_prices
    }

    /// Estimates the cost of calling `descriptor` on `contract_address`.
    ///
    /// View and pure functions go through the same path as state-changing ones.
    pub async fn estimate(
        &self,
        descriptor: &FunctionDescriptor,
        contract_address: &str,
        abi_text: &str,
        chain: &str,
        params: &ParamValues,
    ) -> Result<GasEstimateResult, GasLensError> {
        let raw_values = require_params(descriptor, contract_address, abi_text, params)?;

        let connection = self.resolver.resolve(chain).await?;
        let call = prepare_call(descriptor, contract_address, abi_text, &raw_values)?;

        self.estimate_with(
            &connection.provider,
            connection.chain,
            &connection.endpoint_used,
            &call,
        )
        .await
    }

    /// Runs the gas-units and gas-price queries for a prepared call against `client`.
    pub async fn estimate_with<M: Middleware>(
        &self,
        client: &M,
        chain: ChainKey,
        endpoint: &str,
        call: &PreparedCall,
    ) -> Result<GasEstimateResult, GasLensError> {
        let tx: TypedTransaction = TransactionRequest::new()
            .to(call.to)
            .data(call.calldata.clone())
            .into();

        let gas_units = client
            .estimate_gas(&tx, None)
            .await
            .map_err(|e| GasLensError::EstimationFailed {
                message: node_message(&e),
            })?;

        let (gas_price_wei, gas_price_fallback) = self.gas_price(client, chain).await;
        let total = units::total_cost_wei(gas_units, gas_price_wei);

        let result = GasEstimateResult {
            gas_units: gas_units.to_string(),
            gas_price_gwei: units::format_gwei(gas_price_wei)?,
            total_cost_native: units::format_native(total)?,
            gas_price_fallback,
            chain,
            endpoint_used: endpoint.to_string(),
        };

        tracing::info!(
            "Estimated {} on {}: {} gas at {} gwei = {}",
            call.function.name,
            chain,
            result.gas_units,
            result.gas_price_gwei,
            result.total_cost_native
        );

        Ok(result)
    }

    /// Current network gas price, or the chain's static fallback when the node can't say.
    async fn gas_price<M: Middleware>(&self, client: &M, chain: ChainKey) -> (U256, bool) {
        match client.get_gas_price().await {
            Ok(price) => (price, false),
            Err(e) => {
                let fallback = self.fallback_prices.wei_for(chain);
                tracing::warn!(
                    "Failed to get gas price for {}: {}, using fallback {} wei",
                    chain,
                    node_message(&e),
                    fallback
                );
                (fallback, true)
            }
        }
    }
}

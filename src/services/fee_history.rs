use crate::{
    error::GasLensError,
    models::{ChainKey, FeeHistorySample, FeeWindow},
    services::{call::node_message, ProviderResolver},
    units,
};
use chrono::{DateTime, TimeZone, Utc};
use ethers::prelude::*;
use std::sync::Arc;

/// Assumed average block time when turning hours into a block count.
pub const AVERAGE_BLOCK_TIME_SECS: u64 = 13;

/// Upper bound on blocks requested from `eth_feeHistory`.
pub const MAX_LOOKBACK_BLOCKS: u64 = 1024;

/// Number of blocks covering `window_hours`, between 1 and [`MAX_LOOKBACK_BLOCKS`].
pub fn block_count_for(window_hours: u64) -> u64 {
    (window_hours.saturating_mul(3600) / AVERAGE_BLOCK_TIME_SECS).clamp(1, MAX_LOOKBACK_BLOCKS)
}

pub struct FeeHistorySampler {
    resolver: Arc<ProviderResolver>,
}

impl FeeHistorySampler {
    pub fn new(resolver: Arc<ProviderResolver>) -> Self {
        Self { resolver }
    }

    /// Finds the cheapest block, by base fee, in the last `window_hours`.
    pub async fn best_recent_window(
        &self,
        chain: &str,
        window_hours: u64,
    ) -> Result<FeeWindow, GasLensError> {
        let connection = self.resolver.resolve(chain).await?;
        sample(&connection.provider, connection.chain, block_count_for(window_hours)).await
    }
}

pub async fn sample<M: Middleware>(
    client: &M,
    chain: ChainKey,
    block_count: u64,
) -> Result<FeeWindow, GasLensError> {
    let unavailable = |reason: String| GasLensError::HistoryUnavailable {
        chain: chain.to_string(),
        reason,
    };

    let history = client
        .fee_history(block_count, BlockNumber::Latest, &[])
        .await
        .map_err(|e| unavailable(node_message(&e)))?;

    // The first entry is the window's reference block, not a sample.
    let samples = history.base_fee_per_gas.get(1..).unwrap_or_default();
    if samples.is_empty() {
        return Err(unavailable("no base fee entries returned".to_string()));
    }
    if (samples.len() as u64) < block_count {
        return Err(unavailable(format!(
            "node returned {} of {} requested blocks",
            samples.len(),
            block_count
        )));
    }

    let (offset, min_fee) = samples
        .iter()
        .copied()
        .enumerate()
        .min_by_key(|(_, fee)| *fee)
        .ok_or_else(|| unavailable("no base fee entries returned".to_string()))?;

    let block_number = u64::try_from(history.oldest_block)
        .ok()
        .and_then(|oldest| oldest.checked_add(1 + offset as u64))
        .ok_or_else(|| unavailable(format!("oldest block {} is out of range", history.oldest_block)))?;
    let timestamp = block_timestamp(client, block_number)
        .await
        .map_err(unavailable)?;

    tracing::info!(
        "Cheapest of {} blocks on {}: block {} at {} wei",
        samples.len(),
        chain,
        block_number,
        min_fee
    );

    Ok(FeeWindow {
        window_label: timestamp.format("%Y-%m-%d %H:%M UTC").to_string(),
        avg_gwei: units::format_gwei(min_fee)?,
        blocks_sampled: samples.len() as u64,
        cheapest: FeeHistorySample {
            block_number,
            base_fee_per_gas: min_fee.to_string(),
            timestamp,
        },
        chain,
    })
}

/// Timestamp of `number`. The last fee-history entry is the node's projection for the
/// next block, so an unmined block is dated one average block time after the newest.
async fn block_timestamp<M: Middleware>(client: &M, number: u64) -> Result<DateTime<Utc>, String> {
    let invalid = || format!("block {} has an out-of-range timestamp", number);

    let seconds = match client.get_block(number).await.map_err(|e| node_message(&e))? {
        Some(block) => i64::try_from(block.timestamp).map_err(|_| invalid())?,
        None => {
            let newest = client
                .get_block(BlockNumber::Latest)
                .await
                .map_err(|e| node_message(&e))?
                .ok_or_else(|| "latest block not found".to_string())?;
            let newest_number = newest.number.map(|n| n.as_u64()).unwrap_or(number);
            let newest_seconds = i64::try_from(newest.timestamp).map_err(|_| invalid())?;
            i64::try_from(number.saturating_sub(newest_number))
                .ok()
                .and_then(|distance| distance.checked_mul(AVERAGE_BLOCK_TIME_SECS as i64))
                .and_then(|offset| newest_seconds.checked_add(offset))
                .ok_or_else(invalid)?
        }
    };

    Utc.timestamp_opt(seconds, 0).single().ok_or_else(invalid)
}

pub mod abi;
pub mod analytics;
pub mod call;
pub mod coerce;
pub mod estimator;
pub mod fee_history;
pub mod generation;
pub mod provider;
pub mod simulator;

pub use analytics::Analytics;
pub use estimator::GasEstimator;
pub use fee_history::FeeHistorySampler;
pub use generation::{Generations, Ticket};
pub use provider::{ChainConnection, EndpointKind, ProviderResolver};
pub use simulator::{CallContext, CallSimulator};

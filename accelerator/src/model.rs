use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;

/// Mining pool identifier as used by the mempool services backend
pub type PoolId = u32;

/// Projected position of an accelerated transaction within a pool's upcoming block templates
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccelerationPosition {
    pub block: u64,
    pub vbytes: f64,
}

/// A currently active acceleration request.
///
/// Accounting fields are opaque and kept as the exact JSON numbers received, which may be
/// fractional or negative (fee deltas).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acceleration {
    pub txid: String,
    /// Creation time, seconds since UNIX epoch
    pub added: u64,
    pub effective_vsize: Number,
    pub effective_fee: Number,
    pub fee_delta: Number,
    /// Pools credited with accelerating the transaction. May be missing upstream, which is
    /// kept distinct from an empty list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pools: Option<Vec<PoolId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positions: Option<BTreeMap<PoolId, AccelerationPosition>>,
}

impl Acceleration {
    /// Whether `pool` is credited with this acceleration. Missing `pools` never match.
    pub fn is_accelerated_by(&self, pool: PoolId) -> bool {
        self.pools.as_ref().is_some_and(|pools| pools.contains(&pool))
    }

    pub fn position_in(&self, pool: PoolId) -> Option<&AccelerationPosition> {
        self.positions.as_ref().and_then(|positions| positions.get(&pool))
    }
}

/// Historical record of an acceleration request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccelerationHistory {
    pub txid: String,
    /// Lifecycle label as reported upstream (e.g. `completed`, `failed`)
    pub status: String,
    pub fee_paid: Number,
    pub added: u64,
    pub last_updated: u64,
    pub base_fee: Number,
    pub vsize_fee: Number,
    pub effective_fee: Number,
    pub effective_vsize: Number,
    pub fee_delta: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
    /// Absent and `null` are both kept as `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pools: Option<Vec<PoolId>>,
}

impl AccelerationHistory {
    /// Whether the confirming block is known
    pub fn is_confirmed(&self) -> bool {
        self.block_hash.is_some()
    }
}

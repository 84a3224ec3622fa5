use crate::model::{Acceleration, PoolId};
use serde::{Deserialize, Serialize};

/// A mined block attributable to a mining pool
pub trait MinedBlock {
    fn pool_id(&self) -> PoolId;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTag {
    pub id: PoolId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockExtras {
    pub pool: PoolTag,
}

/// The subset of the backend's extended block representation needed to match accelerations
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockExtended {
    pub id: String,
    pub height: u64,
    pub timestamp: u64,
    pub extras: BlockExtras,
}

impl MinedBlock for BlockExtended {
    fn pool_id(&self) -> PoolId {
        self.extras.pool.id
    }
}

impl MinedBlock for PoolTag {
    fn pool_id(&self) -> PoolId {
        self.id
    }
}

/// Returns true if any of `accelerations` credits `pool`. Scans in order and stops at the first match.
pub fn is_accelerated_pool(pool: PoolId, accelerations: &[Acceleration]) -> bool {
    accelerations.iter().any(|acceleration| acceleration.is_accelerated_by(pool))
}

/// Returns true if `block` was mined by a pool credited with any of `accelerations`
pub fn is_accelerated_block<B: MinedBlock + ?Sized>(block: &B, accelerations: &[Acceleration]) -> bool {
    is_accelerated_pool(block.pool_id(), accelerations)
}

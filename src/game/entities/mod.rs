// World entities
//
// Each manager exclusively owns its collection. Everything else reads
// through `get`/`active`/`iter` and mutates only through manager methods
// (`hit`, `push_back`, `collect`).

pub mod collectible;
pub mod enemy;
pub mod wallet;

pub use collectible::{
    Collectible, CollectibleId, CollectibleKind, CollectibleLifecycle, CollectibleManager,
};
pub use enemy::{Enemy, EnemyHitResult, EnemyId, EnemyKind, EnemyLifecycle, EnemyManager};
pub use wallet::Wallet;

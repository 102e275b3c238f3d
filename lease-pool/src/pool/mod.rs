mod acquire;

mod config;
pub use config::PoolConfig;

mod error;
pub use error::{AcquireError, DrainError, InitError, ReleaseError};

mod pool;
pub use pool::Pool;

mod state;
pub use state::{PoolState, PoolStatus};

pub mod reserve_math;
pub mod fee_math;
pub mod provide_liquidity;
pub mod remove_liquidity;
pub mod claim_rewards;
pub mod swap;
pub mod configure;

pub use reserve_math::*;
pub use fee_math::*;
pub use swap::{SwapOutcome, SwapPreview};

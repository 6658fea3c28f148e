use crate::{
    constants::MAX_REWARD_RATE_BPS,
    error::{PoolError, Result},
    state::{Address, PoolConfig},
};

/// Only the configured owner may touch the administrative surface.
pub fn authorize(config: &PoolConfig, caller: &Address) -> Result<()> {
    if *caller != config.owner {
        return Err(PoolError::Unauthorized);
    }
    Ok(())
}

/// Change the per-swap reward rate (0–10000 bps).
pub fn set_reward_rate(config: &mut PoolConfig, caller: &Address, reward_rate_bps: u16) -> Result<()> {
    authorize(config, caller)?;
    if reward_rate_bps > MAX_REWARD_RATE_BPS {
        return Err(PoolError::RateOutOfRange(reward_rate_bps));
    }
    config.reward_rate_bps = reward_rate_bps;
    Ok(())
}

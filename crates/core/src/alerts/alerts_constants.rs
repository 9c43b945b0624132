/// Annotation rendered above the trailing zero-balance partition.
pub const ZERO_BALANCE_NOTE: &str = "These accounts hold a target allocation for this ticker but have no \
     portfolio value. They cannot receive a rebalancing task until funded.";

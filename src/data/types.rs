use alloy::primitives::{Address, U256};

/// A will owned by `owner`, decoded from the contract's `normalWills`
/// mapping. Pure read-model snapshot; the chain is the source of truth.
#[derive(Debug, Clone)]
pub struct WillRecord {
    pub owner: Address,
    pub beneficiary: Address,
    /// Locked balance in wei.
    pub amount: U256,
    /// Unix timestamp of will creation.
    pub created_at: u64,
    /// Unix timestamp of the owner's last liveness ping.
    pub last_ping: u64,
    /// Seconds of owner silence after which the beneficiary may claim.
    pub claim_wait_time: u64,
    pub description: String,
    pub claimed: bool,
}

impl WillRecord {
    /// Earliest unix timestamp at which the beneficiary can claim,
    /// assuming no further pings.
    pub fn claimable_at(&self) -> u64 {
        self.last_ping.saturating_add(self.claim_wait_time)
    }

    pub fn is_claimable(&self, now: u64) -> bool {
        !self.claimed && now >= self.claimable_at()
    }
}

/// A will in which the connected account is the beneficiary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeneficiaryWill {
    pub owner: Address,
    /// Formatted native-currency amount, e.g. "1.5".
    pub amount: String,
}

/// A single claimable release of a milestone will.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneRelease {
    pub owner: Address,
    pub will_index: U256,
    pub release_index: U256,
    /// Formatted native-currency amount.
    pub amount: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(last_ping: u64, wait: u64, claimed: bool) -> WillRecord {
        WillRecord {
            owner: Address::from_slice(&[0x01; 20]),
            beneficiary: Address::from_slice(&[0x02; 20]),
            amount: U256::from(1u64),
            created_at: 0,
            last_ping,
            claim_wait_time: wait,
            description: String::new(),
            claimed,
        }
    }

    #[test]
    fn test_claimable_at() {
        assert_eq!(record(100, 50, false).claimable_at(), 150);
    }

    #[test]
    fn test_claimable_at_saturates() {
        assert_eq!(record(u64::MAX, 10, false).claimable_at(), u64::MAX);
    }

    #[test]
    fn test_is_claimable() {
        let r = record(100, 50, false);
        assert!(!r.is_claimable(149));
        assert!(r.is_claimable(150));
        assert!(r.is_claimable(151));
    }

    #[test]
    fn test_claimed_never_claimable() {
        let r = record(100, 50, true);
        assert!(!r.is_claimable(1_000_000));
    }
}

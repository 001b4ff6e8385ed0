use alloy::primitives::{Address, U256};
use alloy::sol;

use crate::data::types::{BeneficiaryWill, MilestoneRelease, WillRecord};
use crate::utils;

sol! {
    /// On-chain interface of the deployed SmartWill contract. The ABI is a
    /// fixed input; only these methods are ever called.
    #[sol(rpc)]
    contract SmartWill {
        function createNormalWill(address beneficiary, string description, uint256 claimWaitTime) external payable;
        function deposit() external payable;
        function ping() external;
        function claimNormalWill(address owner) external;
        function claimMilestoneWill(address owner, uint256 willIndex, uint256 releaseIndex) external;

        function hasNormalWill(address owner) external view returns (bool exists);
        function normalWills(address owner) external view returns (
            address beneficiary,
            uint256 amount,
            uint256 createdAt,
            uint256 lastPingTime,
            uint256 claimWaitTime,
            string description,
            bool exists,
            bool claimed
        );
        function getNormalWillAsBeneficiary(address beneficiary) external view returns (address[] owners, uint256[] amounts);
        function getMilestoneWillsAsBeneficiary(address beneficiary) external view returns (
            address[] owners,
            uint256[] willIndexes,
            uint256[] releaseIndexes,
            uint256[] releaseAmounts
        );
    }
}

/// Turn the raw `normalWills` tuple into a typed record. A mapping getter
/// returns zeroed fields for absent keys, so `exists` gates the decode.
pub fn decode_will(owner: Address, raw: SmartWill::normalWillsReturn) -> Option<WillRecord> {
    if !raw.exists {
        return None;
    }
    Some(WillRecord {
        owner,
        beneficiary: raw.beneficiary,
        amount: raw.amount,
        created_at: raw.createdAt.saturating_to(),
        last_ping: raw.lastPingTime.saturating_to(),
        claim_wait_time: raw.claimWaitTime.saturating_to(),
        description: raw.description,
        claimed: raw.claimed,
    })
}

/// Zip the contract's parallel arrays (owners[i] locked amounts[i] for the
/// caller) into an ordered record sequence, preserving index
/// correspondence.
pub fn map_beneficiary_wills(owners: Vec<Address>, amounts: Vec<U256>) -> Vec<BeneficiaryWill> {
    owners
        .into_iter()
        .zip(amounts)
        .map(|(owner, amount)| BeneficiaryWill {
            owner,
            amount: utils::format_u256_as_decimal(amount, 18),
        })
        .collect()
}

/// Same, for the four parallel arrays describing claimable milestone
/// releases.
pub fn map_milestone_releases(
    owners: Vec<Address>,
    will_indexes: Vec<U256>,
    release_indexes: Vec<U256>,
    amounts: Vec<U256>,
) -> Vec<MilestoneRelease> {
    owners
        .into_iter()
        .zip(will_indexes)
        .zip(release_indexes)
        .zip(amounts)
        .map(|(((owner, will_index), release_index), amount)| MilestoneRelease {
            owner,
            will_index,
            release_index,
            amount: utils::format_u256_as_decimal(amount, 18),
        })
        .collect()
}

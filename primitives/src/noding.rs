//! Types shared with the validator ("noding") module, which lives outside this workspace.
//! Governance carries them through to the noding collaborator unchanged.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use polkadot_sdk::sp_runtime::{BoundedVec, traits::ConstU32};
use scale_info::TypeInfo;
use sp_arithmetic::Perbill;

/// Voting power granted to the validators falling into a slice of the score ranking.
#[derive(
  Clone, Copy, Debug, Decode, DecodeWithMemTracking, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo,
)]
pub struct VotingPowerSlice {
  pub part: Perbill,
  pub voting_power: u64,
}

/// Distribution of validator voting power.
#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo,
)]
pub struct VotingPowerDistribution {
  pub slices: BoundedVec<VotingPowerSlice, ConstU32<16>>,
  pub luckies_voting_power: u64,
}

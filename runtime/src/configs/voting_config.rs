//! Voting pallet configuration.
//!
//! Approved proposals reach the other keepers through their governance capabilities. The
//! validator and earning modules are not part of this runtime, so their parameters and signer
//! lists are accepted and have no effect.

use super::*;

use crate::{Bank, Delegating, Profile, Referral, Schedule, Storage, Subscription, Vpn};
use primitives::ecosystem::params;

parameter_types! {
  /// Duration of a proposal (ecosystem constant: one day)
  pub const DefaultVotingPeriod: Moment = params::VOTING_PERIOD;

  pub const DefaultPollPeriod: Moment = params::POLL_PERIOD;
}

impl pallet_voting::Config for Runtime {
  type Scheduler = Schedule;
  type Bank = Bank;
  type Delegation = Delegating;
  type Referral = Referral;
  type Subscription = Subscription;
  type Noding = ();
  type Validators = ();
  type FreeCreators = Profile;
  type EarningSigners = ();
  type TokenRateSigners = Subscription;
  type VpnSigners = Vpn;
  type StorageSigners = Storage;
  type DefaultVotingPeriod = DefaultVotingPeriod;
  type DefaultPollPeriod = DefaultPollPeriod;
  type MaxNameLength = ConstU32<64>;
  type WeightInfo = pallet_voting::weights::SubstrateWeight<Runtime>;
}

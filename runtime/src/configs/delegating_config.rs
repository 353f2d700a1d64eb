//! Delegating pallet configuration.
//!
//! Validator facts come from the noding module, which is not part of this runtime: nobody is an
//! active validator, so nobody earns the validator bonus.

use super::*;

use crate::{Bank, Referral, Schedule};
use primitives::{AccruePercentage, Balance, ecosystem::params};

parameter_types! {
  pub const BlocksPerDay: u32 = time::BLOCKS_PER_DAY;

  /// Extra accrual for active validators (ecosystem constant: 10%)
  pub const ValidatorBonus: Perbill = params::VALIDATOR_BONUS;

  /// Revoking at least this much is announced (ecosystem constant: 100 000 ARTR)
  pub const MassiveRevoke: Balance = params::MASSIVE_REVOKE;

  pub const DefaultMinDelegate: Balance = params::MIN_DELEGATE;
  pub const DefaultRevokePeriod: u32 = params::REVOKE_PERIOD_DAYS;
  pub DefaultAccruePercentage: AccruePercentage = AccruePercentage::default();
}

impl pallet_delegating::Config for Runtime {
  type Ledger = Bank;
  type Scheduler = Schedule;
  type Referral = Referral;
  type Validators = ();
  type BlocksPerDay = BlocksPerDay;
  type ValidatorBonus = ValidatorBonus;
  type MassiveRevoke = MassiveRevoke;
  type DefaultMinDelegate = DefaultMinDelegate;
  type DefaultRevokePeriod = DefaultRevokePeriod;
  type DefaultAccruePercentage = DefaultAccruePercentage;
  type WeightInfo = pallet_delegating::weights::SubstrateWeight<Runtime>;
}

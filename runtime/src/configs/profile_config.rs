//! Profile pallet configuration.

use super::*;

use crate::{Bank, Referral};
use primitives::{Balance, ecosystem::params};

parameter_types! {
  /// Paid by creators not on the free list (ecosystem constant: 1 ARTR)
  pub const AccountCreationFee: Balance = params::ACCOUNT_CREATION_FEE;
}

impl pallet_profile::Config for Runtime {
  type Ledger = Bank;
  type Referral = Referral;
  type FeeCollector = FeeCollector;
  type AccountCreationFee = AccountCreationFee;
  type MaxNicknameLength = ConstU32<32>;
  type WeightInfo = pallet_profile::weights::SubstrateWeight<Runtime>;
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = ProfileBenchmarkHelper;
}

/// Plants a bare root node for the account creation benchmark.
#[cfg(feature = "runtime-benchmarks")]
pub struct ProfileBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl pallet_profile::BenchmarkHelper<AccountId> for ProfileBenchmarkHelper {
  fn referrer() -> AccountId {
    let root = AccountId::from([0xbe; 32]);
    if !pallet_referral::Nodes::<Runtime>::contains_key(&root) {
      pallet_referral::Nodes::<Runtime>::insert(&root, pallet_referral::ReferralInfo::new(None, 0, 0));
    }
    root
  }
}

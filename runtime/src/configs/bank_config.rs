//! Bank pallet configuration.
//!
//! Every balance change is reported to the referral keeper, which keeps the per-level coin
//! aggregates of the structure.

use super::*;

use crate::Referral;
use primitives::{Balance, ecosystem::params};

parameter_types! {
  /// Smallest amount accepted by `send` (ecosystem constant: 0.001 ARTR)
  pub const DefaultMinSend: Balance = params::MIN_SEND;

  pub const DefaultDustDelegation: Balance = params::DUST_DELEGATION;

  /// Transaction fee ratio (ecosystem constant: 0.3%)
  pub const DefaultTransactionFee: Perbill = params::TRANSACTION_FEE;

  /// Cap of a single transaction fee (ecosystem constant: 10 ARTR)
  pub const DefaultMaxTransactionFee: Balance = params::MAX_TRANSACTION_FEE;
}

impl pallet_bank::Config for Runtime {
  type OnBalanceChanged = Referral;
  type FeeCollector = FeeCollector;
  type DefaultMinSend = DefaultMinSend;
  type DefaultDustDelegation = DefaultDustDelegation;
  type DefaultTransactionFee = DefaultTransactionFee;
  type DefaultMaxTransactionFee = DefaultMaxTransactionFee;
  type WeightInfo = pallet_bank::weights::SubstrateWeight<Runtime>;
}

//! Runtime configuration.
//!
//! `frame_system` and `pallet_timestamp` are configured here, together with the reserved module
//! accounts; every keeper has its own `*_config.rs`. Parameter values come from
//! `primitives::ecosystem`, the single source of truth shared with the pallet mocks.

mod bank_config;
mod delegating_config;
mod profile_config;
mod referral_config;
mod schedule_config;
mod subscription_config;
mod voting_config;

pub use referral_config::ReferralCallbacks;
pub use schedule_config::TaskHandlers;

use super::{
  AccountId, Block, BlockNumber, Hash, Moment, Nonce, PalletInfo, Runtime, RuntimeCall,
  RuntimeEvent, RuntimeOrigin, RuntimeTask, VERSION,
};
use polkadot_sdk::{
  frame_support::{
    PalletId, derive_impl, parameter_types,
    traits::{ConstU32, ConstU64, Get},
    weights::{
      Weight,
      constants::{RocksDbWeight, WEIGHT_REF_TIME_PER_SECOND},
    },
  },
  frame_system::limits::{BlockLength, BlockWeights},
  sp_runtime::{Perbill, traits::AccountIdConversion},
  sp_version::RuntimeVersion,
  *,
};
use primitives::{ecosystem::pallet_ids, time};

/// Share of a block available to normal extrinsics.
const NORMAL_DISPATCH_RATIO: Perbill = Perbill::from_percent(75);

parameter_types! {
  pub const Version: RuntimeVersion = VERSION;

  /// Two seconds of compute per 30 second block.
  pub RuntimeBlockWeights: BlockWeights = BlockWeights::with_sensible_defaults(
    Weight::from_parts(2u64 * WEIGHT_REF_TIME_PER_SECOND, u64::MAX),
    NORMAL_DISPATCH_RATIO,
  );
  pub RuntimeBlockLength: BlockLength =
    BlockLength::max_with_normal_ratio(5 * 1024 * 1024, NORMAL_DISPATCH_RATIO);
  pub const BlockHashCount: BlockNumber = time::BLOCKS_PER_DAY;
  pub const SS58Prefix: u16 = 42;
}

#[derive_impl(frame_system::config_preludes::SolochainDefaultConfig)]
impl frame_system::Config for Runtime {
  type Block = Block;
  type BlockWeights = RuntimeBlockWeights;
  type BlockLength = RuntimeBlockLength;
  type AccountId = AccountId;
  type Nonce = Nonce;
  type Hash = Hash;
  type BlockHashCount = BlockHashCount;
  type DbWeight = RocksDbWeight;
  type Version = Version;
  type AccountData = ();
  type SS58Prefix = SS58Prefix;
  type MaxConsumers = ConstU32<16>;
}

impl pallet_timestamp::Config for Runtime {
  type Moment = Moment;
  type OnTimestampSet = ();
  type MinimumPeriod = ConstU64<{ time::BLOCK_TIME / 2 }>;
  type WeightInfo = ();
}

/// Declares a `Get<AccountId>` for the module account derived from a reserved pallet id.
macro_rules! module_account {
  ($(#[$doc:meta])* $name:ident => $id:ident) => {
    $(#[$doc])*
    pub struct $name;
    impl Get<AccountId> for $name {
      fn get() -> AccountId {
        PalletId(*pallet_ids::$id).into_account_truncating()
      }
    }
  };
}

module_account!(
  /// Receiver of transaction, transition and account creation fees
  FeeCollector => FEE_COLLECTOR_ID
);
module_account!(
  /// Receiver of every undistributed referral share
  TopReferrer => TOP_REFERRER_ID
);
module_account!(ForSubscription => FOR_SUBSCRIPTION_ID);
module_account!(ForDelegating => FOR_DELEGATING_ID);
module_account!(PromoBonuses => PROMO_BONUSES_ID);
module_account!(
  /// Status bonus pool, shared weekly
  StatusBonuses => STATUS_BONUSES_ID
);
module_account!(LeaderBonuses => LEADER_BONUSES_ID);
module_account!(VpnAccount => VPN_PALLET_ID);
module_account!(StorageAccount => STORAGE_PALLET_ID);

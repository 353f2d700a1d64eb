//! Subscription, VPN and storage pallet configuration.
//!
//! The subscription keeper sells the service and writes the quotas kept by the VPN and storage
//! keepers. Service revenue lands on the VPN and storage module accounts.

use super::*;

use crate::{Bank, Profile, Referral, Schedule, Storage, Vpn};
use primitives::ecosystem::params;

parameter_types! {
  pub const BaseVpnGb: u64 = params::BASE_VPN_GB;
  pub const BaseStorageGb: u64 = params::BASE_STORAGE_GB;

  /// Monthly price in price units (ecosystem constant: 1990)
  pub const DefaultSubscriptionPrice: u32 = params::SUBSCRIPTION_PRICE;

  /// uARTR per price unit (ecosystem constant: 100 000)
  pub const DefaultTokenRate: u32 = params::TOKEN_RATE;

  pub const DefaultVpnGbPrice: u32 = params::VPN_GB_PRICE;
  pub const DefaultStorageGbPrice: u32 = params::STORAGE_GB_PRICE;

  /// Largest storage directory (ecosystem constant: 10 KiB)
  pub const MaxStorageData: u32 = params::MAX_STORAGE_DATA;
}

impl pallet_subscription::Config for Runtime {
  type Ledger = Bank;
  type Scheduler = Schedule;
  type Referral = Referral;
  type Profiles = Profile;
  type Vpn = Vpn;
  type Storage = Storage;
  type VpnAccount = VpnAccount;
  type StorageAccount = StorageAccount;
  type BaseVpnGb = BaseVpnGb;
  type BaseStorageGb = BaseStorageGb;
  type DefaultSubscriptionPrice = DefaultSubscriptionPrice;
  type DefaultTokenRate = DefaultTokenRate;
  type DefaultVpnGbPrice = DefaultVpnGbPrice;
  type DefaultStorageGbPrice = DefaultStorageGbPrice;
  type WeightInfo = pallet_subscription::weights::SubstrateWeight<Runtime>;
}

impl pallet_vpn::Config for Runtime {
  type WeightInfo = pallet_vpn::weights::SubstrateWeight<Runtime>;
}

impl pallet_storage::Config for Runtime {
  type MaxDataLength = MaxStorageData;
  type WeightInfo = pallet_storage::weights::SubstrateWeight<Runtime>;
}

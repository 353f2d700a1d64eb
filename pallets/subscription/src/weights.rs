#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use core::marker::PhantomData;
use polkadot_sdk::frame_support::{
  traits::Get,
  weights::{constants::RocksDbWeight, Weight},
};

pub trait WeightInfo {
  fn pay_subscription() -> Weight;
  fn pay_vpn() -> Weight;
  fn pay_storage() -> Weight;
  fn set_token_rate() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
  fn pay_subscription() -> Weight {
    // Ten referral levels plus both module accounts.
    Weight::from_parts(140_000_000, 11000)
      .saturating_add(T::DbWeight::get().reads(140))
      .saturating_add(T::DbWeight::get().writes(130))
  }
  fn pay_vpn() -> Weight {
    Weight::from_parts(30_000_000, 3000)
      .saturating_add(T::DbWeight::get().reads(8))
      .saturating_add(T::DbWeight::get().writes(6))
  }
  fn pay_storage() -> Weight {
    Weight::from_parts(32_000_000, 3200)
      .saturating_add(T::DbWeight::get().reads(10))
      .saturating_add(T::DbWeight::get().writes(6))
  }
  fn set_token_rate() -> Weight {
    Weight::from_parts(10_000_000, 1500)
      .saturating_add(T::DbWeight::get().reads(2))
      .saturating_add(T::DbWeight::get().writes(1))
  }
}

impl WeightInfo for () {
  fn pay_subscription() -> Weight {
    Weight::from_parts(140_000_000, 11000)
      .saturating_add(RocksDbWeight::get().reads(140))
      .saturating_add(RocksDbWeight::get().writes(130))
  }
  fn pay_vpn() -> Weight {
    Weight::from_parts(30_000_000, 3000)
      .saturating_add(RocksDbWeight::get().reads(8))
      .saturating_add(RocksDbWeight::get().writes(6))
  }
  fn pay_storage() -> Weight {
    Weight::from_parts(32_000_000, 3200)
      .saturating_add(RocksDbWeight::get().reads(10))
      .saturating_add(RocksDbWeight::get().writes(6))
  }
  fn set_token_rate() -> Weight {
    Weight::from_parts(10_000_000, 1500)
      .saturating_add(RocksDbWeight::get().reads(2))
      .saturating_add(RocksDbWeight::get().writes(1))
  }
}

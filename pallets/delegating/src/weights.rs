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
  fn delegate() -> Weight;
  fn revoke() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
  fn delegate() -> Weight {
    // Up to twelve commission outputs, each walking its referral chain.
    Weight::from_parts(150_000_000, 12000)
      .saturating_add(T::DbWeight::get().reads(160))
      .saturating_add(T::DbWeight::get().writes(150))
  }
  fn revoke() -> Weight {
    Weight::from_parts(45_000_000, 4000)
      .saturating_add(T::DbWeight::get().reads(28))
      .saturating_add(T::DbWeight::get().writes(18))
  }
}

impl WeightInfo for () {
  fn delegate() -> Weight {
    Weight::from_parts(150_000_000, 12000)
      .saturating_add(RocksDbWeight::get().reads(160))
      .saturating_add(RocksDbWeight::get().writes(150))
  }
  fn revoke() -> Weight {
    Weight::from_parts(45_000_000, 4000)
      .saturating_add(RocksDbWeight::get().reads(28))
      .saturating_add(RocksDbWeight::get().writes(18))
  }
}

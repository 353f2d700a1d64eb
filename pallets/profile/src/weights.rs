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
  fn create_account() -> Weight;
  fn update_profile() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
  fn create_account() -> Weight {
    // Appending a child walks the referrer's ancestors.
    Weight::from_parts(60_000_000, 6000)
      .saturating_add(T::DbWeight::get().reads(30))
      .saturating_add(T::DbWeight::get().writes(16))
  }
  fn update_profile() -> Weight {
    Weight::from_parts(14_000_000, 2000)
      .saturating_add(T::DbWeight::get().reads(2))
      .saturating_add(T::DbWeight::get().writes(3))
  }
}

impl WeightInfo for () {
  fn create_account() -> Weight {
    Weight::from_parts(60_000_000, 6000)
      .saturating_add(RocksDbWeight::get().reads(30))
      .saturating_add(RocksDbWeight::get().writes(16))
  }
  fn update_profile() -> Weight {
    Weight::from_parts(14_000_000, 2000)
      .saturating_add(RocksDbWeight::get().reads(2))
      .saturating_add(RocksDbWeight::get().writes(3))
  }
}

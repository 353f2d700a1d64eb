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
  fn propose() -> Weight;
  fn vote() -> Weight;
  fn start_poll() -> Weight;
  fn answer_poll() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
  fn propose() -> Weight {
    // Validation may read every parameter owner.
    Weight::from_parts(60_000_000, 6000)
      .saturating_add(T::DbWeight::get().reads(12))
      .saturating_add(T::DbWeight::get().writes(8))
  }
  fn vote() -> Weight {
    // The last vote applies the proposal.
    Weight::from_parts(55_000_000, 6000)
      .saturating_add(T::DbWeight::get().reads(12))
      .saturating_add(T::DbWeight::get().writes(10))
  }
  fn start_poll() -> Weight {
    Weight::from_parts(20_000_000, 2500)
      .saturating_add(T::DbWeight::get().reads(3))
      .saturating_add(T::DbWeight::get().writes(2))
  }
  fn answer_poll() -> Weight {
    Weight::from_parts(22_000_000, 3000)
      .saturating_add(T::DbWeight::get().reads(4))
      .saturating_add(T::DbWeight::get().writes(2))
  }
}

impl WeightInfo for () {
  fn propose() -> Weight {
    Weight::from_parts(60_000_000, 6000)
      .saturating_add(RocksDbWeight::get().reads(12))
      .saturating_add(RocksDbWeight::get().writes(8))
  }
  fn vote() -> Weight {
    Weight::from_parts(55_000_000, 6000)
      .saturating_add(RocksDbWeight::get().reads(12))
      .saturating_add(RocksDbWeight::get().writes(10))
  }
  fn start_poll() -> Weight {
    Weight::from_parts(20_000_000, 2500)
      .saturating_add(RocksDbWeight::get().reads(3))
      .saturating_add(RocksDbWeight::get().writes(2))
  }
  fn answer_poll() -> Weight {
    Weight::from_parts(22_000_000, 3000)
      .saturating_add(RocksDbWeight::get().reads(4))
      .saturating_add(RocksDbWeight::get().writes(2))
  }
}

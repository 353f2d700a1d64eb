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
  fn send() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
  fn send() -> Weight {
    // Balance hooks walk the referral chain of both parties.
    Weight::from_parts(40_000_000, 4000)
      .saturating_add(T::DbWeight::get().reads(30))
      .saturating_add(T::DbWeight::get().writes(26))
  }
}

impl WeightInfo for () {
  fn send() -> Weight {
    Weight::from_parts(40_000_000, 4000)
      .saturating_add(RocksDbWeight::get().reads(30))
      .saturating_add(RocksDbWeight::get().writes(26))
  }
}

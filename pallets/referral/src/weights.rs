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
  fn request_transition() -> Weight;
  fn resolve_transition() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
  fn request_transition() -> Weight {
    // Cycle check walks the destination's ancestors.
    Weight::from_parts(35_000_000, 3500)
      .saturating_add(T::DbWeight::get().reads(14))
      .saturating_add(T::DbWeight::get().writes(4))
  }
  fn resolve_transition() -> Weight {
    // Both ancestor chains plus the first lines read by status checks.
    Weight::from_parts(120_000_000, 9000)
      .saturating_add(T::DbWeight::get().reads(64))
      .saturating_add(T::DbWeight::get().writes(24))
  }
}

impl WeightInfo for () {
  fn request_transition() -> Weight {
    Weight::from_parts(35_000_000, 3500)
      .saturating_add(RocksDbWeight::get().reads(14))
      .saturating_add(RocksDbWeight::get().writes(4))
  }
  fn resolve_transition() -> Weight {
    Weight::from_parts(120_000_000, 9000)
      .saturating_add(RocksDbWeight::get().reads(64))
      .saturating_add(RocksDbWeight::get().writes(24))
  }
}

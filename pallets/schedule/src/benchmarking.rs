#![cfg(feature = "runtime-benchmarks")]

use crate::*;
use alloc::vec;
use frame::prelude::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::traits::{Hooks, Time};

#[benchmarks]
mod benches {
  use super::*;

  /// One due task nobody claims: the queue scan, the removal and the dispatch attempt.
  #[benchmark]
  fn on_finalize() {
    let now = T::TimeProvider::now();
    let payload = vec![0u8; T::MaxPayloadLength::get() as usize];
    Pallet::<T>::schedule_task(now, b"bench/unclaimed", &payload).unwrap();
    let block = frame_system::Pallet::<T>::block_number();

    #[block]
    {
      Pallet::<T>::on_finalize(block);
    }

    assert!(Pallet::<T>::pending().is_empty());
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};

  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}

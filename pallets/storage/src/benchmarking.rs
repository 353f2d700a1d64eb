#![cfg(feature = "runtime-benchmarks")]

use crate::*;
use alloc::vec;
use frame::prelude::*;
use polkadot_sdk::frame_benchmarking::{account, v2::*};
use polkadot_sdk::frame_system::RawOrigin;

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn set_storage_data() {
    let caller: T::AccountId = whitelisted_caller();
    let data = vec![0u8; T::MaxDataLength::get() as usize];

    #[extrinsic_call]
    set_storage_data(RawOrigin::Signed(caller.clone()), 1_024, data);

    assert_eq!(Current::<T>::get(&caller), 1_024);
  }

  #[benchmark]
  fn set_current() {
    let signer: T::AccountId = whitelisted_caller();
    Signers::<T>::insert(&signer, ());
    let who: T::AccountId = account("user", 0, 0);

    #[extrinsic_call]
    set_current(RawOrigin::Signed(signer), who.clone(), 2_048);

    assert_eq!(Current::<T>::get(&who), 2_048);
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};

  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}

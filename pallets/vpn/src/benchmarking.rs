#![cfg(feature = "runtime-benchmarks")]

use crate::*;
use polkadot_sdk::frame_benchmarking::{account, v2::*};
use polkadot_sdk::frame_system::RawOrigin;

#[benchmarks]
mod benches {
  use super::*;

  /// Reported traffic above the limit.
  #[benchmark]
  fn set_current() {
    let signer: T::AccountId = whitelisted_caller();
    Signers::<T>::insert(&signer, ());
    let who: T::AccountId = account("user", 0, 0);
    let current = Info::<T>::get(&who).limit.saturating_add(1);

    #[extrinsic_call]
    set_current(RawOrigin::Signed(signer), who.clone(), current);

    assert!(Info::<T>::get(&who).is_exhausted());
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};

  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}

#![cfg(feature = "runtime-benchmarks")]

use crate::*;
use alloc::vec;
use frame::prelude::*;
use polkadot_sdk::frame_benchmarking::{account, v2::*};
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{Ledger, ReferralNetwork};

#[benchmarks]
mod benches {
  use super::*;

  fn profile<T: Config>(letter: u8) -> Profile {
    let nickname = vec![letter; T::MaxNicknameLength::get() as usize];
    Profile { auto_pay: true, nickname, ..Default::default() }
  }

  /// A creator outside the free list, so the creation fee is paid.
  #[benchmark]
  fn create_account() {
    let creator: T::AccountId = whitelisted_caller();
    T::Ledger::mint(&creator, T::AccountCreationFee::get()).unwrap();
    let referrer = T::BenchmarkHelper::referrer();
    let who: T::AccountId = account("new", 0, 0);

    #[extrinsic_call]
    create_account(RawOrigin::Signed(creator), who.clone(), referrer, Some(profile::<T>(b'a')));

    assert!(T::Referral::exists(&who));
    assert!(Profiles::<T>::contains_key(&who));
  }

  /// Replacing a nickname releases the old one.
  #[benchmark]
  fn update_profile() {
    let caller: T::AccountId = whitelisted_caller();
    let old = profile::<T>(b'a');
    Nicknames::<T>::insert(&old.nickname, &caller);
    Profiles::<T>::insert(&caller, old.clone());

    #[extrinsic_call]
    update_profile(RawOrigin::Signed(caller.clone()), profile::<T>(b'b'));

    assert!(!Nicknames::<T>::contains_key(&old.nickname));
    assert_eq!(Profiles::<T>::get(&caller).map(|p| p.nickname), Some(profile::<T>(b'b').nickname));
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};

  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}

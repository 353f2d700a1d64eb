#![cfg(feature = "runtime-benchmarks")]

use crate::*;
use alloc::{vec, vec::Vec};
use frame::prelude::*;
use polkadot_sdk::frame_benchmarking::{account, v2::*};
use polkadot_sdk::frame_system::RawOrigin;

#[benchmarks]
mod benches {
  use super::*;

  fn government<T: Config>(size: u32) -> Vec<T::AccountId> {
    let government: Vec<T::AccountId> = (0..size).map(|i| account("governor", i, 0)).collect();
    Government::<T>::put(government.clone());
    government
  }

  fn longest_name<T: Config>() -> Vec<u8> {
    vec![b'n'; T::MaxNameLength::get() as usize]
  }

  #[benchmark]
  fn propose() {
    let government = government::<T>(3);
    let candidate: T::AccountId = account("candidate", 0, 0);

    #[extrinsic_call]
    propose(
      RawOrigin::Signed(government[0].clone()),
      longest_name::<T>(),
      Proposal::AddGovernor(candidate),
    );

    assert!(CurrentProposal::<T>::get().is_some());
  }

  /// The last vote closes the proposal and applies it.
  #[benchmark]
  fn vote() {
    let government = government::<T>(2);
    let candidate: T::AccountId = account("candidate", 0, 0);
    Pallet::<T>::propose(
      RawOrigin::Signed(government[0].clone()).into(),
      longest_name::<T>(),
      Proposal::AddGovernor(candidate.clone()),
    )
    .unwrap();

    #[extrinsic_call]
    vote(RawOrigin::Signed(government[1].clone()), true);

    assert!(CurrentProposal::<T>::get().is_none());
    assert!(Government::<T>::get().contains(&candidate));
  }

  #[benchmark]
  fn start_poll() {
    let government = government::<T>(1);

    #[extrinsic_call]
    start_poll(RawOrigin::Signed(government[0].clone()), longest_name::<T>(), None, None);

    assert!(CurrentPoll::<T>::get().is_some());
  }

  #[benchmark]
  fn answer_poll() {
    let government = government::<T>(1);
    Pallet::<T>::start_poll(
      RawOrigin::Signed(government[0].clone()).into(),
      longest_name::<T>(),
      None,
      None,
    )
    .unwrap();
    let respondent: T::AccountId = whitelisted_caller();

    #[extrinsic_call]
    answer_poll(RawOrigin::Signed(respondent.clone()), true);

    assert_eq!(PollAnswers::<T>::get(&respondent), Some(true));
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};

  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}

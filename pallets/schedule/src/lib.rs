//! Schedule Pallet
//!
//! Time-ordered deferred execution shared by every keeper. A task binds a fire time to a
//! named hook and an opaque payload; at the end of each block all tasks whose fire time has
//! been reached are removed and handed to the registered [`TaskHandler`]s in
//! `(fire_time, insertion)` order.
//!
//! Tasks are keyed by the big-endian fire time followed by a big-endian sequence number, so
//! storage iteration order is the execution order. A hook that fails aborts the block: the
//! state it would leave behind is not recoverable by the keeper that scheduled it.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::schedule";

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, WeightInfo};
  use alloc::vec::Vec;
  use frame::prelude::*;
  use polkadot_sdk::frame_support::traits::Time;
  use primitives::{Moment, Scheduler, TaskHandler};

  /// Storage key of a fire time or a sequence number.
  pub type TaskKey = [u8; 8];

  #[derive(Decode, DecodeWithMemTracking, Encode, TypeInfo, MaxEncodedLen)]
  #[scale_info(skip_type_params(MaxHookLength, MaxPayloadLength))]
  pub struct Task<MaxHookLength: Get<u32>, MaxPayloadLength: Get<u32>> {
    pub hook: BoundedVec<u8, MaxHookLength>,
    pub payload: BoundedVec<u8, MaxPayloadLength>,
  }

  pub type TaskOf<T> = Task<<T as Config>::MaxHookLength, <T as Config>::MaxPayloadLength>;

  #[pallet::config]
  pub trait Config: frame_system::Config {
    /// Source of the block time
    type TimeProvider: Time<Moment = Moment>;

    /// Receivers of fired tasks
    type Handler: TaskHandler;

    /// Length of a day in milliseconds
    #[pallet::constant]
    type OneDay: Get<Moment>;

    /// Days in a month
    #[pallet::constant]
    type DaysPerMonth: Get<u32>;

    #[pallet::constant]
    type MaxHookLength: Get<u32>;

    #[pallet::constant]
    type MaxPayloadLength: Get<u32>;

    /// Weight information for hooks
    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  /// Pending tasks by `(fire_time, sequence)`, both big-endian.
  #[pallet::storage]
  pub type Tasks<T: Config> =
    StorageDoubleMap<_, Identity, TaskKey, Identity, TaskKey, TaskOf<T>, OptionQuery>;

  /// Sequence number handed to the next scheduled task.
  #[pallet::storage]
  pub type NextSequence<T: Config> = StorageValue<_, u64, ValueQuery>;

  #[pallet::error]
  pub enum Error<T> {
    /// Hook name exceeds `MaxHookLength`
    HookNameTooLong,
    /// Payload exceeds `MaxPayloadLength`
    PayloadTooLong,
  }

  #[pallet::hooks]
  impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
    fn on_initialize(_n: BlockNumberFor<T>) -> Weight {
      T::WeightInfo::on_finalize()
    }

    fn on_finalize(_n: BlockNumberFor<T>) {
      let fired = Self::run_due(T::TimeProvider::now());
      if fired > 0 {
        log::debug!(target: LOG_TARGET, "fired {} scheduled tasks", fired);
      }
    }
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    /// `(fire_time, hook, payload)` triples
    pub tasks: Vec<(Moment, Vec<u8>, Vec<u8>)>,
    #[serde(skip)]
    pub _marker: PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      for (at, hook, payload) in &self.tasks {
        Pallet::<T>::schedule_task(*at, hook, payload).expect("genesis task exceeds bounds");
      }
    }
  }

  impl<T: Config> Pallet<T> {
    pub fn schedule_task(at: Moment, hook: &[u8], payload: &[u8]) -> DispatchResult {
      let hook: BoundedVec<u8, T::MaxHookLength> =
        hook.to_vec().try_into().map_err(|_| Error::<T>::HookNameTooLong)?;
      let payload: BoundedVec<u8, T::MaxPayloadLength> =
        payload.to_vec().try_into().map_err(|_| Error::<T>::PayloadTooLong)?;
      let sequence = NextSequence::<T>::mutate(|next| {
        let current = *next;
        *next = next.wrapping_add(1);
        current
      });
      Tasks::<T>::insert(at.to_be_bytes(), sequence.to_be_bytes(), Task { hook, payload });
      Ok(())
    }

    pub fn delete_tasks(at: Moment, hook: &[u8], payload: Option<&[u8]>) {
      let matching: Vec<TaskKey> = Tasks::<T>::iter_prefix(at.to_be_bytes())
        .filter(|(_, task)| {
          task.hook.as_slice() == hook && payload.is_none_or(|p| task.payload.as_slice() == p)
        })
        .map(|(sequence, _)| sequence)
        .collect();
      for sequence in matching {
        Tasks::<T>::remove(at.to_be_bytes(), sequence);
      }
    }

    /// Fires every task due at `now`, including tasks scheduled by the hooks themselves.
    ///
    /// Panics when a hook fails.
    pub fn run_due(now: Moment) -> u32 {
      let mut fired = 0u32;
      while let Some((time_key, sequence, task)) = Tasks::<T>::iter().next() {
        let at = Moment::from_be_bytes(time_key);
        if at > now {
          break;
        }
        Tasks::<T>::remove(time_key, sequence);
        fired = fired.saturating_add(1);

        let name = core::str::from_utf8(&task.hook).unwrap_or("<non-utf8>");
        match T::Handler::handle(&task.hook, &task.payload, at) {
          Some(Ok(())) => {
            log::debug!(target: LOG_TARGET, "hook {} fired for time {}", name, at);
          },
          Some(Err(error)) => {
            log::error!(target: LOG_TARGET, "hook {} failed at time {}: {:?}", name, at, error);
            panic!("scheduled hook {name} failed: {error:?}");
          },
          None => {
            log::warn!(target: LOG_TARGET, "no handler for hook {}, task dropped", name);
          },
        }
      }
      fired
    }

    /// Pending `(hook, payload)` pairs at `at`, in execution order.
    pub fn tasks_at(at: Moment) -> Vec<(Vec<u8>, Vec<u8>)> {
      Tasks::<T>::iter_prefix(at.to_be_bytes())
        .map(|(_, task)| (task.hook.into_inner(), task.payload.into_inner()))
        .collect()
    }

    /// Every pending task as `(fire_time, hook, payload)`, in execution order.
    pub fn pending() -> Vec<(Moment, Vec<u8>, Vec<u8>)> {
      Tasks::<T>::iter()
        .map(|(time_key, _, task)| {
          (
            Moment::from_be_bytes(time_key),
            task.hook.into_inner(),
            task.payload.into_inner(),
          )
        })
        .collect()
    }
  }

  impl<T: Config> Scheduler for Pallet<T> {
    fn now() -> Moment {
      T::TimeProvider::now()
    }

    fn one_day() -> Moment {
      T::OneDay::get()
    }

    fn one_month() -> Moment {
      T::OneDay::get().saturating_mul(Moment::from(T::DaysPerMonth::get()))
    }

    fn schedule(at: Moment, hook: &[u8], payload: &[u8]) -> DispatchResult {
      Self::schedule_task(at, hook, payload)
    }

    fn delete(at: Moment, hook: &[u8], payload: &[u8]) {
      Self::delete_tasks(at, hook, Some(payload))
    }

    fn delete_all(at: Moment, hook: &[u8]) {
      Self::delete_tasks(at, hook, None)
    }
  }
}

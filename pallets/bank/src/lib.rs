//! Bank Pallet
//!
//! Multi-denomination ledger. Every account holds `main`, `delegated` and `revoking` coins;
//! the pallet keeps a supply record whose every denomination equals the sum over accounts.
//!
//! All mutations go through the [`Ledger`] capability. After each one the new coins of every
//! touched account are reported to `T::OnBalanceChanged`, which keeps the referral aggregates
//! in step with the ledger.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

#[cfg(test)]
mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

const LOG_TARGET: &str = "runtime::bank";

#[frame::pallet]
pub mod pallet {
  use super::{LOG_TARGET, WeightInfo};
  use alloc::vec::Vec;
  use frame::prelude::*;
  use polkadot_sdk::sp_runtime::Perbill;
  use primitives::{Balance, BankGovernance, Coins, Denom, Ledger, OnBalanceChanged};

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Notified with the new coins of every account touched by a mutation
    type OnBalanceChanged: OnBalanceChanged<Self::AccountId>;

    /// Module account collecting transaction fees
    #[pallet::constant]
    type FeeCollector: Get<Self::AccountId>;

    /// Default minimum amount accepted by `send`
    #[pallet::constant]
    type DefaultMinSend: Get<Balance>;

    /// Default dust delegation threshold
    #[pallet::constant]
    type DefaultDustDelegation: Get<Balance>;

    /// Default transaction fee ratio
    #[pallet::constant]
    type DefaultTransactionFee: Get<Perbill>;

    /// Default cap of a single transaction fee
    #[pallet::constant]
    type DefaultMaxTransactionFee: Get<Balance>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  #[pallet::storage]
  #[pallet::getter(fn account)]
  pub type Accounts<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, Coins, ValueQuery>;

  /// Total of every denomination over all accounts.
  #[pallet::storage]
  #[pallet::getter(fn supply)]
  pub type Supply<T: Config> = StorageValue<_, Coins, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn min_send)]
  pub type MinSend<T: Config> = StorageValue<_, Balance, ValueQuery, T::DefaultMinSend>;

  #[pallet::storage]
  pub type DustDelegation<T: Config> = StorageValue<_, Balance, ValueQuery, T::DefaultDustDelegation>;

  #[pallet::storage]
  pub type TransactionFee<T: Config> =
    StorageValue<_, Perbill, ValueQuery, T::DefaultTransactionFee>;

  #[pallet::storage]
  #[pallet::getter(fn max_transaction_fee)]
  pub type MaxTransactionFee<T: Config> =
    StorageValue<_, Balance, ValueQuery, T::DefaultMaxTransactionFee>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// Main coins moved between accounts
    Transfer { from: T::AccountId, to: T::AccountId, amount: Balance },
    /// Transaction fee collected
    FeePaid { who: T::AccountId, fee: Balance },
    /// New coins created
    Minted { who: T::AccountId, amount: Balance },
    /// Coins moved between denominations of one account
    CoinsMoved { who: T::AccountId, from: Denom, to: Denom, amount: Balance },
    /// Minimum send amount updated
    MinSendUpdated { old_amount: Balance, new_amount: Balance },
    /// Dust delegation threshold updated
    DustDelegationUpdated { old_amount: Balance, new_amount: Balance },
    /// Transaction fee ratio updated
    TransactionFeeUpdated { old_fee: Perbill, new_fee: Perbill },
    /// Transaction fee cap updated
    MaxTransactionFeeUpdated { old_amount: Balance, new_amount: Balance },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Not enough coins in the source denomination
    InsufficientFunds,
    /// Amount below the minimum send
    BelowMinSend,
    /// Source and target denomination are the same
    SameDenomination,
    /// Arithmetic overflow
    Overflow,
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    pub accounts: Vec<(T::AccountId, Coins)>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      let mut supply = Coins::default();
      for (who, coins) in &self.accounts {
        supply.main = supply.main.saturating_add(coins.main);
        supply.delegated = supply.delegated.saturating_add(coins.delegated);
        supply.revoking = supply.revoking.saturating_add(coins.revoking);
        frame_system::Pallet::<T>::inc_providers(who);
        Accounts::<T>::insert(who, coins);
      }
      Supply::<T>::put(supply);
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Send main coins. The sender pays the transaction fee on top of `amount`.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::send())]
    pub fn send(origin: OriginFor<T>, dest: T::AccountId, amount: Balance) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(amount >= MinSend::<T>::get(), Error::<T>::BelowMinSend);
      let fee = Self::fee_for(amount);
      let required = amount.checked_add(fee).ok_or(Error::<T>::Overflow)?;
      ensure!(Accounts::<T>::get(&who).main >= required, Error::<T>::InsufficientFunds);

      Self::do_transfer(&who, &dest, amount)?;
      <Self as Ledger<T::AccountId>>::pay_transaction_fee(&who, amount)?;
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    pub fn fee_for(amount: Balance) -> Balance {
      TransactionFee::<T>::get()
        .mul_floor(amount)
        .min(MaxTransactionFee::<T>::get())
    }

    fn store(who: &T::AccountId, coins: Coins) {
      if !Accounts::<T>::contains_key(who) {
        frame_system::Pallet::<T>::inc_providers(who);
      }
      Accounts::<T>::insert(who, coins);
    }

    fn notify(who: &T::AccountId) -> DispatchResult {
      T::OnBalanceChanged::on_balance_changed(who, &Accounts::<T>::get(who))
    }

    fn do_transfer(from: &T::AccountId, to: &T::AccountId, amount: Balance) -> DispatchResult {
      if amount == 0 {
        return Ok(());
      }
      let mut source = Accounts::<T>::get(from);
      source.main = source.main.checked_sub(amount).ok_or(Error::<T>::InsufficientFunds)?;
      Self::store(from, source);
      let mut target = Accounts::<T>::get(to);
      target.main = target.main.checked_add(amount).ok_or(Error::<T>::Overflow)?;
      Self::store(to, target);

      Self::deposit_event(Event::Transfer { from: from.clone(), to: to.clone(), amount });
      Self::notify(from)?;
      Self::notify(to)
    }
  }

  impl<T: Config> Ledger<T::AccountId> for Pallet<T> {
    fn coins(who: &T::AccountId) -> Coins {
      Accounts::<T>::get(who)
    }

    fn transfer(from: &T::AccountId, to: &T::AccountId, amount: Balance) -> DispatchResult {
      Self::do_transfer(from, to, amount)
    }

    fn input_output(from: &T::AccountId, outputs: &[(T::AccountId, Balance)]) -> DispatchResult {
      let total = outputs
        .iter()
        .try_fold(0 as Balance, |acc, (_, x)| acc.checked_add(*x))
        .ok_or(Error::<T>::Overflow)?;
      ensure!(Accounts::<T>::get(from).main >= total, Error::<T>::InsufficientFunds);

      let mut source = Accounts::<T>::get(from);
      source.main = source.main.saturating_sub(total);
      Self::store(from, source);
      for (to, amount) in outputs {
        let mut target = Accounts::<T>::get(to);
        target.main = target.main.checked_add(*amount).ok_or(Error::<T>::Overflow)?;
        Self::store(to, target);
        Self::deposit_event(Event::Transfer { from: from.clone(), to: to.clone(), amount: *amount });
      }

      Self::notify(from)?;
      for (to, _) in outputs {
        Self::notify(to)?;
      }
      Ok(())
    }

    fn move_coins(who: &T::AccountId, from: Denom, to: Denom, amount: Balance) -> DispatchResult {
      ensure!(from != to, Error::<T>::SameDenomination);
      if amount == 0 {
        return Ok(());
      }
      let mut coins = Accounts::<T>::get(who);
      let source = coins.get_mut(from);
      *source = source.checked_sub(amount).ok_or(Error::<T>::InsufficientFunds)?;
      let target = coins.get_mut(to);
      *target = target.checked_add(amount).ok_or(Error::<T>::Overflow)?;
      Self::store(who, coins);

      Supply::<T>::try_mutate(|supply| -> DispatchResult {
        let deflated = supply.get_mut(from);
        *deflated = deflated.checked_sub(amount).ok_or(Error::<T>::InsufficientFunds)?;
        let inflated = supply.get_mut(to);
        *inflated = inflated.checked_add(amount).ok_or(Error::<T>::Overflow)?;
        Ok(())
      })?;

      Self::deposit_event(Event::CoinsMoved { who: who.clone(), from, to, amount });
      Self::notify(who)
    }

    fn mint(who: &T::AccountId, amount: Balance) -> DispatchResult {
      if amount == 0 {
        return Ok(());
      }
      let mut coins = Accounts::<T>::get(who);
      coins.main = coins.main.checked_add(amount).ok_or(Error::<T>::Overflow)?;
      Supply::<T>::try_mutate(|supply| -> DispatchResult {
        supply.main = supply.main.checked_add(amount).ok_or(Error::<T>::Overflow)?;
        Ok(())
      })?;
      Self::store(who, coins);

      log::debug!(target: LOG_TARGET, "minted {} to {:?}", amount, who);
      Self::deposit_event(Event::Minted { who: who.clone(), amount });
      Self::notify(who)
    }

    fn transaction_fee(amount: Balance) -> Balance {
      Self::fee_for(amount)
    }

    fn pay_transaction_fee(who: &T::AccountId, amount: Balance) -> Result<Balance, DispatchError> {
      let fee = Self::fee_for(amount);
      if fee > 0 {
        Self::do_transfer(who, &T::FeeCollector::get(), fee)?;
        Self::deposit_event(Event::FeePaid { who: who.clone(), fee });
      }
      Ok(fee)
    }

    fn dust_delegation() -> Balance {
      DustDelegation::<T>::get()
    }
  }

  impl<T: Config> BankGovernance for Pallet<T> {
    fn set_min_send(new_amount: Balance) -> DispatchResult {
      let old_amount = MinSend::<T>::get();
      MinSend::<T>::put(new_amount);
      Self::deposit_event(Event::MinSendUpdated { old_amount, new_amount });
      Ok(())
    }

    fn set_dust_delegation(new_amount: Balance) -> DispatchResult {
      let old_amount = DustDelegation::<T>::get();
      DustDelegation::<T>::put(new_amount);
      Self::deposit_event(Event::DustDelegationUpdated { old_amount, new_amount });
      Ok(())
    }

    fn set_transaction_fee(new_fee: Perbill) -> DispatchResult {
      let old_fee = TransactionFee::<T>::get();
      TransactionFee::<T>::put(new_fee);
      Self::deposit_event(Event::TransactionFeeUpdated { old_fee, new_fee });
      Ok(())
    }

    fn set_max_transaction_fee(new_amount: Balance) -> DispatchResult {
      let old_amount = MaxTransactionFee::<T>::get();
      MaxTransactionFee::<T>::put(new_amount);
      Self::deposit_event(Event::MaxTransactionFeeUpdated { old_amount, new_amount });
      Ok(())
    }
  }
}

//! Keeper capabilities.
//!
//! Every keeper reaches its collaborators through the narrow traits below. A pallet's `Config`
//! names exactly the capabilities it consumes; the runtime binds them to the concrete pallets.
//! The `()` implementations are inert stand-ins for collaborators that are not part of a
//! particular runtime.

use crate::{
  AccruePercentage, Balance, Coins, Denom, Moment, NetworkAward, ReferralFee, Status,
  VotingPowerDistribution,
};
use alloc::vec::Vec;
use polkadot_sdk::sp_runtime::{DispatchError, DispatchResult};
use sp_arithmetic::Perbill;

/// Time-ordered deferred execution.
///
/// A task is a `(fire_time, hook, payload)` triple; tasks fire in `(fire_time, insertion)` order
/// at the end of the first block whose time is not earlier than `fire_time`.
pub trait Scheduler {
  fn now() -> Moment;
  fn one_day() -> Moment;
  fn one_month() -> Moment;
  fn schedule(at: Moment, hook: &[u8], payload: &[u8]) -> DispatchResult;
  /// Removes the tasks at `at` bound to `hook` whose payload equals `payload`.
  fn delete(at: Moment, hook: &[u8], payload: &[u8]);
  /// Removes every task at `at` bound to `hook`.
  fn delete_all(at: Moment, hook: &[u8]);
}

/// Receiver of fired tasks.
///
/// Returns `None` when `hook` does not belong to the implementor.
pub trait TaskHandler {
  fn handle(hook: &[u8], payload: &[u8], at: Moment) -> Option<DispatchResult>;
}

impl TaskHandler for () {
  fn handle(_hook: &[u8], _payload: &[u8], _at: Moment) -> Option<DispatchResult> {
    None
  }
}

macro_rules! impl_task_handler_for_tuples {
  ($($name:ident),+) => {
    impl<$($name: TaskHandler),+> TaskHandler for ($($name,)+) {
      fn handle(hook: &[u8], payload: &[u8], at: Moment) -> Option<DispatchResult> {
        $(
          if let Some(result) = $name::handle(hook, payload, at) {
            return Some(result);
          }
        )+
        None
      }
    }
  };
}

impl_task_handler_for_tuples!(A);
impl_task_handler_for_tuples!(A, B);
impl_task_handler_for_tuples!(A, B, C);
impl_task_handler_for_tuples!(A, B, C, D);
impl_task_handler_for_tuples!(A, B, C, D, E);
impl_task_handler_for_tuples!(A, B, C, D, E, F);

/// Multi-denomination ledger.
pub trait Ledger<AccountId> {
  fn coins(who: &AccountId) -> Coins;

  /// Moves `amount` of main coins between accounts.
  fn transfer(from: &AccountId, to: &AccountId, amount: Balance) -> DispatchResult;

  /// Pays every output from `from`'s main coins, all or nothing.
  fn input_output(from: &AccountId, outputs: &[(AccountId, Balance)]) -> DispatchResult;

  /// Moves coins of one account between denominations.
  fn move_coins(who: &AccountId, from: Denom, to: Denom, amount: Balance) -> DispatchResult;

  /// Creates new main coins, inflating the supply.
  fn mint(who: &AccountId, amount: Balance) -> DispatchResult;

  /// Transaction fee charged on `amount`.
  fn transaction_fee(amount: Balance) -> Balance;

  /// Charges the transaction fee on `amount` to `who`, returning the fee.
  fn pay_transaction_fee(who: &AccountId, amount: Balance) -> Result<Balance, DispatchError>;

  /// Delegations at or below this value neither accrue nor get scheduled.
  fn dust_delegation() -> Balance;
}

/// Fired by the ledger after every change of an account's coins.
pub trait OnBalanceChanged<AccountId> {
  fn on_balance_changed(who: &AccountId, coins: &Coins) -> DispatchResult;
}

impl<AccountId> OnBalanceChanged<AccountId> for () {
  fn on_balance_changed(_who: &AccountId, _coins: &Coins) -> DispatchResult {
    Ok(())
  }
}

/// Referral structure as seen by the product keepers.
pub trait ReferralNetwork<AccountId> {
  fn exists(who: &AccountId) -> bool;
  fn status(who: &AccountId) -> Option<Status>;
  fn is_banished(who: &AccountId) -> bool;
  /// Registers `child` directly under `parent`.
  fn append_child(parent: &AccountId, child: &AccountId) -> DispatchResult;
  fn set_active(who: &AccountId, active: bool) -> DispatchResult;
  /// Re-attaches a banished account to the structure. No-op otherwise.
  fn come_back(who: &AccountId) -> DispatchResult;
  fn delegating_fees(who: &AccountId) -> Result<Vec<ReferralFee<AccountId>>, DispatchError>;
  fn subscription_fees(who: &AccountId) -> Result<Vec<ReferralFee<AccountId>>, DispatchError>;
}

/// Callbacks emitted by the referral keeper once a batch of tree updates is committed.
pub trait ReferralHooks<AccountId> {
  fn on_status_updated(who: &AccountId, status: Status) -> DispatchResult;
  fn on_stake_changed(who: &AccountId) -> DispatchResult;
  fn on_banished(who: &AccountId) -> DispatchResult;
}

impl<AccountId> ReferralHooks<AccountId> for () {
  fn on_status_updated(_who: &AccountId, _status: Status) -> DispatchResult {
    Ok(())
  }

  fn on_stake_changed(_who: &AccountId) -> DispatchResult {
    Ok(())
  }

  fn on_banished(_who: &AccountId) -> DispatchResult {
    Ok(())
  }
}

/// Validator facts owned by the noding module.
pub trait ValidatorInspect<AccountId> {
  fn is_active_validator(who: &AccountId) -> bool;
  fn can_validate(who: &AccountId) -> bool;
}

impl<AccountId> ValidatorInspect<AccountId> for () {
  fn is_active_validator(_who: &AccountId) -> bool {
    false
  }

  fn can_validate(_who: &AccountId) -> bool {
    false
  }
}

/// Profile facts needed by the product keepers.
pub trait ProfileInspect<AccountId> {
  fn auto_pay(who: &AccountId) -> bool;
}

impl<AccountId> ProfileInspect<AccountId> for () {
  fn auto_pay(_who: &AccountId) -> bool {
    false
  }
}

/// A `(limit, current)` byte quota (VPN traffic, storage space).
pub trait ResourceQuota<AccountId> {
  fn limit(who: &AccountId) -> u64;
  fn current(who: &AccountId) -> u64;
  fn set_limit(who: &AccountId, limit: u64);
  fn add_limit(who: &AccountId, extra: u64);
  fn set_current(who: &AccountId, current: u64);
}

/// An allow-list maintained by governance.
pub trait SignerRegistry<AccountId> {
  fn add_signer(who: &AccountId) -> DispatchResult;
  fn remove_signer(who: &AccountId) -> DispatchResult;
}

impl<AccountId> SignerRegistry<AccountId> for () {
  fn add_signer(_who: &AccountId) -> DispatchResult {
    Ok(())
  }

  fn remove_signer(_who: &AccountId) -> DispatchResult {
    Ok(())
  }
}

/// Governance over the ledger parameters.
pub trait BankGovernance {
  fn set_min_send(value: Balance) -> DispatchResult;
  fn set_dust_delegation(value: Balance) -> DispatchResult;
  fn set_transaction_fee(value: Perbill) -> DispatchResult;
  fn set_max_transaction_fee(value: Balance) -> DispatchResult;
}

/// Governance over the delegation parameters.
pub trait DelegationGovernance {
  fn set_min_delegate(value: Balance) -> DispatchResult;
  fn set_revoke_period(days: u32) -> DispatchResult;
  fn set_accrue_percentage(value: AccruePercentage) -> DispatchResult;
}

/// Governance over the referral parameters.
pub trait ReferralGovernance {
  fn set_transition_price(value: Balance) -> DispatchResult;
  fn set_delegating_award(value: NetworkAward) -> DispatchResult;
  fn set_subscription_award(value: NetworkAward) -> DispatchResult;
}

/// Governance over the product prices.
pub trait SubscriptionGovernance {
  fn set_subscription_price(value: u32) -> DispatchResult;
  fn set_vpn_gb_price(value: u32) -> DispatchResult;
  fn set_storage_gb_price(value: u32) -> DispatchResult;
}

/// Governance over the validator module.
pub trait NodingGovernance<AccountId> {
  fn add_staff_validator(who: &AccountId) -> DispatchResult;
  fn remove_staff_validator(who: &AccountId) -> DispatchResult;
  fn set_max_validators(count: u16) -> DispatchResult;
  fn set_lucky_validators(count: u16) -> DispatchResult;
  fn general_amnesty() -> DispatchResult;
  fn set_minimal_status(status: Status) -> DispatchResult;
  fn set_jail_after(count: u16) -> DispatchResult;
  fn set_voting_power(distribution: VotingPowerDistribution) -> DispatchResult;
}

impl<AccountId> NodingGovernance<AccountId> for () {
  fn add_staff_validator(_who: &AccountId) -> DispatchResult {
    Ok(())
  }

  fn remove_staff_validator(_who: &AccountId) -> DispatchResult {
    Ok(())
  }

  fn set_max_validators(_count: u16) -> DispatchResult {
    Ok(())
  }

  fn set_lucky_validators(_count: u16) -> DispatchResult {
    Ok(())
  }

  fn general_amnesty() -> DispatchResult {
    Ok(())
  }

  fn set_minimal_status(_status: Status) -> DispatchResult {
    Ok(())
  }

  fn set_jail_after(_count: u16) -> DispatchResult {
    Ok(())
  }

  fn set_voting_power(_distribution: VotingPowerDistribution) -> DispatchResult {
    Ok(())
  }
}

/// Applies `fees` to `amount`, dropping zero outputs.
pub fn fee_outputs<AccountId: Clone>(
  fees: &[ReferralFee<AccountId>],
  amount: Balance,
) -> Vec<(AccountId, Balance)> {
  fees
    .iter()
    .map(|fee| (fee.beneficiary.clone(), fee.ratio.mul_floor(amount)))
    .filter(|(_, x)| *x > 0)
    .collect()
}

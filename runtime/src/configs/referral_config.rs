//! Referral pallet configuration.
//!
//! Committed tree callbacks are routed to the keepers that react to them. Only banishment has a
//! consumer in this runtime: a banished account loses its whole delegation.

use super::*;

use crate::{Bank, Delegating, Schedule};
use polkadot_sdk::sp_runtime::DispatchResult;
use primitives::{Balance, CompanyAccounts, NetworkAward, ReferralHooks, Status, ecosystem::params};

/// The reserved company accounts.
pub struct Companies;
impl Get<CompanyAccounts<AccountId>> for Companies {
  fn get() -> CompanyAccounts<AccountId> {
    CompanyAccounts {
      top_referrer: TopReferrer::get(),
      for_subscription: ForSubscription::get(),
      for_delegating: ForDelegating::get(),
      promo_bonuses: PromoBonuses::get(),
      status_bonuses: StatusBonuses::get(),
      leader_bonuses: LeaderBonuses::get(),
    }
  }
}

parameter_types! {
  /// Cost of moving to another referrer (ecosystem constant: 1 ARTR)
  pub const DefaultTransitionPrice: Balance = params::TRANSITION_PRICE;

  /// 5% company, 10% over ten levels
  pub const DefaultDelegatingAward: NetworkAward = NetworkAward::delegating();

  /// 10% company, 60% over ten levels
  pub const DefaultSubscriptionAward: NetworkAward = NetworkAward::subscription();
}

pub struct ReferralCallbacks;
impl ReferralHooks<AccountId> for ReferralCallbacks {
  fn on_status_updated(who: &AccountId, status: Status) -> DispatchResult {
    log::debug!(target: "runtime::referral", "{:?} now holds {:?}", who, status);
    Ok(())
  }

  fn on_stake_changed(_who: &AccountId) -> DispatchResult {
    Ok(())
  }

  fn on_banished(who: &AccountId) -> DispatchResult {
    Delegating::on_banished(who)
  }
}

impl pallet_referral::Config for Runtime {
  type Ledger = Bank;
  type Scheduler = Schedule;
  type Hooks = ReferralCallbacks;
  type CompanyAccounts = Companies;
  type FeeCollector = FeeCollector;
  type DefaultTransitionPrice = DefaultTransitionPrice;
  type DefaultDelegatingAward = DefaultDelegatingAward;
  type DefaultSubscriptionAward = DefaultSubscriptionAward;
  type WeightInfo = pallet_referral::weights::SubstrateWeight<Runtime>;
}

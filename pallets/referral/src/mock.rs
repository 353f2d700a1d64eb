use crate as pallet_referral;
use polkadot_sdk::frame_support::{
  construct_runtime, derive_impl, parameter_types,
  traits::{ConstU64, ConstU128},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, DispatchResult,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{
  Balance, Coins, CompanyAccounts, Denom, Ledger, Moment, NetworkAward, OnBalanceChanged,
  ReferralHooks, Scheduler, Status, TaskHandler,
};
use std::{cell::RefCell, collections::BTreeMap};

pub type AccountId = u64;

pub const ROOT: AccountId = 1;
pub const TOP_REFERRER: AccountId = 100;
pub const FOR_SUBSCRIPTION: AccountId = 101;
pub const FOR_DELEGATING: AccountId = 102;
pub const PROMO_BONUSES: AccountId = 103;
pub const STATUS_BONUSES: AccountId = 104;
pub const LEADER_BONUSES: AccountId = 105;
pub const FEE_COLLECTOR: AccountId = 999;

pub const ARTR: Balance = 1_000_000;
pub const DAY: Moment = 1_000;
pub const MONTH: Moment = 30 * DAY;

type Task = (Moment, Vec<u8>, Vec<u8>);

thread_local! {
  static NOW: RefCell<Moment> = const { RefCell::new(0) };
  static TASKS: RefCell<Vec<Task>> = const { RefCell::new(Vec::new()) };
  static COINS: RefCell<BTreeMap<AccountId, Coins>> = const { RefCell::new(BTreeMap::new()) };
  static CALLBACKS: RefCell<Vec<(AccountId, &'static str)>> = const { RefCell::new(Vec::new()) };
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Referral: pallet_referral,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = AccountId;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
}

/// Scheduler keeping its tasks in memory; tests fire them with [`advance_to`].
pub struct MockScheduler;
impl Scheduler for MockScheduler {
  fn now() -> Moment {
    NOW.with(|n| *n.borrow())
  }

  fn one_day() -> Moment {
    DAY
  }

  fn one_month() -> Moment {
    MONTH
  }

  fn schedule(at: Moment, hook: &[u8], payload: &[u8]) -> DispatchResult {
    TASKS.with(|t| t.borrow_mut().push((at, hook.to_vec(), payload.to_vec())));
    Ok(())
  }

  fn delete(at: Moment, hook: &[u8], payload: &[u8]) {
    TASKS.with(|t| t.borrow_mut().retain(|(a, h, p)| !(*a == at && h == hook && p == payload)));
  }

  fn delete_all(at: Moment, hook: &[u8]) {
    TASKS.with(|t| t.borrow_mut().retain(|(a, h, _)| !(*a == at && h == hook)));
  }
}

/// Ledger over an in-memory map that reports every change to the referral pallet.
pub struct MockLedger;

impl MockLedger {
  fn update(who: AccountId, f: impl FnOnce(&mut Coins) -> DispatchResult) -> DispatchResult {
    let mut coins = Self::coins(&who);
    f(&mut coins)?;
    COINS.with(|c| c.borrow_mut().insert(who, coins));
    <Referral as OnBalanceChanged<AccountId>>::on_balance_changed(&who, &coins)
  }
}

impl Ledger<AccountId> for MockLedger {
  fn coins(who: &AccountId) -> Coins {
    COINS.with(|c| c.borrow().get(who).copied().unwrap_or_default())
  }

  fn transfer(from: &AccountId, to: &AccountId, amount: Balance) -> DispatchResult {
    Self::update(*from, |c| {
      c.main = c.main.checked_sub(amount).ok_or(DispatchError::Other("insufficient funds"))?;
      Ok(())
    })?;
    Self::update(*to, |c| {
      c.main += amount;
      Ok(())
    })
  }

  fn input_output(from: &AccountId, outputs: &[(AccountId, Balance)]) -> DispatchResult {
    for (to, amount) in outputs {
      Self::transfer(from, to, *amount)?;
    }
    Ok(())
  }

  fn move_coins(who: &AccountId, from: Denom, to: Denom, amount: Balance) -> DispatchResult {
    Self::update(*who, |c| {
      let source = c.get_mut(from);
      *source = source.checked_sub(amount).ok_or(DispatchError::Other("insufficient funds"))?;
      *c.get_mut(to) += amount;
      Ok(())
    })
  }

  fn mint(who: &AccountId, amount: Balance) -> DispatchResult {
    Self::update(*who, |c| {
      c.main += amount;
      Ok(())
    })
  }

  fn transaction_fee(_amount: Balance) -> Balance {
    0
  }

  fn pay_transaction_fee(_who: &AccountId, _amount: Balance) -> Result<Balance, DispatchError> {
    Ok(0)
  }

  fn dust_delegation() -> Balance {
    0
  }
}

pub struct RecordHooks;
impl ReferralHooks<AccountId> for RecordHooks {
  fn on_status_updated(who: &AccountId, _status: Status) -> DispatchResult {
    CALLBACKS.with(|c| c.borrow_mut().push((*who, "status-updated")));
    Ok(())
  }

  fn on_stake_changed(who: &AccountId) -> DispatchResult {
    CALLBACKS.with(|c| c.borrow_mut().push((*who, "stake-changed")));
    Ok(())
  }

  fn on_banished(who: &AccountId) -> DispatchResult {
    CALLBACKS.with(|c| c.borrow_mut().push((*who, "banished")));
    Ok(())
  }
}

parameter_types! {
  pub const Companies: CompanyAccounts<AccountId> = CompanyAccounts {
    top_referrer: TOP_REFERRER,
    for_subscription: FOR_SUBSCRIPTION,
    for_delegating: FOR_DELEGATING,
    promo_bonuses: PROMO_BONUSES,
    status_bonuses: STATUS_BONUSES,
    leader_bonuses: LEADER_BONUSES,
  };
  pub const DefaultDelegating: NetworkAward = NetworkAward::delegating();
  pub const DefaultSubscription: NetworkAward = NetworkAward::subscription();
}

impl pallet_referral::Config for Test {
  type Ledger = MockLedger;
  type Scheduler = MockScheduler;
  type Hooks = RecordHooks;
  type CompanyAccounts = Companies;
  type FeeCollector = ConstU64<FEE_COLLECTOR>;
  type DefaultTransitionPrice = ConstU128<ARTR>;
  type DefaultDelegatingAward = DefaultDelegating;
  type DefaultSubscriptionAward = DefaultSubscription;
  type WeightInfo = ();
}

pub fn set_now(now: Moment) {
  NOW.with(|n| *n.borrow_mut() = now);
}

pub fn tasks() -> Vec<Task> {
  TASKS.with(|t| t.borrow().clone())
}

pub fn has_task(at: Moment, hook: &[u8], who: AccountId) -> bool {
  use codec::Encode;
  tasks().iter().any(|(a, h, p)| *a == at && h == hook && *p == who.encode())
}

pub fn callbacks() -> Vec<(AccountId, &'static str)> {
  CALLBACKS.with(|c| c.borrow().clone())
}

pub fn clear_callbacks() {
  CALLBACKS.with(|c| c.borrow_mut().clear());
}

/// Moves the clock to `now` and fires every task due by then, earliest first.
pub fn advance_to(now: Moment) {
  set_now(now);
  loop {
    let next = TASKS.with(|t| {
      let mut tasks = t.borrow_mut();
      let index = tasks
        .iter()
        .enumerate()
        .filter(|(_, (at, _, _))| *at <= now)
        .min_by_key(|(i, (at, _, _))| (*at, *i))
        .map(|(i, _)| i);
      index.map(|i| tasks.remove(i))
    });
    let Some((at, hook, payload)) = next else { break };
    assert_eq!(<Referral as TaskHandler>::handle(&hook, &payload, at), Some(Ok(())));
  }
}

/// Credits `main` coins and registers `who` under `parent`.
pub fn register(parent: AccountId, who: AccountId, main: Balance) {
  MockLedger::mint(&who, main).unwrap();
  <Referral as primitives::ReferralNetwork<AccountId>>::append_child(&parent, &who).unwrap();
}

pub fn activate(who: AccountId) {
  <Referral as primitives::ReferralNetwork<AccountId>>::set_active(&who, true).unwrap();
}

pub fn deactivate(who: AccountId) {
  <Referral as primitives::ReferralNetwork<AccountId>>::set_active(&who, false).unwrap();
}

#[derive(Default)]
pub struct ExtBuilder {
  accounts: Vec<(AccountId, Option<AccountId>, Status, bool)>,
  coins: Vec<(AccountId, Coins)>,
}

impl ExtBuilder {
  pub fn account(
    mut self,
    who: AccountId,
    referrer: Option<AccountId>,
    status: Status,
    active: bool,
    main: Balance,
  ) -> Self {
    self.accounts.push((who, referrer, status, active));
    self.coins.push((who, Coins { main, ..Default::default() }));
    self
  }

  pub fn coins(mut self, who: AccountId, main: Balance) -> Self {
    self.coins.push((who, Coins { main, ..Default::default() }));
    self
  }

  pub fn build(self) -> polkadot_sdk::sp_io::TestExternalities {
    set_now(0);
    TASKS.with(|t| t.borrow_mut().clear());
    COINS.with(|c| *c.borrow_mut() = self.coins.into_iter().collect());

    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();
    pallet_referral::GenesisConfig::<Test> { accounts: self.accounts, transition_price: None }
      .assimilate_storage(&mut t)
      .unwrap();

    let mut ext = polkadot_sdk::sp_io::TestExternalities::new(t);
    ext.execute_with(|| {
      clear_callbacks();
      System::set_block_number(1);
    });
    ext
  }
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  ExtBuilder::default().account(ROOT, None, Status::Lucky, true, 1_000 * ARTR).build()
}

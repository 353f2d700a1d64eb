use crate as pallet_delegating;
use polkadot_sdk::frame_support::{
  construct_runtime, derive_impl, parameter_types,
  traits::{ConstU32, ConstU128},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, DispatchResult, Perbill,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{
  AccruePercentage, Balance, Coins, Denom, Ledger, Moment, ReferralFee, ReferralNetwork,
  Scheduler, Status, TaskHandler, ValidatorInspect,
};
use std::{
  cell::RefCell,
  collections::{BTreeMap, BTreeSet},
};

pub type AccountId = u64;

pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const FOR_DELEGATING: AccountId = 102;
pub const TOP_REFERRER: AccountId = 100;
pub const FEE_COLLECTOR: AccountId = 999;

pub const ARTR: Balance = 1_000_000;
pub const DAY: Moment = 1_000;

type Task = (Moment, Vec<u8>, Vec<u8>);

thread_local! {
  static NOW: RefCell<Moment> = const { RefCell::new(0) };
  static TASKS: RefCell<Vec<Task>> = const { RefCell::new(Vec::new()) };
  static COINS: RefCell<BTreeMap<AccountId, Coins>> = const { RefCell::new(BTreeMap::new()) };
  static DUST: RefCell<Balance> = const { RefCell::new(0) };
  static BANISHED: RefCell<BTreeSet<AccountId>> = const { RefCell::new(BTreeSet::new()) };
  static CAME_BACK: RefCell<Vec<AccountId>> = const { RefCell::new(Vec::new()) };
  static VALIDATORS: RefCell<BTreeSet<AccountId>> = const { RefCell::new(BTreeSet::new()) };
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Delegating: pallet_delegating,
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

pub struct MockScheduler;
impl Scheduler for MockScheduler {
  fn now() -> Moment {
    NOW.with(|n| *n.borrow())
  }

  fn one_day() -> Moment {
    DAY
  }

  fn one_month() -> Moment {
    30 * DAY
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

/// In-memory ledger charging the 0.3 % transaction fee.
pub struct MockLedger;
impl Ledger<AccountId> for MockLedger {
  fn coins(who: &AccountId) -> Coins {
    COINS.with(|c| c.borrow().get(who).copied().unwrap_or_default())
  }

  fn transfer(from: &AccountId, to: &AccountId, amount: Balance) -> DispatchResult {
    Self::move_between(from, to, amount)
  }

  fn input_output(from: &AccountId, outputs: &[(AccountId, Balance)]) -> DispatchResult {
    let total: Balance = outputs.iter().map(|(_, x)| x).sum();
    if Self::coins(from).main < total {
      return Err(DispatchError::Other("insufficient funds"));
    }
    for (to, amount) in outputs {
      Self::move_between(from, to, *amount)?;
    }
    Ok(())
  }

  fn move_coins(who: &AccountId, from: Denom, to: Denom, amount: Balance) -> DispatchResult {
    let mut coins = Self::coins(who);
    let source = coins.get_mut(from);
    *source = source.checked_sub(amount).ok_or(DispatchError::Other("insufficient funds"))?;
    *coins.get_mut(to) += amount;
    COINS.with(|c| c.borrow_mut().insert(*who, coins));
    Ok(())
  }

  fn mint(who: &AccountId, amount: Balance) -> DispatchResult {
    COINS.with(|c| c.borrow_mut().entry(*who).or_default().main += amount);
    Ok(())
  }

  fn transaction_fee(amount: Balance) -> Balance {
    Perbill::from_perthousand(3).mul_floor(amount).min(10 * ARTR)
  }

  fn pay_transaction_fee(who: &AccountId, amount: Balance) -> Result<Balance, DispatchError> {
    let fee = Self::transaction_fee(amount);
    Self::move_between(who, &FEE_COLLECTOR, fee)?;
    Ok(fee)
  }

  fn dust_delegation() -> Balance {
    DUST.with(|d| *d.borrow())
  }
}

impl MockLedger {
  fn move_between(from: &AccountId, to: &AccountId, amount: Balance) -> DispatchResult {
    let mut source = Self::coins(from);
    source.main = source.main.checked_sub(amount).ok_or(DispatchError::Other("insufficient funds"))?;
    COINS.with(|c| {
      let mut coins = c.borrow_mut();
      coins.insert(*from, source);
      coins.entry(*to).or_default().main += amount;
    });
    Ok(())
  }
}

/// Referral stand-in: ALICE sits under BOB, delegating fees are 5 % company, 5 % BOB and 5 %
/// top referrer.
pub struct MockReferral;
impl ReferralNetwork<AccountId> for MockReferral {
  fn exists(_who: &AccountId) -> bool {
    true
  }

  fn status(_who: &AccountId) -> Option<Status> {
    Some(Status::Lucky)
  }

  fn is_banished(who: &AccountId) -> bool {
    BANISHED.with(|b| b.borrow().contains(who))
  }

  fn append_child(_parent: &AccountId, _child: &AccountId) -> DispatchResult {
    Ok(())
  }

  fn set_active(_who: &AccountId, _active: bool) -> DispatchResult {
    Ok(())
  }

  fn come_back(who: &AccountId) -> DispatchResult {
    BANISHED.with(|b| b.borrow_mut().remove(who));
    CAME_BACK.with(|c| c.borrow_mut().push(*who));
    Ok(())
  }

  fn delegating_fees(_who: &AccountId) -> Result<Vec<ReferralFee<AccountId>>, DispatchError> {
    Ok(
      [FOR_DELEGATING, BOB, TOP_REFERRER]
        .into_iter()
        .map(|beneficiary| ReferralFee { beneficiary, ratio: Perbill::from_percent(5) })
        .collect(),
    )
  }

  fn subscription_fees(_who: &AccountId) -> Result<Vec<ReferralFee<AccountId>>, DispatchError> {
    Ok(Vec::new())
  }
}

pub struct MockValidators;
impl ValidatorInspect<AccountId> for MockValidators {
  fn is_active_validator(who: &AccountId) -> bool {
    VALIDATORS.with(|v| v.borrow().contains(who))
  }

  fn can_validate(who: &AccountId) -> bool {
    Self::is_active_validator(who)
  }
}

parameter_types! {
  pub const ValidatorBonus: Perbill = Perbill::from_percent(10);
  pub DefaultPercentage: AccruePercentage = AccruePercentage::default();
}

impl pallet_delegating::Config for Test {
  type Ledger = MockLedger;
  type Scheduler = MockScheduler;
  type Referral = MockReferral;
  type Validators = MockValidators;
  type BlocksPerDay = ConstU32<2_880>;
  type ValidatorBonus = ValidatorBonus;
  type MassiveRevoke = ConstU128<{ 100_000 * ARTR }>;
  type DefaultMinDelegate = ConstU128<ARTR>;
  type DefaultRevokePeriod = ConstU32<14>;
  type DefaultAccruePercentage = DefaultPercentage;
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

pub fn coins(who: AccountId) -> Coins {
  MockLedger::coins(&who)
}

pub fn set_dust(value: Balance) {
  DUST.with(|d| *d.borrow_mut() = value);
}

pub fn banish(who: AccountId) {
  BANISHED.with(|b| b.borrow_mut().insert(who));
}

pub fn came_back() -> Vec<AccountId> {
  CAME_BACK.with(|c| c.borrow().clone())
}

pub fn make_validator(who: AccountId) {
  VALIDATORS.with(|v| v.borrow_mut().insert(who));
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
    assert_eq!(<Delegating as TaskHandler>::handle(&hook, &payload, at), Some(Ok(())));
  }
}

#[derive(Default)]
pub struct ExtBuilder {
  coins: Vec<(AccountId, Coins)>,
}

impl ExtBuilder {
  pub fn coins(mut self, who: AccountId, coins: Coins) -> Self {
    self.coins.push((who, coins));
    self
  }

  pub fn build(self) -> polkadot_sdk::sp_io::TestExternalities {
    set_now(0);
    set_dust(0);
    TASKS.with(|t| t.borrow_mut().clear());
    BANISHED.with(|b| b.borrow_mut().clear());
    CAME_BACK.with(|c| c.borrow_mut().clear());
    VALIDATORS.with(|v| v.borrow_mut().clear());
    COINS.with(|c| *c.borrow_mut() = self.coins.into_iter().collect());

    let t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();
    let mut ext = polkadot_sdk::sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
  }
}

/// ALICE holds one million main coins.
pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  ExtBuilder::default()
    .coins(ALICE, Coins { main: 1_000_000 * ARTR, ..Default::default() })
    .build()
}

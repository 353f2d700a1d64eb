use crate as pallet_schedule;
use polkadot_sdk::frame_support::{
  construct_runtime, derive_impl,
  traits::{ConstU32, ConstU64, Time},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, DispatchResult,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{Moment, Scheduler as _, TaskHandler};
use std::cell::RefCell;

pub const DAY: Moment = 1_000;

thread_local! {
  static NOW: RefCell<Moment> = const { RefCell::new(0) };
  pub static FIRED: RefCell<Vec<(Vec<u8>, Vec<u8>, Moment)>> = const { RefCell::new(Vec::new()) };
}

pub fn set_now(now: Moment) {
  NOW.with(|n| *n.borrow_mut() = now);
}

pub fn fired() -> Vec<(Vec<u8>, Vec<u8>, Moment)> {
  FIRED.with(|f| f.borrow().clone())
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Schedule: pallet_schedule,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = u64;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
}

pub struct MockTime;
impl Time for MockTime {
  type Moment = Moment;

  fn now() -> Moment {
    NOW.with(|n| *n.borrow())
  }
}

/// Records every firing; `test/fail` fails and `test/chain` schedules `test/record` at its own
/// fire time.
pub struct RecordingHandler;
impl TaskHandler for RecordingHandler {
  fn handle(hook: &[u8], payload: &[u8], at: Moment) -> Option<DispatchResult> {
    if !hook.starts_with(b"test/") {
      return None;
    }
    FIRED.with(|f| f.borrow_mut().push((hook.to_vec(), payload.to_vec(), at)));
    Some(match hook {
      b"test/fail" => Err(DispatchError::Other("hook failure")),
      b"test/chain" => Schedule::schedule(at, b"test/record", payload),
      _ => Ok(()),
    })
  }
}

impl pallet_schedule::Config for Test {
  type TimeProvider = MockTime;
  type Handler = RecordingHandler;
  type OneDay = ConstU64<DAY>;
  type DaysPerMonth = ConstU32<30>;
  type MaxHookLength = ConstU32<32>;
  type MaxPayloadLength = ConstU32<64>;
  type WeightInfo = ();
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let t = polkadot_sdk::frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  let mut ext = polkadot_sdk::sp_io::TestExternalities::new(t);
  ext.execute_with(|| {
    set_now(0);
    FIRED.with(|f| f.borrow_mut().clear());
    System::set_block_number(1);
  });
  ext
}

//! Schedule pallet configuration: the hook registry.
//!
//! A fired task is offered to the keepers below in order; the first one owning the hook name
//! handles it. A hook name nobody owns is logged and dropped by the scheduler.

use super::*;

use crate::{Delegating, Referral, Subscription, Timestamp, Voting};
use primitives::ecosystem::time;

/// Every keeper that schedules tasks.
pub type TaskHandlers = (Referral, Delegating, Subscription, Voting);

parameter_types! {
  pub const OneDay: Moment = time::DAY;
  pub const DaysPerMonth: u32 = 30;
}

impl pallet_schedule::Config for Runtime {
  type TimeProvider = Timestamp;
  type Handler = TaskHandlers;
  type OneDay = OneDay;
  type DaysPerMonth = DaysPerMonth;
  type MaxHookLength = ConstU32<32>;
  type MaxPayloadLength = ConstU32<64>;
  type WeightInfo = pallet_schedule::weights::SubstrateWeight<Runtime>;
}

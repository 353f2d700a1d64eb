//! Status requirements.
//!
//! Leader and Master need `count` active first-line referrals having `size` active referrals
//! each. Every higher status needs three strong legs, three active first-line referrals with
//! three active referrals each and, from Businessman on, a coin total over the lines the
//! previous status opens.

use crate::types::ReferralInfo;
use primitives::{ARTR, Balance, Status};

struct Core {
  /// Status whose opened lines bound the coin total
  lines_of: Status,
  coins: Balance,
  /// Active accounts a leg must contain
  leg: u64,
}

fn core(status: Status) -> Option<Core> {
  let (lines_of, coins, leg) = match status {
    Status::Champion => (Status::Master, 0, 15),
    Status::Businessman => (Status::Champion, 150_000 * ARTR, 60),
    Status::Professional => (Status::Businessman, 300_000 * ARTR, 200),
    Status::TopLeader => (Status::Professional, 1_000_000 * ARTR, 500),
    Status::Hero => (Status::TopLeader, 2_000_000 * ARTR, 1_000),
    Status::AbsoluteChampion => (Status::Hero, 5_000_000 * ARTR, 2_000),
    _ => return None,
  };
  Some(Core { lines_of, coins, leg })
}

/// Whether `info` meets the requirements of `status`. `child` looks up first-line referrals.
pub fn requirements_met<AccountId: PartialEq, F>(
  status: Status,
  info: &ReferralInfo<AccountId>,
  child: F,
) -> bool
where
  F: Fn(&AccountId) -> Option<ReferralInfo<AccountId>>,
{
  match status {
    Status::Lucky => true,
    _ if info.banished => false,
    Status::Leader => x_by_x(info, &child, 2, 2),
    Status::Master => x_by_x(info, &child, 3, 3),
    other => core(other).is_some_and(|req| core_met(info, &child, &req)),
  }
}

fn active_children<'a, AccountId, F>(
  info: &'a ReferralInfo<AccountId>,
  child: &'a F,
) -> impl Iterator<Item = ReferralInfo<AccountId>> + 'a
where
  F: Fn(&AccountId) -> Option<ReferralInfo<AccountId>>,
{
  info.referrals.iter().filter_map(child).filter(|c| c.active)
}

fn x_by_x<AccountId, F>(info: &ReferralInfo<AccountId>, child: &F, count: u64, size: u64) -> bool
where
  F: Fn(&AccountId) -> Option<ReferralInfo<AccountId>>,
{
  if info.active_refs[1] < count || info.active_refs[2] < count.saturating_mul(size) {
    return false;
  }
  let found = active_children(info, child)
    .filter(|c| c.active_refs[1] >= size)
    .take(count as usize)
    .count();
  found as u64 >= count
}

fn core_met<AccountId: PartialEq, F>(info: &ReferralInfo<AccountId>, child: &F, req: &Core) -> bool
where
  F: Fn(&AccountId) -> Option<ReferralInfo<AccountId>>,
{
  if req.coins > 0 && info.coins_up_to(req.lines_of.lines_opened()) < req.coins {
    return false;
  }
  if info.active_refs[1] < 3 {
    return false;
  }
  let (mut legs, mut three_by_three) = (0u32, 0u32);
  for c in active_children(info, child) {
    if c.total_active_refs() >= req.leg {
      legs += 1;
    }
    if c.active_refs[1] >= 3 {
      three_by_three += 1;
    }
    if legs >= 3 && three_by_three >= 3 {
      return true;
    }
  }
  false
}

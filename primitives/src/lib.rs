#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bank;
pub mod delegation;
pub mod ecosystem;
pub mod noding;
pub mod referral;
pub mod traits;

pub use bank::*;
pub use delegation::*;
pub use ecosystem::*;
pub use noding::*;
pub use referral::*;
pub use traits::*;

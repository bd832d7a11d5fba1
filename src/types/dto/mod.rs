// Data transfer objects - inputs, filters and composite results
pub mod activity;
pub mod common;
pub mod company;
pub mod contact;
pub mod dashboard;
pub mod deal;
pub mod lead;
pub mod search;
pub mod task;
pub mod user;

pub use common::{Page, PageLimits, PageRequest};

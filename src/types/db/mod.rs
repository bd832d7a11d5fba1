// Database entities - SeaORM models

// Access control
pub mod permission;
pub mod role;
pub mod role_permission;
pub mod user;
pub mod user_role;

// CRM records
pub mod activity;
pub mod company;
pub mod contact;
pub mod deal;
pub mod deal_stage;
pub mod lead;
pub mod task;

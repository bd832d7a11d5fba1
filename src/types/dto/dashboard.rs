use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadStats {
    pub total: u64,
    pub new: u64,
    pub converted: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DealStats {
    pub total: u64,
    /// Deals not in Won or Lost
    pub active: u64,
    pub total_value: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: u64,
    pub pending: u64,
    pub overdue: u64,
}

/// Counts as seen by one user; every figure is scoped like a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub leads: LeadStats,
    pub contacts: u64,
    pub companies: u64,
    pub deals: DealStats,
    pub tasks: TaskStats,
}

use crate::database::models::{LeaveBalances, LeaveTypeCaps, LeaveUsage};

use super::finite_or_zero;

/// Remaining balance per leave type for display: `max(0, cap - used)`
/// for paid/casual/sick. The unpaid figure is the days already taken
/// unpaid, not a remaining capacity.
pub fn project_balances(caps: &LeaveTypeCaps, usage: &LeaveUsage) -> LeaveBalances {
    let remaining = |cap: f64, used: f64| (finite_or_zero(cap) - finite_or_zero(used)).max(0.0);

    LeaveBalances {
        paid: remaining(caps.paid, usage.paid),
        casual: remaining(caps.casual, usage.casual),
        sick: remaining(caps.sick, usage.sick),
        unpaid: finite_or_zero(usage.unpaid),
    }
}

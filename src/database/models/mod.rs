pub mod company;
pub mod deduction;
pub mod employee;
pub mod leave;
pub mod month;

pub use company::{Company, LeavePolicy, LeaveTypeCaps};
pub use deduction::UnpaidDeductionEntry;
pub use employee::{Employee, LeaveBalances, LeaveUsage};
pub use leave::{Leave, LeaveAllocations, LeaveStatus};
pub use month::YearMonth;

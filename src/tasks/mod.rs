pub(crate) mod overdue;
pub(crate) mod scheduler;

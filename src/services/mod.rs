pub(crate) mod attempt_timing;
pub(crate) mod effective_quiz;

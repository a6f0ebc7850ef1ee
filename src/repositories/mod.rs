pub(crate) mod attempts;
pub(crate) mod course_modules;
pub(crate) mod courses;
pub(crate) mod health;
pub(crate) mod overrides;
pub(crate) mod quizzes;

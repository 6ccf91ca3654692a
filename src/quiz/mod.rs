pub mod generator;

pub mod mastery;

pub mod session;


/// The standard quiz length, and the floor below which a category pool is
/// considered misconfigured.
pub const MIN_QUIZ_SIZE: usize = 10;

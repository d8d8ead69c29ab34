pub mod records;
pub mod set;

pub use records::{DayTopSet, LastTopSet, PersonalRecord};
pub use set::{LoggedSet, NewLoggedSet};

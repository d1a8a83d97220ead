pub mod tuition;

pub use tuition::{PaidStudents, TuitionList, TuitionRecord};

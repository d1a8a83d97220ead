pub mod collaborators;
pub mod reports;

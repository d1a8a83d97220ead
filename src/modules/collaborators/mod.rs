//! Clients for the upstream registration and payment services.

pub mod models;
pub mod services;

pub use models::{PaidStudents, TuitionList, TuitionRecord};
pub use services::{
    CollaboratorError, HttpPaymentClient, HttpRegistrationClient, PaymentClient,
    RegistrationClient,
};

pub mod collaborator_trait;
pub mod http_client;
pub mod payment;
pub mod registration;

pub use collaborator_trait::{CollaboratorError, PaymentClient, RegistrationClient};
pub use http_client::{build_client, ResponseWrapper};
pub use payment::HttpPaymentClient;
pub use registration::HttpRegistrationClient;

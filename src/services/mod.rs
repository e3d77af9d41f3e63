pub mod eligibility;
pub mod email;
pub mod lifecycle;
pub mod messaging;
pub mod notify;
pub mod pickup;
pub mod session;

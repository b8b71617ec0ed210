pub mod error;
pub mod jwt;
pub mod permissions;
pub mod refund_policy;
pub mod response;
pub mod seat_allocation;
pub mod swagger_doc;
pub mod validation;

//! Data types consumed from and sent to the backend API.

pub mod lead;
pub mod property;
pub mod user;

pub use lead::{
    AdminStats, AgentStats, BulkDeleteResponse, Lead, LeadStats, MessageRequest,
    SendMessageResponse,
};
pub use property::{EnquiryCreate, EnquiryReceipt, Property, PropertyCreate, PropertyUpdate};
pub use user::{LoginResponse, Role, User};

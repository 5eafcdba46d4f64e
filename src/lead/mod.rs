//! Lead data — the signup profiles and the submission payload.

pub mod model;
pub mod submission;

pub use model::{
    BusinessProfile, Field, FieldRejection, IncomeBracket, InvestorProfile, LeadDraft, LeadProfile,
    RevenueBracket, RiskProfile, Sector, UserType,
};
pub use submission::{LeadReceipt, LeadSubmission, MISSING_REQUIRED_MESSAGE};

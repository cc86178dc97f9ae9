//! Wire and draft types for the client

pub mod insurance;
pub mod journal;
pub mod plan;
pub mod system;
pub mod user;

pub use insurance::{
    InsuranceAttachment, InsuranceDraft, InsuranceSnapshotRequest, InsuranceSource, InsuranceType,
    RegisterUserInsuranceRequest, UserInsurance,
};
pub use journal::{JournalEntry, NewJournalEntry};
pub use plan::{PlanDiaries, PlanDraft, PlanUpsertRequest, UserPlan};
pub use system::{HealthResponse, SystemUsersPage};
pub use user::{AuthenticatedUser, LoginCredentials, LoginResponse, ProfileResponse};

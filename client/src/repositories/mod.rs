//! Typed repositories over the backend REST surface

pub mod insurance;
pub mod journal;
pub mod plan;
pub mod system;

pub use insurance::InsuranceRepository;
pub use journal::JournalRepository;
pub use plan::PlanRepository;
pub use system::SystemRepository;

//! Repository layer: one struct per table, all methods taking `&PgPool`.
//!
//! Units of work that must be atomic (deal + founder + investors creation,
//! accountant delegation) open their transaction internally so callers get
//! a single method with all-or-nothing semantics.

mod accountant_repo;
mod deal_repo;
mod document_repo;
mod founder_repo;
mod investor_repo;
mod milestone_repo;
mod note_repo;
mod user_repo;

pub use accountant_repo::AccountantRepo;
pub use deal_repo::DealRepo;
pub use document_repo::DocumentRepo;
pub use founder_repo::FounderRepo;
pub use investor_repo::InvestorRepo;
pub use milestone_repo::MilestoneRepo;
pub use note_repo::NoteRepo;
pub use user_repo::UserRepo;

//! Typed client for the brokerage REST API (`/api`).

pub mod client;
pub mod endpoints;
pub mod error;
pub mod pagination;
pub mod types;

pub use client::{ApiClient, ApiRequest};
pub use endpoints::DashboardKind;
pub use error::ApiError;
pub use pagination::{DashboardFeed, Feed, PageCursor, PageRequest, Paginated, DEFAULT_PAGE_SIZE};
pub use types::{
    AddressValidationRequest, AddressValidationResponse, ContrattoChiuso, DashboardResponse,
    DashboardStatistics, ImmobileSummary, Incarico, LoginRequest, LoginResponse, PageMeta,
    PagedList, PropertySaveRequest, PropertySaveResponse, RegisterUserRequest,
    TakeAssignmentRequest, UpdateUserRequest, User, UserRole, Valutazione, ValutazioneQueue,
};

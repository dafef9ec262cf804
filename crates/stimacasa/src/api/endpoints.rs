use async_trait::async_trait;

use super::client::{ApiClient, ApiRequest};
use super::error::ApiError;
use super::pagination::PageRequest;
use super::types::{
    AddressValidationRequest, AddressValidationResponse, ContrattoChiuso, DashboardResponse,
    Incarico, LoginRequest, LoginResponse, PagedList, PropertySaveRequest, PropertySaveResponse,
    RegisterUserRequest, TakeAssignmentRequest, UpdateUserRequest, User, Valutazione,
    ValutazioneQueue,
};
use crate::intake::EvaluationSink;

/// Which back-office dashboard to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardKind {
    Admin,
    Agent,
}

impl DashboardKind {
    pub const fn path(self) -> &'static str {
        match self {
            DashboardKind::Admin => "/admin/dashboard",
            DashboardKind::Agent => "/agent/dashboard",
        }
    }
}

/// Percent-encode one caller-supplied path segment.
///
/// Dot segments and empty values are refused: URL parsers resolve them against the path.
pub(crate) fn segment(raw: &str) -> Result<String, ApiError> {
    if raw.trim_matches('.').is_empty() {
        return Err(ApiError::InvalidSegment(raw.to_string()));
    }
    Ok(urlencoding::encode(raw).into_owned())
}

fn paged(request: ApiRequest<'_>, page: PageRequest) -> ApiRequest<'_> {
    request
        .query("offset", page.offset)
        .query("limit", page.limit)
}

impl ApiClient {
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send(ApiRequest::post("/auth/login").json(&body)?).await
    }

    pub async fn dashboard(
        &self,
        kind: DashboardKind,
        page: PageRequest,
    ) -> Result<DashboardResponse, ApiError> {
        self.send(paged(ApiRequest::get(kind.path()), page)).await
    }

    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        self.send(ApiRequest::get("/users")).await
    }

    pub async fn register_user(&self, request: &RegisterUserRequest) -> Result<User, ApiError> {
        self.send(ApiRequest::post("/users/register").json(request)?)
            .await
    }

    pub async fn update_user(
        &self,
        id: i64,
        request: &UpdateUserRequest,
    ) -> Result<User, ApiError> {
        self.send(ApiRequest::put(format!("/users/{id}")).json(request)?)
            .await
    }

    /// Closed contracts across the agency.
    pub async fn closed_contracts(
        &self,
        page: PageRequest,
    ) -> Result<PagedList<ContrattoChiuso>, ApiError> {
        self.send(paged(ApiRequest::get("/admin/contratti/chiusi"), page))
            .await
    }

    /// Closed contracts handled by one agent.
    pub async fn agent_closed_contracts(
        &self,
        agent_id: &str,
        page: PageRequest,
    ) -> Result<PagedList<ContrattoChiuso>, ApiError> {
        let path = format!("/agente/contratti/chiusi/{}", segment(agent_id)?);
        self.send(paged(ApiRequest::get(path), page)).await
    }

    pub async fn valutazioni(&self, queue: ValutazioneQueue) -> Result<Vec<Valutazione>, ApiError> {
        self.send(ApiRequest::get(queue.path())).await
    }

    pub async fn delete_valutazione(
        &self,
        queue: ValutazioneQueue,
        id: i64,
    ) -> Result<(), ApiError> {
        let path = format!("{}/{id}", queue.path());
        self.send_no_content(ApiRequest::delete(path)).await
    }

    pub async fn incarichi(&self, agent_id: &str) -> Result<Vec<Incarico>, ApiError> {
        let path = format!("/agente/incarichi/{}", segment(agent_id)?);
        self.send(ApiRequest::get(path)).await
    }

    /// Claim a pending valuation for the given agent.
    pub async fn take_incarico(
        &self,
        valutazione_id: i64,
        request: &TakeAssignmentRequest,
    ) -> Result<Incarico, ApiError> {
        let path = format!("/agente/incarico/prendi/{valutazione_id}");
        self.send(ApiRequest::post(path).json(request)?).await
    }

    pub async fn validate_address(
        &self,
        request: &AddressValidationRequest,
    ) -> Result<AddressValidationResponse, ApiError> {
        self.send(ApiRequest::post("/address/validate").json(request)?)
            .await
    }

    pub async fn save_property(
        &self,
        request: &PropertySaveRequest,
    ) -> Result<PropertySaveResponse, ApiError> {
        self.send(ApiRequest::post("/immobili/save").json(request)?)
            .await
    }
}

#[async_trait]
impl EvaluationSink for ApiClient {
    async fn save_evaluation(
        &self,
        request: &PropertySaveRequest,
    ) -> Result<PropertySaveResponse, ApiError> {
        self.save_property(request).await
    }
}

// 🔀 Request Mapping - transport-independent endpoints
//
// The core consumes "a request with headers / query / JSON body" and
// produces "a status code + optional JSON payload". Any transport (see
// server.rs for the axum one) only has to build an `ApiRequest`, pick the
// `Endpoint` and render the `ApiResponse`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::access::{self, CPF_HEADER};
use crate::entities::CustomerRepository;
use crate::entities::customer::{validate_cpf, validate_name};
use crate::error::{LedgerError, Result};
use crate::ledger;

// ============================================================================
// ROUTE TABLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CreateAccount,
    UpdateAccount,
    GetAccount,
    DeleteAccount,
    Deposit,
    Withdraw,
    Statement,
    StatementByDate,
    Balance,
    Health,
}

impl Endpoint {
    pub const ALL: [Endpoint; 10] = [
        Endpoint::CreateAccount,
        Endpoint::UpdateAccount,
        Endpoint::GetAccount,
        Endpoint::DeleteAccount,
        Endpoint::Deposit,
        Endpoint::Withdraw,
        Endpoint::Statement,
        Endpoint::StatementByDate,
        Endpoint::Balance,
        Endpoint::Health,
    ];

    pub fn method(&self) -> Method {
        match self {
            Endpoint::CreateAccount | Endpoint::Deposit | Endpoint::Withdraw => Method::Post,
            Endpoint::UpdateAccount => Method::Put,
            Endpoint::DeleteAccount => Method::Delete,
            Endpoint::GetAccount
            | Endpoint::Statement
            | Endpoint::StatementByDate
            | Endpoint::Balance
            | Endpoint::Health => Method::Get,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::CreateAccount
            | Endpoint::UpdateAccount
            | Endpoint::GetAccount
            | Endpoint::DeleteAccount => "/account",
            Endpoint::Deposit => "/deposit",
            Endpoint::Withdraw => "/withdraw",
            Endpoint::Statement => "/statement",
            Endpoint::StatementByDate => "/statement/date",
            Endpoint::Balance => "/balance",
            Endpoint::Health => "/health",
        }
    }

}

// ============================================================================
// REQUEST / RESPONSE
// ============================================================================

/// Request body as handed over by the transport
#[derive(Debug, Clone, Default)]
enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// Undecoded bytes; parsed only by endpoints that read a body
    Raw(Vec<u8>),
}

/// Incoming request, already detached from its transport
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    /// Header names are stored lowercase
    headers: HashMap<String, String>,
    query: HashMap<String, String>,
    body: RequestBody,
}

impl ApiRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Decode a raw query string (`a=1&b=two+words`)
    pub fn with_query_string(mut self, raw: &str) -> Self {
        self.query.extend(parse_query(raw));
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Attach a raw body; blank bodies count as absent
    ///
    /// Decoding is deferred, so endpoints that never read a body accept
    /// any payload.
    pub fn with_raw_body(mut self, bytes: &[u8]) -> Self {
        self.body = if bytes.iter().all(u8::is_ascii_whitespace) {
            RequestBody::Empty
        } else {
            RequestBody::Raw(bytes.to_vec())
        };
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Decode the body as JSON; `None` when there is no body
    pub fn json_body(&self) -> Result<Option<Value>> {
        match &self.body {
            RequestBody::Empty => Ok(None),
            RequestBody::Json(value) => Ok(Some(value.clone())),
            RequestBody::Raw(bytes) => serde_json::from_slice(bytes)
                .map(Some)
                .map_err(|e| LedgerError::MalformedRequest(e.to_string())),
        }
    }

    /// Deserialize the body into `T`
    fn parse_body<T: DeserializeOwned>(&self) -> Result<T> {
        let body = self
            .json_body()?
            .ok_or_else(|| LedgerError::MalformedRequest("missing request body".to_string()))?;

        serde_json::from_value(body).map_err(|e| LedgerError::MalformedRequest(e.to_string()))
    }
}

fn parse_query(raw: &str) -> HashMap<String, String> {
    raw.trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Outgoing status code plus optional JSON payload
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        ApiResponse { status: 200, body: Some(body) }
    }

    pub fn created(body: Value) -> Self {
        ApiResponse { status: 201, body: Some(body) }
    }

    pub fn empty(status: u16) -> Self {
        ApiResponse { status, body: None }
    }
}

impl From<LedgerError> for ApiResponse {
    fn from(error: LedgerError) -> Self {
        ApiResponse {
            status: error.status(),
            body: Some(json!({ "error": error.to_string() })),
        }
    }
}

// ============================================================================
// REQUEST BODIES
// ============================================================================

#[derive(Debug, Deserialize)]
struct CreateAccountRequest {
    cpf: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct OperationRequest {
    #[serde(default)]
    description: String,
    amount: f64,
}

#[derive(Debug, Default, Deserialize)]
struct UpdateAccountRequest {
    name: Option<String>,
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Serve one request against `repo`
///
/// Errors never escape: each one is rendered as `{"error": message}` with
/// its status code.
pub fn handle<R: CustomerRepository>(repo: &R, endpoint: Endpoint, request: &ApiRequest) -> ApiResponse {
    match dispatch(repo, endpoint, request) {
        Ok(response) => response,
        Err(error) => {
            tracing::debug!(?endpoint, status = error.status(), %error, "request rejected");
            ApiResponse::from(error)
        }
    }
}

fn dispatch<R: CustomerRepository>(repo: &R, endpoint: Endpoint, request: &ApiRequest) -> Result<ApiResponse> {
    let resolve_customer = || access::resolve(repo, request.header(CPF_HEADER));

    match endpoint {
        Endpoint::CreateAccount => create_account(repo, request),
        Endpoint::Health => Ok(ApiResponse::ok(json!({
            "status": "ok",
            "version": crate::VERSION,
        }))),
        Endpoint::Deposit => {
            let customer = resolve_customer()?;
            let body: OperationRequest = request.parse_body()?;
            let op = repo.update(&customer.id, |c| ledger::deposit(c, body.description, body.amount))?;
            Ok(ApiResponse::ok(json!({ "operation": op })))
        }
        Endpoint::Withdraw => {
            let customer = resolve_customer()?;
            let body: OperationRequest = request.parse_body()?;
            let op = repo.update(&customer.id, |c| ledger::withdraw(c, body.description, body.amount))?;
            Ok(ApiResponse::ok(json!({ "operation": op })))
        }
        Endpoint::Statement => {
            let customer = resolve_customer()?;
            Ok(ApiResponse::ok(json!({ "statement": customer.statement })))
        }
        Endpoint::StatementByDate => {
            let customer = resolve_customer()?;
            let raw = request.query("date").ok_or_else(|| {
                LedgerError::MalformedRequest("missing query parameter `date`".to_string())
            })?;
            let date = ledger::parse_statement_date(raw)?;
            Ok(ApiResponse::ok(json!({ "statement": ledger::statement_on(&customer, date) })))
        }
        Endpoint::Balance => {
            let customer = resolve_customer()?;
            let balance = ledger::compute_balance(&customer.statement);
            Ok(ApiResponse::ok(json!({ "balance": balance })))
        }
        Endpoint::UpdateAccount => {
            let customer = resolve_customer()?;
            let body: UpdateAccountRequest = match request.json_body()? {
                Some(body) => serde_json::from_value(body)
                    .map_err(|e| LedgerError::MalformedRequest(e.to_string()))?,
                None => UpdateAccountRequest::default(),
            };
            repo.update(&customer.id, |c| c.rename(body.name.as_deref()))?;
            tracing::info!(customer_id = %customer.id, "customer renamed");
            Ok(ApiResponse::empty(200))
        }
        Endpoint::GetAccount => {
            let customer = resolve_customer()?;
            Ok(ApiResponse::ok(json!({ "customer": customer })))
        }
        Endpoint::DeleteAccount => {
            let customer = resolve_customer()?;
            repo.delete(&customer.id)?;
            Ok(ApiResponse::empty(204))
        }
    }
}

fn create_account<R: CustomerRepository>(repo: &R, request: &ApiRequest) -> Result<ApiResponse> {
    let body: CreateAccountRequest = request.parse_body()?;
    let cpf = validate_cpf(&body.cpf)?;
    let name = validate_name(Some(&body.name))?;

    let customer = repo.create(cpf, name)?;
    Ok(ApiResponse::created(json!({ "account": { "id": customer.id } })))
}

// ============================================================================
// TESTS
// ============================================================================

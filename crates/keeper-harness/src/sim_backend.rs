//! In-memory secret store.
//!
//! `SimBackend` behaves like the real backend: secrets expire after their
//! lifetime, a secret stored with a passphrase only opens with the same
//! normalized passphrase, and a secret is deleted by its first successful
//! read. Time is virtual and only moves through [`SimBackend::advance`].
//!
//! Keys are 32 hex characters drawn from a seeded `ChaCha8Rng`, so a given
//! seed always yields the same keys.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use keeper_client::{
    CreateParams, CreatedSecret, GatewayError, Passphrase, RevealedSecret, SecretGateway,
    SecretKey, Ttl,
};
use keeper_proto::wire::{CreateSecretResponse, SecretBody};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// A failure to inject into upcoming requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The backend is unavailable.
    ///
    /// Called in-process, the request fails without a status, like a
    /// connection failure. Served over HTTP, it is answered with
    /// `503 Service Unavailable`.
    Unreachable,
    /// The backend answers with a server error.
    ServerError,
}

/// A request as seen by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimRequest {
    /// A create request.
    Create {
        /// Requested lifetime in hours.
        ttl: u32,
        /// Passphrase as transmitted.
        secret_phrase: Option<String>,
        /// `X-Request-ID` header, when sent over HTTP.
        request_id: Option<String>,
    },
    /// A fetch request.
    Fetch {
        /// Requested key.
        key: String,
        /// Passphrase as transmitted.
        secret_phrase: Option<String>,
        /// `X-Request-ID` header, when sent over HTTP.
        request_id: Option<String>,
    },
}

/// Why the backend refused a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Refusal {
    NotFound,
    BadRequest(String),
    Fault(Fault),
}

impl Refusal {
    pub(crate) fn status(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::BadRequest(_) => 400,
            Self::Fault(Fault::ServerError) => 500,
            Self::Fault(Fault::Unreachable) => 503,
        }
    }

    pub(crate) fn reason(&self) -> String {
        match self {
            Self::NotFound => "secret not found".to_string(),
            Self::BadRequest(reason) => reason.clone(),
            Self::Fault(Fault::ServerError) => "simulated server error".to_string(),
            Self::Fault(Fault::Unreachable) => "simulated network failure".to_string(),
        }
    }

    fn into_gateway_error(self) -> GatewayError {
        match self {
            Self::NotFound => GatewayError::NotFound,
            Self::Fault(Fault::Unreachable) => GatewayError::unreachable(self.reason()),
            Self::BadRequest(_) | Self::Fault(Fault::ServerError) => {
                GatewayError::RequestFailed { status: Some(self.status()), reason: self.reason() }
            },
        }
    }
}

struct StoredSecret {
    message: String,
    secret_phrase: Option<String>,
    expires_at: Option<Duration>,
}

struct SimState {
    secrets: HashMap<String, StoredSecret>,
    now: Duration,
    rng: ChaCha8Rng,
    faults: VecDeque<Fault>,
    requests: Vec<SimRequest>,
    omit_passphrase_flag: bool,
}

/// Simulated backend shared between the test and the code under test.
///
/// Cloning yields another handle to the same store.
#[derive(Clone)]
pub struct SimBackend {
    state: Arc<Mutex<SimState>>,
}

impl Default for SimBackend {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SimBackend {
    /// Create an empty store whose keys derive from `seed`.
    pub fn new(seed: u64) -> Self {
        let state = SimState {
            secrets: HashMap::new(),
            now: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(seed),
            faults: VecDeque::new(),
            requests: Vec::new(),
            omit_passphrase_flag: false,
        };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    /// Answer creates without `withSecretPhrase`, like older backends.
    #[must_use]
    pub fn without_passphrase_flag(self) -> Self {
        self.lock().omit_passphrase_flag = true;
        self
    }

    /// Store a secret directly, bypassing faults and the request log.
    ///
    /// `secret_phrase` is compared verbatim on fetch, so pass the normalized
    /// form.
    pub fn insert(&self, message: &str, ttl: Ttl, secret_phrase: Option<&str>) -> SecretKey {
        let mut state = self.lock();
        let key = state.store(message, ttl, secret_phrase);
        SecretKey::parse(key).unwrap_or_else(|_| unreachable!("hex keys are url-safe"))
    }

    /// Move virtual time forward.
    pub fn advance(&self, by: Duration) {
        let mut state = self.lock();
        state.now += by;
        debug!(now = ?state.now, "virtual clock advanced");
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Fail the next request with `fault`. Faults queue up in order.
    pub fn inject_fault(&self, fault: Fault) {
        self.lock().faults.push_back(fault);
    }

    /// Whether a secret is stored under `key` (expired or not).
    pub fn contains(&self, key: &str) -> bool {
        self.lock().secrets.contains_key(key)
    }

    /// Number of stored secrets.
    pub fn len(&self) -> usize {
        self.lock().secrets.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<SimRequest> {
        self.lock().requests.clone()
    }

    pub(crate) fn create(
        &self,
        message: &str,
        ttl: u32,
        secret_phrase: Option<&str>,
        request_id: Option<String>,
    ) -> Result<CreateSecretResponse, Refusal> {
        let mut state = self.lock();
        state.requests.push(SimRequest::Create {
            ttl,
            secret_phrase: secret_phrase.map(str::to_string),
            request_id,
        });
        if let Some(fault) = state.faults.pop_front() {
            return Err(Refusal::Fault(fault));
        }

        if message.is_empty() {
            return Err(Refusal::BadRequest("message is required".to_string()));
        }
        let Some(ttl) = Ttl::from_hours(ttl) else {
            return Err(Refusal::BadRequest(format!("invalid ttl: {ttl}")));
        };

        let secret_phrase = secret_phrase.filter(|phrase| !phrase.is_empty());
        let secret_key = state.store(message, ttl, secret_phrase);
        let with_secret_phrase =
            (!state.omit_passphrase_flag).then_some(secret_phrase.is_some());
        Ok(CreateSecretResponse { secret_key, with_secret_phrase })
    }

    pub(crate) fn fetch(
        &self,
        key: &str,
        secret_phrase: Option<&str>,
        request_id: Option<String>,
    ) -> Result<SecretBody, Refusal> {
        let mut state = self.lock();
        state.requests.push(SimRequest::Fetch {
            key: key.to_string(),
            secret_phrase: secret_phrase.map(str::to_string),
            request_id,
        });
        if let Some(fault) = state.faults.pop_front() {
            return Err(Refusal::Fault(fault));
        }

        let now = state.now;
        let Some(stored) = state.secrets.get(key) else {
            return Err(Refusal::NotFound);
        };

        if stored.expires_at.is_some_and(|at| at <= now) {
            debug!("secret expired");
            state.secrets.remove(key);
            return Err(Refusal::NotFound);
        }
        if let Some(expected) = &stored.secret_phrase
            && secret_phrase != Some(expected.as_str())
        {
            debug!("passphrase mismatch");
            return Err(Refusal::NotFound);
        }

        let stored = state.secrets.remove(key).ok_or(Refusal::NotFound)?;
        Ok(SecretBody { message: stored.message, created_at: None, expired_at: None })
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SimState {
    fn store(&mut self, message: &str, ttl: Ttl, secret_phrase: Option<&str>) -> String {
        let key = loop {
            let candidate = hex::encode(self.rng.r#gen::<[u8; 16]>());
            if !self.secrets.contains_key(&candidate) {
                break candidate;
            }
        };
        let expires_at = ttl.duration().map(|lifetime| self.now + lifetime);
        self.secrets.insert(key.clone(), StoredSecret {
            message: message.to_string(),
            secret_phrase: secret_phrase.map(str::to_string),
            expires_at,
        });
        key
    }
}

impl SecretGateway for SimBackend {
    async fn create_secret(&self, params: &CreateParams) -> Result<CreatedSecret, GatewayError> {
        let response = self.create(
            params.message(),
            params.ttl().hours(),
            params.passphrase().map(Passphrase::as_str),
            None,
        )
        .map_err(Refusal::into_gateway_error)?;
        let key = SecretKey::parse(response.secret_key)
            .map_err(|err| GatewayError::RequestFailed { status: None, reason: err.to_string() })?;
        let requires_passphrase =
            response.with_secret_phrase.unwrap_or(params.passphrase().is_some());
        Ok(CreatedSecret { key, requires_passphrase })
    }

    async fn fetch_secret(
        &self,
        key: &SecretKey,
        passphrase: Option<&Passphrase>,
    ) -> Result<RevealedSecret, GatewayError> {
        let body = self
            .fetch(key.as_str(), passphrase.map(Passphrase::as_str), None)
            .map_err(Refusal::into_gateway_error)?;
        Ok(RevealedSecret::new(body.message).with_timestamps(body.created_at, body.expired_at))
    }
}

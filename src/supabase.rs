use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::types::{UserProfile, WorkoutPlan};

const SUPABASE_URL: &str = "https://qwkzfyrmplexdjroujlv.supabase.co";
const SUPABASE_KEY: &str = "sb_publishable_Kd2mXvRl8q9YjTwc4HnB6g_Fzp_aWuM";
const AUTH_SESSION_KEY: &str = "repday_auth_session";

/// Poll cadence for the live plan subscription.
const SUBSCRIBE_POLL_MS: u32 = 2_000;

pub fn has_remote_config() -> bool {
    !SUPABASE_URL.is_empty() && !SUPABASE_KEY.is_empty()
}

// ============ ERRORS ============

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("not found")]
    NotFound,

    #[error("HTTP error {0}")]
    Http(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl RemoteError {
    fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => RemoteError::PermissionDenied,
            404 => RemoteError::NotFound,
            s => RemoteError::Http(s),
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, RemoteError::PermissionDenied)
    }
}

impl From<JsValue> for RemoteError {
    fn from(err: JsValue) -> Self {
        RemoteError::Network(format!("{:?}", err))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignupError {
    #[error("an invitation is required to sign up")]
    InvitationRequired,

    #[error("this invitation is invalid or has already been used")]
    InvalidInvite,

    #[error("could not reserve a unique plan id")]
    NoUniquePlanId,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

// ============ AUTH ============

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}

#[derive(Deserialize, Debug)]
struct SupabaseAuthResponse {
    access_token: String,
    user: SupabaseUser,
}

#[derive(Deserialize, Debug)]
struct SupabaseUser {
    id: String,
    email: String,
}

#[derive(Deserialize, Debug, Default)]
struct SupabaseAuthError {
    error: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
}

async fn auth_request(path: &str, body: String) -> Result<AuthSession, String> {
    let window = web_sys::window().ok_or("no window")?;

    let headers = Headers::new().map_err(|_| "Failed to create headers")?;
    headers
        .set("apikey", SUPABASE_KEY)
        .map_err(|_| "Failed to set apikey")?;
    headers
        .set("Content-Type", "application/json")
        .map_err(|_| "Failed to set content-type")?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));
    opts.set_headers(&JsValue::from(&headers));

    let url = format!("{}{}", SUPABASE_URL, path);
    let request =
        Request::new_with_str_and_init(&url, &opts).map_err(|_| "Failed to create request")?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|_| "Fetch failed")?;
    let resp: Response = resp_value.dyn_into().map_err(|_| "Invalid response")?;

    let json = JsFuture::from(resp.json().map_err(|_| "No JSON")?)
        .await
        .map_err(|_| "JSON parse failed")?;

    if !resp.ok() {
        let err: SupabaseAuthError = serde_wasm_bindgen::from_value(json).unwrap_or_default();
        return Err(err
            .error_description
            .or(err.msg)
            .or(err.error)
            .unwrap_or_else(|| "Authentication failed".into()));
    }

    let auth_resp: SupabaseAuthResponse =
        serde_wasm_bindgen::from_value(json).map_err(|_| "Invalid auth response")?;

    let session = AuthSession {
        access_token: auth_resp.access_token,
        user: AuthUser {
            id: auth_resp.user.id,
            email: auth_resp.user.email,
        },
    };

    save_auth_session(&session);
    Ok(session)
}

pub async fn sign_up(email: &str, password: &str) -> Result<AuthSession, String> {
    let body = serde_json::json!({ "email": email, "password": password }).to_string();
    auth_request("/auth/v1/signup", body).await
}

pub async fn sign_in(email: &str, password: &str) -> Result<AuthSession, String> {
    let body = serde_json::json!({ "email": email, "password": password }).to_string();
    auth_request("/auth/v1/token?grant_type=password", body).await
}

pub fn sign_out() {
    if let Some(storage) = crate::storage::get_local_storage() {
        let _ = storage.remove_item(AUTH_SESSION_KEY);
    }
}

fn save_auth_session(session: &AuthSession) {
    if let Some(storage) = crate::storage::get_local_storage() {
        if let Ok(json) = serde_json::to_string(session) {
            let _ = storage.set_item(AUTH_SESSION_KEY, &json);
        }
    }
}

pub fn load_auth_session() -> Option<AuthSession> {
    let storage = crate::storage::get_local_storage()?;
    let json = storage.get_item(AUTH_SESSION_KEY).ok()??;
    serde_json::from_str(&json).ok()
}

// ============ DOCUMENTS ============

/// One synced plan document plus the metadata the echo filter needs.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanSnapshot {
    pub id: String,
    pub data: WorkoutPlan,
    pub revision: u64,
    pub origin: String,
}

#[derive(Serialize, Deserialize, Debug)]
struct PlanRow {
    id: String,
    data: serde_json::Value,
    revision: i64,
    origin: String,
    updated_at: i64,
}

#[derive(Serialize, Deserialize, Debug)]
struct ProfileRow {
    id: String,
    data: serde_json::Value,
    updated_at: i64,
}

#[derive(Serialize, Deserialize, Debug)]
struct InviteRow {
    id: String,
    status: String,
}

fn get_headers() -> Result<Headers, RemoteError> {
    let headers = Headers::new()?;
    headers.set("apikey", SUPABASE_KEY)?;

    // Use the user's token if logged in, otherwise the anon key.
    if let Some(session) = load_auth_session() {
        headers.set(
            "Authorization",
            &format!("Bearer {}", session.access_token),
        )?;
    } else {
        headers.set("Authorization", &format!("Bearer {}", SUPABASE_KEY))?;
    }

    headers.set("Content-Type", "application/json")?;
    Ok(headers)
}

fn create_request_init(method: &str, body: Option<&str>, headers: &Headers) -> RequestInit {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(b) = body {
        opts.set_body(&JsValue::from_str(b));
    }
    opts.set_headers(&JsValue::from(headers));
    opts
}

async fn send_request(
    method: &str,
    path: &str,
    body: Option<&str>,
    merge: bool,
) -> Result<Response, RemoteError> {
    let window = web_sys::window().ok_or_else(|| RemoteError::Network("no window".into()))?;

    let headers = get_headers()?;
    if merge {
        headers.set("Prefer", "resolution=merge-duplicates")?;
    }
    let opts = create_request_init(method, body, &headers);

    let url = format!("{}{}", SUPABASE_URL, path);
    let request = Request::new_with_str_and_init(&url, &opts)?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    if !resp.ok() {
        return Err(RemoteError::from_status(resp.status()));
    }
    Ok(resp)
}

async fn rest_get(path: &str) -> Result<JsValue, RemoteError> {
    let resp = send_request("GET", path, None, false).await?;
    Ok(JsFuture::from(resp.json()?).await?)
}

/// Write path: the store answers with an empty body, only the status matters.
async fn rest_send(
    method: &str,
    path: &str,
    body: &str,
    merge: bool,
) -> Result<(), RemoteError> {
    send_request(method, path, Some(body), merge).await?;
    Ok(())
}

/// Fetch one plan document. A missing row is `NotFound`, matching the
/// invalidated-plan teardown path.
pub async fn fetch_plan(id: &str) -> Result<PlanSnapshot, RemoteError> {
    let path = format!("/rest/v1/plans?id=eq.{}&select=*", id);
    let json = rest_get(&path).await?;
    let rows: Vec<PlanRow> =
        serde_wasm_bindgen::from_value(json).map_err(|e| RemoteError::Decode(e.to_string()))?;

    let row = rows.into_iter().next().ok_or(RemoteError::NotFound)?;
    let data: WorkoutPlan =
        serde_json::from_value(row.data).map_err(|e| RemoteError::Decode(e.to_string()))?;
    Ok(PlanSnapshot {
        id: row.id,
        data,
        revision: row.revision.max(0) as u64,
        origin: row.origin,
    })
}

/// Upsert the full plan document. Merge semantics: fields absent from the row
/// are preserved remotely, present fields are overwritten.
pub async fn push_plan(
    id: &str,
    data: &WorkoutPlan,
    revision: u64,
    origin: &str,
    merge: bool,
) -> Result<(), RemoteError> {
    let row = PlanRow {
        id: id.to_string(),
        data: serde_json::to_value(data).map_err(|e| RemoteError::Decode(e.to_string()))?,
        revision: revision as i64,
        origin: origin.to_string(),
        updated_at: chrono::Utc::now().timestamp(),
    };
    let body = serde_json::to_string(&row).map_err(|e| RemoteError::Decode(e.to_string()))?;
    rest_send("POST", "/rest/v1/plans", &body, merge).await?;
    Ok(())
}

/// Live subscription to one plan document. The store exposes no push channel
/// to the browser, so this polls and invokes the callback whenever the stored
/// (revision, origin) pair changes. A vanished row is delivered as `None`
/// exactly once. Dropping the handle unsubscribes.
pub struct PlanSubscription {
    _interval: Interval,
}

impl PlanSubscription {
    pub fn unsubscribe(self) {
        // Dropping the interval cancels the poll.
    }
}

pub fn subscribe_plan(
    id: String,
    on_snapshot: Rc<dyn Fn(Option<PlanSnapshot>)>,
    on_error: Rc<dyn Fn(RemoteError)>,
) -> PlanSubscription {
    let last_seen: Rc<RefCell<Option<(u64, String)>>> = Rc::new(RefCell::new(None));
    let gone = Rc::new(RefCell::new(false));

    let poll: Rc<dyn Fn()> = Rc::new(move || {
        let id = id.clone();
        let on_snapshot = on_snapshot.clone();
        let on_error = on_error.clone();
        let last_seen = last_seen.clone();
        let gone = gone.clone();

        wasm_bindgen_futures::spawn_local(async move {
            if *gone.borrow() {
                return;
            }
            match fetch_plan(&id).await {
                Ok(snap) => {
                    let stamp = (snap.revision, snap.origin.clone());
                    if last_seen.borrow().as_ref() != Some(&stamp) {
                        *last_seen.borrow_mut() = Some(stamp);
                        on_snapshot(Some(snap));
                    }
                }
                Err(RemoteError::NotFound) => {
                    *gone.borrow_mut() = true;
                    on_snapshot(None);
                }
                Err(err) => {
                    web_sys::console::error_1(
                        &format!("plan subscription error: {}", err).into(),
                    );
                    on_error(err);
                }
            }
        });
    });

    // First snapshot right away, then the poll cadence.
    poll();
    let tick = poll.clone();
    let interval = Interval::new(SUBSCRIBE_POLL_MS, move || tick());

    PlanSubscription {
        _interval: interval,
    }
}

pub async fn fetch_profile(uid: &str) -> Result<UserProfile, RemoteError> {
    let path = format!("/rest/v1/profiles?id=eq.{}&select=*", uid);
    let json = rest_get(&path).await?;
    let rows: Vec<ProfileRow> =
        serde_wasm_bindgen::from_value(json).map_err(|e| RemoteError::Decode(e.to_string()))?;

    let row = rows.into_iter().next().ok_or(RemoteError::NotFound)?;
    serde_json::from_value(row.data).map_err(|e| RemoteError::Decode(e.to_string()))
}

pub async fn push_profile(uid: &str, profile: &UserProfile) -> Result<(), RemoteError> {
    let row = ProfileRow {
        id: uid.to_string(),
        data: serde_json::to_value(profile).map_err(|e| RemoteError::Decode(e.to_string()))?,
        updated_at: chrono::Utc::now().timestamp(),
    };
    let body = serde_json::to_string(&row).map_err(|e| RemoteError::Decode(e.to_string()))?;
    rest_send("POST", "/rest/v1/profiles", &body, true).await?;
    Ok(())
}

// ============ ONBOARDING ============

/// Lowercased first name with whitespace runs collapsed to hyphens; the
/// readable half of a plan id.
pub fn slugify_first_name(first_name: &str) -> String {
    first_name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

const KEY_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn random_key(len: usize) -> String {
    (0..len)
        .map(|_| {
            let ix = (js_sys::Math::random() * KEY_CHARS.len() as f64) as usize;
            KEY_CHARS[ix.min(KEY_CHARS.len() - 1)] as char
        })
        .collect()
}

/// Reserve a plan id of the form `{first-name}-{6-char key}`, retrying the
/// random key up to 5 times on collision.
async fn reserve_plan_id(first_name: &str) -> Result<String, SignupError> {
    let slug = slugify_first_name(first_name);
    for _ in 0..5 {
        let candidate = format!("{}-{}", slug, random_key(6));
        match fetch_plan(&candidate).await {
            Err(RemoteError::NotFound) => return Ok(candidate),
            Ok(_) => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Err(SignupError::NoUniquePlanId)
}

/// Atomically claim a pending invite for this user. The document service owns
/// the transaction; the client only sees success or a typed failure.
async fn claim_invite(invite_id: &str, uid: &str) -> Result<(), SignupError> {
    let body = serde_json::json!({ "invite_id": invite_id, "uid": uid }).to_string();
    match rest_send("POST", "/rest/v1/rpc/claim_invite", &body, false).await {
        Ok(_) => Ok(()),
        Err(RemoteError::NotFound) => Err(SignupError::InvalidInvite),
        Err(RemoteError::Http(409)) => Err(SignupError::InvalidInvite),
        Err(err) => Err(err.into()),
    }
}

/// Full signup flow: claim the invite (unless admin), seed a fresh plan under
/// a reserved id, then write the profile bound to it. Returns the profile.
pub async fn create_profile(
    user: &AuthUser,
    is_admin: bool,
    invite_id: Option<&str>,
    mut profile: UserProfile,
) -> Result<UserProfile, SignupError> {
    if invite_id.is_none() && !is_admin {
        return Err(SignupError::InvitationRequired);
    }

    let plan_id = reserve_plan_id(&profile.first_name).await?;

    if let Some(invite) = invite_id {
        claim_invite(invite, &user.id).await?;
    }

    let mut plan = crate::storage::initial_plan();
    plan.user_name = profile.first_name.clone();
    push_plan(&plan_id, &plan, 0, "signup", true).await?;

    profile.workout_id = plan_id;
    push_profile(&user.id, &profile).await?;
    Ok(profile)
}

/// Admin-only: mint a pending invite and return its id for sharing.
pub async fn create_invite() -> Result<String, RemoteError> {
    let invite_id = random_key(12);
    let row = InviteRow {
        id: invite_id.clone(),
        status: "pending".to_string(),
    };
    let body = serde_json::to_string(&row).map_err(|e| RemoteError::Decode(e.to_string()))?;
    rest_send("POST", "/rest/v1/invites", &body, false).await?;
    Ok(invite_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_error_kinds() {
        assert_eq!(RemoteError::from_status(401), RemoteError::PermissionDenied);
        assert_eq!(RemoteError::from_status(403), RemoteError::PermissionDenied);
        assert_eq!(RemoteError::from_status(404), RemoteError::NotFound);
        assert_eq!(RemoteError::from_status(500), RemoteError::Http(500));
        assert!(RemoteError::from_status(403).is_permission_denied());
    }

    #[test]
    fn first_name_slugs_are_hyphenated_lowercase() {
        assert_eq!(slugify_first_name("Dani"), "dani");
        assert_eq!(slugify_first_name("Ana Maria"), "ana-maria");
        assert_eq!(slugify_first_name("  Jean  Paul "), "jean-paul");
    }
}

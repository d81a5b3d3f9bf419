//! Create, read, list, replace, delete and patch of greetings.
//!
//! Every operation resolves the storage key from the resource id and the caller's
//! language preference, checks mutating calls against the canonical entity tag of
//! the stored record, and answers with a [`ServiceResponse`] carrying the caller's
//! correlation token.

use crate::config::ServiceConfig;
use crate::logic::conditional::{evaluate, Evaluation, Safety};
use crate::logic::negotiation::{
    canonical_tag, deliver, unsupported_media_type, DeliveryContext, Dispatch, GreetingVersion,
    GreetingsVersion, MediaTypeRegistry,
};
use crate::logic::patch_engine::{apply_patch, PatchError};
use crate::model::{
    preferred_language, resolve_log_token, GreetingRecord, MessageBody, MessageLink,
    PatchInstruction, RequestContext, ResourceId, ServiceResponse, Status, StorageKey,
};
use crate::store::GreetingStore;

/// Body media types accepted on create and replace.
pub const ENTITY_BODY_TYPES: &[&str] = &["application/json", "application/hal+json"];
/// Body media types accepted on patch.
pub const PATCH_BODY_TYPES: &[&str] = &["application/patch+json", "application/json"];

const NOT_FOUND_MESSAGE: &str = "Sorry your greeting does not exist yet!";
const STALE_MESSAGE: &str = "object has been updated, please get newest version";

/// True when the essence of `content_type` (before any `;`) is one of `accepted`.
pub fn accepts_body(content_type: Option<&str>, accepted: &[&str]) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().to_ascii_lowercase())
        .is_some_and(|essence| accepted.contains(&essence.as_str()))
}

pub struct GreetingService<S: GreetingStore> {
    store: S,
    config: ServiceConfig,
    greeting_versions: MediaTypeRegistry<GreetingVersion>,
    greetings_versions: MediaTypeRegistry<GreetingsVersion>,
}

impl<S: GreetingStore> GreetingService<S> {
    pub fn new(store: S, config: ServiceConfig) -> Self {
        Self {
            store,
            config,
            greeting_versions: GreetingVersion::registry(),
            greetings_versions: GreetingsVersion::registry(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn language(&self, ctx: &RequestContext) -> String {
        preferred_language(ctx.accept_language.as_deref(), &self.config.default_language)
    }

    pub async fn create(&self, ctx: &RequestContext, body: &[u8]) -> ServiceResponse {
        let log_token = resolve_log_token(ctx.log_token.as_deref());
        if !accepts_body(ctx.content_type.as_deref(), ENTITY_BODY_TYPES) {
            log::warn!("create rejected, unsupported content type {:?}", ctx.content_type);
            return unsupported_media_type(log_token);
        }

        let record = match GreetingRecord::from_json(body) {
            Ok(record) => record,
            Err(err) => {
                log::warn!("could not parse greeting for create: {}", err);
                return bad_request(log_token, err.to_string());
            }
        };
        let resource = match record.resource_id() {
            Ok(resource) => resource,
            Err(err) => return bad_request(log_token, err.to_string()),
        };
        let key = StorageKey::new(&resource, &self.language(ctx));

        if let Some(stored) = self.store.get(&key).await {
            log::info!("attempted to create existing greeting {}", key);
            let link = MessageLink {
                href: stored.self_link.href.clone(),
                media_type: "application/hal+json".to_string(),
                title: "Update Greeting Resource".to_string(),
            };
            return ServiceResponse::new(Status::Conflict, log_token)
                .with_message(
                    MessageBody::new(
                        "Sorry that your request for updating greeting could not be met!",
                    )
                    .with_link("greeting", link),
                )
                .with_location(stored.self_link.href);
        }

        let etag = canonical_tag(&record);
        let location = record.self_link.href.clone();
        self.store.put(key.clone(), record).await;
        log::info!(
            "created greeting {} - in total {}",
            key,
            self.store.len().await
        );

        ServiceResponse::new(Status::Created, log_token)
            .with_etag(etag)
            .with_location(location)
    }

    pub async fn read(&self, ctx: &RequestContext, resource: &str) -> ServiceResponse {
        let log_token = resolve_log_token(ctx.log_token.as_deref());
        let version = match self.greeting_versions.dispatch(ctx.accept.as_deref()) {
            Dispatch::Strategy(version) => version,
            Dispatch::Unsupported => {
                log::info!("unsupported media type for greeting read: {:?}", ctx.accept);
                return unsupported_media_type(log_token);
            }
        };
        let resource = match ResourceId::parse(resource) {
            Ok(resource) => resource,
            Err(err) => return bad_request(log_token, err.to_string()),
        };
        let key = StorageKey::new(&resource, &self.language(ctx));

        match self.store.get(&key).await {
            Some(record) => deliver(
                &version,
                &record,
                DeliveryContext {
                    preconditions: &ctx.preconditions,
                    config: &self.config,
                    change_token: None,
                    log_token,
                },
            ),
            None => {
                log::debug!("greeting {} not found", key);
                not_found(log_token)
            }
        }
    }

    pub async fn list(&self, ctx: &RequestContext) -> ServiceResponse {
        let log_token = resolve_log_token(ctx.log_token.as_deref());
        let version = match self.greetings_versions.dispatch(ctx.accept.as_deref()) {
            Dispatch::Strategy(version) => version,
            Dispatch::Unsupported => {
                log::info!("unsupported media type for greetings list: {:?}", ctx.accept);
                return unsupported_media_type(log_token);
            }
        };

        // token before snapshot: a racing write can only leave the tag older than the body
        let change_token = self.store.change_token().await;
        let records = self.store.values().await;
        deliver(
            &version,
            records.as_slice(),
            DeliveryContext {
                preconditions: &ctx.preconditions,
                config: &self.config,
                change_token: Some(&change_token),
                log_token,
            },
        )
    }

    pub async fn replace(
        &self,
        ctx: &RequestContext,
        resource: &str,
        body: &[u8],
    ) -> ServiceResponse {
        let log_token = resolve_log_token(ctx.log_token.as_deref());
        if !accepts_body(ctx.content_type.as_deref(), ENTITY_BODY_TYPES) {
            log::warn!("replace rejected, unsupported content type {:?}", ctx.content_type);
            return unsupported_media_type(log_token);
        }
        let resource = match ResourceId::parse(resource) {
            Ok(resource) => resource,
            Err(err) => return bad_request(log_token, err.to_string()),
        };
        let record = match GreetingRecord::from_json(body) {
            Ok(record) => record,
            Err(err) => {
                log::warn!("could not parse greeting for replace of {}: {}", resource, err);
                return bad_request(log_token, err.to_string());
            }
        };
        if record.resource_id().ok().as_ref() != Some(&resource) {
            log::info!(
                "href and resource mismatch - target: {} href: {}",
                resource,
                record.self_link.href
            );
            return bad_request(
                log_token,
                format!("href {} does not address greeting {}", record.self_link.href, resource),
            );
        }

        let key = StorageKey::new(&resource, &self.language(ctx));
        let status = match self.store.get(&key).await {
            Some(stored) => {
                if let Some(conflict) = self.check_lock(ctx, &stored, &key, &log_token) {
                    return conflict;
                }
                Status::Ok
            }
            None => Status::Created,
        };

        let etag = canonical_tag(&record);
        let location = record.self_link.href.clone();
        self.store.put(key.clone(), record).await;
        log::info!("stored greeting {} ({:?})", key, status);

        ServiceResponse::new(status, log_token)
            .with_etag(etag)
            .with_location(location)
    }

    pub async fn delete(&self, ctx: &RequestContext, resource: &str) -> ServiceResponse {
        let log_token = resolve_log_token(ctx.log_token.as_deref());
        let resource = match ResourceId::parse(resource) {
            Ok(resource) => resource,
            Err(err) => return bad_request(log_token, err.to_string()),
        };
        let key = StorageKey::new(&resource, &self.language(ctx));

        let Some(stored) = self.store.get(&key).await else {
            log::info!("attempted to delete non-existing greeting {}", key);
            return not_found(log_token);
        };
        if let Some(conflict) = self.check_lock(ctx, &stored, &key, &log_token) {
            return conflict;
        }

        self.store.delete(&key).await;
        log::info!("deleted {} - {} greetings left", key, self.store.len().await);

        ServiceResponse::new(Status::NoContent, log_token)
            .with_etag(canonical_tag(&stored))
            .with_location(stored.self_link.href)
    }

    pub async fn patch(
        &self,
        ctx: &RequestContext,
        resource: &str,
        body: &[u8],
    ) -> ServiceResponse {
        let log_token = resolve_log_token(ctx.log_token.as_deref());
        if !accepts_body(ctx.content_type.as_deref(), PATCH_BODY_TYPES) {
            log::warn!("patch rejected, unsupported content type {:?}", ctx.content_type);
            return unsupported_media_type(log_token);
        }
        let resource = match ResourceId::parse(resource) {
            Ok(resource) => resource,
            Err(err) => return bad_request(log_token, err.to_string()),
        };
        let key = StorageKey::new(&resource, &self.language(ctx));

        let Some(stored) = self.store.get(&key).await else {
            return not_found(log_token);
        };
        let location = stored.self_link.href.clone();
        if let Some(conflict) = self.check_lock(ctx, &stored, &key, &log_token) {
            return conflict.with_location(location);
        }

        let instruction = match PatchInstruction::from_json(body) {
            Ok(instruction) => instruction,
            Err(err) => {
                log::warn!("unable to parse patch for {}: {}", key, err);
                return bad_request(log_token, err.to_string()).with_location(location);
            }
        };

        let mut patched = stored;
        match apply_patch(&mut patched, &instruction) {
            Ok(field) => {
                let etag = canonical_tag(&patched);
                self.store.put(key.clone(), patched).await;
                log::info!("patched {:?} of {}", field, key);
                ServiceResponse::new(Status::Ok, log_token)
                    .with_message(MessageBody::new("value is replaced").with_collection_link())
                    .with_etag(etag)
                    .with_location(location)
            }
            Err(err) => {
                log::info!("patch of {} rejected: {}", key, err);
                let message = match err {
                    PatchError::UnsupportedOperation(_) => "only operation replace is supported",
                    PatchError::FieldNotReplaceable(_) | PatchError::IdentityChange(_) => {
                        "value could not be replaced"
                    }
                };
                ServiceResponse::new(Status::BadRequest, log_token)
                    .with_message(MessageBody::new(message).with_collection_link())
                    .with_location(location)
            }
        }
    }

    /// `Some(conflict)` when the caller's lock token does not match the stored record.
    fn check_lock(
        &self,
        ctx: &RequestContext,
        stored: &GreetingRecord,
        key: &StorageKey,
        log_token: &str,
    ) -> Option<ServiceResponse> {
        let current = canonical_tag(stored);
        match evaluate(&ctx.preconditions, Safety::Unsafe, &current, None) {
            Evaluation::PreconditionFailed => {
                log::info!("stale lock token for {}, current tag is {}", key, current);
                Some(
                    ServiceResponse::new(Status::Conflict, log_token.to_string())
                        .with_message(MessageBody::new(STALE_MESSAGE).with_collection_link())
                        .with_etag(current),
                )
            }
            Evaluation::Proceed | Evaluation::NotModified => None,
        }
    }
}

fn not_found(log_token: String) -> ServiceResponse {
    ServiceResponse::new(Status::NotFound, log_token)
        .with_message(MessageBody::new(NOT_FOUND_MESSAGE).with_collection_link())
}

fn bad_request(log_token: String, message: impl Into<String>) -> ServiceResponse {
    ServiceResponse::new(Status::BadRequest, log_token)
        .with_message(MessageBody::new(message).with_collection_link())
}

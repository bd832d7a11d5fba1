use crate::types::internal::auth::AuthenticatedUser;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries the acting user explicitly; nothing reads a session from ambient state.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Source of the request
    pub source: RequestSource,

    /// Active user the operation runs on behalf of
    pub actor: AuthenticatedUser,
}

impl RequestContext {
    /// Create a RequestContext for a library call
    pub fn new(actor: AuthenticatedUser) -> Self {
        Self {
            request_id: RequestId::generate(),
            source: RequestSource::Service,
            actor,
        }
    }

    /// Create a RequestContext for CLI operations
    ///
    /// # Arguments
    /// * `command_name` - Name of the CLI command being executed
    /// * `actor` - User the command acts as
    pub fn for_cli(command_name: &str, actor: AuthenticatedUser) -> Self {
        let ctx = Self {
            request_id: RequestId::generate(),
            source: RequestSource::CLI,
            actor,
        };
        tracing::debug!(request_id = %ctx.request_id, command = command_name, "CLI request context created");
        ctx
    }

    pub fn user(&self) -> &AuthenticatedUser {
        &self.actor
    }

    pub fn user_id(&self) -> i64 {
        self.actor.id
    }
}

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use crate::auth::jwt::verify_token;
use crate::auth::role::{Action, Role};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Clone, Debug)]
pub struct AuthContext {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

impl AuthContext {
    /// Authorization gate. Handlers call this before touching any data.
    pub fn require(&self, action: Action, message: &str) -> Result<(), AppError> {
        if self.role.permits(action) {
            Ok(())
        } else {
            tracing::warn!(user_id = self.user_id, email = %self.email, role = %self.role, ?action, "Action denied");
            Err(AppError::unauthorized(message))
        }
    }
}

pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let auth_header = match req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok()) {
        Some(h) => h,
        None => return unauthorized("Missing Authorization header"),
    };

    // Expect "Bearer <token>"
    let token = match auth_header.strip_prefix("Bearer ") {
        Some(t) if !t.trim().is_empty() => t.trim(),
        _ => return unauthorized("Invalid Authorization format"),
    };

    let claims = match verify_token(token, &state.jwt_secret) {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };

    let user = match state.users.find_by_email(&claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => return unauthorized("User not found"),
        Err(e) => return AppError::from(e).into_response(),
    };

    // Attach context
    req.extensions_mut().insert(AuthContext {
        user_id: user.id,
        email: user.email,
        role: user.role,
    });

    next.run(req).await
}

fn unauthorized(msg: &str) -> Response {
    tracing::debug!(reason = msg, "Request rejected by auth middleware");
    AppError::unauthorized(msg).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(role: Role) -> AuthContext {
        AuthContext { user_id: 1, email: "clerk@store.test".to_string(), role }
    }

    #[test]
    fn gate_passes_permitted_actions() {
        assert!(context(Role::Admin).require(Action::ManageProducts, "denied").is_ok());
        assert!(context(Role::Attendant).require(Action::RecordSale, "denied").is_ok());
    }

    #[test]
    fn gate_rejects_with_the_given_message() {
        let err = context(Role::Attendant)
            .require(Action::ManageProducts, "You must be an admin to add a product")
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(msg) if msg == "You must be an admin to add a product"));
    }
}

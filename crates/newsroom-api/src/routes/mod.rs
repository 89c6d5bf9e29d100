//! API routes

mod auth;
mod categories;
mod health;
mod news;
mod profiles;
mod states;
pub mod types;
mod users;

use axum::{Router, extract::DefaultBodyLimit};

use crate::state::AppState;

pub use auth::{RequireAdmin, RequireAuth};

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .merge(health::routes())
        // Authentication
        .merge(auth::routes())
        // Catalogue and content surfaces
        .merge(categories::routes())
        .merge(states::routes())
        .merge(profiles::routes())
        .merge(users::routes())
        .merge(news::routes())
        .with_state(state)
        // Payloads are JSON documents; 2MB is plenty
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use newsroom_auth::{JwtManager, hash_password};
    use newsroom_db::{Database, NewUser};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn test_state() -> AppState {
        let db = Database::new_in_memory().await.unwrap();
        let jwt = Arc::new(JwtManager::new("secreto-de-pruebas", 24));
        AppState::new(db, jwt, true)
    }

    async fn test_router() -> (Router, AppState) {
        let state = test_state().await;
        (create_router(state.clone()), state)
    }

    /// Insert a user directly and mint a token for it
    async fn seeded_token(state: &AppState, username: &str, perfil_id: i64) -> String {
        state
            .db
            .ensure_profile(perfil_id, "Perfil de pruebas")
            .await
            .unwrap();
        let user = state
            .db
            .insert_user(NewUser {
                username: username.to_string(),
                email: format!("{username}@diario.es"),
                password_hash: hash_password("contraseña-larga").unwrap(),
                perfil_id,
                activo: true,
            })
            .await
            .unwrap();
        state.jwt.generate_token(&user).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn bearer_request(method: &str, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ==================== Health ====================

    #[tokio::test]
    async fn test_health_endpoint() {
        let (router, _) = test_router().await;
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["status"], "healthy");
    }

    // ==================== Registration ====================

    #[tokio::test]
    async fn test_register_creates_user_and_default_profile() {
        let (router, state) = test_router().await;

        let response = router
            .oneshot(json_request(
                "POST",
                "/api/auth/registro",
                json!({"nick": "ana", "email": "ana@diario.es", "password": "contraseña-larga"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response_json(response).await;
        assert_eq!(body["username"], "ana");
        assert_eq!(body["perfil_id"], 2);
        // The stored credential never leaves the server
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());

        let profile = state.db.get_profile(2).await.unwrap().unwrap();
        assert_eq!(profile.nombre, "Contribuidor");
    }

    #[tokio::test]
    async fn test_register_validation_is_field_keyed() {
        let (router, state) = test_router().await;

        let response = router
            .oneshot(json_request(
                "POST",
                "/api/auth/registro",
                json!({"nick": "a", "password": "corta"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = response_json(response).await;
        let errors = body["errors"].as_object().unwrap();
        assert!(errors.contains_key("nick"));
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("password"));

        // Nothing was persisted for the rejected payload
        assert!(!state.db.has_users().await.unwrap());
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let (router, _) = test_router().await;
        let payload = json!({"nick": "ana", "email": "ana@diario.es", "password": "contraseña-larga"});

        let first = router
            .clone()
            .oneshot(json_request("POST", "/api/auth/registro", payload.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = router
            .oneshot(json_request(
                "POST",
                "/api/auth/registro",
                json!({"nick": "otra", "email": "ana@diario.es", "password": "contraseña-larga"}),
            ))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response_json(second).await;
        assert!(body["errors"].as_object().unwrap().contains_key("email"));
    }

    #[tokio::test]
    async fn test_concurrent_registration_shares_profile() {
        let (router, state) = test_router().await;

        let a = router.clone().oneshot(json_request(
            "POST",
            "/api/auth/registro",
            json!({"nick": "ana", "email": "ana@diario.es", "password": "contraseña-larga", "perfil_id": 7}),
        ));
        let b = router.clone().oneshot(json_request(
            "POST",
            "/api/auth/registro",
            json!({"nick": "eva", "email": "eva@diario.es", "password": "contraseña-larga", "perfil_id": 7}),
        ));

        let (first, second) = tokio::join!(a, b);
        assert_eq!(first.unwrap().status(), StatusCode::CREATED);
        assert_eq!(second.unwrap().status(), StatusCode::CREATED);

        // Both registrations resolved to the single lazily created profile
        assert!(state.db.get_profile(7).await.unwrap().is_some());
    }

    // ==================== Login ====================

    #[tokio::test]
    async fn test_login_returns_token() {
        let (router, _) = test_router().await;
        router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/registro",
                json!({"nick": "ana", "email": "ana@diario.es", "password": "contraseña-larga"}),
            ))
            .await
            .unwrap();

        let response = router
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                json!({"email": "ana@diario.es", "password": "contraseña-larga"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["message"], "Login con éxito");
        assert!(!body["token"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_failures_are_undifferentiated() {
        let (router, state) = test_router().await;
        seeded_token(&state, "ana", 2).await;
        state
            .db
            .insert_user(NewUser {
                username: "baja".to_string(),
                email: "baja@diario.es".to_string(),
                password_hash: hash_password("contraseña-larga").unwrap(),
                perfil_id: 2,
                activo: false,
            })
            .await
            .unwrap();

        for payload in [
            // Wrong password
            json!({"email": "ana@diario.es", "password": "incorrecta-123"}),
            // Unknown account
            json!({"email": "nadie@diario.es", "password": "contraseña-larga"}),
            // Deactivated account, correct password
            json!({"email": "baja@diario.es", "password": "contraseña-larga"}),
        ] {
            let response = router
                .clone()
                .oneshot(json_request("POST", "/api/auth/login", payload))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body = response_json(response).await;
            assert_eq!(body["message"], "Sin autorización");
        }
    }

    #[tokio::test]
    async fn test_login_validation() {
        let (router, _) = test_router().await;
        let response = router
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                json!({"email": "no-es-un-correo"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response_json(response).await;
        let errors = body["errors"].as_object().unwrap();
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("password"));
    }

    // ==================== Token gates ====================

    #[tokio::test]
    async fn test_missing_or_malformed_header_is_401() {
        let (router, _) = test_router().await;

        let missing = router
            .clone()
            .oneshot(Request::get("/api/usuarios").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        let body = response_json(missing).await;
        assert_eq!(body["message"], "No se proporcionó un token con el formato correcto");

        let malformed = router
            .oneshot(
                Request::get("/api/usuarios")
                    .header(header::AUTHORIZATION, "Token abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(malformed.status(), StatusCode::UNAUTHORIZED);
        let body = response_json(malformed).await;
        assert_eq!(body["message"], "No se proporcionó un token con el formato correcto");
    }

    #[tokio::test]
    async fn test_invalid_and_expired_tokens_are_403() {
        let (router, state) = test_router().await;

        let garbage = router
            .clone()
            .oneshot(bearer_request("GET", "/api/usuarios", "no.es.jwt", None))
            .await
            .unwrap();
        assert_eq!(garbage.status(), StatusCode::FORBIDDEN);
        let body = response_json(garbage).await;
        assert_eq!(body["message"], "Token inválido o expirado");

        // A token minted already past its expiry
        let expired_manager = JwtManager::new("secreto-de-pruebas", -1);
        state.db.ensure_profile(1, "Administrador").await.unwrap();
        let user = state
            .db
            .insert_user(NewUser {
                username: "ana".to_string(),
                email: "ana@diario.es".to_string(),
                password_hash: hash_password("contraseña-larga").unwrap(),
                perfil_id: 1,
                activo: true,
            })
            .await
            .unwrap();
        let stale = expired_manager.generate_token(&user).unwrap();

        let expired = router
            .oneshot(bearer_request("GET", "/api/usuarios", &stale, None))
            .await
            .unwrap();
        assert_eq!(expired.status(), StatusCode::FORBIDDEN);
        let body = response_json(expired).await;
        assert_eq!(body["message"], "Token inválido o expirado");
    }

    #[tokio::test]
    async fn test_contributor_cannot_reach_admin_surface() {
        let (router, state) = test_router().await;
        let token = seeded_token(&state, "ana", 2).await;

        let response = router
            .oneshot(bearer_request("GET", "/api/usuarios", &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = response_json(response).await;
        assert_eq!(body["message"], "Sin autorización de Administrador");
    }

    #[tokio::test]
    async fn test_token_snapshot_outlives_record_changes() {
        let (router, state) = test_router().await;
        let token = seeded_token(&state, "ana", 1).await;

        // Deactivating the record does not revoke the outstanding token
        let user = state.db.get_user_by_username("ana").await.unwrap().unwrap();
        state
            .db
            .update_user(user.id, newsroom_db::UpdateUser {
                activo: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();

        let response = router
            .oneshot(bearer_request("GET", "/api/usuarios", &token, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // ==================== Catalogue CRUD ====================

    #[tokio::test]
    async fn test_category_crud_through_router() {
        let (router, state) = test_router().await;
        let admin = seeded_token(&state, "admin", 1).await;

        let created = router
            .clone()
            .oneshot(bearer_request(
                "POST",
                "/api/categorias",
                &admin,
                Some(json!({"nombre": "Deportes", "descripcion": "Noticias deportivas"})),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let body = response_json(created).await;
        let id = body["id"].as_i64().unwrap();

        // Reads stay public
        let listed = router
            .clone()
            .oneshot(Request::get("/api/categorias").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(listed.status(), StatusCode::OK);
        assert_eq!(response_json(listed).await.as_array().unwrap().len(), 1);

        let updated = router
            .clone()
            .oneshot(bearer_request(
                "PUT",
                &format!("/api/categorias/{id}"),
                &admin,
                Some(json!({"nombre": "Cultura"})),
            ))
            .await
            .unwrap();
        assert_eq!(updated.status(), StatusCode::OK);
        assert_eq!(response_json(updated).await["message"], "Categoría actualizada con éxito");

        let deleted = router
            .clone()
            .oneshot(bearer_request("DELETE", &format!("/api/categorias/{id}"), &admin, None))
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::OK);

        let gone = router
            .oneshot(
                Request::get(format!("/api/categorias/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_category_mutation_requires_admin() {
        let (router, state) = test_router().await;
        let contributor = seeded_token(&state, "ana", 2).await;

        let response = router
            .oneshot(bearer_request(
                "POST",
                "/api/categorias",
                &contributor,
                Some(json!({"nombre": "Deportes"})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    // ==================== News ====================

    #[tokio::test]
    async fn test_news_create_defaults_author_to_caller() {
        let (router, state) = test_router().await;
        let token = seeded_token(&state, "ana", 2).await;
        let author = state.db.get_user_by_username("ana").await.unwrap().unwrap();
        let category = state
            .db
            .insert_category(newsroom_db::NewCategory {
                nombre: "Deportes".to_string(),
                descripcion: String::new(),
                activo: true,
            })
            .await
            .unwrap();
        let estado = state
            .db
            .insert_state(newsroom_db::NewNewsState {
                nombre: "Publicada".to_string(),
                descripcion: String::new(),
                activo: true,
            })
            .await
            .unwrap();

        let response = router
            .clone()
            .oneshot(bearer_request(
                "POST",
                "/api/noticias",
                &token,
                Some(json!({"titulo": "Titular", "categoria_id": category.id, "estado_id": estado.id})),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        assert_eq!(body["usuario_id"].as_i64().unwrap(), author.id);

        // Reads are open and carry the joined author
        let listed = router
            .oneshot(Request::get("/api/noticias").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(listed.status(), StatusCode::OK);
        let articles = response_json(listed).await;
        assert_eq!(articles[0]["usuario"]["username"], "ana");
    }

    #[tokio::test]
    async fn test_news_mutation_requires_authentication() {
        let (router, _) = test_router().await;
        let response = router
            .oneshot(json_request(
                "POST",
                "/api/noticias",
                json!({"titulo": "Titular", "categoria_id": 1, "estado_id": 1}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // ==================== Profiles ====================

    #[tokio::test]
    async fn test_profile_reads_gated_writes_open() {
        let (router, state) = test_router().await;
        let admin = seeded_token(&state, "admin", 1).await;

        let created = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/perfiles",
                json!({"id": 5, "nombre": "Editor"}),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);

        let unauthenticated = router
            .clone()
            .oneshot(Request::get("/api/perfiles").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(unauthenticated.status(), StatusCode::UNAUTHORIZED);

        let listed = router
            .oneshot(bearer_request("GET", "/api/perfiles", &admin, None))
            .await
            .unwrap();
        assert_eq!(listed.status(), StatusCode::OK);
        let profiles = response_json(listed).await;
        assert!(
            profiles
                .as_array()
                .unwrap()
                .iter()
                .any(|p| p["nombre"] == "Editor")
        );
    }
}

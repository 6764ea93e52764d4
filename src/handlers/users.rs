//! User account HTTP handlers.
//!
//! This module implements the account-management endpoints:
//! - POST /users/create - Register a new user
//! - GET /users/usernameInquiry?phoneNumber= - Find a username by phone number
//! - POST /users/password/inquiry - Issue a temporary password
//! - POST /users/password/update - Change a password
//!
//! Every outcome, success or failure, is rendered as a
//! [`StandardResponse`] envelope. Failures are localized through
//! [`AppState::reject`] and carry an empty data object.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};

use crate::{
    error::AppError,
    messages::MessageKey,
    models::{
        response::{Reply, StandardResponse},
        user::{PasswordUpdateRequest, PhoneNumberQuery, StrictLoginInfo, UserRecord},
    },
    routes::AppState,
    validation::validate_phone_number,
};

/// Rejected bodies and query strings are reported by status only. Their text
/// quotes the offending input.
fn malformed(status: StatusCode) -> AppError {
    AppError::InvalidArgument(format!("malformed request ({status})"))
}

/// Register a new user.
///
/// # Endpoint
///
/// `POST /users/create`
///
/// # Request Body
///
/// ```json
/// {
///   "username": "michael",
///   "password": "pw1234!",
///   "email": "michael@naver.com",
///   "phoneNumber": "010-4589-0000"
/// }
/// ```
///
/// # Response
///
/// - **200**: the created record (`username`, `email`, normalized `phoneNumber`)
/// - **400**: malformed body or invalid field (`common.argument.invalid`)
/// - **400**: username already taken (`user.username.duplicated`)
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserRecord>, JsonRejection>,
) -> Result<Reply, Reply> {
    register(&state, payload)
        .await
        .map_err(|e| state.reject(e))
}

async fn register(
    state: &AppState,
    payload: Result<Json<UserRecord>, JsonRejection>,
) -> Result<Reply, AppError> {
    let Json(mut user) = payload.map_err(|e| malformed(e.status()))?;
    user.validate()?;

    tracing::info!("Registering user {}", user.username);

    user.password = state.password_encoder.encode(&user.password)?;
    let created = state.user_service.create_user(user).await?;

    Ok(Reply::ok(StandardResponse::new(
        state.message(MessageKey::UserCreated),
        created.to_data(),
    )))
}

/// Find the username registered with a phone number.
///
/// The phone number is normalized before lookup, so `010-4589-0000` and
/// `01045890000` find the same user.
///
/// # Response
///
/// - **200**: `{"username": "..."}`
/// - **400**: no user with this number (`user.phoneNumber.notFound`)
/// - **400**: missing or malformed number (`common.argument.invalid`)
pub async fn find_username(
    State(state): State<AppState>,
    query: Result<Query<PhoneNumberQuery>, QueryRejection>,
) -> Result<Reply, Reply> {
    lookup_username(&state, query)
        .await
        .map_err(|e| state.reject(e))
}

async fn lookup_username(
    state: &AppState,
    query: Result<Query<PhoneNumberQuery>, QueryRejection>,
) -> Result<Reply, AppError> {
    let Query(query) = query.map_err(|e| malformed(e.status()))?;
    let phone_number = validate_phone_number(&query.phone_number)?;

    let username = state
        .user_service
        .find_username(&phone_number)
        .await?
        .ok_or(AppError::PhoneNumberNotFound)?;

    Ok(Reply::ok(StandardResponse::with_entry(
        state.message(MessageKey::UsernameFound),
        "username",
        username,
    )))
}

/// Issue a temporary password to the user matching a strict credential.
///
/// The temporary password is stored encoded and returned in plain text
/// exactly once, in this response.
///
/// # Response
///
/// - **200**: `{"password": "<temporary password>"}`
/// - **400**: no user matches every field (`user.userInfo.notFound`)
/// - **400**: malformed body or invalid field (`common.argument.invalid`)
pub async fn recover_password(
    State(state): State<AppState>,
    payload: Result<Json<StrictLoginInfo>, JsonRejection>,
) -> Result<Reply, Reply> {
    issue_temporary_password(&state, payload)
        .await
        .map_err(|e| state.reject(e))
}

async fn issue_temporary_password(
    state: &AppState,
    payload: Result<Json<StrictLoginInfo>, JsonRejection>,
) -> Result<Reply, AppError> {
    let Json(mut info) = payload.map_err(|e| malformed(e.status()))?;
    info.validate()?;

    let temporary_password = state.password_generator.generate();
    let encoded = state.password_encoder.encode(&temporary_password)?;

    let updated_count = state
        .user_service
        .update_password_by_strict_info(&info, &encoded)
        .await?;

    if updated_count == 0 {
        return Err(AppError::UserInfoNotFound);
    }

    tracing::info!("Issued temporary password for user {}", info.username);

    Ok(Reply::ok(StandardResponse::with_entry(
        state.message(MessageKey::TemporaryPasswordReturned),
        "password",
        temporary_password,
    )))
}

/// Change the password of a user identified by their current credential.
///
/// # Request Body
///
/// ```json
/// {
///   "username": "michael",
///   "password": "current-password",
///   "newPassword": "next-password"
/// }
/// ```
///
/// # Response
///
/// - **200**: empty data (`user.password.update.succeeded`)
/// - **400**: credential does not match (`user.userInfo.notFound`)
/// - **400**: malformed body or missing field (`common.argument.invalid`)
pub async fn update_password(
    State(state): State<AppState>,
    payload: Result<Json<PasswordUpdateRequest>, JsonRejection>,
) -> Result<Reply, Reply> {
    change_password(&state, payload)
        .await
        .map_err(|e| state.reject(e))
}

async fn change_password(
    state: &AppState,
    payload: Result<Json<PasswordUpdateRequest>, JsonRejection>,
) -> Result<Reply, AppError> {
    let Json(request) = payload.map_err(|e| malformed(e.status()))?;
    request.validate()?;

    let encoded = state.password_encoder.encode(&request.new_password)?;

    let updated_count = state
        .user_service
        .update_password(&request.login_info, &encoded)
        .await?;

    if updated_count == 0 {
        return Err(AppError::UserInfoNotFound);
    }

    tracing::info!("Password updated for user {}", request.login_info.username);

    Ok(Reply::ok(StandardResponse::message_only(
        state.message(MessageKey::PasswordUpdateSucceeded),
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Method, Request},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        messages::MessageSource,
        routes::create_router,
        services::{
            password::{MockPasswordEncoder, MockTemporaryPasswordGenerator},
            user_service::MockUserService,
        },
    };

    fn app(
        user_service: MockUserService,
        password_encoder: MockPasswordEncoder,
        password_generator: MockTemporaryPasswordGenerator,
    ) -> Router {
        create_router(AppState {
            user_service: Arc::new(user_service),
            password_encoder: Arc::new(password_encoder),
            password_generator: Arc::new(password_generator),
            messages: Arc::new(MessageSource::default()),
        })
    }

    fn message(key: MessageKey) -> String {
        MessageSource::default().message(key)
    }

    fn encoder_returning(encoded: &'static str) -> MockPasswordEncoder {
        let mut encoder = MockPasswordEncoder::new();
        encoder
            .expect_encode()
            .returning(move |_| Ok(encoded.to_string()));
        encoder
    }

    fn user_json() -> Value {
        json!({
            "username": "michael",
            "password": "pw1234!",
            "email": "michael@naver.com",
            "phoneNumber": "010-4589-0000"
        })
    }

    fn strict_login_json() -> Value {
        json!({
            "username": "michael",
            "email": "michael@naver.com",
            "phoneNumber": "010-4589-0000"
        })
    }

    fn password_update_json() -> Value {
        json!({
            "username": "michael",
            "password": "pw1234!",
            "newPassword": "newPw5678!"
        })
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, StandardResponse) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn create_user_success() {
        let mut service = MockUserService::new();
        service
            .expect_create_user()
            .withf(|user| user.phone_number == "01045890000" && user.password == "encodedPW")
            .times(1)
            .returning(|user| Ok(user));

        let app = app(
            service,
            encoder_returning("encodedPW"),
            MockTemporaryPasswordGenerator::new(),
        );

        let (status, body) = send(app, post_json("/users/create", &user_json())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.message, message(MessageKey::UserCreated));
        assert_eq!(body.data["username"], "michael");
        assert_eq!(body.data["email"], "michael@naver.com");
        assert_eq!(body.data["phoneNumber"], "01045890000");
        assert!(body.data.get("password").is_none());
    }

    #[tokio::test]
    async fn create_user_fails_validation_on_malformed_email() {
        let mut service = MockUserService::new();
        service.expect_create_user().never();

        let mut user = user_json();
        user["email"] = json!("alstjrdl852naver.com");

        let app = app(
            service,
            MockPasswordEncoder::new(),
            MockTemporaryPasswordGenerator::new(),
        );

        let (status, body) = send(app, post_json("/users/create", &user)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            StandardResponse::message_only(message(MessageKey::ArgumentInvalid))
        );
    }

    #[tokio::test]
    async fn create_user_fails_on_malformed_body() {
        let mut service = MockUserService::new();
        service.expect_create_user().never();

        let app = app(
            service,
            MockPasswordEncoder::new(),
            MockTemporaryPasswordGenerator::new(),
        );

        let (status, body) = send(app, post_json("/users/create", &json!({"username": 7}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            StandardResponse::message_only(message(MessageKey::ArgumentInvalid))
        );
    }

    #[tokio::test]
    async fn create_user_fails_on_username_duplication() {
        let mut service = MockUserService::new();
        service
            .expect_create_user()
            .times(1)
            .returning(|_| Err(AppError::UsernameDuplicated));

        let app = app(
            service,
            encoder_returning("encodedPW"),
            MockTemporaryPasswordGenerator::new(),
        );

        let (status, body) = send(app, post_json("/users/create", &user_json())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            StandardResponse::message_only(message(MessageKey::UsernameDuplicated))
        );
    }

    #[tokio::test]
    async fn create_user_hides_database_errors() {
        let mut service = MockUserService::new();
        service
            .expect_create_user()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let app = app(
            service,
            encoder_returning("encodedPW"),
            MockTemporaryPasswordGenerator::new(),
        );

        let (status, body) = send(app, post_json("/users/create", &user_json())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            StandardResponse::message_only(message(MessageKey::InternalError))
        );
    }

    #[tokio::test]
    async fn find_username_found() {
        let mut service = MockUserService::new();
        service
            .expect_find_username()
            .withf(|phone_number| phone_number == "01045890000")
            .times(1)
            .returning(|_| Ok(Some("michael".to_string())));

        let app = app(
            service,
            MockPasswordEncoder::new(),
            MockTemporaryPasswordGenerator::new(),
        );

        let (status, body) = send(app, get("/users/usernameInquiry?phoneNumber=010-4589-0000")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            StandardResponse::with_entry(message(MessageKey::UsernameFound), "username", "michael")
        );
    }

    #[tokio::test]
    async fn find_username_accepts_unescaped_country_code() {
        let mut service = MockUserService::new();
        service
            .expect_find_username()
            .withf(|phone_number| phone_number == "01045890000")
            .times(1)
            .returning(|_| Ok(Some("michael".to_string())));

        let app = app(
            service,
            MockPasswordEncoder::new(),
            MockTemporaryPasswordGenerator::new(),
        );

        let (status, body) = send(app, get("/users/usernameInquiry?phoneNumber=+82-10-4589-0000")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.data["username"], "michael");
    }

    #[tokio::test]
    async fn find_username_phone_number_not_found() {
        let mut service = MockUserService::new();
        service.expect_find_username().returning(|_| Ok(None));

        let app = app(
            service,
            MockPasswordEncoder::new(),
            MockTemporaryPasswordGenerator::new(),
        );

        let (status, body) = send(app, get("/users/usernameInquiry?phoneNumber=010-4589-0000")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            StandardResponse::message_only(message(MessageKey::PhoneNumberNotFound))
        );
    }

    #[tokio::test]
    async fn find_username_requires_phone_number() {
        let mut service = MockUserService::new();
        service.expect_find_username().never();

        let app = app(
            service,
            MockPasswordEncoder::new(),
            MockTemporaryPasswordGenerator::new(),
        );

        let (status, body) = send(app, get("/users/usernameInquiry")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            StandardResponse::message_only(message(MessageKey::ArgumentInvalid))
        );
    }

    #[tokio::test]
    async fn recover_password_issues_temporary_password() {
        let mut generator = MockTemporaryPasswordGenerator::new();
        generator
            .expect_generate()
            .times(1)
            .returning(|| "fslkkjlk12".to_string());

        let mut encoder = MockPasswordEncoder::new();
        encoder
            .expect_encode()
            .withf(|raw| raw == "fslkkjlk12")
            .returning(|_| Ok("encodedTemp".to_string()));

        let mut service = MockUserService::new();
        service
            .expect_update_password_by_strict_info()
            .withf(|info, encoded| {
                info.username == "michael"
                    && info.phone_number == "01045890000"
                    && encoded == "encodedTemp"
            })
            .times(1)
            .returning(|_, _| Ok(1));

        let app = app(service, encoder, generator);

        let (status, body) = send(app, post_json("/users/password/inquiry", &strict_login_json())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            StandardResponse::with_entry(
                message(MessageKey::TemporaryPasswordReturned),
                "password",
                "fslkkjlk12"
            )
        );
    }

    #[tokio::test]
    async fn recover_password_fails_when_user_info_mismatches() {
        let mut generator = MockTemporaryPasswordGenerator::new();
        generator
            .expect_generate()
            .returning(|| "fslkkjlk12".to_string());

        let mut service = MockUserService::new();
        service
            .expect_update_password_by_strict_info()
            .returning(|_, _| Ok(0));

        let app = app(service, encoder_returning("encodedTemp"), generator);

        let (status, body) = send(app, post_json("/users/password/inquiry", &strict_login_json())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            StandardResponse::message_only(message(MessageKey::UserInfoNotFound))
        );
    }

    #[tokio::test]
    async fn recover_password_rejects_invalid_email() {
        let mut service = MockUserService::new();
        service.expect_update_password_by_strict_info().never();

        let mut info = strict_login_json();
        info["email"] = json!("michael");

        let app = app(
            service,
            MockPasswordEncoder::new(),
            MockTemporaryPasswordGenerator::new(),
        );

        let (status, body) = send(app, post_json("/users/password/inquiry", &info)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, message(MessageKey::ArgumentInvalid));
    }

    #[tokio::test]
    async fn update_password_success() {
        let mut service = MockUserService::new();
        service
            .expect_update_password()
            .withf(|login, encoded| {
                login.username == "michael" && login.password == "pw1234!" && encoded == "encodedPW"
            })
            .times(1)
            .returning(|_, _| Ok(1));

        let app = app(
            service,
            encoder_returning("encodedPW"),
            MockTemporaryPasswordGenerator::new(),
        );

        let (status, body) = send(app, post_json("/users/password/update", &password_update_json())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            StandardResponse::message_only(message(MessageKey::PasswordUpdateSucceeded))
        );
    }

    #[tokio::test]
    async fn update_password_failure() {
        let mut service = MockUserService::new();
        service
            .expect_update_password()
            .times(1)
            .returning(|_, _| Ok(0));

        let app = app(
            service,
            encoder_returning("encodedPW"),
            MockTemporaryPasswordGenerator::new(),
        );

        let (status, body) = send(app, post_json("/users/password/update", &password_update_json())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            StandardResponse::message_only(message(MessageKey::UserInfoNotFound))
        );
    }

    #[tokio::test]
    async fn update_password_requires_new_password() {
        let mut service = MockUserService::new();
        service.expect_update_password().never();

        let app = app(
            service,
            MockPasswordEncoder::new(),
            MockTemporaryPasswordGenerator::new(),
        );

        let request = json!({"username": "michael", "password": "pw1234!", "newPassword": ""});
        let (status, body) = send(app, post_json("/users/password/update", &request)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, message(MessageKey::ArgumentInvalid));
    }

    #[tokio::test]
    async fn responses_are_localized() {
        let mut service = MockUserService::new();
        service.expect_find_username().returning(|_| Ok(None));

        let app = create_router(AppState {
            user_service: Arc::new(service),
            password_encoder: Arc::new(MockPasswordEncoder::new()),
            password_generator: Arc::new(MockTemporaryPasswordGenerator::new()),
            messages: Arc::new(MessageSource::for_locale("ko")),
        });

        let (status, body) = send(app, get("/users/usernameInquiry?phoneNumber=01045890000")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "해당 전화번호로 가입된 회원이 없습니다.");
        assert!(body.data.is_empty());
    }
}

//! End-to-end behaviour of the account endpoints over the in-memory
//! repository: session lifecycle, password rotation, and the listing
//! contract, with the production middleware stack in front.

use std::sync::Arc;

use accounts::Trace;
use accounts::domain::ports::CredentialHasher;
use accounts::domain::{AccountService, PlainPassword, TRACE_ID_HEADER};
use accounts::inbound::http::configure_api;
use accounts::inbound::http::state::HttpState;
use accounts::test_support::{AccountRecord, InMemoryAccountRepository, fast_hasher};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const PASSWORD: &str = "initial secret";

struct World {
    repo: Arc<InMemoryAccountRepository>,
    state: web::Data<HttpState>,
    key: Key,
}

#[fixture]
async fn world() -> World {
    let hasher = fast_hasher().expect("hasher params");
    let repo = Arc::new(InMemoryAccountRepository::new());
    for (first_name, username) in [("Ada", "ada"), ("Grace", "grace"), ("Edsger", "edsger")] {
        let hash = hasher
            .hash(&PlainPassword::chosen(PASSWORD).expect("valid password"))
            .await
            .expect("hash");
        repo.insert_user(AccountRecord::new(first_name, username, hash));
    }
    let service = AccountService::new(repo.clone(), Arc::new(hasher));
    World {
        repo,
        state: web::Data::new(HttpState::from_service(Arc::new(service))),
        key: Key::generate(),
    }
}

async fn app(
    world: &World,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), world.key.clone())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(world.state.clone())
            .wrap(Trace)
            .service(web::scope("/api/v1").wrap(session).configure(configure_api)),
    )
    .await
}

async fn post_login(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
    password: &str,
) -> ServiceResponse {
    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({"username": username, "password": password}))
        .to_request();
    test::call_service(app, req).await
}

fn cookie_of(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

async fn get_json(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    uri: &str,
    cookie: Option<Cookie<'static>>,
) -> (StatusCode, Value) {
    let mut req = test::TestRequest::get().uri(uri);
    if let Some(cookie) = cookie {
        req = req.cookie(cookie);
    }
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    (status, test::read_body_json(res).await)
}

#[rstest]
#[actix_web::test]
async fn rejected_login_is_unauthorized_with_trace_id(#[future] world: World) {
    let world = world.await;
    let app = app(&world).await;

    let res = post_login(&app, "ada", "wrong password").await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let trace_id = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["statusCode"], json!(401));
    assert_eq!(body["error"]["code"], json!("unauthorized"));
    assert_eq!(body["error"]["traceId"], json!(trace_id));
    assert_eq!(body["message"], json!("invalid credentials"));
}

#[rstest]
#[actix_web::test]
async fn unknown_user_and_wrong_password_are_indistinguishable(#[future] world: World) {
    let world = world.await;
    let app = app(&world).await;

    let unknown: Value = test::read_body_json(post_login(&app, "nobody", PASSWORD).await).await;
    let wrong: Value = test::read_body_json(post_login(&app, "ada", "nope nope").await).await;

    assert_eq!(unknown["message"], wrong["message"]);
    assert_eq!(unknown["statusCode"], wrong["statusCode"]);
}

#[rstest]
#[actix_web::test]
async fn blank_login_fields_are_a_validation_envelope(#[future] world: World) {
    let world = world.await;
    let app = app(&world).await;

    let res = post_login(&app, "   ", "").await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["statusCode"], json!(400));
    assert!(body["error"].is_array());
}

#[rstest]
#[actix_web::test]
async fn logout_ends_the_session(#[future] world: World) {
    let world = world.await;
    let app = app(&world).await;
    let cookie = cookie_of(&post_login(&app, "ada", PASSWORD).await);

    let (status, _) = get_json(&app, "/api/v1/users/me", Some(cookie.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = cookie_of(&res);

    let (status, body) = get_json(&app, "/api/v1/users/me", Some(cleared)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("login required"));
}

#[rstest]
#[actix_web::test]
async fn changed_password_replaces_the_old_one(#[future] world: World) {
    let world = world.await;
    let app = app(&world).await;
    let cookie = cookie_of(&post_login(&app, "grace", PASSWORD).await);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/users/me/password")
            .cookie(cookie)
            .set_json(json!({"oldPassword": PASSWORD, "newPassword": "rotated secret"}))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body["message"],
        json!("Your password has been successfully updated")
    );

    assert_eq!(
        post_login(&app, "grace", "rotated secret").await.status(),
        StatusCode::OK
    );
    assert_eq!(
        post_login(&app, "grace", PASSWORD).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[rstest]
#[actix_web::test]
async fn listing_returns_every_user_with_three_fields(#[future] world: World) {
    let world = world.await;
    let app = app(&world).await;
    let cookie = cookie_of(&post_login(&app, "edsger", PASSWORD).await);

    let (status, body) = get_json(&app, "/api/v1/users", Some(cookie)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], json!(false));
    assert_eq!(body["message"], json!("USERS"));
    let rows = body["data"].as_array().expect("rows");
    assert_eq!(rows.len(), 3);
    let mut usernames: Vec<&str> = rows
        .iter()
        .map(|row| {
            assert_eq!(row.as_object().map(|object| object.len()), Some(3));
            row["username"].as_str().expect("username")
        })
        .collect();
    usernames.sort_unstable();
    assert_eq!(usernames, vec!["ada", "edsger", "grace"]);
}

#[rstest]
#[actix_web::test]
async fn profile_update_is_visible_on_the_home_summary(#[future] world: World) {
    let world = world.await;
    let app = app(&world).await;
    let cookie = cookie_of(&post_login(&app, "ada", PASSWORD).await);

    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri("/api/v1/users/me")
            .cookie(cookie.clone())
            .set_json(json!({"firstName": "  Augusta  "}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let (_, body) = get_json(&app, "/api/v1/users/me/home", Some(cookie)).await;
    assert_eq!(
        body["data"],
        json!([{"firstName": "Augusta", "username": "ada"}])
    );
    assert_eq!(world.repo.profile_writes(), 1);
}

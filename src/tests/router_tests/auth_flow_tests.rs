use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    body_string, get, get_with_session, make_app, post_form, post_form_anon, sign_in,
};

#[test]
fn signed_out_root_shows_login() {
    let (app, _) = make_app();

    let resp = handle(get("/"), &app).expect("Failed to handle request");

    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Welcome to Lead Panel"));
    assert!(body.contains("/auth/request-code"));
}

#[test]
fn otp_flow_signs_in_and_sets_cookie() {
    let (app, outbox) = make_app();

    // Step 1: ask for a code. The address is normalized on the way in.
    let resp = handle(
        post_form_anon("/auth/request-code", "email=Ada%40Example.com"),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Check your email"));
    assert!(body.contains("ada@example.com"));

    let (to, code) = outbox.lock().unwrap().last().cloned().unwrap();
    assert_eq!(to, "ada@example.com");
    assert_eq!(code.len(), 6);

    // Step 2: verify the code. That creates the user and the session.
    let resp = handle(
        post_form_anon(
            "/auth/verify-code",
            &format!("email=ada@example.com&code={code}"),
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap(), "/");

    let cookie = resp
        .headers()
        .get("Set-Cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.contains("HttpOnly"));
    let token = cookie
        .strip_prefix("session=")
        .and_then(|rest| rest.split(';').next())
        .unwrap()
        .to_string();

    // Step 3: the cookie works against a protected screen.
    let resp = handle(get_with_session("/", &token), &app).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("ada@example.com"));
}

#[test]
fn wrong_code_stays_on_code_screen() {
    let (app, _outbox) = make_app();
    handle(
        post_form_anon("/auth/request-code", "email=ada@example.com"),
        &app,
    )
    .unwrap();

    // Codes are numeric, so this can never be the real one.
    let resp = handle(
        post_form_anon("/auth/verify-code", "email=ada@example.com&code=abcdef"),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("invalid or expired code"));
}

#[test]
fn immediate_resend_hits_cooldown() {
    let (app, outbox) = make_app();
    handle(
        post_form_anon("/auth/request-code", "email=ada@example.com"),
        &app,
    )
    .unwrap();

    let resp = handle(
        post_form_anon("/auth/request-code", "email=ada@example.com"),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("before requesting another code"));
    assert_eq!(outbox.lock().unwrap().len(), 1);
}

#[test]
fn invalid_email_bounces_back_to_login() {
    let (app, outbox) = make_app();

    let resp = handle(
        post_form_anon("/auth/request-code", "email=not-an-email"),
        &app,
    )
    .unwrap();

    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("invalid email"));
    assert!(body.contains("Welcome to Lead Panel"));
    assert!(outbox.lock().unwrap().is_empty());
}

#[test]
fn logout_revokes_the_session() {
    let (app, _) = make_app();
    let token = sign_in(&app, "ada@example.com");

    let resp = handle(get_with_session("/", &token), &app).unwrap();
    assert!(body_string(resp).contains("ada@example.com"));

    let resp = handle(post_form("/auth/logout", &token, ""), &app).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap(), "/login");
    let cookie = resp.headers().get("Set-Cookie").unwrap().to_str().unwrap();
    assert!(cookie.contains("Max-Age=0"));

    // The old token is dead even though the hub had it cached.
    let resp = handle(get_with_session("/leads", &token), &app).unwrap();
    assert!(body_string(resp).contains("Welcome to Lead Panel"));
}

#[test]
fn login_screen_redirects_when_already_signed_in() {
    let (app, _) = make_app();
    let token = sign_in(&app, "ada@example.com");

    let resp = handle(get_with_session("/login", &token), &app).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap(), "/");
}

#[test]
fn mutations_require_a_session() {
    let (app, _) = make_app();

    let resp = handle(post_form_anon("/collections", "name=Fitness"), &app);

    assert!(matches!(resp, Err(ServerError::Unauthorized(_))));
}

#[test]
fn unknown_routes_are_not_found() {
    let (app, _) = make_app();
    let token = sign_in(&app, "ada@example.com");

    assert!(matches!(
        handle(get_with_session("/bogus", &token), &app),
        Err(ServerError::NotFound)
    ));
    assert!(matches!(
        handle(get("/bogus"), &app),
        Err(ServerError::NotFound)
    ));
}

#[test]
fn help_is_public() {
    let (app, _) = make_app();

    let resp = handle(get("/help"), &app).unwrap();

    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Getting Started"));
}

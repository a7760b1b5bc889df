use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get_with_session, make_app, post_form, sign_in};

#[test]
fn campaigns_screen_prompts_for_a_collection_first() {
    let (app, _) = make_app();
    let token = sign_in(&app, "own@example.com");

    let body = body_string(handle(get_with_session("/campaigns", &token), &app).unwrap());
    assert!(body.contains("Campaign Management"));
    assert!(body.contains("Create a"));
}

#[test]
fn campaign_freezes_lead_snapshot_at_creation() {
    let (app, _) = make_app();
    let token = sign_in(&app, "own@example.com");
    handle(post_form("/collections", &token, "name=Sources"), &app).unwrap();
    handle(
        post_form("/collections/1/import", &token, "mode=text&data=a,b,c"),
        &app,
    )
    .unwrap();

    let resp = handle(
        post_form(
            "/campaigns",
            &token,
            "name=Spring+Push&collection_id=1&budget=250",
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap(), "/campaigns");

    // Growing the collection afterwards must not move the snapshot.
    handle(
        post_form("/collections/1/import", &token, "mode=text&data=d,e"),
        &app,
    )
    .unwrap();

    let body = body_string(handle(get_with_session("/campaigns", &token), &app).unwrap());
    assert!(body.contains("Spring Push"));
    assert!(body.contains("$250"));
    assert!(body.contains("3 leads"));
    assert!(body.contains("draft"));
}

#[test]
fn campaign_name_and_collection_are_required() {
    let (app, _) = make_app();
    let token = sign_in(&app, "own@example.com");
    handle(post_form("/collections", &token, "name=Sources"), &app).unwrap();

    let resp = handle(post_form("/campaigns", &token, "collection_id=1"), &app);
    assert!(matches!(resp, Err(ServerError::BadRequest(_))));

    let resp = handle(post_form("/campaigns", &token, "name=No+Source"), &app);
    assert!(matches!(resp, Err(ServerError::BadRequest(_))));
}

#[test]
fn campaign_requires_an_owned_collection() {
    let (app, _) = make_app();
    let alice = sign_in(&app, "alice@example.com");
    let bob = sign_in(&app, "bob@example.com");
    handle(post_form("/collections", &alice, "name=Alices"), &app).unwrap();

    let resp = handle(
        post_form("/campaigns", &bob, "name=Steal&collection_id=1&budget=10"),
        &app,
    );
    assert!(matches!(resp, Err(ServerError::NotFound)));
}

#[test]
fn negative_budget_is_rejected() {
    let (app, _) = make_app();
    let token = sign_in(&app, "own@example.com");
    handle(post_form("/collections", &token, "name=Sources"), &app).unwrap();

    let resp = handle(
        post_form("/campaigns", &token, "name=Broke&collection_id=1&budget=-5"),
        &app,
    );
    assert!(matches!(resp, Err(ServerError::BadRequest(_))));
}

use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get_with_session, make_app, post_form, sign_in};

#[test]
fn create_collection_then_list_it() {
    let (app, _) = make_app();
    let token = sign_in(&app, "own@example.com");

    let resp = handle(
        post_form(
            "/collections",
            &token,
            "name=Fitness+Leads&description=gym+folks",
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap(), "/leads");

    let body = body_string(handle(get_with_session("/leads", &token), &app).unwrap());
    assert!(body.contains("Fitness Leads"));
    assert!(body.contains("gym folks"));
    assert!(body.contains("0 leads"));
}

#[test]
fn collection_name_is_validated() {
    let (app, _) = make_app();
    let token = sign_in(&app, "own@example.com");

    let resp = handle(post_form("/collections", &token, "name=x"), &app);
    assert!(matches!(resp, Err(ServerError::BadRequest(_))));

    let resp = handle(post_form("/collections", &token, "name=++"), &app);
    assert!(matches!(resp, Err(ServerError::BadRequest(_))));
}

#[test]
fn collections_are_scoped_to_their_owner() {
    let (app, _) = make_app();
    let alice = sign_in(&app, "alice@example.com");
    let bob = sign_in(&app, "bob@example.com");

    handle(post_form("/collections", &alice, "name=Alice+Only"), &app).unwrap();

    let body = body_string(handle(get_with_session("/leads", &bob), &app).unwrap());
    assert!(!body.contains("Alice Only"));

    // Reaching for it by id does not work either.
    assert!(matches!(
        handle(get_with_session("/collections/1", &bob), &app),
        Err(ServerError::NotFound)
    ));
    assert!(matches!(
        handle(post_form("/collections/1/delete", &bob, ""), &app),
        Err(ServerError::NotFound)
    ));

    // Alice still sees hers.
    let body = body_string(handle(get_with_session("/collections/1", &alice), &app).unwrap());
    assert!(body.contains("Alice Only"));
}

#[test]
fn edit_updates_name_and_description() {
    let (app, _) = make_app();
    let token = sign_in(&app, "own@example.com");
    handle(post_form("/collections", &token, "name=Old+Name"), &app).unwrap();

    let resp = handle(
        post_form(
            "/collections/1/edit",
            &token,
            "name=New+Name&description=after+edit",
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 303);

    let body = body_string(handle(get_with_session("/leads", &token), &app).unwrap());
    assert!(body.contains("New Name"));
    assert!(body.contains("after edit"));
    assert!(!body.contains("Old Name"));
}

#[test]
fn delete_removes_the_collection() {
    let (app, _) = make_app();
    let token = sign_in(&app, "own@example.com");
    handle(post_form("/collections", &token, "name=Shortlived"), &app).unwrap();

    let resp = handle(post_form("/collections/1/delete", &token, ""), &app).unwrap();
    assert_eq!(resp.status(), 303);

    let body = body_string(handle(get_with_session("/leads", &token), &app).unwrap());
    assert!(!body.contains("Shortlived"));
    assert!(matches!(
        handle(get_with_session("/collections/1", &token), &app),
        Err(ServerError::NotFound)
    ));
}

#[test]
fn clone_copies_metadata_but_starts_empty() {
    let (app, _) = make_app();
    let token = sign_in(&app, "own@example.com");
    handle(post_form("/collections", &token, "name=Original"), &app).unwrap();
    handle(
        post_form("/collections/1/import", &token, "mode=text&data=%40alpha"),
        &app,
    )
    .unwrap();

    let resp = handle(post_form("/collections/1/clone", &token, ""), &app).unwrap();
    assert_eq!(resp.status(), 303);

    let body = body_string(handle(get_with_session("/leads", &token), &app).unwrap());
    assert!(body.contains("Copy of Original"));
    assert!(body.contains("0 leads"));
    assert!(body.contains("1 leads"));
}

#[test]
fn collections_list_paginates_past_three() {
    let (app, _) = make_app();
    let token = sign_in(&app, "own@example.com");
    for i in 1..=4 {
        handle(
            post_form("/collections", &token, &format!("name=Batch+{i}")),
            &app,
        )
        .unwrap();
    }

    // Newest first, three per page.
    let body = body_string(handle(get_with_session("/leads", &token), &app).unwrap());
    assert!(body.contains("Batch 4"));
    assert!(body.contains("Batch 2"));
    assert!(!body.contains("Batch 1"));
    assert!(body.contains("Showing 1-3 of 4"));

    let body = body_string(handle(get_with_session("/leads?page=2", &token), &app).unwrap());
    assert!(body.contains("Batch 1"));
    assert!(!body.contains("Batch 4"));
    assert!(body.contains("Showing 4-4 of 4"));
}

#[test]
fn lead_count_filter_narrows_the_list() {
    let (app, _) = make_app();
    let token = sign_in(&app, "own@example.com");
    handle(post_form("/collections", &token, "name=Empty+One"), &app).unwrap();
    handle(post_form("/collections", &token, "name=Full+One"), &app).unwrap();
    handle(
        post_form("/collections/2/import", &token, "mode=text&data=a,b,c"),
        &app,
    )
    .unwrap();

    let body = body_string(handle(get_with_session("/leads?count_min=1", &token), &app).unwrap());
    assert!(body.contains("Full One"));
    assert!(!body.contains("Empty One"));

    let body = body_string(handle(get_with_session("/leads?count_max=0", &token), &app).unwrap());
    assert!(body.contains("Empty One"));
    assert!(!body.contains("Full One"));
}

#[test]
fn name_sort_is_case_insensitive() {
    let (app, _) = make_app();
    let token = sign_in(&app, "own@example.com");
    for name in ["banana", "Apple", "cherry"] {
        handle(
            post_form("/collections", &token, &format!("name={name}")),
            &app,
        )
        .unwrap();
    }

    let body = body_string(
        handle(get_with_session("/leads?sort=name&dir=asc", &token), &app).unwrap(),
    );
    let apple = body.find("Apple").unwrap();
    let banana = body.find("banana").unwrap();
    let cherry = body.find("cherry").unwrap();
    assert!(apple < banana);
    assert!(banana < cherry);
}

use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get_with_session, make_app, post_form, sign_in};

/// One collection with the given handles already imported. Returns the token.
fn seed_collection(app: &crate::router::App, handles: &str) -> String {
    let token = sign_in(app, "own@example.com");
    handle(post_form("/collections", &token, "name=Batch"), app).unwrap();
    if !handles.is_empty() {
        // Text mode splits on commas.
        handle(
            post_form(
                "/collections/1/import",
                &token,
                &format!("mode=text&data={}", handles.replace(' ', ",")),
            ),
            app,
        )
        .unwrap();
    }
    token
}

#[test]
fn import_reports_added_duplicates_and_invalid() {
    let (app, _) = make_app();
    let token = seed_collection(&app, "existing");

    let resp = handle(
        post_form(
            "/collections/1/import",
            &token,
            "mode=text&data=fresh,%40existing,bad%21name",
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Import results"));
    assert!(body.contains(" of 3 handles."));
    assert!(body.contains("1 duplicates skipped: @existing"));
    assert!(body.contains("1 invalid: @bad!name"));
    assert!(body.contains("@fresh"));

    // The parent list now carries the updated denormalized count.
    let body = body_string(handle(get_with_session("/leads", &token), &app).unwrap());
    assert!(body.contains("2 leads"));
}

#[test]
fn import_respects_the_chosen_mode() {
    let (app, _) = make_app();
    let token = seed_collection(&app, "");

    // URL mode keeps instagram profile links and drops the rest.
    let resp = handle(
        post_form(
            "/collections/1/import",
            &token,
            "mode=urls&data=https%3A%2F%2Finstagram.com%2Fyogini%0Ahttps%3A%2F%2Fexample.com%2Fnope",
        ),
        &app,
    )
    .unwrap();
    let body = body_string(resp);
    assert!(body.contains("@yogini"));

    let body = body_string(handle(get_with_session("/collections/1", &token), &app).unwrap());
    assert!(body.contains("@yogini"));
    assert!(!body.contains("nope"));
}

#[test]
fn unknown_import_mode_is_rejected() {
    let (app, _) = make_app();
    let token = seed_collection(&app, "");

    let resp = handle(
        post_form("/collections/1/import", &token, "mode=magic&data=alpha"),
        &app,
    );
    assert!(matches!(resp, Err(ServerError::BadRequest(_))));
}

#[test]
fn contact_toggle_marks_and_unmarks() {
    let (app, _) = make_app();
    let token = seed_collection(&app, "alpha");

    let resp = handle(post_form("/leads/1/contact", &token, ""), &app).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap(), "/collections/1");

    let body = body_string(
        handle(get_with_session("/collections/1?contacted=yes", &token), &app).unwrap(),
    );
    assert!(body.contains("@alpha"));
    let body = body_string(
        handle(get_with_session("/collections/1?contacted=no", &token), &app).unwrap(),
    );
    assert!(!body.contains("@alpha"));

    // Toggling again clears the mark.
    handle(post_form("/leads/1/contact", &token, ""), &app).unwrap();
    let body = body_string(
        handle(get_with_session("/collections/1?contacted=no", &token), &app).unwrap(),
    );
    assert!(body.contains("@alpha"));
}

#[test]
fn metrics_update_recomputes_quality() {
    let (app, _) = make_app();
    let token = seed_collection(&app, "alpha");

    // (150 + 10) / 2000 = 8% engagement, ratio 20: a high quality profile.
    let resp = handle(
        post_form(
            "/leads/1/metrics",
            &token,
            "full_name=Alpha+One&followers=2000&following=100&posts=50\
             &likes=150&comments=10&last_post=2026-08-20",
        ),
        &app,
    )
    .unwrap();
    assert_eq!(resp.status(), 303);

    let body = body_string(handle(get_with_session("/collections/1", &token), &app).unwrap());
    assert!(body.contains("Alpha One"));
    assert!(body.contains("8.0%"));
    assert!(body.contains("2.0K"));

    let body = body_string(
        handle(get_with_session("/collections/1?quality=high", &token), &app).unwrap(),
    );
    assert!(body.contains("@alpha"));
    let body = body_string(
        handle(get_with_session("/collections/1?quality=low", &token), &app).unwrap(),
    );
    assert!(!body.contains("@alpha"));
}

#[test]
fn garbage_metrics_are_rejected() {
    let (app, _) = make_app();
    let token = seed_collection(&app, "alpha");

    let resp = handle(
        post_form("/leads/1/metrics", &token, "followers=12k"),
        &app,
    );
    assert!(matches!(resp, Err(ServerError::BadRequest(_))));

    let resp = handle(
        post_form("/leads/1/metrics", &token, "last_post=20-08-2026"),
        &app,
    );
    assert!(matches!(resp, Err(ServerError::BadRequest(_))));
}

#[test]
fn notes_and_tags_round_trip() {
    let (app, _) = make_app();
    let token = seed_collection(&app, "alpha beta");

    handle(
        post_form("/leads/1/notes", &token, "notes=Reached+out+on+Monday"),
        &app,
    )
    .unwrap();
    handle(
        post_form("/leads/1/tags", &token, "tags=fitness,+travel,"),
        &app,
    )
    .unwrap();

    let body = body_string(handle(get_with_session("/collections/1", &token), &app).unwrap());
    assert!(body.contains("Reached out on Monday"));
    assert!(body.contains("fitness, travel"));

    // Search reaches into notes; the tag filter is a membership check.
    let body = body_string(
        handle(get_with_session("/collections/1?search=monday", &token), &app).unwrap(),
    );
    assert!(body.contains("@alpha"));
    assert!(!body.contains("@beta"));

    let body = body_string(
        handle(get_with_session("/collections/1?tag=travel", &token), &app).unwrap(),
    );
    assert!(body.contains("@alpha"));
    assert!(!body.contains("@beta"));
}

#[test]
fn deleting_a_lead_updates_the_parent_count() {
    let (app, _) = make_app();
    let token = seed_collection(&app, "alpha beta");

    let resp = handle(post_form("/leads/1/delete", &token, ""), &app).unwrap();
    assert_eq!(resp.status(), 303);

    let body = body_string(handle(get_with_session("/collections/1", &token), &app).unwrap());
    assert!(!body.contains("@alpha"));
    assert!(body.contains("@beta"));

    let body = body_string(handle(get_with_session("/leads", &token), &app).unwrap());
    assert!(body.contains("1 leads"));
}

#[test]
fn lead_actions_are_owner_scoped() {
    let (app, _) = make_app();
    let _owner = seed_collection(&app, "alpha");
    let intruder = sign_in(&app, "intruder@example.com");

    let resp = handle(post_form("/leads/1/contact", &intruder, ""), &app);
    assert!(matches!(resp, Err(ServerError::NotFound)));

    let resp = handle(
        post_form("/leads/1/notes", &intruder, "notes=mine+now"),
        &app,
    );
    assert!(matches!(resp, Err(ServerError::NotFound)));
}

#[test]
fn lead_table_paginates_and_sorts_by_handle() {
    let (app, _) = make_app();
    let handles = (1..=12)
        .map(|i| format!("h{i:02}"))
        .collect::<Vec<_>>()
        .join(" ");
    let token = seed_collection(&app, &handles);

    let body = body_string(
        handle(
            get_with_session("/collections/1?sort=handle&dir=asc", &token),
            &app,
        )
        .unwrap(),
    );
    assert!(body.contains("@h01"));
    assert!(body.contains("@h10"));
    assert!(!body.contains("@h11"));
    assert!(body.contains("Showing 1-10 of 12"));

    let body = body_string(
        handle(
            get_with_session("/collections/1?sort=handle&dir=asc&page=2", &token),
            &app,
        )
        .unwrap(),
    );
    assert!(body.contains("@h11"));
    assert!(body.contains("@h12"));
    assert!(!body.contains("@h01"));
    assert!(body.contains("Showing 11-12 of 12"));
}

#[test]
fn out_of_range_page_clamps_to_the_last() {
    let (app, _) = make_app();
    let token = seed_collection(&app, "alpha beta");

    let body = body_string(
        handle(get_with_session("/collections/1?page=99", &token), &app).unwrap(),
    );
    assert!(body.contains("Showing 1-2 of 2"));
}

#[test]
fn export_returns_a_spreadsheet() {
    let (app, _) = make_app();
    let token = seed_collection(&app, "alpha beta");

    let resp = handle(get_with_session("/collections/1/export", &token), &app).unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.contains("leads_batch.xlsx"));
}

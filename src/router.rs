// src/router.rs

use std::collections::HashMap;
use std::io::Read;

use astra::{Body, Request};
use chrono::{NaiveDate, NaiveTime};

use crate::auth::hub::{SessionEvent, SessionHub};
use crate::auth::otp::OtpService;
use crate::auth::sessions::{self, SessionUser, SESSION_TTL_SECS};
use crate::db;
use crate::db::connection::Database;
use crate::domain::collection::{validate_name, CollectionCriteria};
use crate::domain::filter::{CollectionFilter, DateRange, LeadFilter};
use crate::domain::import::{run_import, ImportMode, ImportReport};
use crate::domain::lead::QualityTier;
use crate::domain::paginate::{
    page_numbers, paginate, COLLECTIONS_MAX_VISIBLE, COLLECTIONS_PER_PAGE, LEADS_MAX_VISIBLE,
    LEADS_PER_PAGE,
};
use crate::domain::sort::{
    sort_collections, sort_leads, CollectionSort, CollectionSortKey, LeadSort, LeadSortKey, SortDir,
};
use crate::domain::stats::collection_stats;
use crate::errors::ServerError;
use crate::mailer::Mailer;
use crate::responses::{
    clear_session_cookie, html_response, redirect, redirect_with_cookie, session_cookie, ResultResp,
};
use crate::spreadsheets::export_leads_xlsx;
use crate::templates::pages::{
    campaigns_page, code_page, collection_detail_page, collections_page, help_page, home_page,
    login_page, CampaignsVm, CollectionDetailVm, CollectionsVm, HomeVm,
};

/// Everything a request handler needs. Built once in `main` and borrowed by
/// the serve closure for every request.
pub struct App {
    pub db: Database,
    pub hub: SessionHub,
    pub otp: OtpService,
    pub mailer: Box<dyn Mailer + Send + Sync>,
}

pub fn handle(req: Request, app: &App) -> ResultResp {
    let (parts, body) = req.into_parts();
    let method = parts.method.as_str();
    let path = parts.uri.path();
    let query = parse_params(parts.uri.query().unwrap_or(""));
    let now = now_unix();

    let token = parts
        .headers
        .get("Cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(session_token_from);
    let session = current_user(app, token.as_deref(), now)?;

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    // Public surface. Everything after this match requires a signed-in user.
    match (method, segments.as_slice()) {
        ("GET", ["login"]) => {
            return match session {
                Some(_) => redirect("/"),
                None => html_response(login_page(None)),
            }
        }
        ("POST", ["auth", "request-code"]) => return request_code(app, read_form(body)?, now),
        ("POST", ["auth", "verify-code"]) => return verify_code(app, read_form(body)?, now),
        ("POST", ["auth", "logout"]) => return logout(app, token.as_deref(), now),
        ("GET", ["help"]) => return html_response(help_page(session.is_some())),
        _ => {}
    }

    let Some(user) = session else {
        // Signed-out visitors get the login screen on real pages and a 404
        // elsewhere. Mutations without a session are a 401.
        return match (method, segments.as_slice()) {
            (
                "GET",
                [] | ["leads"] | ["campaigns"] | ["collections", _] | ["collections", _, "export"],
            ) => html_response(login_page(None)),
            ("POST", ["collections" | "leads" | "campaigns", ..]) => {
                Err(ServerError::Unauthorized("sign in required".into()))
            }
            _ => Err(ServerError::NotFound),
        };
    };

    match (method, segments.as_slice()) {
        ("GET", []) => home_screen(app, &user),
        ("GET", ["leads"]) => collections_screen(app, &user, &query, now),
        ("POST", ["collections"]) => create_collection(app, &user, read_form(body)?, now),
        ("GET", ["collections", id]) => {
            let filter = lead_filter_from(&query);
            let sort = lead_sort_from(&query);
            render_collection(
                app,
                &user,
                parse_id(id)?,
                filter,
                sort,
                page_param(&query),
                None,
                now,
            )
        }
        ("POST", ["collections", id, "edit"]) => {
            edit_collection(app, &user, parse_id(id)?, read_form(body)?, now)
        }
        ("POST", ["collections", id, "delete"]) => delete_collection(app, &user, parse_id(id)?),
        ("POST", ["collections", id, "clone"]) => clone_collection(app, &user, parse_id(id)?, now),
        ("POST", ["collections", id, "import"]) => {
            import_leads(app, &user, parse_id(id)?, read_form(body)?, now)
        }
        ("GET", ["collections", id, "export"]) => export_collection(app, &user, parse_id(id)?, now),
        ("POST", ["leads", id, action]) => {
            lead_action(app, &user, parse_id(id)?, action, read_form(body)?, now)
        }
        ("GET", ["campaigns"]) => campaigns_screen(app, &user),
        ("POST", ["campaigns"]) => create_campaign(app, &user, read_form(body)?, now),
        _ => Err(ServerError::NotFound),
    }
}

// ---------- auth ----------

fn request_code(app: &App, form: Params, now: i64) -> ResultResp {
    let email = match OtpService::normalize_email(field(&form, "email")) {
        Ok(email) => email,
        Err(ServerError::BadRequest(msg)) => return html_response(login_page(Some(&msg))),
        Err(e) => return Err(e),
    };

    match app.db.with_conn(|conn| app.otp.request_code(conn, &email, now)) {
        Ok(issued) => {
            if let Err(e) = app.mailer.send_login_code(&issued.email, &issued.code) {
                tracing::error!("sending login code to {} failed: {e}", issued.email);
                return Err(ServerError::InternalError);
            }
            html_response(code_page(&issued.email, None))
        }
        // Cooldown violations come back as BadRequest. Keep the user on the
        // code screen so they can retry once the window passes.
        Err(ServerError::BadRequest(msg)) => html_response(code_page(&email, Some(&msg))),
        Err(e) => Err(e),
    }
}

fn verify_code(app: &App, form: Params, now: i64) -> ResultResp {
    let email = match OtpService::normalize_email(field(&form, "email")) {
        Ok(email) => email,
        Err(ServerError::BadRequest(msg)) => return html_response(login_page(Some(&msg))),
        Err(e) => return Err(e),
    };
    let code = field(&form, "code").to_string();

    let outcome = app.db.with_conn(|conn| {
        let login = app.otp.verify_code(conn, &email, &code, now)?;
        let token = sessions::create_session(conn, login.user_id, now)?;
        Ok((login, token))
    });

    match outcome {
        Ok((login, token)) => {
            app.hub.remember(
                &token,
                SessionUser {
                    user_id: login.user_id,
                    email: login.email.clone(),
                    expires_at: now + SESSION_TTL_SECS,
                },
            );
            app.hub.publish(SessionEvent::SignedIn {
                user_id: login.user_id,
                email: login.email,
            });
            redirect_with_cookie("/", &session_cookie(&token, SESSION_TTL_SECS))
        }
        Err(ServerError::BadRequest(msg)) | Err(ServerError::Unauthorized(msg)) => {
            html_response(code_page(&email, Some(&msg)))
        }
        Err(e) => Err(e),
    }
}

fn logout(app: &App, token: Option<&str>, now: i64) -> ResultResp {
    if let Some(token) = token {
        let revoked = app
            .db
            .with_conn(|conn| sessions::revoke_session(conn, token, now))?;
        app.hub.forget(token);
        if let Some(user_id) = revoked {
            app.hub.forget_user(user_id);
            app.hub.publish(SessionEvent::SignedOut { user_id });
        }
    }
    redirect_with_cookie("/login", &clear_session_cookie())
}

/// Resolve the signed-in user, trying the hub cache before the database.
fn current_user(
    app: &App,
    token: Option<&str>,
    now: i64,
) -> Result<Option<SessionUser>, ServerError> {
    let Some(token) = token else {
        return Ok(None);
    };
    if let Some(user) = app.hub.get(token, now) {
        return Ok(Some(user));
    }
    let loaded = app
        .db
        .with_conn(|conn| sessions::load_user_from_session(conn, token, now))?;
    if let Some(user) = &loaded {
        app.hub.remember(token, user.clone());
    }
    Ok(loaded)
}

// ---------- screens ----------

fn home_screen(app: &App, user: &SessionUser) -> ResultResp {
    let (collections, campaign_count, contacted_count) = app.db.with_conn(|conn| {
        let collections = db::collections::list_collections(conn, user.user_id)?;
        let campaigns = db::campaigns::list_campaigns(conn, user.user_id)?;
        let contacted = db::collections::count_contacted_leads(conn, user.user_id)?;
        Ok((collections, campaigns.len(), contacted))
    })?;

    let vm = HomeVm {
        email: user.email.clone(),
        collection_count: collections.len(),
        lead_count: collections.iter().map(|c| c.lead_count).sum(),
        contacted_count,
        campaign_count,
        recent: collections.into_iter().take(3).collect(),
    };
    html_response(home_page(&vm))
}

fn collections_screen(app: &App, user: &SessionUser, query: &Params, now: i64) -> ResultResp {
    let filter = collection_filter_from(query);
    let sort = collection_sort_from(query);

    let (mut collections, contacted) = app.db.with_conn(|conn| {
        let collections = db::collections::list_collections(conn, user.user_id)?;
        let contacted = db::collections::count_contacted_leads(conn, user.user_id)?;
        Ok((collections, contacted))
    })?;
    filter.apply(&mut collections, now);
    sort_collections(&mut collections, sort);

    let total_collections = collections.len();
    let total_leads: i64 = collections.iter().map(|c| c.lead_count).sum();
    let page = paginate(total_collections, COLLECTIONS_PER_PAGE, page_param(query));
    let window = page_numbers(page.page, page.total_pages, COLLECTIONS_MAX_VISIBLE);
    let visible = collections[page.start..page.end].to_vec();

    html_response(collections_page(&CollectionsVm {
        collections: visible,
        total_collections,
        total_leads,
        contacted,
        page,
        window,
        sort,
        filter,
    }))
}

#[allow(clippy::too_many_arguments)]
fn render_collection(
    app: &App,
    user: &SessionUser,
    id: i64,
    filter: LeadFilter,
    sort: LeadSort,
    requested_page: usize,
    import_report: Option<ImportReport>,
    now: i64,
) -> ResultResp {
    let loaded = app.db.with_conn(|conn| {
        let Some(collection) = db::collections::get_collection(conn, id, user.user_id)? else {
            return Ok(None);
        };
        let leads = db::leads::list_leads(conn, collection.id)?;
        Ok(Some((collection, leads)))
    })?;
    let Some((collection, mut leads)) = loaded else {
        return Err(ServerError::NotFound);
    };

    // Stats describe the whole collection, not the filtered view.
    let stats = collection_stats(&leads, now);
    filter.apply(&mut leads, now);
    sort_leads(&mut leads, sort);

    let page = paginate(leads.len(), LEADS_PER_PAGE, requested_page);
    let window = page_numbers(page.page, page.total_pages, LEADS_MAX_VISIBLE);
    let visible = leads[page.start..page.end].to_vec();

    html_response(collection_detail_page(&CollectionDetailVm {
        collection,
        stats,
        leads: visible,
        page,
        window,
        sort,
        filter,
        import_report,
        now,
    }))
}

fn campaigns_screen(app: &App, user: &SessionUser) -> ResultResp {
    let (campaigns, collections) = app.db.with_conn(|conn| {
        let campaigns = db::campaigns::list_campaigns(conn, user.user_id)?;
        let collections = db::collections::list_collections(conn, user.user_id)?;
        Ok((campaigns, collections))
    })?;
    html_response(campaigns_page(&CampaignsVm {
        campaigns,
        collections,
    }))
}

// ---------- collection actions ----------

fn create_collection(app: &App, user: &SessionUser, form: Params, now: i64) -> ResultResp {
    let name = validate_name(field(&form, "name"))?;
    let description = field(&form, "description").trim().to_string();

    app.db.with_conn(|conn| {
        db::collections::create_collection(
            conn,
            user.user_id,
            &name,
            &description,
            &CollectionCriteria::default(),
            now,
        )
    })?;
    redirect("/leads")
}

fn edit_collection(app: &App, user: &SessionUser, id: i64, form: Params, now: i64) -> ResultResp {
    let name = validate_name(field(&form, "name"))?;
    let description = field(&form, "description").trim().to_string();

    let updated = app.db.with_conn(|conn| {
        db::collections::update_collection(conn, id, user.user_id, &name, &description, now)
    })?;
    if !updated {
        return Err(ServerError::NotFound);
    }
    redirect("/leads")
}

fn delete_collection(app: &App, user: &SessionUser, id: i64) -> ResultResp {
    let deleted = app
        .db
        .with_conn(|conn| db::collections::delete_collection(conn, id, user.user_id))?;
    if !deleted {
        return Err(ServerError::NotFound);
    }
    redirect("/leads")
}

fn clone_collection(app: &App, user: &SessionUser, id: i64, now: i64) -> ResultResp {
    let cloned = app
        .db
        .with_conn(|conn| db::collections::clone_collection(conn, id, user.user_id, now))?;
    if cloned.is_none() {
        return Err(ServerError::NotFound);
    }
    redirect("/leads")
}

fn import_leads(app: &App, user: &SessionUser, id: i64, form: Params, now: i64) -> ResultResp {
    let mode = ImportMode::parse(field(&form, "mode"))
        .ok_or_else(|| ServerError::BadRequest("unknown import mode".into()))?;
    let raw = field(&form, "data").to_string();

    let report = app.db.with_conn(|conn| {
        let Some(collection) = db::collections::get_collection(conn, id, user.user_id)? else {
            return Ok(None);
        };
        let existing = db::leads::existing_handles(conn, collection.id)?;
        let report = run_import(&raw, mode, &existing);
        if !report.successful.is_empty() {
            db::leads::insert_leads(conn, collection.id, &report.successful, now)?;
        }
        Ok(Some(report))
    })?;
    let Some(report) = report else {
        return Err(ServerError::NotFound);
    };

    // Land back on an unfiltered first page with the report banner on top.
    render_collection(
        app,
        user,
        id,
        LeadFilter::default(),
        LeadSort::default(),
        1,
        Some(report),
        now,
    )
}

fn export_collection(app: &App, user: &SessionUser, id: i64, now: i64) -> ResultResp {
    let loaded = app.db.with_conn(|conn| {
        let Some(collection) = db::collections::get_collection(conn, id, user.user_id)? else {
            return Ok(None);
        };
        let leads = db::leads::list_leads(conn, collection.id)?;
        Ok(Some((collection, leads)))
    })?;
    let Some((collection, leads)) = loaded else {
        return Err(ServerError::NotFound);
    };
    export_leads_xlsx(&leads, &collection.name, now)
}

// ---------- lead actions ----------

fn lead_action(
    app: &App,
    user: &SessionUser,
    id: i64,
    action: &str,
    form: Params,
    now: i64,
) -> ResultResp {
    // The join in get_lead doubles as the ownership check, and tells us
    // which collection to land back on.
    let Some(lead) = app
        .db
        .with_conn(|conn| db::leads::get_lead(conn, id, user.user_id))?
    else {
        return Err(ServerError::NotFound);
    };

    app.db.with_conn(|conn| match action {
        "contact" => db::leads::toggle_contacted(conn, id, now).map(|_| ()),
        "notes" => db::leads::set_notes(conn, id, field(&form, "notes").trim(), now).map(|_| ()),
        "tags" => db::leads::set_tags(conn, id, &split_tags(field(&form, "tags")), now).map(|_| ()),
        "delete" => db::leads::delete_lead(conn, id, now).map(|_| ()),
        "metrics" => {
            let full_name = field(&form, "full_name").trim().to_string();
            let full_name = if full_name.is_empty() {
                None
            } else {
                Some(full_name)
            };
            let last_post_at = parse_date(field(&form, "last_post"))?;
            db::leads::update_metrics(
                conn,
                id,
                full_name.as_deref(),
                form_i64(&form, "followers")?,
                form_i64(&form, "following")?,
                form_i64(&form, "posts")?,
                form_i64(&form, "likes")?,
                form_i64(&form, "comments")?,
                last_post_at,
                now,
            )
            .map(|_| ())
        }
        _ => Err(ServerError::NotFound),
    })?;

    redirect(&format!("/collections/{}", lead.collection_id))
}

// ---------- campaign actions ----------

fn create_campaign(app: &App, user: &SessionUser, form: Params, now: i64) -> ResultResp {
    let name = field(&form, "name").trim().to_string();
    if name.is_empty() {
        return Err(ServerError::BadRequest("campaign name is required".into()));
    }
    let collection_id = first_i64(&form, "collection_id")
        .ok_or_else(|| ServerError::BadRequest("pick a collection".into()))?;
    let budget_cents = parse_budget(field(&form, "budget"))?;

    let created = app.db.with_conn(|conn| {
        let Some(collection) = db::collections::get_collection(conn, collection_id, user.user_id)?
        else {
            return Ok(None);
        };
        let id = db::campaigns::create_campaign(
            conn,
            user.user_id,
            collection.id,
            &name,
            budget_cents,
            collection.lead_count,
            now,
        )?;
        Ok(Some(id))
    })?;
    if created.is_none() {
        return Err(ServerError::NotFound);
    }
    redirect("/campaigns")
}

/// Budgets arrive in dollars and are stored in cents.
fn parse_budget(raw: &str) -> Result<i64, ServerError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    let dollars: f64 = raw
        .parse()
        .map_err(|_| ServerError::BadRequest("invalid budget".into()))?;
    if dollars < 0.0 {
        return Err(ServerError::BadRequest("budget cannot be negative".into()));
    }
    Ok((dollars * 100.0).round() as i64)
}

// ---------- request parsing ----------

type Params = HashMap<String, Vec<String>>;

fn parse_params(input: &str) -> Params {
    let mut map: Params = HashMap::new();
    for (k, v) in url::form_urlencoded::parse(input.as_bytes()) {
        map.entry(k.into_owned()).or_default().push(v.into_owned());
    }
    map
}

/// Read and decode an `application/x-www-form-urlencoded` body.
fn read_form(mut body: Body) -> Result<Params, ServerError> {
    let mut raw = String::new();
    body.reader()
        .read_to_string(&mut raw)
        .map_err(|e| ServerError::BadRequest(format!("unreadable form body: {e}")))?;
    Ok(parse_params(&raw))
}

fn first<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.first()).map(String::as_str)
}

fn field<'a>(params: &'a Params, key: &str) -> &'a str {
    first(params, key).unwrap_or("")
}

fn first_i64(params: &Params, key: &str) -> Option<i64> {
    first(params, key)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

fn first_f64(params: &Params, key: &str) -> Option<f64> {
    first(params, key)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

fn page_param(params: &Params) -> usize {
    first(params, "page")
        .and_then(|s| s.parse().ok())
        .unwrap_or(1)
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse().map_err(|_| ServerError::NotFound)
}

/// Numeric form fields: blank means zero, anything unparsable is rejected.
fn form_i64(form: &Params, key: &str) -> Result<i64, ServerError> {
    let raw = field(form, key).trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid number for {key}")))
}

/// Date inputs post `YYYY-MM-DD`; blank clears the field.
fn parse_date(raw: &str) -> Result<Option<i64>, ServerError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ServerError::BadRequest(format!("invalid date: {raw}")))?;
    Ok(Some(date.and_time(NaiveTime::MIN).and_utc().timestamp()))
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn session_token_from(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix("session="))
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

fn collection_filter_from(q: &Params) -> CollectionFilter {
    CollectionFilter {
        lead_count_min: first_i64(q, "count_min"),
        lead_count_max: first_i64(q, "count_max"),
        date_range: first(q, "range")
            .and_then(DateRange::parse)
            .unwrap_or_default(),
    }
}

fn collection_sort_from(q: &Params) -> CollectionSort {
    let mut sort = CollectionSort::default();
    if let Some(key) = first(q, "sort").and_then(CollectionSortKey::parse) {
        sort.key = key;
    }
    if let Some(dir) = first(q, "dir").and_then(SortDir::parse) {
        sort.dir = dir;
    }
    sort
}

fn lead_sort_from(q: &Params) -> LeadSort {
    let mut sort = LeadSort::default();
    if let Some(key) = first(q, "sort").and_then(LeadSortKey::parse) {
        sort.key = key;
    }
    if let Some(dir) = first(q, "dir").and_then(SortDir::parse) {
        sort.dir = dir;
    }
    sort
}

fn lead_filter_from(q: &Params) -> LeadFilter {
    let quality: Vec<QualityTier> = q
        .get("quality")
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
        .filter_map(|s| QualityTier::parse(s))
        .collect();
    let tags: Vec<String> = q
        .get("tag")
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect();

    LeadFilter {
        search: first(q, "search")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from),
        min_followers: first_i64(q, "min_followers"),
        max_followers: first_i64(q, "max_followers"),
        min_engagement: first_f64(q, "min_engagement"),
        max_engagement: first_f64(q, "max_engagement"),
        quality: if quality.is_empty() {
            None
        } else {
            Some(quality)
        },
        tags: if tags.is_empty() { None } else { Some(tags) },
        contacted: match first(q, "contacted") {
            Some("yes") => Some(true),
            Some("no") => Some(false),
            _ => None,
        },
        last_activity_days: first_i64(q, "active_days").filter(|d| *d > 0),
    }
}

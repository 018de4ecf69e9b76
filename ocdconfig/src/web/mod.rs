//! HTTP surface for the settings pages.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `GET /` | admin menu visible to the caller |
//! | `GET /options-general.php?page=..&tab=..` | tabbed settings page |
//! | `POST /options.php` | save one component's settings |
//!
//! Callers identify themselves with `Authorization: Bearer <token>`; an
//! unknown or missing token is an anonymous user without capabilities.

use std::{collections::HashMap, sync::Arc};

use axum::{
    Form, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};

use crate::{
    admin::{AdminSettings, OPTIONS_ENDPOINT, SETTINGS_PAGE, SaveOutcome, form::SubmittedForm},
    capability::User,
    data::store::{OptionStore, StoreError},
    html::{esc_attr, esc_html},
    registrar::{AssembledSettings, SettingsSource},
};

/// Shared state of the settings server.
pub struct WebState {
    source: Box<dyn SettingsSource>,
    store: Arc<dyn OptionStore>,
    users: HashMap<String, User>,
    notices: Vec<String>,
}

impl WebState {
    /// `source` is asked for the settings config on every request.
    pub fn new(source: impl SettingsSource + 'static, store: Arc<dyn OptionStore>) -> Self {
        Self {
            source: Box::new(source),
            store,
            users: HashMap::new(),
            notices: Vec::new(),
        }
    }

    /// Accept `token` as a bearer credential for `user`.
    pub fn with_user(mut self, token: impl Into<String>, user: User) -> Self {
        self.users.insert(token.into(), user);
        self
    }

    /// Error notices shown at the top of every settings page.
    pub fn with_notices(mut self, notices: impl IntoIterator<Item = String>) -> Self {
        self.notices.extend(notices);
        self
    }

    fn user(&self, headers: &HeaderMap) -> User {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|token| self.users.get(token.trim()))
            .cloned()
            .unwrap_or_else(User::anonymous)
    }

    fn assemble(&self) -> Result<AssembledSettings, StoreError> {
        self.source.assemble(self.store.as_ref())
    }
}

/// Build the router serving the settings pages.
pub fn router(state: WebState) -> Router {
    Router::new()
        .route("/", get(admin_menu))
        .route(&format!("/{SETTINGS_PAGE}"), get(settings_page))
        .route(&format!("/{OPTIONS_ENDPOINT}"), post(options_update))
        .with_state(Arc::new(state))
}

/// Serve the settings pages on `listener` until the server stops.
pub async fn serve(listener: tokio::net::TcpListener, state: WebState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("settings pages listening on http://{addr}/");
    }
    axum::serve(listener, router(state)).await
}

fn store_failure(err: StoreError) -> Response {
    error!("option store failure: {err}");
    (StatusCode::INTERNAL_SERVER_ERROR, "option store failure").into_response()
}

async fn admin_menu(State(state): State<Arc<WebState>>, headers: HeaderMap) -> Response {
    let user = state.user(&headers);
    let settings = match state.assemble() {
        Ok(settings) => settings,
        Err(e) => return store_failure(e),
    };
    let page = AdminSettings::new(&settings.config, state.store.as_ref(), None);
    let mut html = String::from(r#"<ul id="adminmenu">"#);
    if let Some(entry) = page.admin_menu(&user) {
        html.push_str(&format!(
            r#"<li><a href="/{}" title="{}">{}</a></li>"#,
            esc_attr(&entry.href()),
            esc_attr(&entry.page_title),
            esc_html(&entry.menu_title)
        ));
    }
    html.push_str("</ul>");
    Html(html).into_response()
}

async fn settings_page(
    State(state): State<Arc<WebState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let settings = match state.assemble() {
        Ok(settings) => settings,
        Err(e) => return store_failure(e),
    };
    if params.get("page") != Some(&settings.config.page_slug) {
        return StatusCode::NOT_FOUND.into_response();
    }
    let user = state.user(&headers);
    let mut page = AdminSettings::new(
        &settings.config,
        state.store.as_ref(),
        params.get("tab").map(String::as_str),
    );
    for notice in state.notices.iter().chain(&settings.notices) {
        page.add_notice(notice.clone());
    }
    if params.get("settings-updated").is_some_and(|v| v == "true") {
        page.mark_updated();
    }
    match page.render_settings_page(&user) {
        Ok(Some(html)) => Html(html).into_response(),
        Ok(None) => {
            debug!("settings page hidden from '{}'", user.name);
            StatusCode::NOT_FOUND.into_response()
        }
        Err(e) => store_failure(e),
    }
}

async fn options_update(
    State(state): State<Arc<WebState>>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let settings = match state.assemble() {
        Ok(settings) => settings,
        Err(e) => return store_failure(e),
    };
    let user = state.user(&headers);
    if !user.can(&settings.config.capability) {
        info!("rejected settings update by '{}'", user.name);
        return StatusCode::NOT_FOUND.into_response();
    }

    let form = SubmittedForm::from_pairs(pairs);
    let Some(option_page) = form.option_page.clone().filter(|p| !p.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "missing option_page").into_response();
    };

    let mut page = AdminSettings::new(&settings.config, state.store.as_ref(), Some(&option_page));
    match page.save(&user, &option_page, &form.values(&option_page)) {
        Ok(SaveOutcome::Saved { slug, .. }) => Redirect::to(&format!(
            "/{SETTINGS_PAGE}?page={}&tab={}&settings-updated=true",
            urlencoding::encode(&settings.config.page_slug),
            urlencoding::encode(&slug)
        ))
        .into_response(),
        Ok(SaveOutcome::Forbidden) => StatusCode::NOT_FOUND.into_response(),
        Ok(SaveOutcome::UnknownPage) => {
            (StatusCode::BAD_REQUEST, "unknown option page").into_response()
        }
        Err(e) => store_failure(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{
            field::{FieldKind, FieldSchema},
            schema::{ComponentDescriptor, SectionSchema},
            store::MemoryStore,
        },
        registrar::SettingsBuilder,
    };
    use axum::{body::Body, http::Request};
    use serde_json::json;
    use tower::ServiceExt;

    fn setup() -> (Router, Arc<MemoryStore>) {
        let mut builder = SettingsBuilder::new("ocdutils").page_title("OCD Utils Settings");
        builder
            .register(
                ComponentDescriptor::new("example", "Example").section(
                    SectionSchema::new("global", "Global")
                        .field(
                            FieldSchema::new("color", "Color", FieldKind::Select)
                                .choice("teal", "Teal")
                                .choice("orchid", "Orchid")
                                .default_value("orchid"),
                        )
                        .field(
                            FieldSchema::new("colors", "Colors", FieldKind::Checkboxes)
                                .choice("red", "Red")
                                .choice("green", "Green")
                                .default_value(json!(["red"])),
                        )
                        .field(FieldSchema::new("count", "Count", FieldKind::Number)),
                ),
            )
            .register(
                ComponentDescriptor::new("carousel", "Carousel")
                    .section(SectionSchema::new("usage", "Usage").description("<p>Docs</p>")),
            );
        let store = Arc::new(MemoryStore::default());
        let state = WebState::new(builder.build(), store.clone())
            .with_user("secret", User::new("admin", ["manage_options"]))
            .with_user("weak", User::new("editor", ["edit_pages"]))
            .with_notices(["The component file for 'gone' is missing or not readable.".to_string()]);
        (router(state), store)
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_req(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_req(body: &str, token: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/options.php")
            .header("authorization", format!("Bearer {token}"))
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_menu_depends_on_capability() {
        let (app, _) = setup();
        let html = body_text(app.clone().oneshot(get_req("/", Some("secret"))).await.unwrap()).await;
        assert!(html.contains("options-general.php?page=ocdutils"));

        let html = body_text(app.oneshot(get_req("/", None)).await.unwrap()).await;
        assert_eq!(html, r#"<ul id="adminmenu"></ul>"#);
    }

    #[tokio::test]
    async fn test_settings_page() {
        let (app, _) = setup();
        let response = app
            .clone()
            .oneshot(get_req("/options-general.php?page=ocdutils", Some("secret")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"<option value="orchid" selected="selected">"#));
        assert!(html.contains("missing or not readable"));

        let html = body_text(
            app.clone()
                .oneshot(get_req(
                    "/options-general.php?page=ocdutils&tab=carousel",
                    Some("secret"),
                ))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("<p>Docs</p>"));
        assert!(!html.contains(r#"type="submit""#));

        let response = app
            .clone()
            .oneshot(get_req("/options-general.php?page=other", Some("secret")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(get_req("/options-general.php?page=ocdutils", Some("weak")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_submit_saves_and_redirects() {
        let (app, store) = setup();
        let body = "option_page=example&action=update&example%5Bcolor%5D=teal\
                    &example%5Bcolors%5D%5B%5D=red&example%5Bcolors%5D%5B%5D=nonexistent\
                    &example%5Bcount%5D=12&example%5Bbogus%5D=1";
        let response = app.clone().oneshot(post_req(body, "secret")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()["location"],
            "/options-general.php?page=ocdutils&tab=example&settings-updated=true"
        );
        let saved = store.load("example").unwrap().unwrap();
        assert_eq!(
            serde_json::Value::Object(saved),
            json!({"color": "teal", "colors": ["red"], "count": 12})
        );

        let html = body_text(
            app.oneshot(get_req(
                "/options-general.php?page=ocdutils&tab=example&settings-updated=true",
                Some("secret"),
            ))
            .await
            .unwrap(),
        )
        .await;
        assert!(html.contains("Settings saved."));
        assert!(html.contains(r#"<option value="teal" selected="selected">"#));
    }

    #[tokio::test]
    async fn test_submit_without_checkboxes_clears_group() {
        let (app, store) = setup();
        let html = body_text(
            app.clone()
                .oneshot(get_req("/options-general.php?page=ocdutils", Some("secret")))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains(r#"value="red" checked="checked""#));

        let response = app
            .clone()
            .oneshot(post_req("option_page=example&example%5Bcount%5D=5", "secret"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let saved = store.load("example").unwrap().unwrap();
        assert_eq!(saved["colors"], json!([]));

        let html = body_text(
            app.oneshot(get_req("/options-general.php?page=ocdutils", Some("secret")))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains(r#"value="red" />"#));
        assert!(!html.contains(r#"value="red" checked="checked""#));
    }

    #[tokio::test]
    async fn test_redirect_is_encoded() {
        let mut builder = SettingsBuilder::new("ocd utils");
        builder.register(ComponentDescriptor::new("a b&c", "Odd").section(
            SectionSchema::new("main", "Main").field(FieldSchema::new("x", "X", FieldKind::Text)),
        ));
        let state = WebState::new(builder.build(), Arc::new(MemoryStore::default()))
            .with_user("secret", User::new("admin", ["manage_options"]));
        let response = router(state)
            .oneshot(post_req("option_page=a+b%26c&a+b%26c%5Bx%5D=hi", "secret"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()["location"],
            "/options-general.php?page=ocd%20utils&tab=a%20b%26c&settings-updated=true"
        );
    }

    #[tokio::test]
    async fn test_submit_rejected_without_capability() {
        let (app, store) = setup();
        let response = app
            .clone()
            .oneshot(post_req("option_page=example&example%5Bcount%5D=3", "weak"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(store.load("example").unwrap(), None);

        let response = app
            .oneshot(post_req("option_page=nope&nope%5Bx%5D=1", "secret"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.load("nope").unwrap(), None);
    }
}

use form_autofill::browser::{
    driver::{ElementHandle, PageDriver},
    error::DriverError,
    mock::{MockElement, MockPage},
    session::{BrowserRequest, BrowserResponse, SessionOptions},
};
use serde_json::json;

// =========================================================================
// NDJSON protocol: requests
// =========================================================================

#[test]
fn every_request_serializes_with_its_command_name() {
    let h = ElementHandle::new("e3");
    let cases = vec![
        (
            BrowserRequest::navigate("https://f.example.com"),
            json!({"cmd": "navigate", "url": "https://f.example.com"}),
        ),
        (BrowserRequest::wait(3000), json!({"cmd": "wait", "ms": 3000})),
        (
            BrowserRequest::query("div[role='radio']", Some(&h)),
            json!({"cmd": "query", "selector": "div[role='radio']", "scope": "e3"}),
        ),
        (BrowserRequest::text(&h), json!({"cmd": "text", "handle": "e3"})),
        (
            BrowserRequest::attr(&h, "aria-label"),
            json!({"cmd": "attr", "handle": "e3", "name": "aria-label"}),
        ),
        (BrowserRequest::visible(&h), json!({"cmd": "visible", "handle": "e3"})),
        (BrowserRequest::click(&h), json!({"cmd": "click", "handle": "e3"})),
        (
            BrowserRequest::fill(&h, "2001-09-05"),
            json!({"cmd": "fill", "handle": "e3", "value": "2001-09-05"}),
        ),
        (BrowserRequest::press("Escape"), json!({"cmd": "press", "key": "Escape"})),
        (BrowserRequest::quit(), json!({"cmd": "quit"})),
    ];

    for (request, expected) in cases {
        assert_eq!(serde_json::to_value(&request).unwrap(), expected);
    }
}

#[test]
fn request_is_a_single_line() {
    let h = ElementHandle::new("e1");
    let line = serde_json::to_string(&BrowserRequest::fill(&h, "line one\nline two")).unwrap();
    assert!(!line.contains('\n'));
}

// =========================================================================
// NDJSON protocol: responses
// =========================================================================

#[test]
fn ready_signal_parses() {
    let r: BrowserResponse = serde_json::from_str(r#"{"ok":true,"ready":true}"#).unwrap();
    assert!(r.ok);
    assert_eq!(r.ready, Some(true));
}

#[test]
fn error_response_parses() {
    let r: BrowserResponse =
        serde_json::from_str(r#"{"ok":false,"error":"unknown handle e9"}"#).unwrap();
    assert!(!r.ok);
    assert_eq!(r.error.as_deref(), Some("unknown handle e9"));
}

#[test]
fn text_and_attr_responses_allow_null() {
    let r: BrowserResponse = serde_json::from_str(r#"{"ok":true,"text":null}"#).unwrap();
    assert_eq!(r.text, None);
    let r: BrowserResponse = serde_json::from_str(r#"{"ok":true,"value":"Female"}"#).unwrap();
    assert_eq!(r.value.as_deref(), Some("Female"));
}

#[test]
fn visibility_response_parses() {
    let r: BrowserResponse = serde_json::from_str(r#"{"ok":true,"visible":false}"#).unwrap();
    assert_eq!(r.visible, Some(false));
}

#[test]
fn unknown_response_fields_are_ignored() {
    let r: BrowserResponse =
        serde_json::from_str(r#"{"ok":true,"url":"https://f.example.com"}"#).unwrap();
    assert!(r.ok);
}

#[test]
fn session_defaults_restore_saved_login() {
    let options = SessionOptions::default();
    assert_eq!(options.node, "node");
    assert_eq!(options.script, "node/form_server.js");
    assert_eq!(options.storage_state.as_deref(), Some("auth.json"));
    assert!(!options.headless);
}

// =========================================================================
// MockPage as a PageDriver
// =========================================================================

#[test]
fn query_first_returns_first_match_in_document_order() {
    let mut page = MockPage::new();
    let block = page.add_block(
        "Gender",
        vec![MockElement::radio("Male"), MockElement::radio("Female")],
    );

    let first = page.query_first("[role='radio']", Some(&block)).unwrap().unwrap();
    assert_eq!(page.attribute(&first, "aria-label").unwrap().as_deref(), Some("Male"));
    assert_eq!(page.query_first("textarea", Some(&block)).unwrap(), None);
}

#[test]
fn fill_sets_element_value() {
    let mut page = MockPage::new();
    let block = page.add_block("About", vec![MockElement::textarea()]);
    let area = page.query_first("textarea", Some(&block)).unwrap().unwrap();

    page.fill(&area, "Hello").unwrap();
    assert_eq!(page.value_of(&area), Some("Hello"));
}

#[test]
fn stale_handle_is_element_not_found() {
    let mut page = MockPage::new();
    let err = page.text_content(&ElementHandle::new("m99")).unwrap_err();
    assert!(matches!(err, DriverError::ElementNotFound { .. }));
}

#[test]
fn unsupported_selector_is_rejected() {
    let mut page = MockPage::new();
    let err = page.query_all("[role]", None).unwrap_err();
    assert!(matches!(err, DriverError::InvalidSelector(_)));
}

#[test]
fn closed_page_fails_fast() {
    let mut page = MockPage::new();
    page.close().unwrap();
    assert!(matches!(page.wait_idle(10), Err(DriverError::SessionClosed)));
    assert_eq!(page.waited_ms(), 0);
}

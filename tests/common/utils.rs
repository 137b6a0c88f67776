use form_autofill::browser::session::SessionOptions;

pub fn page(name: &str) -> String {
    let base = std::env::current_dir().unwrap();
    let path = base.join("tests").join("fixtures").join(name);

    format!("file://{}", path.display())
}

/// Headless session with a fresh profile.
pub fn headless_options() -> SessionOptions {
    SessionOptions {
        headless: true,
        storage_state: None,
        ..SessionOptions::default()
    }
}

//! Location helpers: query flags and page reload

use web_sys::window;

/// Value of `key` in a `?a=1&b=2` query string. A bare `key` yields `""`.
pub fn find_query_param(search: &str, key: &str) -> Option<String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (name == key).then(|| {
                urlencoding::decode(value)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| value.to_string())
            })
        })
}

/// Query parameter of the current page
pub fn get_query_param(key: &str) -> Option<String> {
    let search = window()?.location().search().ok()?;
    find_query_param(&search, key)
}

/// Whether `?key`, `?key=1` or `?key=true` is present.
pub fn query_flag(key: &str) -> bool {
    matches!(get_query_param(key).as_deref(), Some("" | "1" | "true"))
}

/// Reload the page, used when the injected wallet switches chain under us.
pub fn reload_page() {
    let Some(window) = window() else {
        return;
    };
    if let Err(e) = window.location().reload() {
        log::error!("Page reload failed: {:?}", e);
    }
}

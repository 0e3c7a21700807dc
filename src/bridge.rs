use js_sys::{Array, Function, Object, Reflect, JSON};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use yew::Callback;

/// Host capability, resolved once at startup. A global `HylidBridge` object
/// is the only signal that the app is embedded in Super Qi; without it every
/// call is a no-op and the app behaves as a plain browser page.
pub struct Bridge {
    host: Option<Object>,
}

impl Bridge {
    pub fn detect() -> Self {
        let host = web_sys::window()
            .map(JsValue::from)
            .and_then(|window| Reflect::get(&window, &JsValue::from_str("HylidBridge")).ok())
            .filter(|value| !value.is_undefined() && !value.is_null())
            .and_then(|value| value.dyn_into::<Object>().ok());
        Self { host }
    }

    pub fn is_host_present(&self) -> bool {
        self.host.is_some()
    }

    pub fn signal_ready(&self) {
        self.call_host("ready");
    }

    pub fn request_close(&self) {
        self.call_host("close");
    }

    /// Asks the host for its auth token. Absent host, absent method, a throw,
    /// or a non-string/empty result all come back as `None`.
    pub fn auth_token(&self) -> Option<String> {
        let host = self.host.as_ref()?;
        let method = Reflect::get(host, &JsValue::from_str("getAuthToken")).ok()?;
        let method = method.dyn_ref::<Function>()?;
        let token = method.call0(host).ok()?;
        token.as_string().filter(|t| !t.is_empty())
    }

    fn call_host(&self, name: &str) {
        if let Some(host) = &self.host {
            if let Ok(method) = Reflect::get(host, &JsValue::from_str(name)) {
                if let Some(method) = method.dyn_ref::<Function>() {
                    let _ = method.call0(host);
                }
            }
        }
    }
}

/// The user-initiated login path: `window.my.getAuthCode` with success/fail
/// callbacks. Returns false when the platform API is missing so the caller
/// can surface that without waiting. On success the first of `authCode`,
/// `auth_code` or `token` is forwarded, empty if none of them is present.
pub fn request_auth_code(on_done: Callback<Result<String, String>>) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let window = JsValue::from(window);
    let Ok(my) = Reflect::get(&window, &JsValue::from_str("my")) else {
        return false;
    };
    if my.is_undefined() || my.is_null() {
        return false;
    }
    let Ok(get_auth_code) = Reflect::get(&my, &JsValue::from_str("getAuthCode")) else {
        return false;
    };
    let Ok(get_auth_code) = get_auth_code.dyn_into::<Function>() else {
        return false;
    };

    let options = Object::new();
    let scopes = Array::new();
    scopes.push(&JsValue::from_str("auth_base"));
    let _ = Reflect::set(&options, &JsValue::from_str("scopes"), &scopes);

    let success = {
        let on_done = on_done.clone();
        Closure::once_into_js(move |res: JsValue| {
            let token = ["authCode", "auth_code", "token"]
                .iter()
                .find_map(|key| {
                    Reflect::get(&res, &JsValue::from_str(key))
                        .ok()
                        .and_then(|v| v.as_string())
                        .filter(|t| !t.is_empty())
                })
                .unwrap_or_default();
            on_done.emit(Ok(token));
        })
    };
    let _ = Reflect::set(&options, &JsValue::from_str("success"), &success);

    let fail = Closure::once_into_js(move |res: JsValue| {
        let detail = Reflect::get(&res, &JsValue::from_str("authErrorScopes"))
            .ok()
            .filter(|v| !v.is_undefined() && !v.is_null())
            .unwrap_or(res);
        let message = JSON::stringify(&detail)
            .ok()
            .and_then(|s| s.as_string())
            .unwrap_or_else(|| "login failed".to_string());
        on_done.emit(Err(message));
    });
    let _ = Reflect::set(&options, &JsValue::from_str("fail"), &fail);

    let _ = get_auth_code.call1(&my, &options);
    true
}

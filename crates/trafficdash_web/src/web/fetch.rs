use trafficdash::PollError;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, DomException, RequestInit, Response};

/// `GET url` and return the body text. Aborting `signal` yields `PollError::Cancelled`.
pub(super) async fn fetch_status(url: &str, signal: &AbortSignal) -> Result<String, PollError> {
    let window = web_sys::window().ok_or_else(|| PollError::Transport("no window".to_string()))?;

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_signal(Some(signal));

    let resp = JsFuture::from(window.fetch_with_str_and_init(url, &init))
        .await
        .map_err(js_error)?
        .dyn_into::<Response>()
        .map_err(|_| PollError::Transport("fetch did not return a Response".to_string()))?;

    if !resp.ok() {
        return Err(PollError::Http {
            status: resp.status(),
        });
    }

    let text = JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    text.as_string()
        .ok_or_else(|| PollError::Transport("response body is not text".to_string()))
}

fn js_error(err: JsValue) -> PollError {
    if let Some(ex) = err.dyn_ref::<DomException>() {
        if ex.name() == "AbortError" {
            return PollError::Cancelled;
        }
        return PollError::Transport(ex.message());
    }
    PollError::Transport(err.as_string().unwrap_or_else(|| "fetch failed".to_string()))
}

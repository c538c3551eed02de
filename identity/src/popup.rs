//! Browser popup plumbing for the federated sign-in flow (wasm only).
//!
//! Opens the provider-hosted page in a popup and waits for it to post the
//! resulting ID token back to the opener via `postMessage`. The wait ends
//! with [`AuthError::PopupClosed`] if the user dismisses the popup first.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures::channel::oneshot;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::error::AuthError;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub(crate) async fn open_and_wait(url: &str) -> Result<String, AuthError> {
    let window =
        web_sys::window().ok_or_else(|| AuthError::Provider("no browser window".to_string()))?;
    let popup = window
        .open_with_url_and_target(url, "_blank")
        .map_err(|_| AuthError::Provider("popup was blocked".to_string()))?
        .ok_or(AuthError::PopupClosed)?;

    let (tx, mut rx) = oneshot::channel::<String>();
    let tx = Rc::new(RefCell::new(Some(tx)));
    let listener = {
        let tx = Rc::clone(&tx);
        Closure::<dyn FnMut(web_sys::MessageEvent)>::new(move |event: web_sys::MessageEvent| {
            if let Some(token) = event.data().as_string() {
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(token);
                }
            }
        })
    };
    window
        .add_event_listener_with_callback("message", listener.as_ref().unchecked_ref())
        .map_err(|_| AuthError::Provider("failed to listen for the popup result".to_string()))?;

    let result = loop {
        match rx.try_recv() {
            Ok(Some(token)) => break Ok(token),
            Ok(None) => {}
            Err(_) => break Err(AuthError::PopupClosed),
        }
        if popup.closed().unwrap_or(true) {
            break Err(AuthError::PopupClosed);
        }
        gloo_timers::future::sleep(POLL_INTERVAL).await;
    };

    let _ =
        window.remove_event_listener_with_callback("message", listener.as_ref().unchecked_ref());
    result
}

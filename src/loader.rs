use scrollscape_core::{parse_obj, AssetError, Experience, LoadOutcome, MeshData};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

async fn fetch_text(path: &str) -> Result<String, AssetError> {
    let fetch_err = |reason: String| AssetError::Fetch {
        path: path.to_string(),
        reason,
    };
    let window = web::window().ok_or_else(|| fetch_err("no window".into()))?;
    let resp = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|e| fetch_err(format!("{:?}", e)))?;
    let resp: web::Response = resp
        .dyn_into()
        .map_err(|_| fetch_err("not a Response".into()))?;
    if !resp.ok() {
        return Err(fetch_err(format!("HTTP {}", resp.status())));
    }
    let text = resp.text().map_err(|e| fetch_err(format!("{:?}", e)))?;
    JsFuture::from(text)
        .await
        .map_err(|e| fetch_err(format!("{:?}", e)))?
        .as_string()
        .ok_or_else(|| fetch_err("body is not text".into()))
}

async fn load_mesh(path: &str) -> Result<MeshData, AssetError> {
    let text = fetch_text(path).await?;
    parse_obj(&text)
}

/// Fetch a mesh for `scene` in the background and hand it to the experience
/// once it arrives. The completion is ignored if the scene was torn down in
/// the meantime.
pub fn spawn_mesh_load(experience: Rc<RefCell<Experience>>, scene: &str, path: &str) {
    let Some(ticket) = experience.borrow().request_mesh(scene, path) else {
        log::warn!("[assets] no scene named {scene}; skipping {path}");
        return;
    };
    spawn_local(async move {
        let result = load_mesh(&ticket.path).await;
        let outcome = experience.borrow_mut().complete_load(&ticket, result);
        match outcome {
            LoadOutcome::Installed => log::info!("[assets] installed {}", ticket.path),
            LoadOutcome::FallbackInstalled => {
                log::warn!("[assets] {} unavailable; procedural fallback in place", ticket.path)
            }
            LoadOutcome::Stale => log::info!("[assets] {} arrived after its scene was disposed", ticket.path),
        }
    });
}

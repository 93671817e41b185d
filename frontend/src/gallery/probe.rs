use std::cell::RefCell;
use std::collections::HashSet;
use std::future::Future;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::lock::Mutex;
use once_cell::sync::Lazy;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use web_sys::HtmlImageElement;

use crate::gallery::properties::{Phase, Property};

const MAX_INDEX: u32 = 20;
const EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "JPG", "JPEG", "PNG"];

/// Base names tried for a phase, without extension.
fn base_names(phase: Phase) -> Vec<String> {
    let phase_word = match phase {
        Phase::Original => "before",
        Phase::Remodel => "after",
    };
    let stems = ["", "image", "img", "photo", phase_word];
    stems
        .iter()
        .flat_map(|stem| (1..=MAX_INDEX).map(move |i| format!("{stem}{i}")))
        .collect()
}

/// Every filename guess for a phase: each base name with each extension.
pub fn candidates(phase: Phase) -> Vec<String> {
    base_names(phase)
        .iter()
        .flat_map(|base| EXTENSIONS.iter().map(move |ext| format!("{base}.{ext}")))
        .collect()
}

/// Loads `src` into a detached image and reports whether it decoded.
pub async fn image_exists(src: &str) -> bool {
    let Ok(img) = HtmlImageElement::new() else {
        return false;
    };
    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let settle = |found: bool| {
        let tx = tx.clone();
        Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(found);
            }
        })
    };
    let on_load = settle(true);
    let on_error = settle(false);
    img.set_onload(Some(on_load.as_ref().unchecked_ref()));
    img.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    img.set_src(src);

    let found = rx.await.unwrap_or(false);
    img.set_onload(None);
    img.set_onerror(None);
    found
}

/// One listing tab probes at a time across the whole page.
static PROBE_QUEUE: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Finds images for a listing that has no filenames in the manifest.
pub async fn discover(property: &Property, phase: Phase) -> Vec<String> {
    discover_with(property, phase, |src| async move { image_exists(&src).await }).await
}

/// Candidates are tried one after another, each awaited before the next; a
/// failed load just means the file isn't there. Once a base name is found its
/// other extensions are skipped.
pub async fn discover_with<F, Fut>(property: &Property, phase: Phase, mut exists: F) -> Vec<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = bool>,
{
    let _turn = PROBE_QUEUE.lock().await;

    let mut found = Vec::new();
    let mut found_bases = HashSet::new();
    for file in candidates(phase) {
        let base = file.rsplit_once('.').map_or(file.as_str(), |(base, _)| base);
        if found_bases.contains(base) {
            continue;
        }
        let path = property.image_path(phase, &file);
        if exists(path.clone()).await {
            found_bases.insert(base.to_string());
            found.push(path);
        }
    }
    log::info!(
        "Probed {} {}: {} images",
        property.name,
        phase.default_folder(),
        found.len()
    );
    found
}

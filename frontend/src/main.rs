mod animations;
mod config;
mod contact;
mod error;
mod gallery;
mod nav;
mod utils;

use crate::error::Result;
use crate::utils::dom::{document, listen};

type Setup = fn() -> Result<()>;

const SETUP: [(&str, Setup); 8] = [
    ("property gallery", gallery::mount),
    ("mobile nav", nav::toggle::attach),
    ("smooth scroll", nav::smooth_scroll::attach),
    ("navbar style", nav::navbar::attach),
    ("active section", nav::active_section::attach),
    ("contact form", contact::form::attach),
    ("entrance animations", animations::reveal::attach),
    ("stat counters", animations::counter::attach),
];

/// Wires every handler once. A failing piece is logged and the rest still run.
fn start() {
    for (name, setup) in SETUP {
        match setup() {
            Ok(()) => log::debug!("{} ready", name),
            Err(e) => log::error!("{} setup failed: {}", name, e),
        }
    }
}

fn main() {
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    wasm_logger::init(wasm_logger::Config::new(level));

    let document = match document() {
        Ok(document) => document,
        Err(e) => {
            log::error!("Site script can't run: {}", e);
            return;
        }
    };

    if document.ready_state() == "loading" {
        let mut started = false;
        let wired = listen(&document, "DOMContentLoaded", move |_| {
            if !started {
                started = true;
                start();
            }
        });
        if let Err(e) = wired {
            log::error!("Could not wait for DOMContentLoaded: {}", e);
        }
    } else {
        start();
    }
}

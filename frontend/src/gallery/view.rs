use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::KeyboardEvent;
use yew::prelude::*;

use crate::gallery::modal::ImageModal;
use crate::gallery::probe;
use crate::gallery::properties::{Phase, Property};

/// Tab selection per card plus the image open in the modal, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryState {
    tabs: Vec<Phase>,
    modal: Option<String>,
}

impl GalleryState {
    pub fn new(cards: usize) -> Self {
        Self {
            tabs: vec![Phase::Original; cards],
            modal: None,
        }
    }

    pub fn active_tab(&self, card: usize) -> Phase {
        self.tabs.get(card).copied().unwrap_or(Phase::Original)
    }

    pub fn select_tab(&self, card: usize, phase: Phase) -> Self {
        let mut next = self.clone();
        if let Some(tab) = next.tabs.get_mut(card) {
            *tab = phase;
        }
        next
    }

    pub fn open_modal(&self, src: String) -> Self {
        Self {
            modal: Some(src),
            ..self.clone()
        }
    }

    pub fn close_modal(&self) -> Self {
        Self {
            modal: None,
            ..self.clone()
        }
    }

    pub fn modal(&self) -> Option<&str> {
        self.modal.as_deref()
    }
}

#[derive(Properties, PartialEq)]
pub struct PropertyGalleryProps {
    pub properties: Vec<Property>,
}

#[function_component(PropertyGallery)]
pub fn property_gallery(props: &PropertyGalleryProps) -> Html {
    let state = use_state(|| GalleryState::new(props.properties.len()));

    let open_modal = {
        let state = state.clone();
        Callback::from(move |src: String| state.set(state.open_modal(src)))
    };
    let close_modal = {
        let state = state.clone();
        Callback::from(move |_: ()| state.set(state.close_modal()))
    };

    // Escape closes the preview while it is open.
    {
        let close_modal = close_modal.clone();
        use_effect_with_deps(
            move |open: &bool| {
                let destructor: Box<dyn FnOnce()> = match web_sys::window()
                    .and_then(|w| w.document())
                    .filter(|_| *open)
                {
                    Some(document) => {
                        let callback = Closure::<dyn Fn(KeyboardEvent)>::new(move |e: KeyboardEvent| {
                            if e.key() == "Escape" {
                                close_modal.emit(());
                            }
                        });
                        if let Err(e) = document.add_event_listener_with_callback(
                            "keydown",
                            callback.as_ref().unchecked_ref(),
                        ) {
                            log::warn!("Failed to listen for Escape: {:?}", e);
                        }
                        Box::new(move || {
                            let _ = document.remove_event_listener_with_callback(
                                "keydown",
                                callback.as_ref().unchecked_ref(),
                            );
                        })
                    }
                    None => Box::new(|| ()),
                };
                move || destructor()
            },
            state.modal().is_some(),
        );
    }

    html! {
        <div class="property-gallery">
            {
                for props.properties.iter().enumerate().map(|(index, property)| {
                    let on_select = {
                        let state = state.clone();
                        Callback::from(move |phase: Phase| state.set(state.select_tab(index, phase)))
                    };
                    html! {
                        <PropertyCard
                            property={property.clone()}
                            active={state.active_tab(index)}
                            on_select={on_select}
                            open_modal={open_modal.clone()}
                        />
                    }
                })
            }
            <ImageModal
                selected_image={state.modal().map(str::to_string)}
                on_close={close_modal}
            />
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PropertyCardProps {
    pub property: Property,
    pub active: Phase,
    pub on_select: Callback<Phase>,
    pub open_modal: Callback<String>,
}

#[function_component(PropertyCard)]
pub fn property_card(props: &PropertyCardProps) -> Html {
    let property = &props.property;
    let original = use_state(|| property.image_paths(Phase::Original));
    let remodel = use_state(|| property.image_paths(Phase::Remodel));

    // Only tabs without filenames in the manifest get probed, one after the
    // other in a single task.
    {
        let property = property.clone();
        let original = original.clone();
        let remodel = remodel.clone();
        use_effect_with_deps(
            move |_| {
                let pending = property.probe_phases();
                if !pending.is_empty() {
                    spawn_local(async move {
                        for phase in pending {
                            let found = probe::discover(&property, phase).await;
                            match phase {
                                Phase::Original => original.set(found),
                                Phase::Remodel => remodel.set(found),
                            }
                        }
                    });
                }
                || ()
            },
            props.property.folder.clone(),
        );
    }

    let images = match props.active {
        Phase::Original => (*original).clone(),
        Phase::Remodel => (*remodel).clone(),
    };

    html! {
        <div class="property-card">
            <div class="property-header">
                <h3>{&property.name}</h3>
                <p class="property-address">{&property.address}</p>
            </div>
            {
                if property.improvements.is_empty() {
                    html! {}
                } else {
                    html! {
                        <ul class="property-improvements">
                            { for property.improvements.iter().map(|item| html! { <li>{item}</li> }) }
                        </ul>
                    }
                }
            }
            <div class="gallery-tabs">
                {
                    for Phase::ALL.iter().map(|&phase| {
                        let on_select = props.on_select.clone();
                        html! {
                            <button
                                class={classes!("tab-btn", (phase == props.active).then_some("active"))}
                                onclick={Callback::from(move |_: MouseEvent| on_select.emit(phase))}
                            >
                                {phase.label()}
                            </button>
                        }
                    })
                }
            </div>
            <div class="gallery-panel">
                {
                    if images.is_empty() {
                        html! { <p class="gallery-empty">{"Photos coming soon"}</p> }
                    } else {
                        html! {
                            <div class="gallery-grid">
                                {
                                    for images.into_iter().map(|src| {
                                        let open_modal = props.open_modal.clone();
                                        let alt = format!("{} ({})", property.name, props.active.label());
                                        html! {
                                            <img
                                                class="gallery-image"
                                                src={src.clone()}
                                                alt={alt}
                                                loading="lazy"
                                                onclick={Callback::from(move |_: MouseEvent| open_modal.emit(src.clone()))}
                                            />
                                        }
                                    })
                                }
                            </div>
                        }
                    }
                }
            </div>
        </div>
    }
}

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub selected_image: Option<String>,
    pub on_close: Callback<()>,
}

/// Full-screen preview of a single gallery image.
#[function_component(ImageModal)]
pub fn image_modal(props: &ModalProps) -> Html {
    let Some(src) = props.selected_image.clone() else {
        return html! {};
    };
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    html! {
        <div class="modal-overlay" onclick={on_close.clone()}>
            <div class="modal-content" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
                <img src={src} alt="Large preview" />
                <button class="modal-close" onclick={on_close}>{"×"}</button>
            </div>
        </div>
    }
}

//! File dropzone with drag & drop and keyboard support.
//!
//! Hands every chosen or dropped file set to `on_files` in one call.

use leptos::*;
use web_sys::{DragEvent, Event, File, FileList, HtmlInputElement, KeyboardEvent};

const IDLE_TEXT: &str = "Drag & Drop files here, or click to select";
const BUSY_TEXT: &str = "Uploading...";

/// Prompt shown inside the zone.
pub fn dropzone_text(busy: bool) -> &'static str {
    if busy {
        BUSY_TEXT
    } else {
        IDLE_TEXT
    }
}

fn files_of(list: Option<FileList>) -> Vec<File> {
    list.map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
        .unwrap_or_default()
}

#[component]
pub fn UploadDropzone(
    #[prop(into)] on_files: Callback<Vec<File>>,
    #[prop(into)] busy: Signal<bool>,
) -> impl IntoView {
    let (hover, set_hover) = create_signal(false);
    let input_ref = create_node_ref::<html::Input>();

    let open_picker = move || {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let on_keydown = move |ev: KeyboardEvent| {
        if ev.key() == "Enter" {
            open_picker();
        }
    };

    let on_drag_over = move |ev: DragEvent| {
        ev.prevent_default();
        set_hover.set(true);
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_hover.set(false);

        let files = files_of(ev.data_transfer().and_then(|dt| dt.files()));
        if !files.is_empty() {
            on_files.call(files);
        }
    };

    let on_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let files = files_of(input.files());
        // Allow picking the same file again
        input.set_value("");
        if !files.is_empty() {
            on_files.call(files);
        }
    };

    view! {
        <div
            class="dropzone"
            class:hover=move || hover.get()
            role="button"
            tabindex="0"
            aria-label="Upload files"
            on:click=move |_| open_picker()
            on:keydown=on_keydown
            on:dragover=on_drag_over
            on:dragleave=move |_| set_hover.set(false)
            on:drop=on_drop
        >
            <input
                node_ref=input_ref
                type="file"
                multiple
                style="display:none"
                on:click=|ev| ev.stop_propagation()
                on:change=on_change
            />
            <div class="dropzone-text">
                {move || dropzone_text(busy.get())}
            </div>
        </div>
    }
}

use leptos::*;

#[component]
pub fn ProgressItem(
    #[prop(into)] file_name: String,
    #[prop(into)] progress: Signal<u8>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let cancel_label = format!("Cancel upload for {}", file_name);

    view! {
        <div class="card progress-item" aria-live="polite">
            <div class="progress-header">
                <strong>{file_name}</strong>
                <button on:click=move |_| on_cancel.call(()) aria-label=cancel_label>
                    "Cancel"
                </button>
            </div>
            <div class="progress">
                <div class="progress-fill" style=move || format!("width: {}%;", progress.get())></div>
            </div>
        </div>
    }
}

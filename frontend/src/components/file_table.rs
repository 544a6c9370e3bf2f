//! Table of uploaded files with download links.

use leptos::*;

use crate::services::download_url;
use crate::types::{format_size_kb, format_uploaded_at, FileRecord};

#[component]
pub fn FileTable(#[prop(into)] files: Signal<Vec<FileRecord>>) -> impl IntoView {
    view! {
        <Show
            when=move || files.with(|f| !f.is_empty())
            fallback=|| view! { <div class="card" aria-live="polite">"No files yet."</div> }
        >
            <div class="card">
                <table class="table" aria-label="Uploaded files">
                    <thead>
                        <tr>
                            <th>"Name"</th>
                            <th>"Size"</th>
                            <th>"Type"</th>
                            <th>"Uploaded"</th>
                            <th>"Download"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || files.get()
                            key=|file| file.row_key()
                            children=move |file| view! { <FileRow file=file/> }
                        />
                    </tbody>
                </table>
            </div>
        </Show>
    }
}

#[component]
fn FileRow(file: FileRecord) -> impl IntoView {
    let href = download_url(&file.name);
    let label = format!("Download {}", file.name);

    view! {
        <tr>
            <td>{file.name}</td>
            <td>{format_size_kb(file.size)}</td>
            <td>{file.content_type}</td>
            <td>{format_uploaded_at(file.uploaded_at)}</td>
            <td>
                <a href=href download="" aria-label=label>"Download"</a>
            </td>
        </tr>
    }
}

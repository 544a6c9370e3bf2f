//! The upload page: dropzone, one progress row per running upload, and the
//! file list.

use leptos::*;
use web_sys::{AbortController, File};

use super::{FileTable, ProgressItem, UploadDropzone};
use crate::services::{list_files, upload_file};
use crate::types::{AppError, AppResult, FileRecord, UploadResponse};
use crate::uploads::{upload_all, InFlightList, UploadHost};

/// Runs uploads against the page's signals and the browser.
#[derive(Clone, Copy)]
struct BrowserHost {
    in_flight: RwSignal<InFlightList<AbortController>>,
    files: Resource<(), Vec<FileRecord>>,
}

impl UploadHost for BrowserHost {
    type File = File;
    type Handle = AbortController;

    fn file_name(&self, file: &File) -> String {
        file.name()
    }

    fn new_handle(&self) -> AppResult<AbortController> {
        AbortController::new().map_err(|e| AppError::Browser(format!("AbortController: {:?}", e)))
    }

    fn update_in_flight(&self, f: impl FnOnce(&mut InFlightList<AbortController>)) {
        self.in_flight.update(f);
    }

    async fn upload(
        &self,
        file: &File,
        handle: &AbortController,
        on_progress: &dyn Fn(u8),
    ) -> AppResult<UploadResponse> {
        let signal = handle.signal();
        upload_file(file, on_progress, Some(&signal)).await
    }

    fn invalidate_list(&self) {
        self.files.refetch();
    }

    fn report_failure(&self, name: &str, _err: &AppError) {
        if let Err(e) = gloo_utils::window().alert_with_message(&format!("Upload failed: {}", name)) {
            log::warn!("Could not show alert: {:?}", e);
        }
    }
}

async fn load_files() -> Vec<FileRecord> {
    match list_files(None).await {
        Ok(listed) => listed.files,
        Err(e) => {
            log::error!("❌ Could not load files: {}", e);
            Vec::new()
        }
    }
}

#[component]
pub fn UploadPage() -> impl IntoView {
    let in_flight = create_rw_signal(InFlightList::<AbortController>::new());
    let files = create_local_resource(|| (), |_| load_files());
    let host = BrowserHost { in_flight, files };

    let on_files = Callback::new(move |selected: Vec<File>| {
        spawn_local(async move {
            let summary = upload_all(&host, selected).await;
            log::info!(
                "📊 {} uploaded, {} failed, {} cancelled",
                summary.uploaded,
                summary.failed,
                summary.cancelled
            );
        });
    });

    let busy = Signal::derive(move || in_flight.with(|list| list.is_busy()));
    let listed = Signal::derive(move || files.get().unwrap_or_default());

    let progress_row = move |(name, _): (String, u8)| {
        let progress = Signal::derive({
            let name = name.clone();
            move || {
                in_flight.with(|list| {
                    list.iter()
                        .find(|u| u.name == name)
                        .map(|u| u.progress)
                        .unwrap_or(0)
                })
            }
        });
        let on_cancel = Callback::new({
            let name = name.clone();
            move |_| {
                in_flight.update(|list| {
                    list.cancel(&name);
                });
            }
        });

        view! { <ProgressItem file_name=name progress=progress on_cancel=on_cancel/> }
    };

    view! {
        <div class="grid">
            <UploadDropzone on_files=on_files busy=busy/>

            <For
                each=move || in_flight.with(|list| list.snapshot())
                key=|(name, _)| name.clone()
                children=progress_row
            />

            <Show
                when=move || files.get().is_some()
                fallback=|| view! { <div class="card">"Loading…"</div> }
            >
                <FileTable files=listed/>
            </Show>

            <div>
                <button on:click=move |_| files.refetch()>"Refresh"</button>
            </div>
        </div>
    }
}

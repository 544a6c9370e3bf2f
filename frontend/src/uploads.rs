//! Upload orchestration for the page.
//!
//! Files go up one at a time. Each attempt is tracked in an [`InFlightList`]
//! while its request runs, and can be cancelled through the handle stored
//! with it. The browser specifics (file objects, abort controllers, signals,
//! alerts) live behind [`UploadHost`] so the flow itself runs anywhere.

use crate::types::{AppError, AppResult, UploadResponse};

// =============================================================================
// In-flight tracking
// =============================================================================

/// Something that can abort a running request.
pub trait Abort {
    fn abort(&self);
}

impl Abort for web_sys::AbortController {
    fn abort(&self) {
        web_sys::AbortController::abort(self)
    }
}

/// One upload attempt that has not finished yet.
#[derive(Clone, Debug)]
pub struct InFlightUpload<H> {
    pub name: String,
    /// 0-100
    pub progress: u8,
    pub handle: H,
}

/// Uploads currently running, in start order.
#[derive(Clone, Debug)]
pub struct InFlightList<H> {
    entries: Vec<InFlightUpload<H>>,
}

impl<H> Default for InFlightList<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H: Abort> InFlightList<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, name: impl Into<String>, handle: H) {
        self.entries.push(InFlightUpload {
            name: name.into(),
            progress: 0,
            handle,
        });
    }

    pub fn set_progress(&mut self, name: &str, progress: u8) {
        for entry in self.entries.iter_mut().filter(|e| e.name == name) {
            entry.progress = progress.min(100);
        }
    }

    /// Drop every entry with this name.
    pub fn finish(&mut self, name: &str) {
        self.entries.retain(|e| e.name != name);
    }

    /// Abort the named uploads and drop them. Returns false if none matched.
    pub fn cancel(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| {
            if e.name == name {
                e.handle.abort();
                false
            } else {
                true
            }
        });
        self.entries.len() != before
    }

    pub fn is_busy(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InFlightUpload<H>> {
        self.entries.iter()
    }

    /// `(name, progress)` pairs for rendering.
    pub fn snapshot(&self) -> Vec<(String, u8)> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.progress))
            .collect()
    }
}

// =============================================================================
// Upload flow
// =============================================================================

/// Environment the upload flow runs in.
#[allow(async_fn_in_trait)]
pub trait UploadHost {
    type File;
    type Handle: Abort + Clone;

    fn file_name(&self, file: &Self::File) -> String;

    fn new_handle(&self) -> AppResult<Self::Handle>;

    /// Mutate the shared in-flight list.
    fn update_in_flight(&self, f: impl FnOnce(&mut InFlightList<Self::Handle>));

    async fn upload(
        &self,
        file: &Self::File,
        handle: &Self::Handle,
        on_progress: &dyn Fn(u8),
    ) -> AppResult<UploadResponse>;

    /// Mark the cached file list stale.
    fn invalidate_list(&self);

    fn report_failure(&self, name: &str, err: &AppError);
}

/// Outcome counts of one [`upload_all`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub uploaded: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl UploadSummary {
    pub fn total(&self) -> usize {
        self.uploaded + self.failed + self.cancelled
    }
}

/// Upload `files` one after another.
///
/// Every file gets exactly one upload call. A failure is reported and the
/// next file still goes; a cancelled upload is not reported. The in-flight
/// entry is gone once its call returns, whatever the outcome.
pub async fn upload_all<H: UploadHost>(host: &H, files: Vec<H::File>) -> UploadSummary {
    let mut summary = UploadSummary::default();

    for file in files {
        let name = host.file_name(&file);

        let handle = match host.new_handle() {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("❌ Could not start upload of {}: {}", name, e);
                host.report_failure(&name, &e);
                summary.failed += 1;
                continue;
            }
        };

        host.update_in_flight(|list| list.begin(name.clone(), handle.clone()));
        log::info!("📤 Uploading {}", name);

        let on_progress = |pct: u8| host.update_in_flight(|list| list.set_progress(&name, pct));
        let result = host.upload(&file, &handle, &on_progress).await;

        host.update_in_flight(|list| list.finish(&name));

        match result {
            Ok(response) => {
                log::info!("✅ Uploaded {} ({} bytes)", response.file.name, response.file.size);
                summary.uploaded += 1;
                host.invalidate_list();
            }
            Err(e) if e.is_cancelled() => {
                log::info!("🚫 Upload of {} cancelled", name);
                summary.cancelled += 1;
            }
            Err(e) => {
                log::error!("❌ Upload failed: {}: {}", name, e);
                summary.failed += 1;
                host.report_failure(&name, &e);
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileRecord;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct FakeHandle(Rc<Cell<bool>>);

    impl Abort for FakeHandle {
        fn abort(&self) {
            self.0.set(true);
        }
    }

    /// Uploads succeed unless the name is listed in `fail` or `cancel`.
    #[derive(Default)]
    struct FakeHost {
        fail: Vec<&'static str>,
        cancel: Vec<&'static str>,
        in_flight: RefCell<InFlightList<FakeHandle>>,
        calls: RefCell<Vec<String>>,
        busy_during_call: RefCell<Vec<usize>>,
        progress_seen: RefCell<Vec<u8>>,
        failures: RefCell<Vec<String>>,
        invalidations: Cell<usize>,
    }

    impl UploadHost for FakeHost {
        type File = &'static str;
        type Handle = FakeHandle;

        fn file_name(&self, file: &Self::File) -> String {
            file.to_string()
        }

        fn new_handle(&self) -> AppResult<FakeHandle> {
            Ok(FakeHandle::default())
        }

        fn update_in_flight(&self, f: impl FnOnce(&mut InFlightList<FakeHandle>)) {
            f(&mut self.in_flight.borrow_mut());
        }

        async fn upload(
            &self,
            file: &Self::File,
            handle: &FakeHandle,
            on_progress: &dyn Fn(u8),
        ) -> AppResult<UploadResponse> {
            self.calls.borrow_mut().push(file.to_string());
            self.busy_during_call.borrow_mut().push(self.in_flight.borrow().len());

            on_progress(0);
            if let Some((_, pct)) = self.in_flight.borrow().snapshot().first() {
                self.progress_seen.borrow_mut().push(*pct);
            }

            if self.cancel.contains(file) {
                // The user hits Cancel while the request runs.
                self.in_flight.borrow_mut().cancel(file);
            }
            if handle.0.get() {
                return Err(AppError::Cancelled);
            }
            if self.fail.contains(file) {
                return Err(AppError::Status {
                    action: "Upload",
                    status: 500,
                });
            }

            on_progress(100);
            Ok(UploadResponse {
                ok: true,
                file: FileRecord {
                    name: file.to_string(),
                    size: 3,
                    content_type: "text/plain".into(),
                    uploaded_at: 1.0,
                },
            })
        }

        fn invalidate_list(&self) {
            self.invalidations.set(self.invalidations.get() + 1);
        }

        fn report_failure(&self, name: &str, _err: &AppError) {
            self.failures.borrow_mut().push(name.to_string());
        }
    }

    #[test]
    fn test_one_upload_call_per_file() {
        let host = FakeHost::default();
        let summary = block_on(upload_all(&host, vec!["a.txt", "b.txt", "c.txt"]));

        assert_eq!(*host.calls.borrow(), vec!["a.txt", "b.txt", "c.txt"]);
        assert_eq!(summary.uploaded, 3);
        assert_eq!(summary.total(), 3);
        assert_eq!(host.invalidations.get(), 3);
        assert!(host.in_flight.borrow().is_empty());
    }

    #[test]
    fn test_uploads_run_one_at_a_time() {
        let host = FakeHost::default();
        block_on(upload_all(&host, vec!["a.txt", "b.txt"]));

        // Exactly the current file is in flight during each call.
        assert_eq!(*host.busy_during_call.borrow(), vec![1, 1]);
        assert_eq!(*host.progress_seen.borrow(), vec![0, 0]);
    }

    #[test]
    fn test_failure_does_not_block_later_files() {
        let host = FakeHost {
            fail: vec!["b.txt"],
            ..Default::default()
        };
        let summary = block_on(upload_all(&host, vec!["a.txt", "b.txt", "c.txt"]));

        assert_eq!(host.calls.borrow().len(), 3);
        assert_eq!(*host.failures.borrow(), vec!["b.txt"]);
        assert_eq!(
            summary,
            UploadSummary {
                uploaded: 2,
                failed: 1,
                cancelled: 0
            }
        );
        assert!(host.in_flight.borrow().is_empty());
    }

    #[test]
    fn test_cancel_aborts_without_report() {
        let host = FakeHost {
            cancel: vec!["a.txt"],
            ..Default::default()
        };
        let summary = block_on(upload_all(&host, vec!["a.txt", "b.txt"]));

        assert_eq!(summary.cancelled, 1);
        assert_eq!(summary.uploaded, 1);
        assert!(host.failures.borrow().is_empty());
        assert_eq!(host.invalidations.get(), 1);
        assert!(host.in_flight.borrow().is_empty());
    }

    #[test]
    fn test_in_flight_list_operations() {
        let mut list = InFlightList::new();
        let a = FakeHandle::default();
        let b = FakeHandle::default();

        list.begin("a", a.clone());
        list.begin("b", b.clone());
        assert!(list.is_busy());
        assert_eq!(list.len(), 2);

        list.set_progress("a", 250);
        assert_eq!(list.snapshot(), vec![("a".to_string(), 100), ("b".to_string(), 0)]);

        assert!(list.cancel("b"));
        assert!(b.0.get());
        assert!(!a.0.get());
        assert!(!list.cancel("b"));

        list.finish("a");
        assert!(!list.is_busy());
        assert_eq!(list.iter().count(), 0);
    }
}

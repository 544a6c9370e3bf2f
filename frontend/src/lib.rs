//! Filedrop - Frontend Rust/Leptos Application
//!
//! A WebAssembly client for uploading files to the Filedrop API, watching
//! their progress, cancelling them, and downloading what was stored.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (title)                                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  UploadPage                                                  │
//! │  ├── UploadDropzone (click, Enter, drag & drop)             │
//! │  ├── ProgressItem per running upload (Cancel)               │
//! │  ├── FileTable (or Loading…)                                │
//! │  └── Refresh                                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - Compile-time settings (API base, title)
//! - [`types`] - File records, API envelopes, errors
//! - [`uploads`] - Sequential upload flow and in-flight tracking
//! - [`components`] - UI components
//! - [`services`] - API calls

use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod uploads;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Files
    FileRecord,
    // API
    FileListResponse, UploadResponse,
    // Errors
    AppError, AppResult,
};

// Upload flow
pub use uploads::{upload_all, InFlightList, UploadHost, UploadSummary};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 Filedrop - Starting Leptos App ({})", API_BASE);

    // Mount the application
    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_TITLE/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    view! {
        <Header/>

        <div class="container">
            <UploadPage/>
        </div>

        <Footer/>
    }
}

use leptos::*;
use crate::config::APP_TITLE;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header>
            <div class="header-left">
                <h1 class="logo">{APP_TITLE}</h1>
            </div>
            <div class="header-right">
                <span class="badge">"Upload · List · Download"</span>
            </div>
        </header>
    }
}

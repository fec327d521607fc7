//! 読み込み中・エラー表示

use leptos::prelude::*;

#[component]
pub fn LoadingView() -> impl IntoView {
    view! {
        <div class="status-view">
            <div class="spinner"></div>
            <h2 class="status-title">"Memproses Data Strategis..."</h2>
        </div>
    }
}

#[component]
pub fn ErrorView(message: String) -> impl IntoView {
    view! {
        <div class="status-view status-error">
            <div class="status-icon">"!"</div>
            <h2 class="status-title">"Gagal Memuat Data"</h2>
            <p>"Silakan coba segarkan halaman."</p>
            <p class="status-detail">{message}</p>
        </div>
    }
}

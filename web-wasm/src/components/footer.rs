//! フッターコンポーネント

use leptos::prelude::*;

#[component]
pub fn Footer(address: Signal<String>) -> impl IntoView {
    view! {
        <footer class="footer">
            <p>"© 2026 Koperasi Syarikat Islam Mandiri. All Rights Reserved."</p>
            <p class="footer-address">{move || address.get()}</p>
        </footer>
    }
}

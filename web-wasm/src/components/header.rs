//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header<FG, FX, FP>(
    logo: Signal<Option<String>>,
    is_generating: Signal<bool>,
    on_generate: FG,
    on_export_pptx: FX,
    on_export_pdf: FP,
) -> impl IntoView
where
    FG: Fn(()) + 'static + Clone,
    FX: Fn(()) + 'static + Clone,
    FP: Fn(()) + 'static + Clone,
{
    view! {
        <header class="header">
            <div class="brand">
                <Show when=move || logo.get().is_some()>
                    <img class="brand-logo" src=move || logo.get().unwrap_or_default() />
                </Show>
                <div>
                    <h1>"KSIM STRATEGIC DECK"</h1>
                    <p class="brand-tagline">"Investor Presentation Generator v8.0"</p>
                </div>
            </div>

            <div class="header-actions">
                <button
                    class="btn btn-generate"
                    class:generating=move || is_generating.get()
                    disabled=move || is_generating.get()
                    on:click={
                        let on_generate = on_generate.clone();
                        move |_| on_generate(())
                    }
                >
                    {move || if is_generating.get() { "Generating..." } else { "Generate AI Visuals" }}
                </button>

                <button
                    class="btn btn-primary"
                    on:click={
                        let on_export_pptx = on_export_pptx.clone();
                        move |_| on_export_pptx(())
                    }
                >
                    "PPTX"
                </button>

                <button
                    class="btn btn-secondary"
                    on:click={
                        let on_export_pdf = on_export_pdf.clone();
                        move |_| on_export_pdf(())
                    }
                >
                    "PDF"
                </button>
            </div>
        </header>
    }
}

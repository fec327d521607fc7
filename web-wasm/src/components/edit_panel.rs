//! 画像編集パネル

use leptos::prelude::*;

#[component]
pub fn EditPanel<FS, FC>(
    draft: RwSignal<String>,
    pending: bool,
    on_submit: FS,
    on_cancel: FC,
) -> impl IntoView
where
    FS: Fn(String) + 'static + Clone,
    FC: Fn(()) + 'static + Clone,
{
    view! {
        <div class="edit-panel">
            <input
                type="text"
                class="edit-input"
                placeholder="e.g. Add more sunset glow..."
                disabled=pending
                prop:value=move || draft.get()
                on:input=move |ev| draft.set(event_target_value(&ev))
                on:keydown={
                    let on_submit = on_submit.clone();
                    move |ev| {
                        if ev.key() == "Enter" {
                            on_submit(draft.get_untracked());
                        }
                    }
                }
            />
            <div class="edit-actions">
                <button
                    class="btn btn-ghost"
                    disabled=pending
                    on:click={
                        let on_cancel = on_cancel.clone();
                        move |_| on_cancel(())
                    }
                >
                    "Cancel"
                </button>
                <button
                    class="btn btn-accent"
                    disabled=pending
                    on:click={
                        let on_submit = on_submit.clone();
                        move |_| on_submit(draft.get_untracked())
                    }
                >
                    {if pending { "Editing..." } else { "Send" }}
                </button>
            </div>
        </div>
    }
}

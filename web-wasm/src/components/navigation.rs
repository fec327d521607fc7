//! スライド送りの矢印とインジケーター

use crate::app::{update_shell, DeckState};
use ksim_deck_common::Navigator;
use leptos::prelude::*;

pub fn navigation_bar(navigator: &Navigator, state: DeckState) -> impl IntoView {
    let current = navigator.current();
    let dots = (0..navigator.len())
        .map(|index| {
            view! {
                <button
                    class="dot"
                    class:active={index == current}
                    title=format!("Slide {}", index + 1)
                    on:click=move |_| {
                        update_shell(state, |s| s.jump_to(index));
                    }
                ></button>
            }
        })
        .collect_view();

    view! {
        <button
            class="nav-arrow nav-prev"
            disabled={!navigator.can_previous()}
            on:click=move |_| {
                update_shell(state, |s| s.previous());
            }
        >
            "‹"
        </button>
        <button
            class="nav-arrow nav-next"
            disabled={!navigator.can_next()}
            on:click=move |_| {
                update_shell(state, |s| s.next());
            }
        >
            "›"
        </button>
        <div class="nav-dots">{dots}</div>
    }
}

//! メインアプリケーションコンポーネント

use crate::api::{self, ExportKind, ServerGenerator};
use crate::components::{
    footer::Footer,
    header::Header,
    navigation::navigation_bar,
    slide_view::render_slide,
    status::{ErrorView, LoadingView},
};
use crate::download;
use ksim_deck_common::{GenerationQueue, ImageGenerator, ShellState};
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::console;

/// 読み込み状態
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready(ShellState),
    /// 読み込み失敗（再試行はページの再読み込み）
    Failed(String),
}

pub type DeckState = RwSignal<LoadState>;

/// 準備完了時だけシェルを更新する
pub fn update_shell<R>(state: DeckState, f: impl FnOnce(&mut ShellState) -> R) -> Option<R> {
    state
        .try_update(|s| match s {
            LoadState::Ready(shell) => Some(f(shell)),
            _ => None,
        })
        .flatten()
}

/// 準備完了時だけシェルを参照する
pub fn with_shell<R>(state: DeckState, f: impl FnOnce(&ShellState) -> R) -> Option<R> {
    state.with(|s| match s {
        LoadState::Ready(shell) => Some(f(shell)),
        _ => None,
    })
}

// ============================================
// 非同期処理
// ============================================

fn load_deck(state: DeckState) {
    spawn_local(async move {
        match api::fetch_deck_data().await {
            Ok((document, assets)) => {
                state.try_set(LoadState::Ready(ShellState::new(document, assets)));
            }
            Err(e) => {
                let message = api::js_error_message(&e);
                console::error_1(&format!("デッキデータの取得に失敗: {}", message).into());
                state.try_set(LoadState::Failed(message));
            }
        }
    });
}

/// ポートフォリオ6枚を順番に生成し、届いた順に反映する
pub fn generate_all(state: DeckState) {
    let Some(ticket) = update_shell(state, |s| s.begin_generation()).flatten() else {
        return;
    };

    spawn_local(async move {
        let queue = GenerationQueue::portfolio();
        let report = queue
            .run(&ServerGenerator, |key, image| {
                update_shell(state, |s| s.apply_generated(ticket, key, image)).unwrap_or(false)
            })
            .await;
        update_shell(state, |s| s.finish_generation(ticket));

        console::log_1(
            &format!(
                "AI画像生成: 成功 {}枚, 失敗 {}枚{}",
                report.updated.len(),
                report.failed.len(),
                if report.aborted { " (中断)" } else { "" }
            )
            .into(),
        );
    });
}

/// 開いている編集セッションを送信する
pub fn submit_edit(state: DeckState, prompt: String) {
    let request = update_shell(state, |s| {
        s.set_edit_prompt(prompt);
        s.begin_edit()
    })
    .flatten();
    let Some(request) = request else {
        return;
    };

    spawn_local(async move {
        let image = ServerGenerator.edit(&request.image, &request.prompt).await;
        update_shell(state, |s| s.finish_edit(request.ticket, request.key, image));
    });
}

/// 現在のアセットでサーバー側エクスポートを実行して保存する
pub fn export(state: DeckState, kind: ExportKind) {
    let Some(assets) = with_shell(state, |s| s.assets().clone()) else {
        return;
    };

    spawn_local(async move {
        let result = match api::export_deck(kind, &assets).await {
            Ok(blob) => download::save_blob(&blob, &kind.file_name()),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            console::error_1(&format!("{}出力に失敗: {}", kind.as_str(), api::js_error_message(&e)).into());
        }
    });
}

// ============================================
// コンポーネント
// ============================================

#[component]
pub fn App() -> impl IntoView {
    let state: DeckState = RwSignal::new(LoadState::Loading);
    // 編集プロンプトの入力中の値（シェルへは送信時に反映）
    let draft = RwSignal::new(String::new());

    load_deck(state);
    on_cleanup(move || {
        update_shell(state, |s| s.invalidate());
    });

    let is_generating = Signal::derive(move || with_shell(state, |s| s.is_generating()).unwrap_or(false));
    let logo = Signal::derive(move || with_shell(state, |s| s.assets().logo.to_string()));
    let address = Signal::derive(move || {
        with_shell(state, |s| s.document().meta.office.address.clone()).unwrap_or_default()
    });

    view! {
        <div class="app">
            {move || {
                state.with(|s| match s {
                    LoadState::Loading => view! { <LoadingView /> }.into_any(),
                    LoadState::Failed(message) => view! { <ErrorView message=message.clone() /> }.into_any(),
                    LoadState::Ready(shell) => {
                        let slides = shell.slides();
                        let navigator = shell.navigator();
                        let slide = slides
                            .get(navigator.current())
                            .map(|slide| render_slide(slide, navigator.direction(), shell.edit(), state, draft));
                        view! {
                            <div class="deck-shell">
                                <Header
                                    logo=logo
                                    is_generating=is_generating
                                    on_generate=move |_| generate_all(state)
                                    on_export_pptx=move |_| export(state, ExportKind::Pptx)
                                    on_export_pdf=move |_| export(state, ExportKind::Pdf)
                                />
                                <div class="slide-viewer">
                                    <div class="slide-page">{slide}</div>
                                    {navigation_bar(navigator, state)}
                                </div>
                                <Footer address=address />
                            </div>
                        }
                        .into_any()
                    }
                })
            }}
        </div>
    }
}

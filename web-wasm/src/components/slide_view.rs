//! スライド描画

use crate::app::{submit_edit, update_shell, DeckState};
use crate::components::edit_panel::EditPanel;
use ksim_deck_common::slides::{InvestmentBox, MemberCard, PhotoSlot, VALUE_CHAIN_LABEL};
use ksim_deck_common::{
    Direction, EditSession, PortfolioKey, SlideBody, SlideDescriptor, Transition, VisualStyle,
};
use leptos::prelude::*;

const STYLE: VisualStyle = VisualStyle::Animated;

/// 要素の表示遅延
fn stagger(order: usize) -> String {
    STYLE
        .stagger_delay(order)
        .map(|delay| format!("animation-delay: {:.1}s", delay))
        .unwrap_or_default()
}

fn direction_class(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "slide-forward",
        Direction::Backward => "slide-backward",
        Direction::Still => "slide-still",
    }
}

/// 現在のスライドを描画する
pub fn render_slide(
    slide: &SlideDescriptor<'_>,
    direction: Direction,
    edit: &EditSession,
    state: DeckState,
    draft: RwSignal<String>,
) -> AnyView {
    let transition = Transition::for_direction(direction);
    let class = format!("slide slide-{} {}", slide.kind.key(), direction_class(direction));
    let style = format!("--enter-x: {}px; --exit-x: {}px", transition.enter_x, transition.exit_x);

    view! {
        <div class=class style=style>
            {slide_header(slide)}
            {slide_body(slide, edit, state, draft)}
        </div>
    }
    .into_any()
}

fn slide_header(slide: &SlideDescriptor<'_>) -> Option<AnyView> {
    if matches!(slide.body, SlideBody::Cover { .. }) {
        return None;
    }
    let eyebrow = slide.eyebrow.to_string();
    let heading = slide.heading.to_string();
    Some(
        view! {
            <div class="slide-heading">
                <span class="slide-subtitle">{eyebrow}</span>
                <h2 class="section-title animated" style=stagger(0)>{heading}</h2>
            </div>
        }
        .into_any(),
    )
}

fn slide_body(slide: &SlideDescriptor<'_>, edit: &EditSession, state: DeckState, draft: RwSignal<String>) -> AnyView {
    match &slide.body {
        SlideBody::Cover { logo, subtitle, date } => {
            let logo = logo.to_string();
            let title = slide.heading.to_string();
            let subtitle = subtitle.to_string();
            let date = date.to_string();
            view! {
                <div class="cover">
                    <img class="cover-logo animated" style=stagger(0) src=logo />
                    <h1 class="cover-title animated" style=stagger(1)>{title}</h1>
                    <h2 class="cover-subtitle animated" style=stagger(2)>{subtitle}</h2>
                    <p class="cover-date animated" style=stagger(3)>{date}</p>
                </div>
            }
            .into_any()
        }

        SlideBody::ExecutiveSummary { points, metric_value, metric_label } => {
            let items = bullet_items(points, 1);
            let metric_value = metric_value.to_string();
            let metric_label = metric_label.to_string();
            view! {
                <div class="summary">
                    <ul class="summary-points">{items}</ul>
                    <div class="metric-card animated" style=stagger(3)>
                        <div class="metric-value">{metric_value}</div>
                        <div class="metric-label">{metric_label}</div>
                    </div>
                </div>
            }
            .into_any()
        }

        SlideBody::Management { members } => {
            let cards = members
                .iter()
                .enumerate()
                .map(|(i, member)| member_card(member, i + 1))
                .collect_view();
            view! { <div class="team-grid">{cards}</div> }.into_any()
        }

        SlideBody::ProblemSolution { problem_title, problem_points, solution_title, pillars } => {
            let problem_title = problem_title.to_string();
            let problem_items = bullet_items(problem_points, 1);
            let solution_title = solution_title.to_string();
            let pillar_cards = pillars
                .iter()
                .map(|pillar| {
                    let name = pillar.name.clone();
                    let description = pillar.description.clone();
                    view! {
                        <div class="pillar">
                            <h4>{name}</h4>
                            <p>{description}</p>
                        </div>
                    }
                })
                .collect_view();
            view! {
                <div class="problem-solution">
                    <div class="problem-card animated" style=stagger(1)>
                        <h3>{problem_title}</h3>
                        <ul>{problem_items}</ul>
                    </div>
                    <div class="solution-card animated" style=stagger(2)>
                        <h3>{solution_title}</h3>
                        <div class="pillars">{pillar_cards}</div>
                    </div>
                </div>
            }
            .into_any()
        }

        SlideBody::Advantages { items } => {
            let cards = items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let number = format!("{:02}", i + 1);
                    let item = item.clone();
                    view! {
                        <div class="advantage animated" style=stagger(i + 1)>
                            <span class="advantage-number">{number}</span>
                            <p>{item}</p>
                        </div>
                    }
                })
                .collect_view();
            view! { <div class="advantages-grid">{cards}</div> }.into_any()
        }

        SlideBody::Sector { value_chain, operations, photos } => {
            let value_chain = value_chain.to_string();
            let operation_items = bullet_items(operations, 2);
            let photo_views = photos
                .iter()
                .map(|slot| portfolio_photo(slot, edit, state, draft))
                .collect_view();
            view! {
                <div class="sector">
                    <div class="sector-text">
                        <div class="value-chain animated" style=stagger(1)>
                            <span class="value-chain-label">{VALUE_CHAIN_LABEL}</span>
                            <p>{value_chain}</p>
                        </div>
                        <ul class="operations">{operation_items}</ul>
                    </div>
                    <div class="sector-photos">{photo_views}</div>
                </div>
            }
            .into_any()
        }

        SlideBody::Roadmap { phases } => {
            let columns = phases
                .iter()
                .enumerate()
                .map(|(i, phase)| {
                    let label = format!("Phase {}", i + 1);
                    let title = phase.title.clone();
                    let milestones = phase
                        .milestones
                        .iter()
                        .map(|m| {
                            let m = m.clone();
                            view! { <li>{m}</li> }
                        })
                        .collect_view();
                    view! {
                        <div class="phase animated" style=stagger(i + 1)>
                            <span class="phase-label">{label}</span>
                            <h3>{title}</h3>
                            <ul>{milestones}</ul>
                        </div>
                    }
                })
                .collect_view();
            view! { <div class="roadmap">{columns}</div> }.into_any()
        }

        SlideBody::Investment { boxes, closing, contacts } => {
            let box_views = boxes
                .iter()
                .enumerate()
                .map(|(i, b)| investment_box(b, i + 1))
                .collect_view();
            let closing = format!("\"{}\"", closing);
            let contact_views = contacts
                .iter()
                .map(|c| {
                    let c = c.to_string();
                    view! { <span class="contact">{c}</span> }
                })
                .collect_view();
            view! {
                <div class="investment">
                    <div class="investment-boxes">{box_views}</div>
                    <div class="closing animated" style=stagger(4)>
                        <p class="closing-quote">{closing}</p>
                        <div class="contacts">{contact_views}</div>
                    </div>
                </div>
            }
            .into_any()
        }
    }
}

fn bullet_items(items: &[String], first_order: usize) -> impl IntoView {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let item = item.clone();
            view! { <li class="animated" style=stagger(first_order + i)>{item}</li> }
        })
        .collect_view()
}

fn member_card(member: &MemberCard<'_>, order: usize) -> impl IntoView {
    let name = member.name.to_string();
    let title = member.title.to_string();
    let initial = name.chars().next().map(String::from).unwrap_or_default();
    let photo = match member.photo {
        Some(photo) => {
            let src = photo.to_string();
            view! { <img class="member-photo" src=src /> }.into_any()
        }
        None => view! { <div class="member-initial">{initial}</div> }.into_any(),
    };
    view! {
        <div class="member-card animated" style=stagger(order)>
            {photo}
            <h3>{name}</h3>
            <p>{title}</p>
        </div>
    }
}

fn investment_box(b: &InvestmentBox<'_>, order: usize) -> impl IntoView {
    let title = b.title.to_string();
    let items = b
        .items
        .iter()
        .map(|item| {
            let item = item.clone();
            view! { <li>{item}</li> }
        })
        .collect_view();
    view! {
        <div class="investment-box animated" style=stagger(order)>
            <h3>{title}</h3>
            <ul>{items}</ul>
        </div>
    }
}

/// ポートフォリオ画像（ホバーで編集ボタン）
fn portfolio_photo(slot: &PhotoSlot<'_>, edit: &EditSession, state: DeckState, draft: RwSignal<String>) -> impl IntoView {
    let key: PortfolioKey = slot.key;
    let src = slot.image.to_string();

    let editor = if edit.is_open_for(key) {
        let pending = edit.is_pending();
        view! {
            <EditPanel
                draft=draft
                pending=pending
                on_submit=move |prompt| submit_edit(state, prompt)
                on_cancel=move |_| {
                    update_shell(state, |s| s.cancel_edit());
                }
            />
        }
        .into_any()
    } else {
        view! {
            <button
                class="edit-trigger"
                title="Edit with AI"
                on:click=move |_| {
                    let prompt = update_shell(state, |s| {
                        s.open_edit(key);
                        s.edit().prompt().to_string()
                    });
                    if let Some(prompt) = prompt {
                        draft.set(prompt);
                    }
                }
            >
                "✎"
            </button>
        }
        .into_any()
    };

    view! {
        <div class="portfolio-photo" data-key=key.as_str()>
            <img src=src />
            <div class="portfolio-overlay">{editor}</div>
        </div>
    }
}

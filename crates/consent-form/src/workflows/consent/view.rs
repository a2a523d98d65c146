//! HTML rendering of the consent form. Every function here is a pure
//! function of the model; the whole form is re-rendered after each event.

use html_escape::decode_html_entities;
use maud::{html, Markup, DOCTYPE};

use super::domain::{ConsentModel, Input, Question, Standard};
use super::router::{ACTIVITY_PATH, FORM_PATH, GENERATE_PATH};

pub const FORM_ID: &str = "consent-form";
pub const PROPERTY_PLACEHOLDER: &str = "Select a property on the map";
pub const ACTIVITY_PLACEHOLDER: &str = "Select an activity";

const HTMX_SRC: &str = "https://unpkg.com/htmx.org@1.9.12";
const HTMX_JSON_ENC_SRC: &str = "https://unpkg.com/htmx.org@1.9.12/dist/ext/json-enc.js";

pub fn render_page(model: &ConsentModel) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Building Consent" }
                script src=(HTMX_SRC) defer {}
                script src=(HTMX_JSON_ENC_SRC) defer {}
            }
            body {
                (render_form(model))
            }
        }
    }
}

/// The swappable form fragment. It polls for a fresh copy while banners are
/// waiting to expire or a standards request is outstanding.
pub fn render_form(model: &ConsentModel) -> Markup {
    let poll = !model.errors.is_empty() || model.awaiting_standards;
    let target = format!("#{FORM_ID}");

    html! {
        div
            id=(FORM_ID)
            class="consent"
            hx-get=[poll.then_some(FORM_PATH)]
            hx-trigger=[poll.then_some("every 1s")]
            hx-target=[poll.then_some(target.as_str())]
            hx-swap=[poll.then_some("outerHTML")]
        {
            (error_banners(model))
            div class="columns" {
                (sidebar(model))
                main class="column" {
                    (selectors(model, &target))
                    @for (index, standard) in model.standards.iter().enumerate() {
                        (standard_section(index, standard))
                    }
                    @if model.standards.is_empty() {
                        (generate_action(&target))
                    }
                }
            }
        }
    }
}

fn error_banners(model: &ConsentModel) -> Markup {
    html! {
        @if !model.errors.is_empty() {
            div class="errors" {
                @for error in model.errors.iter() {
                    div class="notification is-danger" role="alert" data-error-id=(error.id.0) {
                        (error.message)
                    }
                }
            }
        }
    }
}

fn sidebar(model: &ConsentModel) -> Markup {
    html! {
        aside class="column is-one-quarter menu" {
            p class="menu-label" { "Standards" }
            ul class="menu-list" {
                @for (index, standard) in model.standards.iter().enumerate() {
                    li { a href=(format!("#{}", anchor(index))) { (standard.name) } }
                }
            }
            p class="menu-label" { "Status" }
            p class="consent-status" { (model.status.label()) }
        }
    }
}

fn selectors(model: &ConsentModel, target: &str) -> Markup {
    html! {
        div class="field" {
            label class="label" for="activity" { "Activity" }
            div class="select" {
                select
                    id="activity"
                    name="activity"
                    hx-post=(ACTIVITY_PATH)
                    hx-ext="json-enc"
                    hx-trigger="change"
                    hx-target=(target)
                    hx-swap="outerHTML"
                {
                    option value="" disabled selected[model.selected_activity.is_none()] {
                        (ACTIVITY_PLACEHOLDER)
                    }
                    @for activity in model.activities() {
                        option
                            value=(activity.as_str())
                            selected[model.selected_activity.as_ref() == Some(activity)]
                        {
                            (activity.as_str())
                        }
                    }
                }
            }
        }
        div class="field" {
            label class="label" for="property" { "Property" }
            @match &model.selected_property {
                Some(property) => {
                    input id="property" class="input" type="text" readonly value=(property.full_address);
                }
                None => {
                    input id="property" class="input" type="text" readonly placeholder=(PROPERTY_PLACEHOLDER);
                }
            }
        }
    }
}

fn standard_section(index: usize, standard: &Standard) -> Markup {
    html! {
        details class="standard" id=(anchor(index)) data-key=(standard.key) open {
            summary {
                strong { (standard.name) }
                " "
                span class="tag" { (standard.section) }
            }
            p class="description" { (standard.description) }
            @for (position, question) in standard.questions.iter().enumerate() {
                (question_row(index, position, question))
            }
        }
    }
}

fn question_row(index: usize, position: usize, question: &Question) -> Markup {
    let field_id = format!("{}-question-{position}", anchor(index));
    let prompt = decode_html_entities(question.input.prompt()).into_owned();

    html! {
        div class="field" data-format=(question.input.format()) {
            label class="label" for=(field_id) { (prompt) }
            div class="control" {
                @match &question.input {
                    Input::Text { .. } => {
                        input id=(field_id) name=(question.key) class="input" type="text" value=(question.value);
                    }
                    Input::Multichoice { options, .. } => {
                        input
                            id=(field_id)
                            name=(question.key)
                            class="input"
                            type="text"
                            list=(format!("{field_id}-options"))
                            value=(question.value);
                        datalist id=(format!("{field_id}-options")) {
                            @for choice in options {
                                option value=(choice) {}
                            }
                        }
                    }
                    Input::Number { .. } => {
                        input id=(field_id) name=(question.key) class="input" type="number" value=(question.value);
                    }
                    Input::File { .. } => {
                        input id=(field_id) name=(question.key) class="file-input" type="file";
                    }
                }
                @if !question.unit.is_empty() {
                    span class="unit" { (question.unit) }
                }
            }
        }
    }
}

fn generate_action(target: &str) -> Markup {
    html! {
        div class="field generate" {
            button
                class="button is-primary"
                type="button"
                hx-post=(GENERATE_PATH)
                hx-target=(target)
                hx-swap="outerHTML"
            {
                "Generate Standards"
            }
        }
    }
}

/// Keys come from the rules engine verbatim, so anchors use the position.
fn anchor(index: usize) -> String {
    format!("standard-{index}")
}

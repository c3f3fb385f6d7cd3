//! Contextual Feedback Page
//!
//! Opened from a QR code (`/f?loc=&id=&tok=&lang=`). Room and check-out
//! links are checked with the server before the form for the location is
//! shown.

use habesha_core::session::ContextLink;
use habesha_core::validation::{merge_attachments, validate_contextual};
use habesha_core::{
    AspectSpec, ContextualSubmission, FeedbackContext, FormErrors, FormKind, Language,
};
use leptos::*;
use leptos_router::*;
use std::collections::BTreeMap;

use crate::api;
use crate::components::{InlineLoading, Loading, StarRating};
use crate::state::global::GlobalState;

#[derive(Debug, Clone, PartialEq)]
enum LinkState {
    Verifying,
    Invalid(String),
    Ready(FeedbackContext, Option<Language>),
}

/// Fixed texts of one contextual form
#[derive(Clone, Copy)]
struct FormText {
    title: &'static str,
    intro: &'static str,
    comment_label: &'static str,
    placeholder: &'static str,
}

fn form_text(kind: FormKind) -> FormText {
    match kind {
        FormKind::Checkout => FormText {
            title: "Check-out Experience",
            intro: "How was your check-out?",
            comment_label: "Additional Comments about Check-out (Optional)",
            placeholder: "Any specific details regarding billing, staff interaction, or waiting time?",
        },
        FormKind::Room => FormText {
            title: "Room Experience",
            intro: "Please rate different aspects of your room.",
            comment_label: "Specific Comments about the Room (Optional)",
            placeholder: "Any details about cleanliness, comfort, noise, bathroom, amenities, or maintenance issues?",
        },
        FormKind::Dining => FormText {
            title: "Dining Experience",
            intro: "Tell us about your meal.",
            comment_label: "Specific Comments (Optional)",
            placeholder: "Dishes you enjoyed or disliked? Service details? Atmosphere?",
        },
        FormKind::Amenity => FormText {
            title: "Amenity Feedback",
            intro: "Help us keep this area at its best.",
            comment_label: "Additional Comments (Optional)",
            placeholder: "Any issues or suggestions regarding the area, staff, or facilities?",
        },
    }
}

/// Human name of the place the form is about, used in the thank-you toast
fn place_name(context: &FeedbackContext) -> String {
    match (context.loc.form_kind(), context.id.as_deref()) {
        (FormKind::Room, Some(id)) => format!("Room {}", id),
        (FormKind::Dining, Some(id)) => format!("Table {}", id),
        (FormKind::Amenity, _) => context.loc.as_str().replace('_', " "),
        (kind, _) => form_text(kind).title.to_string(),
    }
}

#[component]
pub fn ContextualFeedback() -> impl IntoView {
    let query = use_query_map();
    let link_state = create_rw_signal(LinkState::Verifying);

    create_effect(move |_| {
        let link = query.with(|q| {
            ContextLink::from_query(
                q.get("loc").map(String::as_str),
                q.get("id").map(String::as_str),
                q.get("tok").map(String::as_str),
                q.get("lang").map(String::as_str),
            )
        });

        let link = match link {
            Ok(link) => link,
            Err(e) => {
                link_state.set(LinkState::Invalid(e.to_string()));
                return;
            }
        };

        let language = link.language;
        if !link.needs_validation() {
            link_state.set(LinkState::Ready(link.into_context(None), language));
            return;
        }

        link_state.set(LinkState::Verifying);
        spawn_local(async move {
            let next = match api::validate_token(&link).await {
                Ok(validation) if validation.valid => {
                    LinkState::Ready(link.into_context(validation.context), language)
                }
                Ok(validation) => LinkState::Invalid(validation.failure_message().to_string()),
                Err(e) => LinkState::Invalid(e),
            };
            link_state.set(next);
        });
    });

    view! {
        <div class="max-w-xl mx-auto">
            {move || match link_state.get() {
                LinkState::Verifying => view! {
                    <Loading message="Verifying feedback session..." />
                }.into_view(),
                LinkState::Invalid(message) => view! {
                    <div class="text-center py-12">
                        <div class="p-4 rounded-lg bg-red-50 text-red-700">
                            <p class="font-semibold">"Invalid Link"</p>
                            <p class="text-sm mt-1">{message}</p>
                        </div>
                        <p class="mt-4 text-sm text-gray-500">
                            "Please ensure you scanned the correct QR code. If the problem persists, contact reception."
                        </p>
                    </div>
                }.into_view(),
                LinkState::Ready(context, language) => view! {
                    <ContextualForm context=context language=language />
                }.into_view(),
            }}
        </div>
    }
}

#[component]
fn ContextualForm(context: FeedbackContext, language: Option<Language>) -> impl IntoView {
    let state = expect_context::<GlobalState>();
    let kind = context.loc.form_kind();
    let text = form_text(kind);

    let aspects: Vec<(AspectSpec, RwSignal<u8>)> = kind
        .aspects()
        .iter()
        .map(|spec| (*spec, create_rw_signal(0u8)))
        .collect();
    let aspects = store_value(aspects);
    let context = store_value(context);

    let (comments, set_comments) = create_signal(String::new());
    let attachments = create_rw_signal(Vec::<String>::new());
    let (errors, set_errors) = create_signal(FormErrors::new());
    let (submitting, set_submitting) = create_signal(false);
    let (submitted, set_submitted) = create_signal(false);

    let greeting = context.with_value(|c| c.guest_name.clone()).map(|name| match language {
        Some(Language::Amh) => format!("እንኳን ደህና መጡ, {}!", name),
        _ => format!("Welcome, {}!", name),
    });

    let on_files = move |ev: web_sys::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        let Some(files) = input.files() else {
            return;
        };

        let picked: Vec<String> = (0..files.length())
            .filter_map(|i| files.get(i))
            .map(|file| file.name())
            .collect();
        if picked.is_empty() {
            return;
        }

        attachments.update(|current| *current = merge_attachments(current, &picked));
        state.show_success(&format!("{} file(s) selected", picked.len().min(3)));
        input.set_value("");
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }

        let ratings: BTreeMap<String, u8> = aspects.with_value(|list| {
            list.iter()
                .map(|(spec, rating)| (spec.name.to_string(), rating.get_untracked()))
                .filter(|(_, v)| *v > 0)
                .collect()
        });
        let comment = comments.get_untracked();
        let submission = ContextualSubmission {
            context: context.get_value(),
            ratings,
            comments: Some(comment).filter(|c| !c.trim().is_empty()),
            attachments: attachments.get_untracked(),
        };

        if let Err(form_errors) = validate_contextual(&submission) {
            set_errors.set(form_errors);
            return;
        }

        set_errors.set(FormErrors::new());
        set_submitting.set(true);
        let place = context.with_value(place_name);

        spawn_local(async move {
            match api::submit_contextual(&submission).await {
                Ok(_) => {
                    state.show_success(&format!("Thank you for your feedback on {}!", place));
                    set_submitted.set(true);
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Contextual feedback failed: {}", e).into());
                    state.show_error("Failed to submit feedback. Please try again.");
                }
            }
            set_submitting.set(false);
        });
    };

    let comment_field = kind.comment_field();

    view! {
        <Show
            when=move || !submitted.get()
            fallback=|| view! {
                <div class="bg-white rounded-xl shadow p-8 text-center">
                    <div class="text-5xl mb-4">"🙏"</div>
                    <h2 class="text-2xl font-semibold mb-2">"Thank you!"</h2>
                    <p class="text-gray-600">"Your feedback has been received."</p>
                </div>
            }
        >
            <form on:submit=on_submit novalidate class="bg-white rounded-xl shadow p-6">
                <h1 class="text-2xl font-semibold mb-1">{text.title}</h1>
                {greeting.clone().map(|g| view! { <p class="text-emerald-700 mb-1">{g}</p> })}
                <p class="text-gray-500 mb-6">{text.intro}</p>

                {aspects.with_value(|list| list.iter().map(|(spec, rating)| {
                    let name = spec.name;
                    view! {
                        <StarRating
                            rating=*rating
                            label=spec.label
                            required=spec.required
                            error=Signal::derive(move || errors.with(|e| e.get(name).map(str::to_string)))
                        />
                    }
                }).collect_view())}

                <div class="mb-4">
                    <label for="comments" class="block text-sm font-medium text-gray-700 mb-1">
                        {text.comment_label}
                    </label>
                    <textarea
                        id="comments"
                        rows="4"
                        maxlength="500"
                        placeholder=text.placeholder
                        class="w-full border rounded-lg px-3 py-2"
                        prop:value=move || comments.get()
                        on:input=move |ev| set_comments.set(event_target_value(&ev))
                    />
                    {move || errors.with(|e| e.get(comment_field).map(str::to_string)).map(|msg| view! {
                        <p class="text-xs text-red-600 mt-1">{msg}</p>
                    })}
                </div>

                {kind.accepts_attachments().then(|| view! {
                    <div class="mb-4">
                        <label for="attachments" class="block text-sm font-medium text-gray-700 mb-1">
                            "Attach Photos (Optional Issue Report)"
                        </label>
                        <input
                            id="attachments"
                            type="file"
                            accept="image/*"
                            multiple=true
                            class="block w-full text-sm"
                            on:change=on_files
                        />
                        <ul class="mt-2 flex flex-wrap gap-2">
                            {move || attachments.get().into_iter().map(|name| {
                                let remove = name.clone();
                                view! {
                                    <li class="flex items-center bg-gray-100 rounded px-2 py-1 text-xs">
                                        <span class="truncate max-w-[100px]">{name}</span>
                                        <button
                                            type="button"
                                            class="ml-1 text-red-500"
                                            aria-label="Remove file"
                                            on:click=move |_| attachments.update(|a| a.retain(|n| *n != remove))
                                        >
                                            "✕"
                                        </button>
                                    </li>
                                }
                            }).collect_view()}
                        </ul>
                        {move || errors.with(|e| e.get("attachments").map(str::to_string)).map(|msg| view! {
                            <p class="text-xs text-red-600 mt-1">{msg}</p>
                        })}
                    </div>
                })}

                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full mt-4 bg-emerald-600 hover:bg-emerald-700 disabled:bg-gray-400 text-white rounded-lg py-3 font-semibold transition-colors flex items-center justify-center space-x-2"
                >
                    {move || if submitting.get() {
                        view! { <InlineLoading /> <span>"Submitting..."</span> }.into_view()
                    } else {
                        view! { <span>"Submit Feedback"</span> }.into_view()
                    }}
                </button>
            </form>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use habesha_core::LocationCode;

    fn context(loc: LocationCode, id: Option<&str>) -> FeedbackContext {
        FeedbackContext {
            loc,
            id: id.map(str::to_string),
            token: None,
            guest_name: None,
        }
    }

    #[test]
    fn test_place_name() {
        assert_eq!(place_name(&context(LocationCode::Room, Some("305"))), "Room 305");
        assert_eq!(place_name(&context(LocationCode::DiningTable, Some("7"))), "Table 7");
        assert_eq!(place_name(&context(LocationCode::RestroomLobby, None)), "restroom lobby");
        assert_eq!(place_name(&context(LocationCode::Checkout, None)), "Check-out Experience");
    }

    #[test]
    fn test_every_form_has_texts() {
        for kind in [FormKind::Checkout, FormKind::Room, FormKind::Dining, FormKind::Amenity] {
            let text = form_text(kind);
            assert!(!text.title.is_empty());
            assert!(text.comment_label.ends_with("(Optional)"));
        }
    }
}

//! Guest Feedback Page
//!
//! General feedback form with a star rating, available in English and
//! Amharic.

use habesha_core::validation::validate_guest;
use habesha_core::{FormErrors, GuestSubmission, Language};
use leptos::*;

use crate::api;
use crate::components::{InlineLoading, StarRating};
use crate::state::global::GlobalState;

/// Form texts in one language
struct Labels {
    title: &'static str,
    rate: &'static str,
    room: &'static str,
    comment: &'static str,
    placeholder: &'static str,
    submit: &'static str,
    submitting: &'static str,
    submitted: &'static str,
    failed: &'static str,
}

static ENGLISH: Labels = Labels {
    title: "Guest Feedback",
    rate: "Rate your experience:",
    room: "Room/Table # (Optional)",
    comment: "Your Comments:",
    placeholder: "Enter your comments here...",
    submit: "Submit Feedback",
    submitting: "Submitting...",
    submitted: "Feedback submitted!",
    failed: "Submission failed. Please try again.",
};

static AMHARIC: Labels = Labels {
    title: "የእንግዳ አስተያየት",
    rate: "ደረጃ ይስጡ:",
    room: "ክፍል/ጠረጴዛ ቁጥር (አማራጭ)",
    comment: "አስተያየትዎ:",
    placeholder: "አስተያየትዎን እዚህ ያስገቡ...",
    submit: "አስተያየት ላክ",
    submitting: "እየገባ ነው...",
    submitted: "አስተያየትዎ ገብቷል!",
    failed: "አልተሳካም።",
};

fn labels(language: Language) -> &'static Labels {
    match language {
        Language::Eng => &ENGLISH,
        Language::Amh => &AMHARIC,
    }
}

#[component]
pub fn GuestFeedback() -> impl IntoView {
    let state = expect_context::<GlobalState>();

    let rating = create_rw_signal(0u8);
    let (comment, set_comment) = create_signal(String::new());
    let (room, set_room) = create_signal(String::new());
    let (language, set_language) = create_signal(Language::Eng);
    let (errors, set_errors) = create_signal(FormErrors::new());
    let (submitting, set_submitting) = create_signal(false);

    let text = move || labels(language.get());
    let field_error = move |field: &'static str| {
        Signal::derive(move || errors.with(|e| e.get(field).map(str::to_string)))
    };

    let switch_language = move |lang: Language| {
        set_language.set(lang);
        set_errors.set(FormErrors::new());
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }

        let submission = GuestSubmission {
            rating: rating.get_untracked(),
            comment: comment.get_untracked(),
            room_number: Some(room.get_untracked()).filter(|r| !r.trim().is_empty()),
            language: language.get_untracked(),
        };
        if let Err(form_errors) = validate_guest(&submission) {
            set_errors.set(form_errors);
            return;
        }

        set_errors.set(FormErrors::new());
        set_submitting.set(true);
        let texts = labels(submission.language);

        spawn_local(async move {
            match api::submit_guest(&submission).await {
                Ok(_) => {
                    state.show_success(texts.submitted);
                    rating.set(0);
                    set_comment.set(String::new());
                    set_room.set(String::new());
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Guest feedback failed: {}", e).into());
                    state.show_error(texts.failed);
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="max-w-xl mx-auto bg-white rounded-xl shadow p-6">
            <div class="flex items-center justify-between mb-6">
                <h1 class="text-2xl font-semibold">{move || text().title}</h1>
                <div class="space-x-1">
                    <LanguageButton label="ENG" lang=Language::Eng current=language on_pick=switch_language />
                    <LanguageButton label="አማ" lang=Language::Amh current=language on_pick=switch_language />
                </div>
            </div>

            <form on:submit=on_submit novalidate>
                <label class="block text-sm font-medium text-gray-700 mb-2">{move || text().rate}</label>
                <StarRating rating=rating error=field_error("rating") />

                <div class="mb-4">
                    <label for="roomNumber" class="block text-sm font-medium text-gray-700 mb-1">
                        {move || text().room}
                    </label>
                    <input
                        id="roomNumber"
                        type="text"
                        class="w-full border rounded-lg px-3 py-2"
                        prop:value=move || room.get()
                        on:input=move |ev| set_room.set(event_target_value(&ev))
                    />
                </div>

                <div class="mb-4">
                    <label for="comment" class="block text-sm font-medium text-gray-700 mb-1">
                        {move || text().comment}
                    </label>
                    <textarea
                        id="comment"
                        rows="4"
                        class="w-full border rounded-lg px-3 py-2"
                        placeholder=move || text().placeholder
                        prop:value=move || comment.get()
                        on:input=move |ev| set_comment.set(event_target_value(&ev))
                    />
                    {move || errors.with(|e| e.get("comment").map(str::to_string)).map(|msg| view! {
                        <p class="text-xs text-red-600 mt-1">{msg}</p>
                    })}
                </div>

                <button
                    type="submit"
                    disabled=move || submitting.get()
                    class="w-full mt-4 bg-emerald-600 hover:bg-emerald-700 disabled:bg-gray-400 text-white rounded-lg py-3 font-semibold transition-colors flex items-center justify-center space-x-2"
                >
                    {move || if submitting.get() {
                        view! { <InlineLoading /> <span>{text().submitting}</span> }.into_view()
                    } else {
                        view! { <span>{text().submit}</span> }.into_view()
                    }}
                </button>
            </form>
        </div>
    }
}

#[component]
fn LanguageButton(
    label: &'static str,
    lang: Language,
    current: ReadSignal<Language>,
    on_pick: impl Fn(Language) + 'static,
) -> impl IntoView {
    view! {
        <button
            type="button"
            on:click=move |_| on_pick(lang)
            class=move || if current.get() == lang {
                "px-3 py-1 rounded text-sm bg-emerald-600 text-white"
            } else {
                "px-3 py-1 rounded text-sm text-gray-600 hover:bg-gray-100"
            }
        >
            {label}
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_language() {
        assert_eq!(labels(Language::Eng).submit, "Submit Feedback");
        assert_eq!(labels(Language::Amh).submitted, "አስተያየትዎ ገብቷል!");
    }
}

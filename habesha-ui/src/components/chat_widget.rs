//! HahuBot Chat Widget
//!
//! Floating chat panel. The transcript model decides what may be sent and
//! how pending replies are resolved; this component only renders it.

use habesha_core::chat::{ChatTranscript, Sender, BOT_NAME};
use leptos::*;

use crate::api;

#[component]
pub fn ChatWidget() -> impl IntoView {
    let (open, set_open) = create_signal(false);
    let transcript = create_rw_signal(ChatTranscript::new());
    let (input, set_input) = create_signal(String::new());

    let send = move || {
        let Some(text) = transcript.try_update(|t| t.begin_send(&input.get_untracked())).flatten()
        else {
            return;
        };
        set_input.set(String::new());

        spawn_local(async move {
            let result = api::send_chat(text).await.map(|reply| reply.reply);
            if let Err(e) = &result {
                web_sys::console::error_1(&format!("Chat request failed: {}", e).into());
            }
            transcript.update(|t| t.resolve(result));
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        send();
    };

    view! {
        <div class="fixed bottom-20 right-4 z-40 flex flex-col items-end">
            <Show when=move || open.get()>
                <div class="w-80 h-96 mb-3 bg-white rounded-xl shadow-xl flex flex-col overflow-hidden">
                    <div class="bg-emerald-700 text-white px-4 py-3 flex items-center justify-between">
                        <span class="font-semibold">{BOT_NAME}</span>
                        <button on:click=move |_| set_open.set(false) aria-label="Close chat">"✕"</button>
                    </div>

                    <div class="flex-1 overflow-y-auto p-3 space-y-2">
                        {move || transcript.with(|t| {
                            t.messages().iter().map(|message| {
                                let (align, bubble) = match message.sender {
                                    Sender::User => ("justify-end", "bg-emerald-600 text-white"),
                                    Sender::Bot => ("justify-start", "bg-gray-100 text-gray-800"),
                                    Sender::Error => ("justify-start", "bg-red-100 text-red-700"),
                                };
                                let pending = if message.pending { " opacity-70 italic" } else { "" };
                                view! {
                                    <div class=format!("flex {}", align)>
                                        <p class=format!(
                                            "max-w-[80%] px-3 py-2 rounded-lg text-sm whitespace-pre-wrap {}{}",
                                            bubble, pending
                                        )>
                                            {message.text.clone()}
                                        </p>
                                    </div>
                                }
                            }).collect_view()
                        })}
                    </div>

                    <form on:submit=on_submit class="border-t p-2 flex space-x-2">
                        <input
                            type="text"
                            placeholder="Type a message..."
                            class="flex-1 border rounded-lg px-3 py-2 text-sm text-gray-800"
                            prop:value=move || input.get()
                            on:input=move |ev| set_input.set(event_target_value(&ev))
                        />
                        <button
                            type="submit"
                            aria-label="Send message"
                            disabled=move || transcript.with(|t| t.is_waiting())
                            class="px-3 py-2 bg-emerald-600 text-white rounded-lg text-sm disabled:bg-gray-400"
                        >
                            "Send"
                        </button>
                    </form>
                </div>
            </Show>

            <button
                on:click=move |_| set_open.update(|o| *o = !*o)
                aria-label="Open chat"
                class="w-14 h-14 rounded-full bg-emerald-600 hover:bg-emerald-700 text-white text-2xl shadow-lg"
            >
                "💬"
            </button>
        </div>
    }
}

//! Landing Page

use leptos::*;
use leptos_router::*;

#[component]
pub fn Home() -> impl IntoView {
    view! {
        <div class="space-y-12">
            <section class="text-center py-16 bg-gradient-to-b from-emerald-50 to-white rounded-xl">
                <h1 class="text-4xl font-bold text-emerald-900 mb-4">"Welcome to Habesha Hospitality Hub"</h1>
                <p class="text-lg text-gray-600 max-w-2xl mx-auto mb-8">
                    "Tell us about your stay. Every rating and comment reaches our team, \
                     and the issues you raise are followed up the same day."
                </p>
                <div class="flex justify-center gap-4">
                    <A
                        href="/feedback"
                        class="px-6 py-3 bg-emerald-600 hover:bg-emerald-700 text-white rounded-lg font-medium transition-colors"
                    >
                        "Share Feedback"
                    </A>
                    <A
                        href="/login"
                        class="px-6 py-3 border border-emerald-600 text-emerald-700 hover:bg-emerald-50 rounded-lg font-medium transition-colors"
                    >
                        "Staff Login"
                    </A>
                </div>
            </section>

            <section class="grid md:grid-cols-3 gap-6">
                <Feature
                    icon="⭐"
                    title="Rate Your Stay"
                    text="Quick star ratings in English or Amharic."
                />
                <Feature
                    icon="📱"
                    title="Scan and Share"
                    text="QR codes in rooms, restaurants and the pool open the right form."
                />
                <Feature
                    icon="💬"
                    title="Ask HahuBot"
                    text="Wi-Fi, breakfast times and check-out answers any time."
                />
            </section>
        </div>
    }
}

#[component]
fn Feature(
    icon: &'static str,
    title: &'static str,
    text: &'static str,
) -> impl IntoView {
    view! {
        <div class="bg-white rounded-xl shadow p-6 text-center">
            <div class="text-4xl mb-3">{icon}</div>
            <h3 class="text-lg font-semibold mb-2">{title}</h3>
            <p class="text-gray-600">{text}</p>
        </div>
    }
}

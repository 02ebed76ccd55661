use crate::usecases::u101_personalize_photo::view::PersonalizePhotoPage;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <PersonalizePhotoPage />
    }
}

use super::api;
use super::state::{PersonalizeState, ResultAsset};
use crate::shared::components::PageHeader;
use crate::shared::export;
use crate::shared::icons::icon;
use crate::shared::media;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u101_personalize_photo::{PersonalizePhoto, RESULT_FILENAME};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;
use wasm_bindgen::JsCast;

#[component]
pub fn PersonalizePhotoPage() -> impl IntoView {
    let state = RwSignal::new(PersonalizeState::new());

    // The raw browser file handle is not part of the serializable view state;
    // it lives next to it for the duration of the selection.
    let file_handle = StoredValue::new_local(None::<web_sys::File>);

    // Shared by the file picker and the drop zone: validate, replace the
    // selection, then decode the preview off the UI thread.
    let handle_file = move |file: web_sys::File| {
        let accepted = state
            .try_update(|s| s.select(&file.name(), &file.type_(), file.size() as u64))
            .flatten();
        let Some(accepted) = accepted else {
            return;
        };
        if let Some(url) = accepted.stale_url {
            media::revoke_object_url(&url);
        }
        file_handle.set_value(Some(file.clone()));

        let token = accepted.token;
        let mime = file.type_();
        spawn_local(async move {
            match media::read_file_bytes(&file).await {
                Ok(bytes) => {
                    let data_uri = media::to_data_uri(&mime, &bytes);
                    state.update(|s| s.preview_ready(token, data_uri));
                }
                Err(message) => {
                    log::warn!("preview decode failed: {}", message);
                    state.update(|s| s.preview_failed(token, message));
                }
            }
        });
    };

    let handle_file_input = move |ev: web_sys::Event| {
        let input = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok());

        if let Some(file) = input.and_then(|i| i.files()).and_then(|files| files.get(0)) {
            handle_file(file);
        }
    };

    let handle_drag_over = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        state.update(|s| s.set_drag_active(true));
    };

    let handle_drag_leave = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        state.update(|s| s.set_drag_active(false));
    };

    let handle_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        state.update(|s| s.set_drag_active(false));
        let file = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0));
        if let Some(file) = file {
            handle_file(file);
        }
    };

    let handle_personalize = move |_| {
        // begin_request is the single-flight gate: it refuses while a request
        // is outstanding or nothing is selected.
        let flight = state.try_update(|s| s.begin_request()).flatten();
        let Some(flight) = flight else {
            return;
        };
        if let Some(url) = flight.stale_url {
            media::revoke_object_url(&url);
        }
        let Some(file) = file_handle.get_value() else {
            state.update(|s| s.request_failed(flight.token, api::FALLBACK_ERROR.to_string()));
            return;
        };

        let token = flight.token;
        spawn_local(async move {
            match api::personalize(&file).await {
                Ok(image) => match media::object_url_for_bytes(&image.bytes, &image.mime) {
                    Ok(object_url) => {
                        let stale = state
                            .try_update(|s| {
                                s.request_succeeded(
                                    token,
                                    ResultAsset {
                                        bytes: image.bytes,
                                        object_url,
                                    },
                                )
                            })
                            .flatten();
                        if let Some(url) = stale {
                            media::revoke_object_url(&url);
                        }
                    }
                    Err(message) => {
                        log::error!("result decode failed: {}", message);
                        state.update(|s| s.request_failed(token, message));
                    }
                },
                Err(message) => {
                    log::error!("personalize request failed: {}", message);
                    state.update(|s| s.request_failed(token, message));
                }
            }
        });
    };

    let handle_download = move |_| {
        let Some(result) = state.with_untracked(|s| s.result.clone()) else {
            return;
        };
        if let Err(message) = export::download_bytes(&result.bytes, "image/png", RESULT_FILENAME) {
            log::error!("download failed: {}", message);
        }
    };

    view! {
        <div class="personalize-page">
            <PageHeader
                title=PersonalizePhoto::display_name().to_string()
                subtitle=PersonalizePhoto::description().to_string()
            >
                <></>
            </PageHeader>

            <div class="card">
                <div
                    class=move || if state.with(|s| s.drag_active) {
                        "upload-area upload-area--dragover"
                    } else {
                        "upload-area"
                    }
                    on:dragover=handle_drag_over
                    on:dragleave=handle_drag_leave
                    on:drop=handle_drop
                >
                    <label class="upload-area__inner" for="photo-input">
                        <div class="upload-area__icon">{icon("image")}</div>
                        <div class="upload-area__text">
                            {move || state.with(|s| match &s.selected {
                                Some(asset) => asset.name.clone(),
                                None => "Click or drag to upload a photo".to_string(),
                            })}
                        </div>
                        <div class="upload-area__hint">
                            "Supports JPG, PNG, and other image formats"
                        </div>
                    </label>
                    <input
                        id="photo-input"
                        type="file"
                        accept="image/*"
                        on:change=handle_file_input
                        class="hidden"
                    />
                </div>

                {move || state.with(|s| s.visible_error()).map(|message| view! {
                    <div class="warning-box warning-box--error">
                        <span class="warning-box__icon">{icon("alert")}</span>
                        <span class="warning-box__text">{message}</span>
                    </div>
                })}

                {move || state.with(|s| s.preview.clone()).map(|preview| view! {
                    <div class="preview-section">
                        <h2 class="preview-section__title">"Preview"</h2>
                        <div class="preview-section__grid">
                            <div class="preview-panel">
                                <div class="preview-panel__label">"Original Photo"</div>
                                <img class="preview-panel__image" src=preview alt="Original photo" />
                            </div>
                            {move || state
                                .with(|s| s.result.as_ref().map(|r| r.object_url.clone()))
                                .map(|object_url| view! {
                                    <div class="preview-panel">
                                        <div class="preview-panel__label">"Personalized Illustration"</div>
                                        <img
                                            class="preview-panel__image"
                                            src=object_url
                                            alt="Personalized illustration"
                                        />
                                    </div>
                                })}
                        </div>
                    </div>
                })}

                <div class="personalize-page__actions">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=handle_personalize
                        disabled=Signal::derive(move || !state.with(|s| s.can_submit()))
                    >
                        {icon("sparkles")}
                        " Personalize Illustration"
                    </Button>
                    <Show when=move || state.with(|s| s.in_flight())>
                        <Space gap=SpaceGap::Small>
                            <Spinner />
                            <span class="personalize-page__busy">"Processing..."</span>
                        </Space>
                    </Show>
                    <Show when=move || state.with(|s| s.result.is_some())>
                        <Button
                            appearance=ButtonAppearance::Secondary
                            on_click=handle_download
                        >
                            {icon("download")}
                            " Download Result"
                        </Button>
                    </Show>
                </div>
            </div>
        </div>
    }
}

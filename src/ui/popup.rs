/// Popup UI for the barcode generator extension

use crate::error::Error;
use crate::history::{HistoryItem, HistoryStore};
use crate::preferences::{DisplaySettings, PreferencesStore};
use crate::render::generate;
use crate::sample::{DefaultValue, OsRandom, default_value, random_sample};
use crate::storage;
use crate::symbology::Symbology;
use crate::ui::bridge::{self, CANVAS_ID, CanvasRenderer};
use crate::ui::components::{Hint, Toast, ToastKind, ToastView};
use crate::ui::history_panel::HistoryPanel;
use patternfly_yew::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// Shows a toast and dismisses it after its kind's duration, unless a newer
/// toast has replaced it by then
#[derive(Clone)]
struct Notifier {
    toast: UseStateHandle<Option<Toast>>,
    counter: Rc<RefCell<u32>>,
}

impl Notifier {
    fn show(&self, kind: ToastKind, message: impl Into<String>) {
        let id = {
            let mut counter = self.counter.borrow_mut();
            *counter += 1;
            *counter
        };

        self.toast.set(Some(Toast {
            id,
            kind,
            message: message.into(),
        }));

        let toast = self.toast.clone();
        let counter = self.counter.clone();
        spawn_local(async move {
            bridge::wait_ms(kind.duration_ms()).await;
            if *counter.borrow() == id {
                toast.set(None);
            }
        });
    }

    fn success(&self, message: impl Into<String>) {
        self.show(ToastKind::Success, message);
    }

    fn error(&self, message: impl Into<String>) {
        self.show(ToastKind::Error, message);
    }
}

/// Validate, render, and record one barcode
fn run_generation(
    symbology: &Symbology,
    text: &str,
    settings: &DisplaySettings,
) -> Result<(), Error> {
    let options = generate(&mut CanvasRenderer, symbology, text, settings)?;

    // History is best-effort: a failed write never hides a good barcode
    let recorded = bridge::thumbnail().and_then(|thumbnail| {
        HistoryStore::new(storage::open_default()).record(
            symbology.clone(),
            options.text.clone(),
            thumbnail,
            settings.clone(),
        )
    });
    if let Err(e) = recorded {
        log::error!("Failed to save history: {}", e);
    }

    Ok(())
}

/// The toast for a finished generation: the error on failure, otherwise
/// `on_success` when the caller asked for one
fn generation_toast(
    outcome: &Result<(), Error>,
    on_success: Option<&str>,
) -> Option<(ToastKind, String)> {
    match outcome {
        Ok(()) => on_success.map(|message| (ToastKind::Success, message.to_string())),
        Err(e) => Some((ToastKind::Error, e.user_message())),
    }
}

fn save_preferences(settings: &DisplaySettings) {
    if let Err(e) = PreferencesStore::new(storage::open_default()).save(settings) {
        log::error!("Failed to save preferences: {}", e);
    }
}

fn load_history() -> Vec<HistoryItem> {
    HistoryStore::new(storage::open_default()).list()
}

#[function_component(App)]
pub fn app() -> Html {
    let symbology = use_state(Symbology::default);
    let text = use_state(String::new);
    let settings = use_state(DisplaySettings::default);
    let dark_mode = use_state(|| false);
    let has_result = use_state(|| false);
    let options_expanded = use_state(|| true);
    let history_open = use_state(|| false);
    let history_items = use_state(Vec::new);
    let toast = use_state(|| None::<Toast>);
    let toast_counter = use_mut_ref(|| 0u32);

    let notifier = Notifier {
        toast: toast.clone(),
        counter: toast_counter.clone(),
    };

    // Load preferences and the initial default value on mount
    {
        let symbology = symbology.clone();
        let text = text.clone();
        let settings = settings.clone();
        let dark_mode = dark_mode.clone();
        let notifier = notifier.clone();

        use_effect_with((), move |_| {
            let prefs = PreferencesStore::new(storage::open_default());
            settings.set(prefs.load());

            let is_dark = prefs.load_dark_mode();
            bridge::apply_dark_mode(is_dark);
            dark_mode.set(is_dark);

            let current = (*symbology).clone();
            spawn_local(async move {
                text.set(resolve_default(&current, &notifier).await);
            });
            || ()
        });
    }

    // Generate handler, shared by the button, Enter key, history "Use" and random sample.
    // The optional message is shown only when generation succeeds.
    let do_generate = {
        let has_result = has_result.clone();
        let history_open = history_open.clone();
        let history_items = history_items.clone();
        let notifier = notifier.clone();

        Callback::from(
            move |(symbology, text, settings, on_success): (
                Symbology,
                String,
                DisplaySettings,
                Option<&'static str>,
            )| {
                let outcome = run_generation(&symbology, &text, &settings);
                match &outcome {
                    Ok(()) => {
                        has_result.set(true);
                        if *history_open {
                            history_items.set(load_history());
                        }
                    }
                    Err(e) => {
                        log::warn!("Generation failed: {}", e);
                        has_result.set(false);
                    }
                }

                if let Some((kind, message)) = generation_toast(&outcome, on_success) {
                    notifier.show(kind, message);
                }
            },
        )
    };

    let on_generate = {
        let do_generate = do_generate.clone();
        let symbology = symbology.clone();
        let text = text.clone();
        let settings = settings.clone();

        Callback::from(move |_: ()| {
            do_generate.emit((
                (*symbology).clone(),
                (*text).clone(),
                (*settings).clone(),
                None,
            ));
        })
    };

    let on_keypress = {
        let on_generate = on_generate.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                on_generate.emit(());
            }
        })
    };

    let on_text_input = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                text.set(input.value());
            }
        })
    };

    // Switching symbology replaces the input with that symbology's default
    let on_symbology_change = {
        let symbology = symbology.clone();
        let text = text.clone();
        let notifier = notifier.clone();

        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let selected = Symbology::from_bcid(&select.value());
            symbology.set(selected.clone());

            let text = text.clone();
            let notifier = notifier.clone();
            spawn_local(async move {
                text.set(resolve_default(&selected, &notifier).await);
            });
        })
    };

    let on_use_url = {
        let symbology = symbology.clone();
        let text = text.clone();
        let notifier = notifier.clone();

        Callback::from(move |_: MouseEvent| {
            let symbology = symbology.clone();
            let text = text.clone();
            let notifier = notifier.clone();
            spawn_local(async move {
                match bridge::current_tab_url().await {
                    Ok(url) => {
                        text.set(url);
                        symbology.set(Symbology::QrCode);
                    }
                    Err(e) => notifier.error(format!("Failed to get current URL: {}", e)),
                }
            });
        })
    };

    let on_manual = {
        let text = text.clone();
        Callback::from(move |_: MouseEvent| text.set(String::new()))
    };

    let on_random = {
        let do_generate = do_generate.clone();
        let symbology = symbology.clone();
        let text = text.clone();
        let settings = settings.clone();

        Callback::from(move |_: MouseEvent| {
            let sample = random_sample(&symbology, &mut OsRandom);
            text.set(sample.clone());
            do_generate.emit(((*symbology).clone(), sample, (*settings).clone(), None));
        })
    };

    // Settings controls: every change is persisted immediately
    let update_settings = {
        let settings = settings.clone();
        move |apply: fn(&mut DisplaySettings, &HtmlInputElement)| {
            let settings = settings.clone();
            Callback::from(move |e: Event| {
                let input: HtmlInputElement = e.target_unchecked_into();
                let mut next = (*settings).clone();
                apply(&mut next, &input);
                save_preferences(&next);
                settings.set(next);
            })
        }
    };
    let on_scale_change = update_settings(|s, input| s.scale = DisplaySettings::parse_scale(&input.value()));
    let on_show_text_change = update_settings(|s, input| s.show_text = input.checked());
    let on_fg_change = update_settings(|s, input| s.fg_color = input.value());
    let on_bg_change = update_settings(|s, input| s.bg_color = input.value());

    let on_download = {
        let symbology = symbology.clone();
        let notifier = notifier.clone();
        Callback::from(move |_: MouseEvent| {
            bridge::download_png(&symbology);
            notifier.success("Barcode downloaded!");
        })
    };

    let on_download_svg = {
        let symbology = symbology.clone();
        let notifier = notifier.clone();
        Callback::from(move |_: MouseEvent| match bridge::download_svg(&symbology) {
            Ok(()) => notifier.success("Barcode downloaded as SVG!"),
            Err(e) => notifier.error(format!("SVG export failed: {}", e)),
        })
    };

    let on_copy = {
        let notifier = notifier.clone();
        Callback::from(move |_: MouseEvent| {
            let notifier = notifier.clone();
            spawn_local(async move {
                match bridge::copy_to_clipboard().await {
                    Ok(()) => notifier.success("Barcode copied to clipboard!"),
                    Err(e) => notifier.error(format!("Failed to copy to clipboard: {}", e)),
                }
            });
        })
    };

    let on_print = {
        let notifier = notifier.clone();
        Callback::from(move |_: MouseEvent| match bridge::print() {
            Ok(()) => notifier.success("Print dialog opened!"),
            Err(e) => notifier.error(format!("Failed to print: {}", e)),
        })
    };

    let on_toggle_dark = {
        let dark_mode = dark_mode.clone();
        Callback::from(move |_: MouseEvent| {
            let enabled = !*dark_mode;
            bridge::apply_dark_mode(enabled);
            let mut prefs = PreferencesStore::new(storage::open_default());
            if let Err(e) = prefs.save_dark_mode(enabled) {
                log::error!("Failed to save theme: {}", e);
            }
            dark_mode.set(enabled);
        })
    };

    let on_toggle_options = {
        let options_expanded = options_expanded.clone();
        Callback::from(move |_: MouseEvent| options_expanded.set(!*options_expanded))
    };

    let on_toggle_history = {
        let history_open = history_open.clone();
        let history_items = history_items.clone();
        Callback::from(move |_: MouseEvent| {
            let open = !*history_open;
            if open {
                history_items.set(load_history());
            }
            history_open.set(open);
        })
    };

    let on_close_history = {
        let history_open = history_open.clone();
        Callback::from(move |_: ()| history_open.set(false))
    };

    // Regenerate a past barcode with the settings it was made with
    let on_use_history = {
        let symbology = symbology.clone();
        let text = text.clone();
        let settings = settings.clone();
        let do_generate = do_generate.clone();

        Callback::from(move |id: i64| {
            let Some(item) = HistoryStore::new(storage::open_default()).get(id) else {
                return;
            };

            symbology.set(item.symbology.clone());
            text.set(item.text.clone());
            settings.set(item.settings.clone());
            do_generate.emit((
                item.symbology,
                item.text,
                item.settings,
                Some("Barcode regenerated from history!"),
            ));
        })
    };

    let on_delete_history = {
        let history_items = history_items.clone();
        let notifier = notifier.clone();

        Callback::from(move |id: i64| {
            let mut history = HistoryStore::new(storage::open_default());
            match history.delete(id) {
                Ok(_) => {
                    history_items.set(history.list());
                    notifier.success("Item deleted from history!");
                }
                Err(e) => notifier.error(format!("Failed to delete: {}", e)),
            }
        })
    };

    let on_clear_history = {
        let history_items = history_items.clone();
        let notifier = notifier.clone();

        Callback::from(move |_: ()| {
            if !bridge::confirm("Are you sure you want to clear all history?") {
                return;
            }
            match HistoryStore::new(storage::open_default()).clear() {
                Ok(()) => {
                    history_items.set(Vec::new());
                    notifier.success("History cleared!");
                }
                Err(e) => notifier.error(format!("Failed to clear history: {}", e)),
            }
        })
    };

    html! {
        <div class="padding-20">
            <div class="popup-header">
                <h1 class="popup-title">{"Barcode Generator"}</h1>
                <Button onclick={on_toggle_history} variant={ButtonVariant::Secondary}>
                    {"🕘"}
                </Button>
                <Button onclick={on_toggle_dark} variant={ButtonVariant::Secondary}>
                    {if *dark_mode { "☀️" } else { "🌙" }}
                </Button>
            </div>

            if *history_open {
                <HistoryPanel
                    items={(*history_items).clone()}
                    on_use={on_use_history}
                    on_delete={on_delete_history}
                    on_clear={on_clear_history}
                    on_close={on_close_history}
                />
            }

            <div class="flex-column-gap">
                <select class="barcode-type" onchange={on_symbology_change}>
                    {for Symbology::KNOWN.iter().map(|s| html! {
                        <option value={s.bcid().to_string()} selected={*s == *symbology}>
                            {s.display_name()}
                        </option>
                    })}
                </select>

                <div class="input-source">
                    <Button onclick={on_use_url} variant={ButtonVariant::Secondary}>
                        {"Use Current URL"}
                    </Button>
                    <Button onclick={on_manual} variant={ButtonVariant::Secondary}>
                        {"Manual"}
                    </Button>
                </div>

                <input
                    type="text"
                    class="text-input"
                    placeholder={symbology.placeholder()}
                    value={(*text).clone()}
                    oninput={on_text_input}
                    onkeypress={on_keypress}
                />
                <Hint text={symbology.hint()} />

                <div class="options-section">
                    <div class="options-header">
                        <span>{"Options"}</span>
                        <button class="options-toggle" onclick={on_toggle_options}>
                            {if *options_expanded { "▲" } else { "▼" }}
                        </button>
                    </div>
                    if *options_expanded {
                        <div class="options-content">
                            <label>
                                {format!("Scale: {}", settings.scale)}
                                <input type="range" min="1" max="10" step="0.5"
                                    value={settings.scale.to_string()}
                                    onchange={on_scale_change} />
                            </label>
                            <label>
                                <input type="checkbox" checked={settings.show_text}
                                    onchange={on_show_text_change} />
                                {"Show text"}
                            </label>
                            <label>
                                {"Bars"}
                                <input type="color" value={settings.fg_color.clone()}
                                    onchange={on_fg_change} />
                            </label>
                            <label>
                                {"Background"}
                                <input type="color" value={settings.bg_color.clone()}
                                    onchange={on_bg_change} />
                            </label>
                        </div>
                    }
                </div>

                <div class="generate-actions">
                    <Button onclick={on_generate.reform(|_: MouseEvent| ())} variant={ButtonVariant::Primary} block={true}>
                        {"Generate Barcode"}
                    </Button>
                    <Button onclick={on_random} variant={ButtonVariant::Secondary} block={true}>
                        {"🎲 Random Sample"}
                    </Button>
                </div>
            </div>

            <ToastView toast={(*toast).clone()} />

            <div class="result" style={if *has_result { "display: block;" } else { "display: none;" }}>
                <canvas id={CANVAS_ID}></canvas>
                <div class="export-actions">
                    <Button onclick={on_download} variant={ButtonVariant::Secondary}>{"PNG"}</Button>
                    <Button onclick={on_download_svg} variant={ButtonVariant::Secondary}>{"SVG"}</Button>
                    <Button onclick={on_copy} variant={ButtonVariant::Secondary}>{"Copy"}</Button>
                    <Button onclick={on_print} variant={ButtonVariant::Secondary}>{"Print"}</Button>
                </div>
            </div>

            <p class="footer-popup">
                {"Barcode Generator v0.1.0"}
            </p>
        </div>
    }
}

/// Default text for `symbology`; the tab URL for QR codes, empty if it cannot be read
async fn resolve_default(symbology: &Symbology, notifier: &Notifier) -> String {
    match default_value(symbology, &mut OsRandom) {
        DefaultValue::Fixed(value) => value,
        DefaultValue::ActiveTabUrl => match bridge::current_tab_url().await {
            Ok(url) => url,
            Err(e) => {
                log::warn!("Active tab URL unavailable: {}", e);
                notifier.show(ToastKind::Warning, format!("Failed to get current URL: {}", e));
                String::new()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderFailure;

    #[test]
    fn test_failed_generation_reports_only_the_error() {
        let outcome = Err(Error::Render(RenderFailure::new("Unknown encoder foo")));
        let toast = generation_toast(&outcome, Some("Barcode regenerated from history!"));

        assert_eq!(
            toast,
            Some((
                ToastKind::Error,
                "Error generating barcode: Unknown encoder foo".to_string()
            ))
        );
    }

    #[test]
    fn test_successful_generation_uses_caller_message() {
        assert_eq!(
            generation_toast(&Ok(()), Some("Barcode regenerated from history!")),
            Some((ToastKind::Success, "Barcode regenerated from history!".to_string()))
        );
        assert_eq!(generation_toast(&Ok(()), None), None);
    }
}

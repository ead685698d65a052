/// Reusable UI components

use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

impl ToastKind {
    /// How long the message stays before it dismisses itself
    pub fn duration_ms(&self) -> u32 {
        match self {
            ToastKind::Success => 2000,
            ToastKind::Warning | ToastKind::Error => 5000,
        }
    }
}

/// A transient message. `id` tells a stale dismiss timer from a current one.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Properties, PartialEq)]
pub struct ToastViewProps {
    pub toast: Option<Toast>,
}

#[function_component(ToastView)]
pub fn toast_view(props: &ToastViewProps) -> Html {
    let Some(toast) = &props.toast else {
        return html! {};
    };

    let (bg_color, border_color, class) = match toast.kind {
        ToastKind::Success => ("#e8f5e9", "#4caf50", "success-message"),
        ToastKind::Warning => ("#fff3e0", "#ff9800", "warning-message"),
        ToastKind::Error => ("#ffebee", "#f44336", "error-message"),
    };

    html! {
        <div
            class={class}
            style={format!("padding: 12px; border-radius: 4px; background-color: {}; border-left: 4px solid {}; margin: 10px 0;", bg_color, border_color)}
        >
            <p class="message-paragraph">{&toast.message}</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct HintProps {
    #[prop_or_default]
    pub text: Option<&'static str>,
}

/// Format hint under the text input, hidden when the symbology has none
#[function_component(Hint)]
pub fn hint(props: &HintProps) -> Html {
    match props.text {
        Some(text) => html! {
            <div class="barcode-hint">{format!("ℹ️ {}", text)}</div>
        },
        None => html! {},
    }
}

/// History panel: past generations with "Use" and "Delete" actions

use crate::history::HistoryItem;
use patternfly_yew::prelude::*;
use wasm_bindgen::JsValue;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct HistoryPanelProps {
    pub items: Vec<HistoryItem>,
    pub on_use: Callback<i64>,
    pub on_delete: Callback<i64>,
    pub on_clear: Callback<()>,
    pub on_close: Callback<()>,
}

#[function_component(HistoryPanel)]
pub fn history_panel(props: &HistoryPanelProps) -> Html {
    html! {
        <div class="history-panel">
            <div class="history-header">
                <h2 class="history-title">{"History"}</h2>
                <Button onclick={props.on_clear.reform(|_: MouseEvent| ())} variant={ButtonVariant::Danger}>
                    {"Clear"}
                </Button>
                <Button onclick={props.on_close.reform(|_: MouseEvent| ())} variant={ButtonVariant::Secondary}>
                    {"✗"}
                </Button>
            </div>

            if props.items.is_empty() {
                <div class="empty-state">
                    {"No history yet. Generate some barcodes!"}
                </div>
            } else {
                <div class="history-list">
                    {for props.items.iter().map(|item| html! {
                        <HistoryRow
                            key={item.id.to_string()}
                            item={item.clone()}
                            on_use={props.on_use.clone()}
                            on_delete={props.on_delete.clone()}
                        />
                    })}
                </div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct HistoryRowProps {
    item: HistoryItem,
    on_use: Callback<i64>,
    on_delete: Callback<i64>,
}

#[function_component(HistoryRow)]
fn history_row(props: &HistoryRowProps) -> Html {
    let item = &props.item;
    let id = item.id;

    html! {
        <div class="history-item">
            <img
                src={item.thumbnail.to_data_url()}
                alt="Barcode thumbnail"
                class="history-thumbnail"
            />
            <div class="history-item-info">
                <div class="history-item-type">{item.symbology.display_name()}</div>
                <div class="history-item-text">{item.preview_text()}</div>
                <div class="history-item-time">{format_local_time(item.created_at.timestamp_millis())}</div>
            </div>
            <div class="history-item-actions">
                <Button onclick={props.on_use.reform(move |_: MouseEvent| id)} variant={ButtonVariant::Secondary}>
                    {"Use"}
                </Button>
                <Button onclick={props.on_delete.reform(move |_: MouseEvent| id)} variant={ButtonVariant::Danger}>
                    {"Delete"}
                </Button>
            </div>
        </div>
    }
}

fn format_local_time(millis: i64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(millis as f64));
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date(),
        date.get_hours(),
        date.get_minutes(),
        date.get_seconds()
    )
}

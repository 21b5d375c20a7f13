use iced::widget::{button, scrollable, text, Column};
use iced::{Element, Length};

use crate::state::data::LocationResult;
use crate::Message;

/// Scrollable list of search results. The entry named `selected` is
/// highlighted; pressing any entry emits `on_select`.
pub fn result_list<'a>(
    results: Vec<&'a LocationResult>,
    selected: Option<&str>,
    on_select: fn(LocationResult) -> Message,
) -> Element<'a, Message> {
    if results.is_empty() {
        return text("Sonuç bulunamadı").size(14).into();
    }

    let entries = results.into_iter().map(|location| {
        let style = if selected == Some(location.id.as_str()) {
            button::primary
        } else {
            button::secondary
        };

        Element::from(
            button(text(location.text.as_str()))
                .on_press(on_select(location.clone()))
                .width(Length::Fill)
                .style(style),
        )
    });

    scrollable(Column::with_children(entries).spacing(4))
        .height(Length::Fixed(160.0))
        .into()
}

/// Link-style button that saves a hand-typed district
pub fn save_as_button<'a>(location: LocationResult) -> Element<'a, Message> {
    button(text(format!("\"{}\" olarak kaydet", location.text)).size(14))
        .on_press(Message::DistrictSelected(location))
        .style(button::text)
        .into()
}

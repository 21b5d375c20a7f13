use iced::widget::{column, container, row, text, Column, Row};
use iced::{Alignment, Color, Element, Length};

use crate::prayer::PrayerName;
use crate::state::display::DisplayState;
use crate::Message;

/// The next prayer is highlighted once it is this close
const SOON_MINUTES: u32 = 15;

/// Amber used for "estimated data" notices
const WARNING_COLOR: Color = Color {
    r: 0.96,
    g: 0.62,
    b: 0.04,
    a: 1.0,
};

/// One prayer: label, time and an active/next badge
fn prayer_card<'a>(prayer: PrayerName, time: &'a str, is_active: bool, is_next: bool) -> Element<'a, Message> {
    let badge = if is_active {
        "Şu an"
    } else if is_next {
        "Sıradaki"
    } else {
        ""
    };

    let content = column![
        text(prayer.label()).size(18),
        text(time).size(32),
        text(badge).size(14),
    ]
    .spacing(6)
    .align_x(Alignment::Center);

    let card = container(content)
        .padding(16)
        .width(Length::Fill)
        .center_x(Length::Fill);

    if is_active {
        card.style(container::rounded_box).into()
    } else if is_next {
        card.style(container::bordered_box).into()
    } else {
        card.into()
    }
}

/// Two rows of three cards in daily order
pub fn prayer_grid(display: &DisplayState) -> Element<'_, Message> {
    let Some(schedule) = &display.schedule else {
        return text("Namaz vakitleri yükleniyor...").into();
    };

    let current = display.resolved.and_then(|resolved| resolved.current);
    let next = display.resolved.map(|resolved| resolved.next);

    let card_row = |prayers: &[PrayerName]| {
        Row::with_children(prayers.iter().map(|&prayer| {
            prayer_card(
                prayer,
                schedule.times.get(prayer),
                current == Some(prayer),
                next == Some(prayer),
            )
        }))
        .spacing(12)
    };

    Column::new()
        .push(card_row(&PrayerName::ALL[..3]))
        .push(card_row(&PrayerName::ALL[3..]))
        .spacing(12)
        .into()
}

/// "Yatsı vaktine 1s 15dk" plus the estimate / error notices
pub fn countdown_banner(display: &DisplayState) -> Element<'_, Message> {
    let mut banner = Column::new().spacing(6).align_x(Alignment::Center);

    if let (Some(resolved), Some(countdown)) = (display.resolved, display.countdown_text()) {
        let mut remaining = text(countdown).size(20);
        if display.minutes_to_next.is_some_and(|minutes| minutes <= SOON_MINUTES) {
            remaining = remaining.color(WARNING_COLOR);
        }

        banner = banner.push(
            row![text(format!("{} vaktine", resolved.next.label())).size(20), remaining].spacing(8),
        );
    }

    if display.is_degraded {
        banner = banner.push(
            text("API'ye ulaşılamadı. Gösterilen vakitler tahminidir.")
                .size(14)
                .color(WARNING_COLOR),
        );
    }

    if let Some(error) = &display.error {
        banner = banner.push(
            text(format!("Namaz vakitleri okunamadı: {}", error))
                .size(14)
                .color(WARNING_COLOR),
        );
    }

    banner.into()
}

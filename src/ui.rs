#[allow(unused_imports)]
use log::{debug, info, warn, error};

use iced::alignment::{Horizontal, Vertical};
use iced::font::Weight;
use iced::widget::{
    center, column, container, horizontal_space, image as image_widget, opaque, progress_bar,
    row, shader, stack, text,
};
use iced::{Alignment, Color, ContentFit, Element, Font, Length, Padding};

use crate::app::{HoverLens, Message};
use crate::loading::LoadingPhase;
use crate::panel::HoverPanel;
use crate::sprite_cache::SpriteCache;

const PANEL_IMAGE_HEIGHT: f32 = 180.0;
const EDGE_MARGIN: f32 = 8.0;

fn bold() -> Font {
    Font {
        weight: Weight::Bold,
        ..Font::DEFAULT
    }
}

fn dim_text(_theme: &iced::Theme) -> text::Style {
    text::Style {
        color: Some(Color::from_rgb(0.75, 0.75, 0.78)),
    }
}

fn accent_text(_theme: &iced::Theme) -> text::Style {
    text::Style {
        color: Some(Color::from_rgb(0.95, 0.84, 0.55)),
    }
}

pub fn build_ui(app: &HoverLens) -> Element<'_, Message> {
    let scene = shader(&app.canvas).width(Length::Fill).height(Length::Fill);

    let mut layers = stack![scene].width(Length::Fill).height(Length::Fill);

    if let Some(panel) = app.hovered_panel() {
        if let Some(layer) = panel_layer(app, panel) {
            layers = layers.push(layer);
        }
    }

    if app.phase != LoadingPhase::Ready {
        layers = layers.push(loading_overlay(&app.phase));
    }

    let mut content = column![layers].width(Length::Fill).height(Length::Fill);
    if app.show_footer {
        content = content.push(footer(app));
    }
    content.into()
}

/// The floating data panel, offset inside a full-size transparent layer
/// so it lands under the projected anchor point of the hovered object.
fn panel_layer<'a>(app: &'a HoverLens, panel: &'a HoverPanel) -> Option<Element<'a, Message>> {
    let object = app.scene.objects.get(panel.object_index)?;
    let anchor = object.panel_anchor(app.panel_offset);
    let (x, y) = app.canvas.camera.world_to_screen(anchor, app.viewport)?;

    let width = app.panel_max_width.min(app.viewport.0 - EDGE_MARGIN * 2.0);
    let left = (x - width / 2.0).clamp(EDGE_MARGIN, (app.viewport.0 - width - EDGE_MARGIN).max(EDGE_MARGIN));
    let top = y.clamp(EDGE_MARGIN, (app.viewport.1 * 0.6).max(EDGE_MARGIN));

    Some(
        container(panel_card(panel, &app.sprites, width))
            .padding(Padding {
                top,
                right: 0.0,
                bottom: 0.0,
                left,
            })
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
    )
}

fn panel_card<'a>(
    panel: &'a HoverPanel,
    sprites: &'a SpriteCache,
    width: f32,
) -> Element<'a, Message> {
    let Some(entry) = panel.current_entry() else {
        return column![].into();
    };

    let mut content = column![
        text(&entry.name).size(20).font(bold()),
        text(panel.year_label()).size(13).style(accent_text),
    ]
    .spacing(6);

    if !entry.description1.is_empty() {
        content = content.push(text(&entry.description1).size(14));
    }
    if !entry.description2.is_empty() {
        content = content.push(text(&entry.description2).size(14).style(dim_text));
    }

    if let Some(file_name) = panel.current_image_file() {
        content = content.push(match sprites.get(file_name) {
            Some(sprite) => Element::from(
                image_widget(sprite.handle.clone())
                    .content_fit(ContentFit::Contain)
                    .width(Length::Fill)
                    .height(Length::Fixed(PANEL_IMAGE_HEIGHT)),
            ),
            None => Element::from(
                container(text("image unavailable").size(12).style(dim_text))
                    .width(Length::Fill)
                    .height(Length::Fixed(60.0))
                    .align_x(Horizontal::Center)
                    .align_y(Vertical::Center)
                    .style(|_theme| container::Style {
                        background: Some(Color::from_rgb(0.3, 0.3, 0.3).into()),
                        ..container::Style::default()
                    }),
            ),
        });

        if let Some(counter) = panel.image_counter_label() {
            content = content.push(text(counter).size(12).style(dim_text));
        }
    }

    container(content)
        .padding(12)
        .width(Length::Fixed(width))
        .style(|_theme| container::Style {
            background: Some(
                Color {
                    a: 0.88,
                    ..Color::from_rgb(0.07, 0.08, 0.1)
                }
                .into(),
            ),
            border: iced::Border {
                color: Color::from_rgb(0.35, 0.35, 0.4),
                width: 1.0,
                radius: 8.0.into(),
            },
            ..container::Style::default()
        })
        .into()
}

/// Dims the scene and shows loading progress, or the failure reason.
fn loading_overlay<'a>(phase: &LoadingPhase) -> Element<'a, Message> {
    let inner: Element<'a, Message> = match phase {
        LoadingPhase::Failed(reason) => column![
            text("Failed to load dataset").size(20).font(bold()),
            text(reason.clone()).size(14).style(dim_text),
        ]
        .spacing(8)
        .align_x(Alignment::Center)
        .into(),
        phase => column![
            text(phase.label()).size(16),
            container(progress_bar(0.0..=1.0, phase.progress())).width(Length::Fixed(320.0)),
        ]
        .spacing(12)
        .align_x(Alignment::Center)
        .into(),
    };

    opaque(center(inner).style(|_theme| container::Style {
        background: Some(
            Color {
                a: 0.7,
                ..Color::BLACK
            }
            .into(),
        ),
        ..container::Style::default()
    }))
}

fn footer(app: &HoverLens) -> Element<'_, Message> {
    let status = match app
        .dispatcher
        .current()
        .and_then(|index| app.scene.objects.get(index))
    {
        Some(object) => format!("hovering: {}", object.name),
        None => String::from("hover an object for details"),
    };

    let stats = format!(
        "{} entries | {} tags | {} sprites",
        app.index.entry_count(),
        app.index.tag_count(),
        app.sprites.len()
    );

    container(
        row![
            text(status).size(14).font(Font::MONOSPACE).style(dim_text),
            horizontal_space(),
            text(stats).size(14).font(Font::MONOSPACE).style(dim_text),
        ]
        .align_y(Alignment::Center)
        .spacing(3),
    )
    .width(Length::Fill)
    .height(32)
    .padding(6)
    .into()
}

//! "Place Object" button overlay.

use app::LOG_PLACEMENT;
use bevy::prelude::*;

pub const NORMAL_BUTTON: Color = Color::srgb(0.15, 0.15, 0.15);
pub const HOVERED_BUTTON: Color = Color::srgb(0.25, 0.25, 0.25);
pub const PRESSED_BUTTON: Color = Color::srgb(0.35, 0.75, 0.35);

/// Plugin for the place button
pub(super) struct PlaceButtonPlugin;

impl Plugin for PlaceButtonPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PlaceObjectRequested>()
            .add_systems(Startup, spawn_ui)
            .add_systems(Update, handle_button_interactions);
    }
}

/// Marker component for the place button; hidden while a model is loading
#[derive(Component)]
pub struct PlaceObjectButton;

/// Written when the user presses the place button
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct PlaceObjectRequested;

fn spawn_ui(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                align_items: AlignItems::End,
                justify_content: JustifyContent::Center,
                padding: UiRect::bottom(Val::Px(40.0)),
                ..default()
            },
            Name::new("Place Object UI Root"),
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Button,
                    PlaceObjectButton,
                    Node {
                        width: Val::Px(220.0),
                        height: Val::Px(60.0),
                        border: UiRect::all(Val::Px(3.0)),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BorderColor::all(Color::BLACK),
                    BorderRadius::all(Val::Px(10.0)),
                    BackgroundColor(NORMAL_BUTTON),
                    Name::new("Place Object Button"),
                ))
                .with_children(|button| {
                    button.spawn((
                        Text::new("Place Object"),
                        TextFont {
                            font_size: 26.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.9, 0.9, 0.9)),
                    ));
                });
        });
}

/// Handles hover/press colors and turns presses into [`PlaceObjectRequested`]
fn handle_button_interactions(
    mut interaction_query: Query<
        (&Interaction, &mut BackgroundColor, &mut BorderColor),
        (Changed<Interaction>, With<PlaceObjectButton>),
    >,
    mut requests: MessageWriter<PlaceObjectRequested>,
) {
    for (interaction, mut color, mut border_color) in &mut interaction_query {
        match *interaction {
            Interaction::Pressed => {
                *color = PRESSED_BUTTON.into();
                *border_color = BorderColor::all(Color::WHITE);
                debug!(target: LOG_PLACEMENT, "Place button pressed");
                requests.write(PlaceObjectRequested);
            }
            Interaction::Hovered => {
                *color = HOVERED_BUTTON.into();
                *border_color = BorderColor::all(Color::WHITE);
            }
            Interaction::None => {
                *color = NORMAL_BUTTON.into();
                *border_color = BorderColor::all(Color::BLACK);
            }
        }
    }
}

/// Shows or hides every place button.
pub(super) fn set_button_visible(
    buttons: &mut Query<&mut Visibility, With<PlaceObjectButton>>,
    visible: bool,
) {
    let next = if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut visibility in buttons.iter_mut() {
        visibility.set_if_neq(next);
    }
}

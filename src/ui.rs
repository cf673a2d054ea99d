use bevy::prelude::*;
use bevy::ui::BackgroundColor;

use gridstamp::grid::GridIndex;
use gridstamp::preview::PreviewPool;
use gridstamp::session::{HapticPulse, PlacementSession};

#[derive(Component)]
pub struct StatusText;

const HELP: &str = "WASD/QE hand  G grab  P place  hold Space paint  R release  Esc cancel  \
arrows rotate  I/K reach";

pub fn spawn_status_hud(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            padding: UiRect::all(Val::Px(6.0)),
            ..default()
        },
        BackgroundColor(Color::linear_rgba(0.0, 0.0, 0.0, 0.6)),
    ))
    .with_children(|parent| {
        parent.spawn((
            Text::new(HELP),
            TextFont { font_size: 16.0, ..default() },
            TextColor(Color::WHITE),
            StatusText,
        ));
    });
}

pub fn update_status_hud(
    session: Res<PlacementSession>,
    grid: Option<Res<GridIndex>>,
    pool: Option<Res<PreviewPool>>,
    mut text: Query<&mut Text, With<StatusText>>,
) {
    let Ok(mut text) = text.single_mut() else { return; };
    let (yaw, pitch) = session.yaw_pitch();
    let occupants = grid.as_ref().map_or(0, |g| g.unique_occupants().len());
    let ghosts = pool.as_ref().map_or(0, |p| p.active_count());
    text.0 = format!(
        "{:?}  path {}  reach {:.2}  yaw {:.0} pitch {:.0}\nplaced {}  ghosts {}\n{}",
        session.phase(),
        session.path().len(),
        session.reach(),
        yaw,
        pitch,
        occupants,
        ghosts,
        HELP,
    );
}

/// No controller hardware here: pulses go to the log.
pub fn log_haptic_pulses(mut pulses: EventReader<HapticPulse>) {
    for pulse in pulses.read() {
        debug!(
            "Haptic: {:?} hand, amplitude {:.2} for {:.2}s",
            pulse.hand, pulse.amplitude, pulse.duration
        );
    }
}

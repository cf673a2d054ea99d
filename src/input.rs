use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::input::{mouse::MouseMotion, keyboard::KeyCode, ButtonInput};

use gridstamp::prefab::Placeable;
use gridstamp::session::{Controller, Hand, Held, PlacementCommand, PlacementInput};

use crate::actions::{EditorAction, ActionState};
use crate::setup::MainCamera;

pub const HAND_SPEED: f32 = 3.0;
pub const ROTATE_SPEED: f32 = 0.2;
pub const MAX_CAMERA_DT: f32 = 0.05; // never use a dt larger than 50ms
/// Objects farther than this from the right hand cannot be grabbed.
pub const GRAB_RADIUS: f32 = 1.5;

#[derive(Component)]
pub struct CameraOrbit {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

pub fn input_mapping_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut action_state: ResMut<ActionState>,
) {
    action_state.set(EditorAction::HandForward, keys.pressed(KeyCode::KeyW));
    action_state.set(EditorAction::HandBackward, keys.pressed(KeyCode::KeyS));
    action_state.set(EditorAction::HandLeft, keys.pressed(KeyCode::KeyA));
    action_state.set(EditorAction::HandRight, keys.pressed(KeyCode::KeyD));
    action_state.set(EditorAction::HandUp, keys.pressed(KeyCode::KeyE));
    action_state.set(EditorAction::HandDown, keys.pressed(KeyCode::KeyQ));
    action_state.set(EditorAction::RotateLeft, keys.pressed(KeyCode::ArrowLeft));
    action_state.set(EditorAction::RotateRight, keys.pressed(KeyCode::ArrowRight));
    action_state.set(EditorAction::RotateUp, keys.pressed(KeyCode::ArrowUp));
    action_state.set(EditorAction::RotateDown, keys.pressed(KeyCode::ArrowDown));
    action_state.set(EditorAction::DollyOut, keys.pressed(KeyCode::KeyI));
    action_state.set(EditorAction::DollyIn, keys.pressed(KeyCode::KeyK));
}

/// Keyboard stands in for the tracked right controller.
pub fn move_hand_system(
    time: Res<Time>,
    action_state: Res<ActionState>,
    mut hands: Query<(&mut Transform, &Controller)>,
) {
    use EditorAction::*;
    let dir = Vec3::new(
        action_state.axis(HandLeft, HandRight),
        action_state.axis(HandDown, HandUp),
        action_state.axis(HandForward, HandBackward),
    );
    if dir == Vec3::ZERO { return; }

    for (mut tf, controller) in &mut hands {
        if controller.hand == Hand::Right {
            tf.translation += dir.normalize() * HAND_SPEED * time.delta_secs();
        }
    }
}

/// Turn keys into the session's polled input: stick axes every frame,
/// commands on key edges.
pub fn placement_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    action_state: Res<ActionState>,
    mut input: ResMut<PlacementInput>,
    hands: Query<(&Controller, &Transform)>,
    loose: Query<(Entity, &Transform), (With<Placeable>, Without<Held>, Without<Controller>)>,
) {
    use EditorAction::*;
    input.set_axis(
        Hand::Right,
        Vec2::new(action_state.axis(RotateLeft, RotateRight), action_state.axis(RotateDown, RotateUp)),
    );
    input.set_axis(Hand::Left, Vec2::new(0.0, action_state.axis(DollyIn, DollyOut)));

    if keys.just_pressed(KeyCode::KeyG) {
        let hand = hands
            .iter()
            .find(|(c, _)| c.hand == Hand::Right)
            .map(|(_, tf)| tf.translation);
        let nearest = hand.and_then(|hand| {
            loose
                .iter()
                .map(|(e, tf)| (e, tf.translation.distance(hand)))
                .filter(|(_, d)| *d <= GRAB_RADIUS)
                .min_by(|a, b| a.1.total_cmp(&b.1))
        });
        match nearest {
            Some((entity, _)) => input.push(PlacementCommand::Grab { entity, hand: Hand::Right }),
            None => info!("Nothing within {} m of the right hand", GRAB_RADIUS),
        }
    }
    if keys.just_pressed(KeyCode::KeyP) { input.push(PlacementCommand::Place); }
    if keys.just_pressed(KeyCode::Space) { input.push(PlacementCommand::StartPaint); }
    if keys.just_released(KeyCode::Space) { input.push(PlacementCommand::StopPaint); }
    if keys.just_pressed(KeyCode::KeyR) { input.push(PlacementCommand::Release); }
    if keys.just_pressed(KeyCode::Escape) { input.push(PlacementCommand::Cancel); }
}

pub fn camera_controller(
    time: Res<Time>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    mut query: Query<(&mut Transform, &mut CameraOrbit), With<MainCamera>>,
) {
    // 0) Clamp delta
    let dt = time.delta_secs().min(MAX_CAMERA_DT);

    let Ok((mut tf, mut orbit)) = query.single_mut() else { return; };

    // 1) Zoom
    for ev in scroll_evr.read() {
        let amount = match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.02,
        };
        orbit.radius = (orbit.radius - amount).clamp(2.0, 60.0);
    }

    // 2) Orbit
    if mouse_buttons.pressed(MouseButton::Middle) {
        for ev in motion_evr.read() {
            orbit.yaw += ev.delta.x * ROTATE_SPEED * dt;
            orbit.pitch += ev.delta.y * ROTATE_SPEED * dt;
        }
    } else {
        motion_evr.clear();
    }

    orbit.pitch = orbit.pitch.clamp(
        -std::f32::consts::FRAC_PI_2 + 0.01,
        std::f32::consts::FRAC_PI_2 - 0.01,
    );

    // 3) Position camera
    let xz_radius = orbit.radius * orbit.pitch.cos();
    let offset = Vec3::new(
        xz_radius * orbit.yaw.cos(),
        orbit.radius * orbit.pitch.sin(),
        xz_radius * orbit.yaw.sin(),
    );

    tf.translation = orbit.focus + offset;

    // 4) Stay above the floor
    tf.translation.y = tf.translation.y.max(0.5);

    tf.look_at(orbit.focus, Vec3::Y);
}

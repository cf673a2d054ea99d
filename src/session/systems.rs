// src/session/systems.rs
//! The per-tick chain that drives a placement session.

use bevy::prelude::*;

use super::feedback::HapticPulse;
use super::input::{Controller, PlacementCommand, PlacementInput};
use super::state::{Held, HeldObject, PlacementSession, SessionPhase, ZoneChange};
use crate::config::PlacementTuning;
use crate::grid::{GridIndex, GridVisualizer};
use crate::prefab::{spawn_placed, Placeable, Placed, PrefabLibrary, RendererParts};
use crate::preview::PreviewPool;

/// Drain the command queue and run the resulting transitions in arrival order.
/// Without a grid the queue is left untouched until one appears.
#[allow(clippy::too_many_arguments)]
pub fn apply_placement_commands(
    mut commands: Commands,
    mut input: ResMut<PlacementInput>,
    mut session: ResMut<PlacementSession>,
    grid: Option<ResMut<GridIndex>>,
    library: Option<Res<PrefabLibrary>>,
    mut pool: Option<ResMut<PreviewPool>>,
    tuning: Res<PlacementTuning>,
    mut pulses: EventWriter<HapticPulse>,
    objects: Query<(&Placeable, &Transform, Option<&RendererParts>)>,
    controllers: Query<(&Controller, &Transform), Without<Placeable>>,
) {
    let Some(mut grid) = grid else { return; };

    for command in input.drain() {
        let phase = session.phase();
        match command {
            PlacementCommand::Grab { entity, hand } => {
                if session.held_entity() == Some(entity) {
                    debug!("Placement: {:?} is already held", entity);
                    continue;
                }
                let Ok((placeable, transform, parts)) = objects.get(entity) else {
                    debug!("Placement: {:?} is not placeable; grab rejected", entity);
                    continue;
                };
                if let Some(previous) = release_held(&mut commands, &mut session, &mut pool) {
                    debug!("Placement: force-released {:?} for a new grab", previous.entity);
                }

                grid.clear_occupant(entity);
                commands.entity(entity).remove::<Placed>().insert(Held { hand });

                let reach = controllers
                    .iter()
                    .find(|(c, _)| c.hand == hand)
                    .map(|(_, hand_tf)| {
                        tuning.clamp_reach(hand_tf.translation.distance(transform.translation))
                    })
                    .unwrap_or(tuning.default_reach);

                let held = HeldObject {
                    entity,
                    hand,
                    placeable: *placeable,
                    renderers: parts.map(|p| p.0.clone()).unwrap_or_default(),
                };
                session.begin_hold(held, transform.rotation, reach);
                debug!("Placement: grabbed {:?} ({:?} hand)", entity, hand);
            }

            PlacementCommand::Place => {
                if phase != SessionPhase::Holding {
                    debug!("Placement: place ignored while {:?}", phase);
                    continue;
                }
                place_held(&mut commands, &mut session, &mut grid, &mut pool, &tuning, &mut pulses, &objects);
            }

            PlacementCommand::StartPaint => {
                if !session.start_paint(&grid) {
                    debug!("Placement: start paint ignored while {:?}", phase);
                }
            }

            PlacementCommand::StopPaint | PlacementCommand::Release if phase == SessionPhase::Painting => {
                finalize_paint(
                    &mut commands,
                    &mut session,
                    &mut grid,
                    library.as_deref(),
                    &mut pool,
                    &tuning,
                    &mut pulses,
                );
            }

            PlacementCommand::StopPaint => {
                debug!("Placement: stop paint ignored while {:?}", phase);
            }

            PlacementCommand::Release | PlacementCommand::Cancel => {
                match release_held(&mut commands, &mut session, &mut pool) {
                    Some(held) => debug!("Placement: {:?} released ({:?})", held.entity, command),
                    None => debug!("Placement: {:?} ignored while idle", command),
                }
            }
        }
    }
}

/// Snap the held object into its cell. A taken cell keeps the object in hand.
fn place_held(
    commands: &mut Commands,
    session: &mut PlacementSession,
    grid: &mut GridIndex,
    pool: &mut Option<ResMut<PreviewPool>>,
    tuning: &PlacementTuning,
    pulses: &mut EventWriter<HapticPulse>,
    objects: &Query<(&Placeable, &Transform, Option<&RendererParts>)>,
) {
    let Some(held) = session.held().cloned() else { return; };
    let Ok((_, transform, _)) = objects.get(held.entity) else {
        warn!("Placement: held object {:?} vanished; ending session", held.entity);
        release_held(commands, session, pool);
        return;
    };

    let cell = session
        .snapped_cell()
        .unwrap_or_else(|| grid.world_to_cell(transform.translation));
    if grid.is_occupied_ignoring(cell, held.entity) {
        debug!("Placement: cell {:?} is taken; keeping {:?} in hand", cell, held.entity);
        return;
    }

    let rotation = session.live_rotation(grid);
    commands.entity(held.entity).insert((
        Transform::from_translation(grid.cell_to_world(cell))
            .with_rotation(rotation)
            .with_scale(held.placeable.authored_scale),
        Placed,
    ));
    grid.occupy(cell, held.entity);
    release_held(commands, session, pool);
    pulses.write(HapticPulse::new(held.hand, tuning.place_pulse));
    debug!("Placement: placed {:?} at {:?}", held.entity, cell);
}

/// Stamp a copy into every free path cell. The original is destroyed only if
/// something was committed; otherwise it is released untouched.
fn finalize_paint(
    commands: &mut Commands,
    session: &mut PlacementSession,
    grid: &mut GridIndex,
    library: Option<&PrefabLibrary>,
    pool: &mut Option<ResMut<PreviewPool>>,
    tuning: &PlacementTuning,
    pulses: &mut EventWriter<HapticPulse>,
) {
    let cells = session.path().cells().to_vec();
    let rotation = session.locked_rotation();
    let Some(held) = release_held(commands, session, pool) else { return; };

    let committed = match library {
        Some(library) => cells
            .iter()
            .filter_map(|&cell| spawn_placed(commands, library, grid, held.placeable.prefab, cell, rotation))
            .count(),
        None => {
            warn!("Placement: no prefab library; paint stroke dropped");
            0
        }
    };

    if committed > 0 {
        commands.entity(held.entity).try_despawn();
        pulses.write(HapticPulse::new(held.hand, tuning.stamp_pulse));
        info!("Placement: stamped {} of {} painted cell(s)", committed, cells.len());
    } else {
        debug!("Placement: nothing committed; {:?} released", held.entity);
    }
}

/// End the session without committing. Renderers come back, previews go away.
fn release_held(
    commands: &mut Commands,
    session: &mut PlacementSession,
    pool: &mut Option<ResMut<PreviewPool>>,
) -> Option<HeldObject> {
    let held = session.end_hold()?;
    set_renderers_visible(commands, &held.renderers, true);
    commands.entity(held.entity).try_remove::<Held>();
    if let Some(pool) = pool.as_deref_mut() {
        pool.hide(commands);
    }
    Some(held)
}

fn set_renderers_visible(commands: &mut Commands, renderers: &[Entity], visible: bool) {
    let visibility = if visible { Visibility::Inherited } else { Visibility::Hidden };
    for &part in renderers {
        commands.entity(part).try_insert(visibility);
    }
}

pub fn rotate_held_object(
    time: Res<Time>,
    input: Res<PlacementInput>,
    tuning: Res<PlacementTuning>,
    grid: Option<Res<GridIndex>>,
    mut session: ResMut<PlacementSession>,
    mut pulses: EventWriter<HapticPulse>,
) {
    let Some(grid) = grid else { return; };
    let Some(hand) = session.held().map(|h| h.hand) else { return; };
    let Some(step) = session.tick_rotate_repeat(input.axis(hand), time.delta_secs(), &tuning) else {
        return;
    };
    session.apply_rotation_step(step, grid.config().rotation_step);
    pulses.write(HapticPulse::new(hand, tuning.rotate_pulse));
}

/// Dolly with the free hand's stick, then pin the object in front of the holding hand.
/// Without a controller for that hand the transform is left to whoever moves it.
pub fn carry_held_object(
    time: Res<Time>,
    input: Res<PlacementInput>,
    tuning: Res<PlacementTuning>,
    grid: Option<Res<GridIndex>>,
    mut session: ResMut<PlacementSession>,
    controllers: Query<(&Controller, &Transform), Without<Held>>,
    mut held_objects: Query<&mut Transform, With<Held>>,
) {
    let Some(grid) = grid else { return; };
    let Some((entity, hand)) = session.held().map(|h| (h.entity, h.hand)) else { return; };

    let dolly = input.axis(hand.other()).y;
    if dolly.abs() > tuning.dolly_deadzone {
        let reach = session.reach() + dolly.signum() * tuning.dolly_speed * time.delta_secs();
        session.set_reach(tuning.clamp_reach(reach));
    }

    let Some((_, hand_tf)) = controllers.iter().find(|(c, _)| c.hand == hand) else { return; };
    let Ok(mut tf) = held_objects.get_mut(entity) else { return; };
    tf.translation = hand_tf.translation + hand_tf.forward() * session.reach();
    tf.rotation = session.live_rotation(&grid);
}

/// Near/far hysteresis for the held object's own renderers.
pub fn update_held_visibility(
    mut commands: Commands,
    tuning: Res<PlacementTuning>,
    grid: Option<Res<GridIndex>>,
    visualizer: Option<Res<GridVisualizer>>,
    mut session: ResMut<PlacementSession>,
    mut pool: Option<ResMut<PreviewPool>>,
    held_objects: Query<&Transform, With<Held>>,
) {
    let (Some(grid), Some(visualizer)) = (grid, visualizer) else { return; };
    let Some(entity) = session.held_entity() else { return; };
    let Ok(tf) = held_objects.get(entity) else { return; };

    let in_near = visualizer.near_contains(&grid, tf.translation);
    let in_far = visualizer.far_contains(&grid, tf.translation, tuning.far_zone_scale);
    let Some(change) = session.update_zone(in_near, in_far) else { return; };
    let Some(held) = session.held() else { return; };

    match change {
        ZoneChange::EnteredNear => {
            set_renderers_visible(&mut commands, &held.renderers, false);
            if let Some(pool) = pool.as_deref_mut() {
                pool.hide(&mut commands);
            }
        }
        ZoneChange::ExitedFar => set_renderers_visible(&mut commands, &held.renderers, true),
    }
}

/// Recompute the snapped cell (and the paint path) and reconcile the ghosts.
#[allow(clippy::too_many_arguments)]
pub fn update_placement_preview(
    mut commands: Commands,
    tuning: Res<PlacementTuning>,
    grid: Option<Res<GridIndex>>,
    library: Option<Res<PrefabLibrary>>,
    visualizer: Option<Res<GridVisualizer>>,
    mut session: ResMut<PlacementSession>,
    mut pool: Option<ResMut<PreviewPool>>,
    held_objects: Query<&Transform, With<Held>>,
) {
    let Some(grid) = grid else { return; };
    let Some((entity, prefab)) = session.held().map(|h| (h.entity, h.placeable.prefab)) else {
        return;
    };
    let Ok(tf) = held_objects.get(entity) else { return; };

    let moved = session.take_sample(tf.translation, tuning.move_epsilon_sq);
    let dirty = session.take_preview_dirty();
    if !moved && !dirty {
        return;
    }

    let cell = grid.world_to_cell(tf.translation);
    session.set_snapped_cell(cell);
    let valid = !grid.is_occupied_ignoring(cell, entity);

    let (positions, rotation) = if session.phase() == SessionPhase::Painting {
        // Steps outside the cage never enter the path.
        if visualizer.as_deref().is_none_or(|v| v.contains_cell(cell)) {
            session.paint_step(cell);
        }
        let positions: Vec<Vec3> = session.path().cells().iter().map(|&c| grid.cell_to_world(c)).collect();
        (positions, session.locked_rotation())
    } else {
        (vec![grid.cell_to_world(cell)], session.live_rotation(&grid))
    };

    let (Some(pool), Some(library)) = (pool.as_deref_mut(), library.as_deref()) else { return; };
    pool.set_valid(&mut commands, valid);
    pool.show_multiple(&mut commands, library, prefab, &positions, rotation);
}

//! Placement plugin wiring (glue).
//! - Session, input queue and tuning resources
//! - Haptic pulse event
//! - Preview pool bootstrap (when render assets exist)
//! - The ordered per-tick chain

use bevy::prelude::*;

use super::feedback::HapticPulse;
use super::input::PlacementInput;
use super::state::PlacementSession;
use super::systems::{
    apply_placement_commands,
    carry_held_object,
    rotate_held_object,
    update_held_visibility,
    update_placement_preview,
};
use crate::config::PlacementTuning;
use crate::preview::{init_preview_pool, PreviewPool};

/// Everything the session does in a tick. Input producers run before it.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PlacementSet;

pub struct PlacementPlugin;
impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlacementSession>()
            .init_resource::<PlacementInput>()
            .init_resource::<PlacementTuning>()
            .add_event::<HapticPulse>()
            .add_systems(
                Startup,
                init_preview_pool.run_if(
                    resource_exists::<Assets<StandardMaterial>>
                        .and(not(resource_exists::<PreviewPool>)),
                ),
            )
            .add_systems(
                Update,
                (
                    apply_placement_commands,
                    rotate_held_object,
                    carry_held_object,
                    update_held_visibility,
                    update_placement_preview,
                )
                    .chain()
                    .in_set(PlacementSet),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellCoord, GridConfig, GridIndex, GridVisualizer};
    use crate::prefab::library::tests::test_library;
    use crate::prefab::{spawn_placeable, spawn_placed, Placed, PrefabId, PrefabLibrary, RendererParts};
    use crate::preview::{GhostMaterials, PreviewGhost};
    use crate::session::{Controller, Hand, Held, PlacementCommand, SessionPhase};
    use bevy::ecs::event::Events;
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;

    fn app() -> App {
        let mut app = App::new();
        app.insert_resource(GridIndex::new(GridConfig::default()))
            .insert_resource(test_library())
            .insert_resource(PreviewPool::new(GhostMaterials::placeholder()))
            .init_resource::<Time>()
            .add_plugins(PlacementPlugin);
        app
    }

    fn spawn(app: &mut App, prefab: u32, at: Vec3) -> Entity {
        app.world_mut()
            .run_system_once(move |mut commands: Commands, library: Res<PrefabLibrary>| {
                spawn_placeable(&mut commands, &library, PrefabId(prefab), Transform::from_translation(at))
            })
            .expect("system runs")
            .expect("known prefab")
    }

    fn spawn_blocker(app: &mut App, cell: CellCoord) -> Entity {
        app.world_mut()
            .run_system_once(
                move |mut commands: Commands, library: Res<PrefabLibrary>, mut grid: ResMut<GridIndex>| {
                    spawn_placed(&mut commands, &library, &mut grid, PrefabId(1), cell, Quat::IDENTITY)
                },
            )
            .expect("system runs")
            .expect("free cell")
    }

    fn send(app: &mut App, command: PlacementCommand) {
        app.world_mut().resource_mut::<PlacementInput>().push(command);
        app.update();
    }

    fn move_to(app: &mut App, entity: Entity, at: Vec3) {
        app.world_mut()
            .get_mut::<Transform>(entity)
            .expect("held transform")
            .translation = at;
        app.update();
    }

    fn grab(app: &mut App, entity: Entity) {
        send(app, PlacementCommand::Grab { entity, hand: Hand::Right });
    }

    fn phase(app: &App) -> SessionPhase {
        app.world().resource::<PlacementSession>().phase()
    }

    fn pulses(app: &App) -> Vec<HapticPulse> {
        app.world()
            .resource::<Events<HapticPulse>>()
            .iter_current_update_events()
            .copied()
            .collect()
    }

    fn c(x: i32, y: i32, z: i32) -> CellCoord {
        CellCoord::new(x, y, z)
    }

    #[test]
    fn simple_placement_snaps_and_occupies() {
        let mut app = app();
        let held = spawn(&mut app, 0, Vec3::new(1.4, 0.2, 2.9));

        grab(&mut app, held);
        assert_eq!(phase(&app), SessionPhase::Holding);
        assert!(app.world().get::<Held>(held).is_some());
        assert_eq!(app.world().resource::<PlacementSession>().snapped_cell(), Some(c(1, 0, 2)));
        assert_eq!(app.world().resource::<PreviewPool>().active_count(), 1);

        send(&mut app, PlacementCommand::Place);
        assert_eq!(phase(&app), SessionPhase::Idle);
        assert_eq!(app.world().resource::<GridIndex>().occupant_at(c(1, 0, 2)), Some(held));

        let tf = app.world().get::<Transform>(held).expect("transform");
        assert_eq!(tf.translation, Vec3::new(1.5, 0.5, 2.5));
        assert_eq!(tf.scale, Vec3::splat(0.9));
        assert!(app.world().get::<Placed>(held).is_some());
        assert!(app.world().get::<Held>(held).is_none());
        assert_eq!(app.world().resource::<PreviewPool>().active_count(), 0);

        let tuning = PlacementTuning::default();
        assert_eq!(pulses(&app), vec![HapticPulse::new(Hand::Right, tuning.place_pulse)]);
    }

    #[test]
    fn blocked_placement_keeps_object_in_hand() {
        let mut app = app();
        let blocker = spawn_blocker(&mut app, c(1, 0, 2));
        let held = spawn(&mut app, 0, Vec3::new(1.4, 0.2, 2.9));

        grab(&mut app, held);
        assert!(!app.world().resource::<PreviewPool>().is_valid());

        send(&mut app, PlacementCommand::Place);
        assert_eq!(phase(&app), SessionPhase::Holding);
        let grid = app.world().resource::<GridIndex>();
        assert_eq!(grid.occupant_at(c(1, 0, 2)), Some(blocker));
        assert_eq!(grid.len(), 1);
        assert!(pulses(&app).is_empty());
    }

    #[test]
    fn paint_stamps_every_free_path_cell() {
        let mut app = app();
        let held = spawn(&mut app, 0, Vec3::new(0.5, 0.5, 0.5));

        grab(&mut app, held);
        send(&mut app, PlacementCommand::StartPaint);
        assert_eq!(phase(&app), SessionPhase::Painting);
        move_to(&mut app, held, Vec3::new(1.5, 0.5, 0.5));
        move_to(&mut app, held, Vec3::new(1.5, 0.5, 1.5));
        assert_eq!(
            app.world().resource::<PlacementSession>().path().cells(),
            &[c(0, 0, 0), c(1, 0, 0), c(1, 0, 1)]
        );
        assert_eq!(app.world().resource::<PreviewPool>().active_count(), 3);

        send(&mut app, PlacementCommand::StopPaint);
        assert_eq!(phase(&app), SessionPhase::Idle);
        assert!(app.world().get_entity(held).is_err(), "original replaced by stamps");

        let grid = app.world().resource::<GridIndex>();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.unique_occupants().len(), 3);
        assert!(!grid.unique_occupants().contains(&held));
        assert_eq!(app.world().resource::<PreviewPool>().active_count(), 0);

        let tuning = PlacementTuning::default();
        assert_eq!(pulses(&app), vec![HapticPulse::new(Hand::Right, tuning.stamp_pulse)]);
    }

    #[test]
    fn paint_skips_cells_held_by_others() {
        let mut app = app();
        let blocker = spawn_blocker(&mut app, c(1, 0, 1));
        let held = spawn(&mut app, 0, Vec3::new(0.5, 0.5, 0.5));

        grab(&mut app, held);
        send(&mut app, PlacementCommand::StartPaint);
        move_to(&mut app, held, Vec3::new(1.5, 0.5, 0.5));
        move_to(&mut app, held, Vec3::new(1.5, 0.5, 1.5));
        assert!(!app.world().resource::<PreviewPool>().is_valid());

        // Release while painting finalizes too.
        send(&mut app, PlacementCommand::Release);
        let grid = app.world().resource::<GridIndex>();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.occupant_at(c(1, 0, 1)), Some(blocker));
        assert!(app.world().get_entity(held).is_err());
    }

    #[test]
    fn paint_with_nothing_committed_releases_original() {
        let mut app = app();
        spawn_blocker(&mut app, c(0, 0, 0));
        let held = spawn(&mut app, 0, Vec3::new(0.5, 0.5, 0.5));

        grab(&mut app, held);
        send(&mut app, PlacementCommand::StartPaint);
        send(&mut app, PlacementCommand::StopPaint);

        assert_eq!(phase(&app), SessionPhase::Idle);
        assert!(app.world().get_entity(held).is_ok());
        assert!(app.world().get::<Held>(held).is_none());
        assert_eq!(app.world().resource::<GridIndex>().len(), 1);
        assert!(pulses(&app).is_empty());
    }

    #[test]
    fn backtracking_shrinks_the_ghost_row() {
        let mut app = app();
        let held = spawn(&mut app, 1, Vec3::new(0.5, 0.5, 0.5));
        grab(&mut app, held);
        send(&mut app, PlacementCommand::StartPaint);
        move_to(&mut app, held, Vec3::new(1.5, 0.5, 0.5));
        move_to(&mut app, held, Vec3::new(2.5, 0.5, 0.5));
        move_to(&mut app, held, Vec3::new(1.5, 0.5, 0.5));

        let pool = app.world().resource::<PreviewPool>();
        assert_eq!((pool.active_count(), pool.pooled_count()), (2, 1));
        assert_eq!(app.world().resource::<PlacementSession>().path().len(), 2);
    }

    #[test]
    fn cancel_releases_without_commit() {
        let mut app = app();
        let placed = spawn_blocker(&mut app, c(2, 0, 2));

        grab(&mut app, placed);
        assert!(app.world().resource::<GridIndex>().is_empty(), "held object frees its cell");
        assert!(app.world().get::<Placed>(placed).is_none());

        send(&mut app, PlacementCommand::StartPaint);
        send(&mut app, PlacementCommand::Cancel);
        assert_eq!(phase(&app), SessionPhase::Idle);
        assert!(app.world().resource::<GridIndex>().is_empty());
        assert!(app.world().get::<Held>(placed).is_none());
        assert_eq!(app.world().resource::<PreviewPool>().active_count(), 0);
    }

    #[test]
    fn misuse_is_ignored() {
        let mut app = app();
        send(&mut app, PlacementCommand::StopPaint);
        send(&mut app, PlacementCommand::Place);
        send(&mut app, PlacementCommand::StartPaint);
        send(&mut app, PlacementCommand::Cancel);
        assert_eq!(phase(&app), SessionPhase::Idle);

        let held = spawn(&mut app, 0, Vec3::new(0.5, 0.5, 0.5));
        grab(&mut app, held);
        send(&mut app, PlacementCommand::StartPaint);
        send(&mut app, PlacementCommand::Place);
        assert_eq!(phase(&app), SessionPhase::Painting);
        assert!(app.world().resource::<GridIndex>().is_empty());
    }

    #[test]
    fn last_grab_wins_and_bad_grabs_are_rejected() {
        let mut app = app();
        let first = spawn(&mut app, 0, Vec3::new(0.5, 0.5, 0.5));
        let second = spawn(&mut app, 1, Vec3::new(3.5, 0.5, 0.5));
        let plain = app.world_mut().spawn(Transform::default()).id();

        grab(&mut app, first);
        grab(&mut app, second);
        assert!(app.world().get::<Held>(first).is_none());
        assert_eq!(app.world().resource::<PlacementSession>().held_entity(), Some(second));
        assert_eq!(app.world().resource::<PreviewPool>().source(), Some(PrefabId(1)));

        grab(&mut app, second);
        grab(&mut app, plain);
        assert_eq!(app.world().resource::<PlacementSession>().held_entity(), Some(second));
    }

    #[test]
    fn commands_wait_for_the_grid() {
        let mut app = app();
        let held = spawn(&mut app, 0, Vec3::new(0.5, 0.5, 0.5));
        grab(&mut app, held);

        let grid = app
            .world_mut()
            .remove_resource::<GridIndex>()
            .expect("grid present");
        send(&mut app, PlacementCommand::Cancel);
        assert_eq!(phase(&app), SessionPhase::Holding);
        assert_eq!(app.world().resource::<PlacementInput>().pending().len(), 1);

        app.insert_resource(grid);
        app.update();
        assert_eq!(phase(&app), SessionPhase::Idle);
        assert!(app.world().resource::<PlacementInput>().pending().is_empty());
        assert!(app.world().get::<Held>(held).is_none());
    }

    #[test]
    fn rotate_stick_steps_and_pulses() {
        let mut app = app();
        let held = spawn(&mut app, 0, Vec3::new(0.5, 0.5, 0.5));
        grab(&mut app, held);

        app.world_mut()
            .resource_mut::<PlacementInput>()
            .set_axis(Hand::Right, Vec2::new(0.9, 0.0));
        app.update();

        let grid = GridIndex::new(GridConfig::default());
        let session = app.world().resource::<PlacementSession>();
        assert_eq!(session.yaw_pitch(), (90.0, 0.0));
        let tuning = PlacementTuning::default();
        assert_eq!(pulses(&app), vec![HapticPulse::new(Hand::Right, tuning.rotate_pulse)]);

        let ghost = app
            .world()
            .resource::<PreviewPool>()
            .active_roots()
            .next()
            .expect("one ghost");
        let rotation = app.world().get::<Transform>(ghost).expect("ghost transform").rotation;
        assert!(rotation.abs_diff_eq(grid.quantize_yaw(90.0), 1e-6));

        // Held without time passing: no repeat yet.
        app.update();
        assert!(pulses(&app).is_empty());
    }

    #[test]
    fn dolly_moves_object_along_hand_forward() {
        let mut app = app();
        app.world_mut()
            .spawn((Controller { hand: Hand::Right }, Transform::default()));
        let held = spawn(&mut app, 0, Vec3::new(0.0, 0.0, -1.0));

        grab(&mut app, held);
        assert!((app.world().resource::<PlacementSession>().reach() - 1.0).abs() < 1e-5);

        app.world_mut()
            .resource_mut::<PlacementInput>()
            .set_axis(Hand::Left, Vec2::new(0.0, 1.0));
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(500));
        app.update();

        let z = app.world().get::<Transform>(held).expect("held transform").translation.z;
        assert!((z + 1.75).abs() < 1e-4, "expected z = -1.75, got {z}");

        // Clamped at max reach.
        for _ in 0..10 {
            app.world_mut()
                .resource_mut::<Time>()
                .advance_by(Duration::from_millis(500));
            app.update();
        }
        let tuning = PlacementTuning::default();
        assert_eq!(app.world().resource::<PlacementSession>().reach(), tuning.max_reach);
    }

    #[test]
    fn dolly_speed_ignores_stick_magnitude() {
        let mut app = app();
        app.world_mut()
            .spawn((Controller { hand: Hand::Right }, Transform::default()));
        let held = spawn(&mut app, 0, Vec3::new(0.0, 0.0, -1.0));
        grab(&mut app, held);

        app.world_mut()
            .resource_mut::<PlacementInput>()
            .set_axis(Hand::Left, Vec2::new(0.0, 0.5));
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(500));
        app.update();

        let reach = app.world().resource::<PlacementSession>().reach();
        assert!((reach - 1.75).abs() < 1e-4, "half deflection still moves at full speed, got {reach}");

        app.world_mut()
            .resource_mut::<PlacementInput>()
            .set_axis(Hand::Left, Vec2::new(0.0, -0.2));
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(500));
        app.update();
        let reach = app.world().resource::<PlacementSession>().reach();
        assert!((reach - 1.0).abs() < 1e-4, "pulling back at full speed, got {reach}");
    }

    #[test]
    fn held_mesh_hides_near_and_shows_past_far_band() {
        let mut app = app();
        app.insert_resource(GridVisualizer { center: c(0, 0, 0), half_range: 2 });
        let held = spawn(&mut app, 1, Vec3::new(5.0, 0.5, 0.5));
        let parts = app.world().get::<RendererParts>(held).expect("parts").0.clone();
        let visible = |app: &App| {
            parts
                .iter()
                .all(|&p| app.world().get::<Visibility>(p) == Some(&Visibility::Inherited))
        };

        grab(&mut app, held);
        assert!(visible(&app));

        move_to(&mut app, held, Vec3::new(2.0, 0.5, 0.5));
        assert!(!visible(&app));
        assert_eq!(app.world().resource::<PreviewPool>().active_count(), 1);

        // Inside the 10% band: stays hidden.
        move_to(&mut app, held, Vec3::new(3.2, 0.5, 0.5));
        assert!(!visible(&app));

        move_to(&mut app, held, Vec3::new(4.0, 0.5, 0.5));
        assert!(visible(&app));

        move_to(&mut app, held, Vec3::new(3.2, 0.5, 0.5));
        assert!(visible(&app));

        // Hidden again near the cage, restored on release.
        move_to(&mut app, held, Vec3::new(1.0, 0.5, 0.5));
        assert!(!visible(&app));
        send(&mut app, PlacementCommand::Release);
        assert!(visible(&app));
    }

    #[test]
    fn paint_ignores_cells_outside_the_cage() {
        let mut app = app();
        app.insert_resource(GridVisualizer { center: c(0, 0, 0), half_range: 1 });
        let held = spawn(&mut app, 0, Vec3::new(1.5, 0.5, 0.5));

        grab(&mut app, held);
        send(&mut app, PlacementCommand::StartPaint);
        move_to(&mut app, held, Vec3::new(2.5, 0.5, 0.5));
        assert_eq!(app.world().resource::<PlacementSession>().path().cells(), &[c(1, 0, 0)]);
    }

    #[test]
    fn ghosts_never_carry_capabilities() {
        let mut app = app();
        let held = spawn(&mut app, 0, Vec3::new(0.5, 0.5, 0.5));
        grab(&mut app, held);

        let mut ghosts = app
            .world_mut()
            .query_filtered::<Entity, (With<PreviewGhost>, Or<(With<crate::prefab::Placeable>, With<Held>)>)>();
        assert_eq!(ghosts.iter(app.world()).count(), 0);
    }
}

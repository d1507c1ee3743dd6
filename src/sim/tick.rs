//! Fixed timestep simulation tick
//!
//! One ordered step: input and player, integration, collision response,
//! contact dispatch, projectile/pickup bookkeeping, timed actions, and finally
//! the upgrade draft. While a draft is open only the choice input is handled.

use glam::Vec2;

use super::arena::Aabb;
use super::body::{resolve_pair, resolve_static};
use super::collision::{
    BodyCategory, aabb_wall_collision, circle_aabb_collision, circle_obb_collision,
    obb_obb_collision,
};
use super::player::Damage;
use super::projectile::HitReport;
use super::schedule::TimedAction;
use super::spawner::pick_spawn_position;
use super::state::{BodyRef, ContactKey, GameEvent, GamePhase, GameState, contact_key};
use crate::audio::SoundCue;
use crate::hooks::{EffectKind, Hooks};

/// Autopilot heads back to the middle when further out than this share of the
/// smaller arena half-size
const AUTOPILOT_LEASH: f32 = 0.4;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// World point the ship should face
    pub aim: Option<Vec2>,
    /// Thrust toward the aim point
    pub thrust: bool,
    /// Trigger held
    pub fire: bool,
    /// Pick an option of the open upgrade draft
    pub choose: Option<usize>,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

/// Body contact found this step, dispatched after physical response
#[derive(Debug, Clone, Copy)]
struct Contact {
    a: BodyRef,
    b: BodyRef,
    point: Vec2,
    speed: f32,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, hooks: &mut Hooks, dt: f32) {
    state.time_ticks += 1;
    hooks.advance(dt);

    let input = if input.autopilot {
        autopilot(state)
    } else {
        input.clone()
    };

    // The draft choice is the one input honored while time is frozen
    if let Some(index) = input.choose {
        choose_upgrade(state, index, hooks);
    }

    let dt = dt * state.progression.time_scale();
    if dt > 0.0 {
        update_player(state, &input, hooks, dt);
        integrate(state, dt);
        let contacts = collide(state);
        dispatch_contacts(state, contacts, hooks);
        resolve_projectile_hits(state, hooks);
        update_pickups(state, hooks, dt);
        state.sweep();
        run_timed_actions(state, dt);
    }

    state.normalize_order();

    if state
        .progression
        .try_open(state.player.alive, &state.tuning.draft, &mut state.rng, hooks)
    {
        let options = state
            .progression
            .offer()
            .iter()
            .map(|o| o.label.clone())
            .collect();
        state.events.push(GameEvent::DraftOpened { options });
    }

    state.phase = if !state.player.alive {
        GamePhase::GameOver
    } else if state.progression.is_drafting() {
        GamePhase::Drafting
    } else {
        GamePhase::Playing
    };
}

fn choose_upgrade(state: &mut GameState, index: usize, hooks: &mut Hooks) {
    if !state.progression.is_drafting() {
        return;
    }
    match state.progression.choose(index, &mut state.player, hooks) {
        Ok(option) => state.events.push(GameEvent::UpgradeChosen {
            kind: option.kind,
            label: option.label,
        }),
        Err(e) => log::warn!("Ignoring draft input: {e}"),
    }
}

/// Simple demo pilot: stay near the middle, shoot the nearest hazard,
/// take the first upgrade offered.
fn autopilot(state: &GameState) -> TickInput {
    if state.progression.is_drafting() {
        return TickInput {
            choose: Some(0),
            ..Default::default()
        };
    }

    let pos = state.player.body.pos;
    let center = state.arena.bounds.center();
    let bounds = &state.arena.bounds;
    let leash = bounds.width().min(bounds.height()) * 0.5 * AUTOPILOT_LEASH;

    if pos.distance(center) > leash {
        return TickInput {
            aim: Some(center),
            thrust: true,
            fire: true,
            ..Default::default()
        };
    }

    let target = state
        .hazards
        .iter()
        .filter(|h| h.alive)
        .min_by(|a, b| {
            a.body
                .pos
                .distance_squared(pos)
                .total_cmp(&b.body.pos.distance_squared(pos))
        })
        .map(|h| h.body.pos);

    TickInput {
        aim: target,
        fire: target.is_some(),
        ..Default::default()
    }
}

fn update_player(state: &mut GameState, input: &TickInput, hooks: &mut Hooks, dt: f32) {
    state.player.steer(input.aim, input.thrust, dt);

    if state.player.update_weapon(input.fire, dt) {
        let shots = state.player.volley(state.tuning.player.multi_shot_spacing);
        for shot in shots {
            state.spawn_projectile(shot.pos, shot.vel, shot.pierce);
            hooks.play(SoundCue::Shoot);
        }
    }
}

fn integrate(state: &mut GameState, dt: f32) {
    if state.player.alive {
        state.player.body.integrate(dt);
    }
    for hazard in &mut state.hazards {
        hazard.body.integrate(dt);
    }

    let despawn = state.arena.despawn_bounds(state.tuning.projectile.inset);
    for projectile in &mut state.projectiles {
        projectile.advance(dt, despawn.as_ref());
    }
}

/// Detect body contacts and apply the physical response
fn collide(state: &mut GameState) -> Vec<Contact> {
    let restitution = state.tuning.arena.restitution;
    let mut contacts = Vec::new();

    // Hazards vs walls
    for hazard in &mut state.hazards {
        for (i, wall) in state.arena.walls.iter().enumerate() {
            let hit = aabb_wall_collision(&hazard.aabb(), wall, state.arena.wall_normal(i));
            if hit.hit {
                let speed =
                    resolve_static(&mut hazard.body, hit.normal, hit.penetration, restitution);
                contacts.push(Contact {
                    a: BodyRef::Hazard(hazard.id),
                    b: BodyRef::Wall(i),
                    point: hit.point,
                    speed,
                });
            }
        }
    }

    // Hazards vs hazards
    for i in 0..state.hazards.len() {
        let (head, tail) = state.hazards.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            let reach = a.bounding_radius() + b.bounding_radius();
            if a.body.pos.distance_squared(b.body.pos) > reach * reach {
                continue;
            }
            let hit = obb_obb_collision(&a.obb(), &b.obb());
            if hit.hit {
                let speed = resolve_pair(
                    &mut a.body,
                    &mut b.body,
                    hit.normal,
                    hit.penetration,
                    restitution,
                );
                contacts.push(Contact {
                    a: BodyRef::Hazard(a.id),
                    b: BodyRef::Hazard(b.id),
                    point: hit.point,
                    speed,
                });
            }
        }
    }

    let player = &mut state.player;
    if !player.alive {
        return contacts;
    }

    // Player vs walls
    for (i, wall) in state.arena.walls.iter().enumerate() {
        let bounds = Aabb::from_center(player.body.pos, Vec2::splat(player.radius));
        let hit = aabb_wall_collision(&bounds, wall, state.arena.wall_normal(i));
        if hit.hit {
            let speed =
                resolve_static(&mut player.body, hit.normal, hit.penetration, restitution);
            contacts.push(Contact {
                a: BodyRef::Player,
                b: BodyRef::Wall(i),
                point: hit.point,
                speed,
            });
        }
    }

    // Player vs hazards
    for hazard in &mut state.hazards {
        let hit = circle_obb_collision(player.body.pos, player.radius, &hazard.obb());
        if hit.hit {
            let speed = resolve_pair(
                &mut player.body,
                &mut hazard.body,
                hit.normal,
                hit.penetration,
                restitution,
            );
            contacts.push(Contact {
                a: BodyRef::Player,
                b: BodyRef::Hazard(hazard.id),
                point: hit.point,
                speed,
            });
        }
    }

    contacts
}

/// Fire contact handlers for pairs that started touching this step
fn dispatch_contacts(state: &mut GameState, contacts: Vec<Contact>, hooks: &mut Hooks) {
    let previous = std::mem::take(&mut state.contacts);
    let now = state.elapsed();

    for contact in contacts {
        let key: ContactKey = contact_key(contact.a, contact.b);
        let entered = !previous.contains(&key) && !state.contacts.contains(&key);
        state.contacts.insert(key);
        if !entered {
            continue;
        }

        for (me, other) in [(contact.a, contact.b), (contact.b, contact.a)] {
            match me {
                BodyRef::Hazard(id) => {
                    let category = category_of(other);
                    if let Some(hazard) = state.hazards.iter_mut().find(|h| h.id == id) {
                        hazard.on_body_contact(
                            category,
                            contact.point,
                            contact.speed,
                            now,
                            &state.tuning.hazard,
                            hooks,
                        );
                    }
                }
                BodyRef::Player => damage_player(state, hooks),
                BodyRef::Wall(_) => {}
            }
        }
    }
}

fn category_of(body: BodyRef) -> BodyCategory {
    match body {
        BodyRef::Player => BodyCategory::Player,
        BodyRef::Hazard(_) => BodyCategory::Hazard,
        BodyRef::Wall(_) => BodyCategory::Boundary,
    }
}

fn damage_player(state: &mut GameState, hooks: &mut Hooks) {
    match state
        .player
        .take_damage(&mut state.scheduler, &state.tuning.player, hooks)
    {
        Damage::Hurt => state.events.push(GameEvent::PlayerHurt {
            lives: state.player.lives,
        }),
        Damage::Died => {
            let score = state.score();
            state.events.push(GameEvent::PlayerDied { score });
        }
        Damage::Ignored => {}
    }
}

/// Projectiles against walls and hazards (overlap tests, no physical response)
fn resolve_projectile_hits(state: &mut GameState, hooks: &mut Hooks) {
    let mut drops = Vec::new();

    for projectile in &mut state.projectiles {
        if !projectile.alive {
            continue;
        }

        let on_wall = state
            .arena
            .walls
            .iter()
            .any(|wall| circle_aabb_collision(projectile.pos, projectile.radius, wall).hit);
        if on_wall {
            projectile.on_boundary_contact();
            continue;
        }

        for hazard in &mut state.hazards {
            if !projectile.alive {
                break;
            }
            // Dead hazards wait for the sweep; piercing projectiles fly through them
            if !hazard.alive || projectile.ignores(hazard.id) {
                continue;
            }
            if !circle_obb_collision(projectile.pos, projectile.radius, &hazard.obb()).hit {
                continue;
            }
            if let HitReport::Hit { .. } = projectile.on_hazard_contact(hazard.id) {
                let point = hazard.surface_point(projectile.pos);
                hooks.effect(point, EffectKind::ProjectileImpact);
                if let Some(positions) =
                    hazard.hit_by_projectile(point, &state.tuning.hazard, &mut state.rng, hooks)
                {
                    log::debug!("Projectile {} destroyed hazard {}", projectile.id, hazard.id);
                    state.events.push(GameEvent::HazardDestroyed {
                        id: hazard.id,
                        pos: hazard.body.pos,
                    });
                    drops.extend(positions);
                }
            }
        }
    }

    for pos in drops {
        state.spawn_pickup(pos);
    }
}

fn update_pickups(state: &mut GameState, hooks: &mut Hooks, dt: f32) {
    let target = state.player.alive.then_some(state.player.body.pos);
    let mut collected = 0;

    for pickup in &mut state.pickups {
        let value = pickup.update(target, &state.tuning.pickup, dt);
        if value > 0 {
            collected += value;
            hooks.effect(pickup.pos, EffectKind::PickupCollected);
            state.events.push(GameEvent::PickupCollected {
                id: pickup.id,
                value,
            });
        }
    }

    if collected > 0 {
        state.progression.add_currency(collected);
    }
}

fn run_timed_actions(state: &mut GameState, dt: f32) {
    state.scheduler.advance(dt);

    for action in state.scheduler.drain_due() {
        match action {
            TimedAction::SpawnHazard => {
                if state.spawner.on_timer(
                    state.player.alive,
                    &mut state.scheduler,
                    &state.tuning.spawner,
                ) {
                    let player = state.player.alive.then_some(state.player.body.pos);
                    let pos = pick_spawn_position(
                        &mut state.rng,
                        &state.arena.bounds,
                        &state.tuning.spawner,
                        player,
                    );
                    state.spawn_hazard(pos);
                }
            }
            TimedAction::BlinkToggle { generation } => {
                state
                    .player
                    .on_blink(generation, &mut state.scheduler, &state.tuning.player)
            }
            TimedAction::EndInvulnerability { generation } => {
                state.player.on_invulnerability_end(generation)
            }
        }
    }
}

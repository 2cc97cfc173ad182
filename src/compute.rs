/// Game-logic functions.
///
/// Public actions take an immutable reference to the current `GameState`
/// (and, where needed, an RNG handle) and return a brand-new `GameState`.
/// The per-entity helpers below them mutate a single entity in place and are
/// public so they can be exercised on their own.
use rand::Rng;
use tracing::{debug, info};

use crate::collision::{resolve_tiles, CollisionReport};
use crate::config::{
    CharacterStats, EnemySpawn, ATTACK_COOLDOWN_MS, ATTACK_DAMAGE, ATTACK_HEIGHT, ATTACK_REACH,
    BOSS_HEALTH, CONTACT_DAMAGE, CONTACT_DAMAGE_INTERVAL_MS, ENEMY_FRAMES,
    ENEMY_FRAME_INTERVAL_MS, ENEMY_HEALTH, ENEMY_JITTER_ODDS, ENEMY_SIZE, ENEMY_SPEED,
    FLOOR_ROWS, GRAVITY, HAZARD_DAMAGE, JUMP_POWER, MOVE_SPEED, PLAYER_FRAME_INTERVAL_MS,
    PLAYER_HEALTH, PLAYER_HEIGHT, PLAYER_START, PLAYER_WIDTH, RIGHT_EDGE_MARGIN, TILE_SIZE,
};
use crate::entities::{
    AnimalKind, Body, Enemy, EnemyKind, Facing, GameState, GameStatus, Input, Player, Rect,
};
use crate::level::{mark_level_complete, mark_player_defeated};
use crate::tilemap::Tilemap;

// ── Per-kind tables ───────────────────────────────────────────────────────────

/// Special action bound to an animal kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ability {
    /// Sets vertical velocity.
    Leap { vy: f32 },
    /// Moves along facing, then damages enemies within `reach` horizontally.
    Dash { distance: f32, reach: f32, damage: u32 },
    /// Sets a gentle upward velocity.
    Glide { vy: f32 },
    /// Moves along facing.
    Slide { distance: f32 },
    /// Damages enemies inside a box around the player.
    Stomp {
        reach_x: f32,
        reach_y: f32,
        damage: u32,
    },
}

/// Initial vertical velocity of a jump (negative is up).
pub fn jump_velocity(kind: AnimalKind) -> f32 {
    match kind {
        AnimalKind::Macaco => -JUMP_POWER - 6.0,
        AnimalKind::Elefante => -JUMP_POWER + 2.0,
        AnimalKind::Papagaio => -JUMP_POWER - 2.0,
        AnimalKind::Tigre | AnimalKind::Cobra => -JUMP_POWER,
    }
}

pub fn ability_for(kind: AnimalKind) -> Ability {
    match kind {
        AnimalKind::Macaco => Ability::Leap { vy: -22.0 },
        AnimalKind::Tigre => Ability::Dash {
            distance: 120.0,
            reach: 120.0,
            damage: 30,
        },
        AnimalKind::Papagaio => Ability::Glide { vy: -6.0 },
        AnimalKind::Cobra => Ability::Slide { distance: 80.0 },
        AnimalKind::Elefante => Ability::Stomp {
            reach_x: 160.0,
            reach_y: 80.0,
            damage: 40,
        },
    }
}

fn max_health_for(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::TigerBoss => BOSS_HEALTH,
        EnemyKind::TigerMinion | EnemyKind::SnakeMinion => ENEMY_HEALTH,
    }
}

// ── Constructors ──────────────────────────────────────────────────────────────

pub fn new_player(kind: AnimalKind) -> Player {
    let (x, y) = PLAYER_START;
    Player {
        body: Body::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT),
        kind,
        health: PLAYER_HEALTH,
        facing: Facing::Right,
        frame: 0,
        frame_timer_ms: 0,
        ability_ready: true,
        last_ability_ms: None,
        last_attack_ms: None,
        last_contact_ms: None,
    }
}

/// Converts a tile-unit spawn entry into a pixel-space enemy.
pub fn spawn_enemy(spawn: &EnemySpawn) -> Enemy {
    let x = spawn.x as f32 * TILE_SIZE;
    let y = spawn.y as f32 * TILE_SIZE - PLAYER_HEIGHT / 2.0;
    let patrol = spawn.patrol.map(|[a, b]| {
        let (a, b) = (a as f32 * TILE_SIZE, b as f32 * TILE_SIZE);
        (a.min(b), a.max(b))
    });
    let max_health = max_health_for(spawn.kind);
    Enemy {
        body: Body::new(x, y, ENEMY_SIZE, ENEMY_SIZE),
        kind: spawn.kind,
        health: max_health,
        max_health,
        patrol,
        facing: Facing::Right,
        frame: 0,
        frame_timer_ms: 0,
        dead: false,
    }
}

// ── Damage ────────────────────────────────────────────────────────────────────

/// Returns `true` only on the hit that takes health to zero.
pub fn damage_player(player: &mut Player, amount: u32) -> bool {
    if player.health == 0 {
        return false;
    }
    player.health = player.health.saturating_sub(amount);
    player.health == 0
}

/// Returns `true` only on the hit that kills the enemy.
pub fn damage_enemy(enemy: &mut Enemy, amount: u32) -> bool {
    if enemy.dead {
        return false;
    }
    enemy.health = enemy.health.saturating_sub(amount);
    if enemy.health == 0 {
        enemy.dead = true;
        return true;
    }
    false
}

fn damage_enemies_where(
    enemies: &mut [Enemy],
    amount: u32,
    mut hit: impl FnMut(&Enemy) -> bool,
) -> usize {
    let mut killed = 0;
    for enemy in enemies.iter_mut().filter(|e| !e.dead) {
        if hit(enemy) && damage_enemy(enemy, amount) {
            killed += 1;
        }
    }
    killed
}

// ── Entity updates ────────────────────────────────────────────────────────────

/// One physics step for the player: input, gravity, integration, tile
/// collision, bounds clamp, animation and ability recovery.
pub fn update_player(
    player: &mut Player,
    input: Input,
    dt_ms: u64,
    clock_ms: u64,
    stats: CharacterStats,
    tilemap: &Tilemap,
) -> CollisionReport {
    if input.right {
        player.facing = Facing::Right;
    } else if input.left {
        player.facing = Facing::Left;
    }

    let body = &mut player.body;
    body.vx = if input.right {
        MOVE_SPEED
    } else if input.left {
        -MOVE_SPEED
    } else {
        0.0
    };
    body.vy += GRAVITY;
    body.x += body.vx;
    body.y += body.vy;

    // Stays false unless a solid cell pushes the body up this step.
    body.grounded = false;
    let report = resolve_tiles(body, tilemap);

    let max_x = tilemap.width_px() - body.w - RIGHT_EDGE_MARGIN;
    if body.x < 0.0 {
        body.x = 0.0;
    }
    if body.x > max_x {
        body.x = max_x;
    }

    player.frame_timer_ms += dt_ms;
    if player.frame_timer_ms >= PLAYER_FRAME_INTERVAL_MS {
        player.frame_timer_ms = 0;
        player.frame = (player.frame + 1) % stats.frames.max(1);
    }

    if !player.ability_ready {
        let elapsed = player
            .last_ability_ms
            .map_or(u64::MAX, |used| clock_ms.saturating_sub(used));
        if elapsed >= stats.ability_cooldown {
            player.ability_ready = true;
        }
    }

    report
}

/// Y coordinate an enemy of height `h` rests at; enemies ignore the tilemap.
pub fn enemy_ground_y(rows: usize, h: f32) -> f32 {
    (rows - FLOOR_ROWS.min(rows)) as f32 * TILE_SIZE - h
}

/// One step for an enemy: patrol or jitter, gravity onto the ground line,
/// animation.
pub fn update_enemy(enemy: &mut Enemy, dt_ms: u64, tilemap: &Tilemap, rng: &mut impl Rng) {
    let body = &mut enemy.body;
    match enemy.patrol {
        Some((min, max)) => {
            if body.x < min {
                enemy.facing = Facing::Right;
            }
            if body.x > max {
                enemy.facing = Facing::Left;
            }
            body.x += enemy.facing.sign() * ENEMY_SPEED;
        }
        None => {
            let step = if rng.gen_ratio(1, ENEMY_JITTER_ODDS) {
                -ENEMY_SPEED
            } else {
                ENEMY_SPEED
            };
            body.x = (body.x + step).clamp(0.0, (tilemap.width_px() - body.w).max(0.0));
        }
    }

    body.vy += GRAVITY;
    body.y += body.vy;
    let ground_y = enemy_ground_y(tilemap.rows(), body.h);
    if body.y > ground_y {
        body.y = ground_y;
        body.vy = 0.0;
    }

    enemy.frame_timer_ms += dt_ms;
    if enemy.frame_timer_ms > ENEMY_FRAME_INTERVAL_MS {
        enemy.frame_timer_ms = 0;
        enemy.frame = (enemy.frame + 1) % ENEMY_FRAMES;
    }
}

// ── Input-driven actions (pure) ──────────────────────────────────────────────

/// Applies the kind's jump velocity if the player is standing on something.
pub fn jump(state: &GameState) -> GameState {
    let mut next = state.clone();
    if next.status != GameStatus::Playing || !next.player.body.grounded {
        return next;
    }
    next.player.body.vy = jump_velocity(next.player.kind);
    next.player.body.grounded = false;
    next
}

/// Melee hit in front of the player, rate-limited by `ATTACK_COOLDOWN_MS`.
pub fn attack(state: &GameState) -> GameState {
    let mut next = state.clone();
    if next.status != GameStatus::Playing {
        return next;
    }
    let now = next.clock_ms;
    if let Some(last) = next.player.last_attack_ms {
        if now.saturating_sub(last) < ATTACK_COOLDOWN_MS {
            return next;
        }
    }
    next.player.last_attack_ms = Some(now);

    let hitbox = attack_hitbox(&next.player);
    let killed = damage_enemies_where(&mut next.enemies, ATTACK_DAMAGE, |e| {
        hitbox.intersects(&e.body.rect())
    });
    debug!(killed, "attack");
    next
}

/// Area struck by `attack`.
pub fn attack_hitbox(player: &Player) -> Rect {
    let body = &player.body;
    let x = match player.facing {
        Facing::Right => body.x + body.w,
        Facing::Left => body.x - ATTACK_REACH,
    };
    Rect {
        x,
        y: body.y + body.h / 3.0,
        w: ATTACK_REACH,
        h: ATTACK_HEIGHT,
    }
}

/// Fires the kind's ability if it has recovered.
pub fn use_ability(state: &GameState) -> GameState {
    let mut next = state.clone();
    if next.status != GameStatus::Playing || !next.player.ability_ready {
        return next;
    }

    let ability = ability_for(next.player.kind);
    let player = &mut next.player;
    let killed = match ability {
        Ability::Leap { vy } | Ability::Glide { vy } => {
            player.body.vy = vy;
            0
        }
        Ability::Dash {
            distance,
            reach,
            damage,
        } => {
            player.body.x += player.facing.sign() * distance;
            let px = player.body.x;
            damage_enemies_where(&mut next.enemies, damage, |e| (e.body.x - px).abs() < reach)
        }
        Ability::Slide { distance } => {
            player.body.x += player.facing.sign() * distance;
            0
        }
        Ability::Stomp {
            reach_x,
            reach_y,
            damage,
        } => {
            let (px, py) = (player.body.x, player.body.y);
            damage_enemies_where(&mut next.enemies, damage, |e| {
                (e.body.x - px).abs() < reach_x && (e.body.y - py).abs() < reach_y
            })
        }
    };

    next.player.ability_ready = false;
    next.player.last_ability_ms = Some(next.clock_ms);
    info!(kind = next.player.kind.name(), killed, "ability_used");
    next
}

// ── Per-frame tick (RNG is injected) ─────────────────────────────────────────

/// Advance the simulation by one step of `dt_ms`. Does nothing outside
/// `GameStatus::Playing`. All randomness comes through `rng`.
pub fn tick(state: &GameState, input: Input, dt_ms: u64, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    if next.status != GameStatus::Playing {
        return next;
    }
    next.clock_ms += dt_ms;

    // ── 1. Player physics + tile collision ───────────────────────────────────
    let stats = next.roster.stats(next.player.kind);
    let report = update_player(
        &mut next.player,
        input,
        dt_ms,
        next.clock_ms,
        stats,
        &next.tilemap,
    );

    // ── 2. Hazard damage, then death / goal ──────────────────────────────────
    let mut defeated = false;
    for _ in 0..report.hazard_hits {
        defeated |= damage_player(&mut next.player, HAZARD_DAMAGE);
    }
    if defeated {
        mark_player_defeated(&mut next);
    } else if report.reached_goal {
        mark_level_complete(&mut next);
    }

    // ── 3. Enemies ───────────────────────────────────────────────────────────
    for enemy in next.enemies.iter_mut() {
        update_enemy(enemy, dt_ms, &next.tilemap, rng);
    }

    // ── 4. Cull the dead ─────────────────────────────────────────────────────
    next.enemies.retain(|e| !e.dead);

    // ── 5. Contact damage ────────────────────────────────────────────────────
    if next.status == GameStatus::Playing {
        apply_contact_damage(&mut next);
    }

    next
}

fn apply_contact_damage(state: &mut GameState) {
    let now = state.clock_ms;
    if let Some(last) = state.player.last_contact_ms {
        if now.saturating_sub(last) < CONTACT_DAMAGE_INTERVAL_MS {
            return;
        }
    }
    let player_rect = state.player.body.rect();
    let touching = state
        .enemies
        .iter()
        .filter(|e| e.body.rect().intersects(&player_rect))
        .count();
    if touching == 0 {
        return;
    }
    state.player.last_contact_ms = Some(now);

    let mut defeated = false;
    for _ in 0..touching {
        defeated |= damage_player(&mut state.player, CONTACT_DAMAGE);
    }
    if defeated {
        mark_player_defeated(state);
    }
}

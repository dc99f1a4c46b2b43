//! Scene building: simulation state to triangles
//!
//! Reads the state and never mutates it. Output is in arena pixels; the
//! pipeline maps it to clip space.

use glam::Vec2;
use std::f32::consts::PI;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::PLAYER_SIZE;
use crate::heading;
use crate::settings::{QualityPreset, Settings};
use crate::sim::{Enemy, GameState, Microbe, MicrobeKind, Particle, Projectile, Ship};

/// Circle tessellation for the quality preset
fn segments(settings: &Settings) -> u32 {
    match settings.quality {
        QualityPreset::Low => 10,
        QualityPreset::Medium => 16,
        QualityPreset::High => 24,
    }
}

/// Build the full frame for `state`
pub fn build_scene(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(16 * 1024);
    let segs = segments(settings);

    if settings.background {
        for microbe in &state.background.microbes {
            microbe_shape(&mut vertices, microbe, settings);
        }
    }

    for (_, particle) in state.particles.iter() {
        particle_shape(&mut vertices, particle, segs);
    }

    for enemy in &state.enemies {
        enemy_shape(&mut vertices, enemy, settings);
    }

    for (_, droplet) in state.projectiles.iter() {
        droplet_shape(&mut vertices, droplet, settings, segs);
    }

    if state.ship.visible {
        ship_shape(&mut vertices, &state.ship, settings);
    }

    vertices
}

/// Clear color for the current settings
pub fn background_color(settings: &Settings) -> [f32; 4] {
    if settings.high_contrast {
        colors::BACKGROUND_HIGH_CONTRAST
    } else {
        colors::BACKGROUND
    }
}

fn ship_shape(out: &mut Vec<Vertex>, ship: &Ship, settings: &Settings) {
    let dir = heading(ship.angle);
    let body_length = PLAYER_SIZE * 1.5;
    let body_width = PLAYER_SIZE * 0.5;

    // Medicine spray behind the barrel while thrusting
    if ship.thrusting {
        let base = ship.pos - dir * (body_length / 2.0 + 2.0);
        out.extend(shapes::cone(
            base,
            ship.angle + PI,
            PLAYER_SIZE,
            body_width,
            colors::with_alpha(colors::SPRAY, 0.0),
            colors::SPRAY,
        ));
    }

    // Plunger rod and thumb rest
    let rod_center = ship.pos - dir * (body_length / 2.0 + 3.0);
    out.extend(shapes::oriented_rect(rod_center, ship.angle, 6.0, 2.5, colors::PLUNGER));
    let thumb = ship.pos - dir * (body_length / 2.0 + 6.0);
    out.extend(shapes::oriented_rect(thumb, ship.angle, 2.5, body_width * 1.4, colors::PLUNGER));

    // Glass barrel with the medicine inside
    out.extend(shapes::oriented_rect(ship.pos, ship.angle, body_length, body_width, colors::BARREL));
    let fill = if settings.effective_pulse() {
        0.75 + ship.pulse_phase.sin() * 0.1
    } else {
        0.75
    };
    let fill_length = (body_length - 4.0) * fill;
    let fill_center = ship.pos + dir * ((body_length - 4.0) / 2.0 - fill_length / 2.0);
    out.extend(shapes::oriented_rect(
        fill_center,
        ship.angle,
        fill_length,
        body_width - 3.0,
        colors::MEDICINE,
    ));

    // Needle out to the tip
    let hub = ship.pos + dir * (body_length / 2.0);
    out.extend(shapes::oriented_rect(hub + dir * 1.5, ship.angle, 3.0, 4.0, colors::NEEDLE));
    out.extend(shapes::line(hub, ship.tip(), 1.5, colors::NEEDLE));
}

fn enemy_shape(out: &mut Vec<Vertex>, enemy: &Enemy, settings: &Settings) {
    let palette = (enemy.palette as usize).min(colors::HEMORRHOID.len() - 1);
    let pulse = if settings.effective_pulse() {
        1.0 + enemy.pulse_phase.sin() * enemy.pulse_amplitude
    } else {
        1.0
    };
    let radius = enemy.radius * pulse;

    out.extend(shapes::radial_gradient(
        enemy.pos,
        radius * 1.3,
        colors::HEMORRHOID_GLOW,
        colors::with_alpha(colors::HEMORRHOID_GLOW, 0.0),
        segments(settings),
    ));
    out.extend(shapes::blob(
        enemy.pos,
        radius,
        enemy.rotation,
        &enemy.vertex_offsets,
        colors::HEMORRHOID_INNER[palette],
        colors::HEMORRHOID[palette],
    ));
    out.extend(shapes::blob_outline(
        enemy.pos,
        radius,
        enemy.rotation,
        &enemy.vertex_offsets,
        1.0,
        colors::HEMORRHOID_OUTLINE,
    ));
}

fn droplet_shape(out: &mut Vec<Vertex>, droplet: &Projectile, settings: &Settings, segs: u32) {
    let glow = if settings.effective_pulse() {
        2.5 + droplet.pulse_phase.sin() * 0.5
    } else {
        2.5
    };
    out.extend(shapes::radial_gradient(
        droplet.pos,
        droplet.radius * glow,
        colors::DROPLET_GLOW,
        colors::with_alpha(colors::DROPLET_GLOW, 0.0),
        segs,
    ));
    out.extend(shapes::circle(droplet.pos, droplet.radius, colors::DROPLET, segs));
    let shine = droplet.pos - Vec2::splat(droplet.radius * 0.3);
    out.extend(shapes::circle(shine, droplet.radius * 0.35, colors::DROPLET_SHINE, 6));
}

fn particle_shape(out: &mut Vec<Vertex>, particle: &Particle, segs: u32) {
    let palette = (particle.palette as usize).min(colors::PARTICLE.len() - 1);
    let color = colors::with_alpha(colors::PARTICLE[palette], particle.alpha.clamp(0.0, 1.0));
    if particle.spark {
        out.extend(shapes::spark(particle.pos, particle.radius * 2.0, particle.rotation, color));
    } else {
        out.extend(shapes::circle(particle.pos, particle.radius, color, segs.min(8)));
    }
}

fn microbe_shape(out: &mut Vec<Vertex>, microbe: &Microbe, settings: &Settings) {
    let size = microbe.size;
    let pos = microbe.pos;
    let shade = 0.85 + microbe.tint * 0.15;
    let tinted = |c: [f32; 4]| [c[0] * shade, c[1] * shade, c[2] * shade, c[3] * microbe.alpha];
    let segs = segments(settings).min(10);

    match microbe.kind {
        MicrobeKind::BloodCell => {
            out.extend(shapes::circle(pos, size * 2.0, tinted(colors::BLOOD_CELL), segs));
            out.extend(shapes::circle(pos, size, colors::BLOOD_CELL_CENTER, segs));
        }
        MicrobeKind::WhiteCell => {
            out.extend(shapes::circle(pos, size * 2.2, tinted(colors::WHITE_CELL), segs));
            let nucleus = pos + heading(microbe.rotation) * (size * 0.5);
            out.extend(shapes::circle(nucleus, size * 0.9, colors::WHITE_CELL_NUCLEUS, segs));
        }
        MicrobeKind::Platelet => {
            out.extend(shapes::oriented_rect(
                pos,
                microbe.rotation,
                size * 1.8,
                size * 1.1,
                tinted(colors::PLATELET),
            ));
        }
        MicrobeKind::Bacteria => {
            let color = tinted(colors::BACTERIA);
            out.extend(shapes::oriented_rect(pos, microbe.rotation, size * 3.0, size * 1.4, color));
            let cap = heading(microbe.rotation) * (size * 1.5);
            out.extend(shapes::circle(pos + cap, size * 0.7, color, segs));
            out.extend(shapes::circle(pos - cap, size * 0.7, color, segs));
        }
        MicrobeKind::Virus => {
            let color = tinted(colors::VIRUS);
            out.extend(shapes::circle(pos, size * 1.2, color, segs));
            for i in 0..6 {
                let theta = microbe.rotation + i as f32 * PI / 3.0;
                let dir = heading(theta);
                out.extend(shapes::line(
                    pos + dir * size,
                    pos + dir * (size * 1.8),
                    size * 0.3,
                    color,
                ));
            }
        }
    }
}

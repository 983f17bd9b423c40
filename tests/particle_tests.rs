// Host-side tests for the particle link graph.

use glam::Vec3;
use scrollscape_core::particles::{Particle, ParticleConfig, ParticleGraph};

fn still(positions: &[Vec3], min_distance: f32, max_connections: u32) -> ParticleGraph {
    let config = ParticleConfig {
        count: positions.len(),
        half_extent: 10.0,
        min_distance,
        max_connections,
        max_speed: 0.0,
        frame_rate_independent: true,
    };
    let particles = positions.iter().map(|p| Particle::new(*p, Vec3::ZERO)).collect();
    ParticleGraph::from_particles(config, particles)
}

#[test]
fn close_pair_gets_one_half_alpha_edge() {
    let mut g = still(&[Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)], 10.0, 4);
    g.tick(0.0);
    assert_eq!(g.edges().len(), 1);
    let e = g.edges()[0];
    assert_eq!((e.a, e.b), (0, 1));
    assert!((e.alpha - 0.5).abs() < 1e-6);
    assert_eq!(g.draw_count(), 2);
    assert_eq!(g.line_positions()[..2], [Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)]);
    assert_eq!(g.line_alphas()[..2], [e.alpha, e.alpha]);
}

#[test]
fn distant_pair_is_not_linked() {
    let mut g = still(&[Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)], 10.0, 4);
    g.tick(0.0);
    assert!(g.edges().is_empty());
    assert_eq!(g.draw_count(), 0);
}

#[test]
fn connection_counts_never_exceed_the_cap() {
    let cluster: Vec<Vec3> = (0..12)
        .map(|i| Vec3::new(i as f32 * 0.1, (i % 3) as f32 * 0.1, 0.0))
        .collect();
    let mut g = still(&cluster, 5.0, 3);
    g.tick(0.0);
    let mut degree = vec![0u32; cluster.len()];
    for e in g.edges() {
        assert!(e.a < e.b);
        degree[e.a] += 1;
        degree[e.b] += 1;
    }
    for (i, p) in g.particles().iter().enumerate() {
        assert!(degree[i] <= 3, "particle {i} has {} links", degree[i]);
        assert_eq!(p.connections, degree[i]);
    }
    assert!(g.edges().len() <= cluster.len() * 3 / 2);
}

#[test]
fn edges_are_rebuilt_each_tick() {
    let config = ParticleConfig {
        count: 2,
        half_extent: 100.0,
        min_distance: 2.0,
        max_connections: 4,
        max_speed: 1.0,
        frame_rate_independent: false,
    };
    let particles = vec![
        Particle::new(Vec3::ZERO, Vec3::ZERO),
        Particle::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
    ];
    let mut g = ParticleGraph::from_particles(config, particles);
    g.tick(0.0);
    // fixed-step mode moves one velocity per tick regardless of dt
    assert_eq!(g.particles()[1].position.x, 2.0);
    assert!(g.edges().is_empty());
}

#[test]
fn motion_scales_with_frame_time() {
    let config = ParticleConfig {
        count: 1,
        half_extent: 100.0,
        min_distance: 1.0,
        max_connections: 1,
        max_speed: 0.1,
        frame_rate_independent: true,
    };
    let v = Vec3::new(0.1, 0.0, 0.0);
    let mut a = ParticleGraph::from_particles(config.clone(), vec![Particle::new(Vec3::ZERO, v)]);
    let mut b = ParticleGraph::from_particles(config, vec![Particle::new(Vec3::ZERO, v)]);
    a.tick(1.0 / 30.0);
    b.tick(1.0 / 60.0);
    b.tick(1.0 / 60.0);
    assert!((a.particles()[0].position.x - 0.2).abs() < 1e-5);
    assert!((a.particles()[0].position.x - b.particles()[0].position.x).abs() < 1e-5);
}

#[test]
fn particles_bounce_off_the_cube_walls() {
    let config = ParticleConfig {
        count: 1,
        half_extent: 1.0,
        min_distance: 1.0,
        max_connections: 1,
        max_speed: 0.5,
        frame_rate_independent: false,
    };
    let mut g = ParticleGraph::from_particles(
        config,
        vec![Particle::new(Vec3::new(0.9, 0.0, -0.9), Vec3::new(0.5, 0.0, -0.5))],
    );
    g.tick(0.0);
    let p = g.particles()[0];
    assert!(p.velocity.x < 0.0);
    assert!(p.velocity.z > 0.0);
    g.tick(0.0);
    assert!(g.particles()[0].position.x < p.position.x);
}

#[test]
fn impulse_pushes_neighbours_away_within_speed_limit() {
    let config = ParticleConfig {
        count: 2,
        half_extent: 10.0,
        min_distance: 1.0,
        max_connections: 2,
        max_speed: 0.1,
        frame_rate_independent: true,
    };
    let mut g = ParticleGraph::from_particles(
        config,
        vec![
            Particle::new(Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO),
            Particle::new(Vec3::new(9.0, 0.0, 0.0), Vec3::ZERO),
        ],
    );
    g.impulse(Vec3::ZERO, 2.0, 10.0);
    assert!(g.particles()[0].velocity.x > 0.0);
    assert!(g.particles()[0].velocity.length() <= 0.4 + 1e-6);
    assert_eq!(g.particles()[1].velocity, Vec3::ZERO);
    g.relax_speeds(1.0);
    assert!((g.particles()[0].velocity.length() - 0.1).abs() < 1e-5);
}

#[test]
fn invalid_particle_configs_are_rejected() {
    let mut c = ParticleConfig::default();
    assert!(c.validate().is_ok());
    c.min_distance = 0.0;
    assert!(c.validate().is_err());
    c = ParticleConfig {
        half_extent: f32::NAN,
        ..ParticleConfig::default()
    };
    assert!(c.validate().is_err());
    c = ParticleConfig {
        max_speed: -1.0,
        ..ParticleConfig::default()
    };
    assert!(c.validate().is_err());
}

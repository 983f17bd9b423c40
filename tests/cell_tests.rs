// Host-side tests for the cell-division state machine.

use scrollscape_core::cells::{
    CellColony, ColonyConfig, Deformation, DivisionOdds, DivisionPhase, GrowthPattern,
};

fn eager(max_generations: u32) -> ColonyConfig {
    ColonyConfig {
        division_cooldown: 0.0,
        division_duration: 1.0,
        max_generations,
        max_cells: 32,
        cleanup_interval: 1.0e9,
        odds: DivisionOdds::Forced(1.0),
        ..ColonyConfig::default()
    }
}

#[test]
fn colony_starts_with_one_mother_cell() {
    let colony = CellColony::new(ColonyConfig::default());
    assert_eq!(colony.active_count(), 1);
    let mother = &colony.cells()[0];
    assert_eq!(mother.generation, 0);
    assert_eq!(mother.parent, None);
    assert!(!mother.dividing);
    assert_eq!(mother.phase(), None);
}

#[test]
fn forced_division_yields_two_first_generation_daughters() {
    let mut colony = CellColony::new(eager(2));
    assert!(colony.tick(0.1).is_empty());
    assert!(colony.cells()[0].dividing);

    let events = colony.tick(1.0);
    assert_eq!(events.len(), 1);
    let ev = events[0];
    assert_eq!(ev.parent, 0);
    assert_eq!(ev.generation, 1);
    assert_eq!(colony.active_count(), 2);

    let mother = colony.get(0).unwrap();
    assert!(!mother.active);
    for id in ev.children {
        let d = colony.get(id).unwrap();
        assert!(d.active);
        assert_eq!(d.generation, 1);
        assert_eq!(d.parent, Some(0));
        assert_eq!(d.age, 0.0);
    }
    let [a, b] = ev.children;
    let (pa, pb) = (colony.get(a).unwrap().position, colony.get(b).unwrap().position);
    assert!(pa.distance(pb) > 0.0);
}

#[test]
fn each_division_adds_exactly_one_active_cell() {
    let mut colony = CellColony::new(eager(3));
    let mut completed = 0;
    for _ in 0..40 {
        let before = colony.active_count();
        let events = colony.tick(0.25);
        completed += events.len();
        assert_eq!(colony.active_count(), before + events.len());
    }
    assert_eq!(colony.active_count(), 1 + completed);
}

#[test]
fn growth_stops_at_the_generation_ceiling() {
    let mut colony = CellColony::new(eager(2));
    for _ in 0..40 {
        colony.tick(0.5);
    }
    assert_eq!(colony.active_count(), 4);
    assert!(colony.active_cells().all(|c| c.generation == 2));
    assert!(colony.active_cells().all(|c| !colony.is_eligible(c)));
    assert_eq!(colony.cells().len(), 7);
}

#[test]
fn division_at_the_ceiling_is_a_no_op() {
    let mut colony = CellColony::new(eager(1));
    {
        let c = &mut colony.cells_mut()[0];
        c.generation = 1;
        c.dividing = true;
        c.division_progress = 0.99;
    }
    let events = colony.tick(1.0);
    assert!(events.is_empty());
    assert_eq!(colony.active_count(), 1);
    let c = &colony.cells()[0];
    assert!(c.active);
    assert!(!c.dividing);
    assert_eq!(c.division_progress, 0.0);
}

#[test]
fn full_colony_does_not_start_divisions() {
    let mut colony = CellColony::new(ColonyConfig {
        max_cells: 1,
        ..eager(4)
    });
    for _ in 0..10 {
        assert!(colony.tick(0.5).is_empty());
    }
    assert_eq!(colony.active_count(), 1);
    assert!(!colony.cells()[0].dividing);
}

#[test]
fn cooldown_and_forced_division_guards() {
    let mut colony = CellColony::new(ColonyConfig {
        division_cooldown: 2.0,
        odds: DivisionOdds::Forced(0.0),
        ..eager(3)
    });
    assert!(!colony.force_division(0));
    colony.tick(2.5);
    assert!(!colony.cells()[0].dividing);
    assert!(colony.force_division(0));
    assert!(!colony.force_division(0));
    assert!(!colony.force_division(999));
}

#[test]
fn phases_follow_progress_in_order() {
    assert_eq!(DivisionPhase::from_progress(0.0), DivisionPhase::Preparation);
    assert_eq!(DivisionPhase::from_progress(0.3), DivisionPhase::Stretching);
    assert_eq!(DivisionPhase::from_progress(0.7), DivisionPhase::Separation);
    assert_eq!(DivisionPhase::from_progress(0.95), DivisionPhase::Completion);
    assert!(DivisionPhase::Preparation < DivisionPhase::Completion);

    let mut colony = CellColony::new(eager(2));
    colony.tick(0.1);
    let mut seen = Vec::new();
    for _ in 0..9 {
        colony.tick(0.1);
        if let Some(p) = colony.cells()[0].phase() {
            if seen.last() != Some(&p) {
                seen.push(p);
            }
        }
    }
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert!(seen.contains(&DivisionPhase::Stretching));
}

#[test]
fn deformation_grows_through_division() {
    let mut colony = CellColony::new(eager(2));
    assert_eq!(colony.cells()[0].deformation(), Deformation::ROUND);
    colony.tick(0.1);
    let mut last = colony.cells()[0].deformation().elongation;
    for _ in 0..8 {
        colony.tick(0.1);
        let e = colony.cells()[0].deformation().elongation;
        assert!(e >= last);
        last = e;
    }
    assert!(last > 1.5);
}

#[test]
fn tiered_odds_fall_with_population() {
    assert!(CellColony::base_probability(1) > CellColony::base_probability(3));
    assert!(CellColony::base_probability(3) > CellColony::base_probability(6));
    assert!(CellColony::base_probability(6) > CellColony::base_probability(20));
    let colony = CellColony::new(ColonyConfig::default());
    let pressure = colony.population_pressure();
    assert!(pressure > 0.9 && pressure <= 1.0);
}

#[test]
fn sweep_prunes_oldest_inactive_records() {
    let mut colony = CellColony::new(ColonyConfig {
        soft_ceiling: 5,
        ..eager(2)
    });
    for _ in 0..40 {
        colony.tick(0.5);
    }
    assert_eq!(colony.cells().len(), 7);
    assert_eq!(colony.sweep(), 2);
    assert_eq!(colony.cells().len(), 5);
    assert!(colony.get(0).is_none());
    assert_eq!(colony.active_count(), 4);
    assert_eq!(colony.sweep(), 0);
}

#[test]
fn mutation_keeps_genetics_in_bounds() {
    let mut colony = CellColony::new(ColonyConfig {
        mutation: 0.5,
        pattern_flip_chance: 0.5,
        ..eager(4)
    });
    for _ in 0..80 {
        colony.tick(0.25);
    }
    for c in colony.cells() {
        let g = c.genetics;
        assert!((0.0..=1.0).contains(&g.color_bias));
        assert!((0.6..=1.4).contains(&g.size_bias));
        assert!((0.0..=1.0).contains(&g.division_tendency));
        assert!(matches!(g.growth_pattern, GrowthPattern::Radial | GrowthPattern::Spiral));
    }
}

#[test]
fn reset_and_validation() {
    let mut colony = CellColony::new(eager(2));
    for _ in 0..10 {
        colony.tick(0.5);
    }
    colony.reset();
    assert_eq!(colony.active_count(), 1);
    assert_eq!(colony.cells().len(), 1);

    assert!(ColonyConfig::default().validate().is_ok());
    assert!(ColonyConfig { max_cells: 0, ..ColonyConfig::default() }.validate().is_err());
    assert!(ColonyConfig { division_duration: 0.0, ..ColonyConfig::default() }.validate().is_err());
}

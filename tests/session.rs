//! End-to-end spins against the recording surface.

use wheelspin::magnifier;
use wheelspin::prelude::*;
use wheelspin::recording::DrawCommand;

fn labels(n: usize) -> Vec<WheelEntry> {
    entries_from_labels((0..n).map(|i| format!("prize {i}")))
}

#[test]
fn two_second_session_samples_match_the_curve() {
    let curve = SpeedCurve::default();
    let mut animator = SpinAnimator::new();
    animator.set_rotation(15.0);
    let session = animator.start(500.0, 2000.0, 4, &mut Prng::new(3)).unwrap();

    let r0 = session.rotation_at(&curve, session.progress_at(500.0));
    let r5 = session.rotation_at(&curve, session.progress_at(1500.0));
    let r1 = session.rotation_at(&curve, session.progress_at(2500.0));

    assert_eq!(r0, session.start_rotation_deg);
    assert_eq!(
        r5,
        session.start_rotation_deg + session.total_rotation_deg * curve.normalized_position_at(0.5)
    );
    assert_eq!(r1, session.start_rotation_deg + session.total_rotation_deg);
    assert!(r0 <= r5 && r5 <= r1);
}

#[test]
fn renderer_magnifier_and_outcome_agree_on_every_frame() {
    let entries = labels(9);
    let mut engine = SpinEngine::new(SpinSettings {
        duration_s: 1.5,
        ..SpinSettings::default()
    });
    engine.set_entries(entries.clone());
    let mut renderer: WheelRenderer<RecordingSurface> = WheelRenderer::new(900.0, 540.0);
    renderer.set_entries(&entries);
    let mut target = RecordingSurface::new(900.0, 540.0);

    engine.spin(0.0, &mut Prng::new(2024)).unwrap();
    let mut now = 0.0;
    let outcome = loop {
        now += 16.7;
        let report = engine.frame(now);
        let stats = renderer.render(&mut target, report.rotation_deg).unwrap();
        target.take_commands();

        let live = report.reading.unwrap();
        assert_eq!(stats.reading, Some(live));
        let center = stats.rows.iter().find(|r| r.offset == 0).unwrap();
        assert_eq!(center.entry_index, live.index);
        assert_eq!(engine.current_entry().unwrap().label, entries[live.index].label);

        if let Some(done) = report.completed {
            assert_eq!(done.index, live.index);
            break done;
        }
    };

    assert_eq!(outcome.index, selected_index(engine.rotation_deg(), 9));
    assert_eq!(renderer.cache_builds(), 1);
}

#[test]
fn resize_mid_spin_rebuilds_the_cache_once() {
    let entries = labels(5);
    let mut renderer: WheelRenderer<RecordingSurface> = WheelRenderer::new(640.0, 400.0);
    renderer.set_entries(&entries);
    let mut target = RecordingSurface::new(640.0, 400.0);

    for k in 0..10 {
        if k == 5 {
            renderer.resize(1024.0, 700.0);
            target.resize(1024.0, 700.0);
        }
        renderer.render(&mut target, k as f64 * 40.0).unwrap();
    }
    assert_eq!(renderer.cache_builds(), 2);

    let layer_draws = target.count(|c| matches!(c, DrawCommand::Layer { .. }));
    assert_eq!(layer_draws, 10);
}

#[test]
fn magnifier_rows_scroll_one_row_per_slice() {
    let n = 6;
    let layout = WheelLayout::from_container(800.0, 500.0);
    let slice = 360.0 / n as f64;
    // Half a slice of rotation moves every row by half a row height.
    let a = read_pointer(slice * 0.25, n).unwrap();
    let b = read_pointer(slice * 0.75, n).unwrap();
    assert_eq!(a.index, b.index);
    let rows_a = magnifier::rows(&a, n, &layout);
    let rows_b = magnifier::rows(&b, n, &layout);
    for (ra, rb) in rows_a.iter().zip(&rows_b) {
        assert_eq!(ra.entry_index, rb.entry_index);
        assert!(((ra.y - rb.y).abs() - layout.row_height * 0.5).abs() < 1e-9);
    }
}

#[test]
fn consecutive_spins_each_complete_once() {
    let mut engine = SpinEngine::new(SpinSettings {
        duration_s: 0.5,
        ..SpinSettings::default()
    });
    engine.set_entries(labels(3));
    let mut rng = Prng::new(77);
    let mut completions = 0;
    let mut now = 0.0;
    for _ in 0..4 {
        engine.spin(now, &mut rng).unwrap();
        while engine.is_spinning() {
            now += 16.0;
            if engine.frame(now).completed.is_some() {
                completions += 1;
            }
        }
    }
    assert_eq!(completions, 4);
}

use acmiview_core::LocalPosition;
use acmiview_track::{
    offset_by, seconds_between, Classification, Entity, EntityRegistry, Sample, Timestamp,
    Trajectory,
};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;

fn t(secs: f64) -> Timestamp {
    offset_by(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(), secs).unwrap()
}

/// Sorted sample times in whole milliseconds plus a position per sample
fn samples_strategy() -> impl Strategy<Value = Vec<(i64, (f64, f64, f64))>> {
    prop::collection::vec(
        (0i64..20_000, (-1e5f64..1e5, -1e5f64..1e5, 0f64..15_000.0)),
        1..40,
    )
    .prop_map(|mut v| {
        v.sort_by_key(|(ms, _)| *ms);
        v
    })
}

fn build(samples: &[(i64, (f64, f64, f64))]) -> Trajectory {
    let mut tr = Trajectory::new();
    for (ms, (x, y, z)) in samples {
        tr.push(Sample::new(t(*ms as f64 / 1000.0), LocalPosition::new(*x, *y, *z)))
            .unwrap();
    }
    tr
}

/// Front-to-back scan for the bracketing pair
fn linear_scan(tr: &Trajectory, at: Timestamp) -> Option<LocalPosition> {
    let samples = tr.samples();
    let first = samples.first()?;
    let last = samples.last()?;
    if at < first.time {
        return None;
    }
    if at >= last.time {
        return Some(last.position);
    }
    for pair in samples.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.time <= at && at <= b.time {
            let span = seconds_between(a.time, b.time);
            let f = if span > 0.0 {
                seconds_between(a.time, at) / span
            } else {
                0.0
            };
            return Some(a.position.lerp(&b.position, f));
        }
    }
    None
}

fn close(a: &LocalPosition, b: &LocalPosition) -> bool {
    a.distance_to(b) < 1e-6
}

proptest! {
    #[test]
    fn binary_search_matches_linear_scan(samples in samples_strategy(), query_ms in -1_000i64..21_000) {
        let tr = build(&samples);
        let at = t(query_ms as f64 / 1000.0);
        match (tr.position_at(at), linear_scan(&tr, at)) {
            (Some(a), Some(b)) => prop_assert!(close(&a, &b), "{a} != {b}"),
            (a, b) => prop_assert_eq!(a, b),
        }
    }

    #[test]
    fn clamped_after_last_sample(samples in samples_strategy(), extra_ms in 0i64..100_000) {
        let tr = build(&samples);
        let last = tr.last().unwrap();
        let at = offset_by(last.time, extra_ms as f64 / 1000.0).unwrap();
        prop_assert_eq!(tr.position_at(at), Some(last.position));
    }

    #[test]
    fn absent_before_first_sample(samples in samples_strategy(), before_ms in 1i64..100_000) {
        let tr = build(&samples);
        let at = offset_by(tr.first_time().unwrap(), -(before_ms as f64) / 1000.0).unwrap();
        prop_assert_eq!(tr.position_at(at), None);
    }

    #[test]
    fn interpolated_point_lies_on_bracket(samples in samples_strategy(), query_ms in 0i64..20_000) {
        let tr = build(&samples);
        let at = t(query_ms as f64 / 1000.0);
        let s = tr.samples();
        let (first, last) = (tr.first_time().unwrap(), tr.last_time().unwrap());
        if !(first < at && at < last) {
            return Ok(());
        }

        let i = s.windows(2).position(|p| p[0].time <= at && at <= p[1].time).unwrap();
        let (a, b) = (&s[i], &s[i + 1]);
        let p = tr.position_at(at).unwrap();

        // collinear with the bracket and no farther from either end than the bracket length
        let ab = a.position.distance_to(&b.position);
        let via = a.position.distance_to(&p) + p.distance_to(&b.position);
        prop_assert!((via - ab).abs() < 1e-6 * ab.max(1.0));
    }

    #[test]
    fn queries_are_idempotent(samples in samples_strategy(), query_ms in -1_000i64..21_000) {
        let tr = build(&samples);
        let at = t(query_ms as f64 / 1000.0);
        prop_assert_eq!(tr.position_at(at), tr.position_at(at));
    }

    #[test]
    fn trail_starts_and_ends_on_the_trajectory(
        samples in samples_strategy(),
        now_ms in 0i64..20_000,
        window_ms in 1_000i64..300_000,
    ) {
        let tr = build(&samples);
        let now = t(now_ms as f64 / 1000.0);
        if let Some(points) = tr.trail(now, window_ms as f64 / 1000.0) {
            prop_assert!(points.len() >= 2);
            let tail = tr.position_at(now).unwrap();
            prop_assert!(close(points.last().unwrap(), &tail));
        }
    }
}

#[test]
fn registry_bounds_follow_add_and_remove() {
    let span = |id: &str, first: f64, last: f64| {
        let mut e = Entity::new(id, id, Classification::Aircraft);
        e.add_sample(Sample::new(t(first), LocalPosition::ORIGIN)).unwrap();
        e.add_sample(Sample::new(t(last), LocalPosition::ORIGIN)).unwrap();
        e
    };

    let mut reg = EntityRegistry::new();
    reg.add(span("A", 10.0, 50.0));
    reg.add(span("B", 5.0, 40.0));
    assert_eq!(reg.time_range(), Some((t(5.0), t(50.0))));

    reg.remove("A");
    assert_eq!(reg.time_range(), Some((t(5.0), t(40.0))));
}

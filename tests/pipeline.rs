use chrono::{TimeZone, Utc};

use routesculpt::common::color::*;
use routesculpt::input::polyline;
use routesculpt::input::stream::*;
use routesculpt::{colorize, normalize, normalize_polyline, simplify, simplify_to_count, GeoPoint};


fn summary(name: &str) -> ActivitySummary {
    ActivitySummary {
        name: name.to_string(),
        start_time: Utc.with_ymd_and_hms(2024, 9, 14, 6, 0, 0).unwrap(),
        elevation_gain: Some(380.0),
        duration: 5400.0,
        distance: None,
    }
}

/// Switchback climb sampled every few meters
fn climb() -> ActivityStream {
    let mut stream = ActivityStream::default();
    for i in 0..400 {
        let s = i as f64;
        let lat = 46.5 + s*0.00005;
        let lng = 8.0 + (s*0.05).sin()*0.002;
        stream.latlng.push((lat, lng));
        stream.elevation.push(1200.0 + s*1.5 - (s*0.3).cos()*8.0);
        stream.elapsed.push(s*10.0);
    }
    stream
}

#[test]
fn pipeline_t0() {
    let route = normalize(&summary("Pass climb"), &climb(), true).unwrap();
    let stats = route.stats();
    assert_eq!(route.points().len(), 400);
    assert_eq!(stats.elevation_gain, 380.0);
    assert!(stats.elevation_loss>0.0);
    assert!(stats.distance>2000.0);
    assert!(stats.end_time.is_some());

    let bounds = route.bounds();
    assert!(route.points().iter().all(|p| {
        p.longitude>=bounds.southwest.0 && p.longitude<=bounds.northeast.0
            && p.latitude>=bounds.southwest.1 && p.latitude<=bounds.northeast.1
    }));

    let path = route.to_path();
    let reduced = simplify_to_count(&path, 60, 20);
    assert!(reduced.len()<path.len());
    assert_eq!(reduced.first(), path.first());
    assert_eq!(reduced.last(), path.last());
    assert!(reduced.iter().all(|p| p.elevation.is_some()));

    let elevations: Vec<f64> = reduced.iter().filter_map(|p| p.elevation).collect();
    let mut clipped = vec![false; elevations.len()];
    clipped[0] = true;
    let fallback = RGB (0.2, 0.2, 0.2);
    let colors = colorize(&elevations, &clipped, GradientPreset::Terrain.stops(), 0.5, fallback);
    assert_eq!(colors.len(), reduced.len());
    assert_eq!(colors.vertex(0), Some(fallback));
    assert!(colors.as_slice().iter().all(|c| (0.0..=1.0).contains(c)));
}

#[test]
fn pipeline_t1() {
    let latlng: Vec<(f64, f64)> = climb().latlng;
    let encoded = polyline::encode(&latlng);
    let route = normalize_polyline(&summary("Preview"), &encoded, true).unwrap();
    assert_eq!(route.points().len(), latlng.len());
    for (p, (lat, lng)) in route.points().iter().zip(&latlng) {
        assert!((p.latitude - lat).abs()<=1e-5);
        assert!((p.longitude - lng).abs()<=1e-5);
    }

    let simplified = simplify(route.points(), 0.0005);
    assert!(simplified.len()>=2);
    assert!(simplified.len()<route.points().len());
}

#[test]
fn pipeline_t2() {
    let route = normalize_polyline(&summary("Empty"), "", false).unwrap();
    assert!(route.points().is_empty());
    assert!(simplify(route.points(), 0.1).is_empty());
    assert!(simplify_to_count(route.points(), 10, 20).is_empty());

    let lone: Vec<GeoPoint> = vec![GeoPoint::new(1.0, 1.0)];
    assert_eq!(simplify_to_count(&lone, 0, 20), lone);
}

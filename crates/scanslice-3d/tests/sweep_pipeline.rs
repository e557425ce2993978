use approx::assert_relative_eq;
use scanslice_3d::{
    deskew::{deskew_slices, DeskewConfig, DeskewDirection},
    io::bin::{read_bin_points, write_bin_points},
    slicing::{classify_azimuth, organize_points, par_organize_points, SlicerConfig},
};
use scanslice_lie::se3::MotionVector;

/// A synthetic sweep: 16 rings, one return every 0.05 degrees.
fn synthetic_sweep() -> Vec<Vec<f64>> {
    let mut points = Vec::new();
    for ring in 0..16 {
        let elevation = (ring as f64 - 8.0).to_radians();
        for step in 0..7200 {
            let azimuth = (step as f64 * 0.05).to_radians();
            let range = 10.0 + (step % 13) as f64 * 0.1;
            points.push(vec![
                range * elevation.cos() * azimuth.cos(),
                range * elevation.cos() * azimuth.sin(),
                range * elevation.sin(),
                ring as f64,
            ]);
        }
    }
    points
}

#[test]
fn test_organize_sweep() -> Result<(), Box<dyn std::error::Error>> {
    let points = synthetic_sweep();
    let config = SlicerConfig::default();
    let slices = organize_points(points.iter().cloned(), &config)?;

    assert_eq!(slices.len(), 720);

    let kept = slices.iter().map(|s| s.len()).sum::<usize>();
    assert!(kept < points.len());

    // every kept point snaps to the slice it was stored in
    for (idx, slice) in slices.iter().enumerate() {
        for p in slice.iter() {
            let theta = scanslice_3d::slicing::azimuth_deg(p[0], p[1]);
            assert_eq!(classify_azimuth(theta, &config), Some(idx));
        }
        assert!(slice.windows(2).all(|w| w[0][2] <= w[1][2]));
    }

    let parallel = par_organize_points(points, &config)?;
    assert_eq!(parallel, slices);
    Ok(())
}

#[test]
fn test_read_organize_deskew() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let path = tmp_dir.path().join("sweep.bin");
    write_bin_points(&path, &synthetic_sweep())?;

    let points = read_bin_points(&path, 4)?;
    let slices = organize_points(points, &SlicerConfig::with_granularity(1.0))?;

    let motion = MotionVector::from_array([0.8, 0.1, 0.0, 0.0, 0.0, 0.05]);
    let backward = DeskewConfig::default();
    let forward = DeskewConfig {
        direction: DeskewDirection::Forward,
        ..backward
    };

    let deskewed = deskew_slices(&slices, &motion, &backward)?;
    let restored = deskew_slices(&deskewed, &motion, &forward)?;

    for (a, b) in restored.iter().flatten().zip(slices.iter().flatten()) {
        assert_eq!(a[3], b[3]);
        for i in 0..3 {
            assert_relative_eq!(a[i], b[i], epsilon = 1e-9);
        }
    }
    Ok(())
}

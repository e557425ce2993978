use argh::FromArgs;
use serde::Deserialize;
use std::path::PathBuf;

use scanslice::lie::se3::MotionVector;
use scanslice::s3d::{
    deskew::{deskew_slices, DeskewConfig},
    io::bin::{read_bin_points, write_bin_points, DEFAULT_FIELDS_PER_POINT},
    slicing::{organize_points, par_organize_points, SlicerConfig},
};

#[derive(FromArgs)]
/// Slice a sweep log by azimuth and compensate the sensor motion
struct Args {
    /// path to the input sweep log (.bin)
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to write the deskewed sweep log (.bin)
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// path to a json file with the slicer, deskew and motion settings
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// sweep motion as tx,ty,tz,wx,wy,wz; overrides the config file
    #[argh(option, short = 'm', from_str_fn(parse_motion))]
    motion: Option<MotionVector>,

    /// number of f32 fields per record in the input log
    #[argh(option, default = "DEFAULT_FIELDS_PER_POINT")]
    fields: usize,

    /// sort the slices in parallel
    #[argh(switch)]
    parallel: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    slicer: SlicerConfig,
    deskew: DeskewConfig,
    motion: MotionVector,
}

fn parse_motion(value: &str) -> Result<MotionVector, String> {
    let values = value
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("{v}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    let values: [f64; 6] = values
        .try_into()
        .map_err(|v: Vec<f64>| format!("expected 6 motion components, got {}", v.len()))?;
    Ok(MotionVector::from_array(values))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut settings = match &args.config {
        Some(path) => serde_json::from_str::<Settings>(&std::fs::read_to_string(path)?)?,
        None => Settings::default(),
    };
    if let Some(motion) = args.motion {
        settings.motion = motion;
    }
    log::info!("Settings: {:?}", settings);

    let points = read_bin_points(&args.input, args.fields)?;
    println!("Input sweep: #{} points", points.len());

    let now = std::time::Instant::now();
    let slices = match args.parallel {
        true => par_organize_points(points, &settings.slicer)?,
        false => organize_points(points, &settings.slicer)?,
    };
    log::debug!("organize elapsed: {:?}", now.elapsed());

    let num_kept = slices.iter().map(|s| s.len()).sum::<usize>();
    let num_occupied = slices.iter().filter(|s| !s.is_empty()).count();
    println!(
        "Sliced: #{} points in {}/{} slices",
        num_kept,
        num_occupied,
        slices.len()
    );

    let now = std::time::Instant::now();
    let deskewed = deskew_slices(&slices, &settings.motion, &settings.deskew)?;
    log::debug!("deskew elapsed: {:?}", now.elapsed());

    if let Some(output) = args.output {
        let rows = deskewed.into_iter().flatten().collect::<Vec<_>>();
        write_bin_points(&output, &rows)?;
        println!("Wrote #{} points to {}", rows.len(), output.display());
    }

    Ok(())
}

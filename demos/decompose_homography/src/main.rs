use argh::FromArgs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use kornia_homography::{
    linalg, CameraMotion, DecompositionMethod, DecompositionParams, HomographyDecomposer,
};

#[derive(FromArgs)]
/// Decompose a planar homography into camera motion hypotheses
struct Args {
    /// path to a json file with the homography `h`, the intrinsics `k` and optional `params`,
    /// see `data/reference_scene.json` for a sample
    #[argh(option)]
    input: Option<PathBuf>,

    /// decomposition method: `svd` or `closed-form`
    #[argh(option, default = "DecompositionMethod::SvdBased")]
    method: DecompositionMethod,
}

/// Homography and intrinsics as row-major 3x3 arrays.
#[derive(Deserialize)]
struct Scene {
    h: [[f64; 3]; 3],
    k: [[f64; 3]; 3],
    #[serde(default)]
    params: DecompositionParams,
}

/// Motion hypothesis printed with row-major arrays.
#[derive(Serialize)]
struct MotionReport {
    rotation: [[f64; 3]; 3],
    translation: [f64; 3],
    normal: [f64; 3],
}

impl From<&CameraMotion> for MotionReport {
    fn from(motion: &CameraMotion) -> Self {
        Self {
            rotation: linalg::mat3_to_rows(&motion.rotation),
            translation: motion.translation.to_array(),
            normal: motion.normal.to_array(),
        }
    }
}

fn reference_scene() -> Scene {
    Scene {
        h: [
            [81.1551391671253, 88.2921244076486, -3654.60266252177],
            [97.9788368422579, 106.556736454251, -10832.7494480565],
            [0.0194699936416257, 0.0235813413282153, 7.77972095366621],
        ],
        k: [[600.0, 0.0, 320.0], [0.0, 600.0, 240.0], [0.0, 0.0, 1.0]],
        params: DecompositionParams::default(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let scene = match &args.input {
        Some(path) => {
            log::info!("reading scene from {}", path.display());
            let file = std::fs::File::open(path)?;
            serde_json::from_reader(std::io::BufReader::new(file))?
        }
        None => {
            log::info!("no input given, using the reference scene");
            reference_scene()
        }
    };

    let h = linalg::mat3_from_rows(&scene.h);
    let k = linalg::mat3_from_rows(&scene.k);

    let decomposer = HomographyDecomposer::with_params(args.method, scene.params);
    let motions = decomposer.try_decompose_homography(&h, &k)?;
    log::info!("{} decomposition: #{} motions", args.method, motions.len());

    let reports = motions.iter().map(MotionReport::from).collect::<Vec<_>>();
    println!("{}", serde_json::to_string_pretty(&reports)?);

    Ok(())
}

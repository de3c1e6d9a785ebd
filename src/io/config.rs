use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculus::{DerivativeParams, QuadratureParams};
use crate::dynamics::{DoubleWellParams, KeplerParams, OrbitParams, ProjectileParams};
use crate::error::Result;
use crate::maps::{RotorParams, SpiralParams};
use crate::quantum::{BandParams, EigenParams, WavepacketParams};
use crate::stochastic::{DiffusionParams, IdealGasParams, IsingParams, ToleranceParams};

/// Parameters of every experiment. Missing sections keep their defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rotor: RotorParams,
    pub spiral: SpiralParams,
    pub derivative: DerivativeParams,
    pub quadrature: QuadratureParams,
    pub double_well: DoubleWellParams,
    pub kepler: KeplerParams,
    pub orbit: OrbitParams,
    pub projectile: ProjectileParams,
    pub eigen: EigenParams,
    pub band: BandParams,
    pub wavepacket: WavepacketParams,
    pub ising: IsingParams,
    pub diffusion: DiffusionParams,
    pub ideal_gas: IdealGasParams,
    pub tolerance: ToleranceParams,
}

/// Deserialize a [`Config`] from a YAML file.
pub fn read_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let config: Config = serde_yaml::from_reader(reader)?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

// example of yaml file
// rotor:
//   kick_strength: 0.9
//   starts: [[1.0, 0.5], [3.0, -1.0]]
// eigen:
//   potential: { kind: harmonic }
//   hbar: 0.1
// ising:
//   size: 32
//   tau: 2.0

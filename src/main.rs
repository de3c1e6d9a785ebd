use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};

use rust_cp::calculus::{self, ArctanSquare, Differentiable, Integrand};
use rust_cp::dynamics::{self, OrbitBody};
use rust_cp::io::{read_columns, read_config, read_values, Config};
use rust_cp::maps;
use rust_cp::plot::{render_spin_grid, Figure, Series};
use rust_cp::quantum::{self, Cosine, DoubleWell, Potential};
use rust_cp::stats::{self, Histogram};
use rust_cp::stochastic::{self, IsingSimulation};
use rust_cp::toys::{self, filecheck};

#[derive(Parser, Debug)]
#[command(version, about = "Computational physics experiments", long_about = None)]
struct Args {
    /// YAML file with one section per experiment
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the SVG figures
    #[arg(long, global = true, default_value = "plots")]
    out: PathBuf,

    /// Seed for the random number generator
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// -v for progress, -vv for detail
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Phase portrait of the kicked rotor
    Rotor {
        #[arg(short = 'k', long)]
        kick_strength: Option<f64>,
        #[arg(long)]
        kicks: Option<usize>,
        /// Start point `theta,p`, repeatable
        #[arg(long = "start", value_parser = parse_point, allow_hyphen_values = true)]
        starts: Vec<(f64, f64)>,
    },
    /// Decaying spiral around the given centres
    Spiral {
        #[arg(long = "start", value_parser = parse_point, allow_hyphen_values = true)]
        centers: Vec<(f64, f64)>,
    },
    /// Error of finite-difference derivatives against the step size
    Derivative {
        #[arg(short, long)]
        x: Option<f64>,
    },
    /// Error of composite quadrature rules against the strip count
    Integrate {
        #[arg(long)]
        max_exp: Option<f64>,
    },
    /// Stroboscopic section of the driven double well
    DoubleWell {
        #[arg(long)]
        periods: Option<usize>,
        /// Driving amplitude
        #[arg(short, long)]
        b: Option<f64>,
        #[arg(long = "start", value_parser = parse_point, allow_hyphen_values = true)]
        starts: Vec<(f64, f64)>,
    },
    /// Kepler orbits of the solar system
    Kepler {
        /// Plot ln(r + 1) instead of r
        #[arg(long)]
        log: bool,
    },
    /// Direct integration of Earth and Halley's comet
    Orbit {
        #[arg(long)]
        dt: Option<f64>,
        #[arg(long)]
        years: Option<f64>,
    },
    /// Optimal shot put and energies of a measured track
    Projectile {
        /// Whitespace-delimited `t x z` file
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Bound states of a box-discretised potential
    Eigen {
        #[arg(long)]
        hbar: Option<f64>,
        #[arg(long)]
        e_max: Option<f64>,
    },
    /// Bloch bands of the periodic cosine potential
    Band {
        #[arg(long)]
        hbar: Option<f64>,
        /// Bloch phase whose states are drawn, repeatable
        #[arg(long = "k", allow_hyphen_values = true)]
        ks: Vec<f64>,
    },
    /// Time evolution of a Gaussian packet in the tilted double well
    Wavepacket {
        /// Packet centre, repeatable
        #[arg(long = "x0", allow_hyphen_values = true)]
        starts: Vec<f64>,
        #[arg(long, allow_hyphen_values = true)]
        momentum: Option<f64>,
    },
    /// Metropolis simulation of the 2D Ising model
    Ising {
        #[arg(long)]
        tau: Option<f64>,
        /// Initial magnetisation
        #[arg(long = "m", allow_hyphen_values = true)]
        m: Option<f64>,
        #[arg(long)]
        size: Option<usize>,
        #[arg(long)]
        sweeps: Option<usize>,
        /// Scan the configured temperatures instead of a single run
        #[arg(long)]
        scan: bool,
    },
    /// Ensemble of drifting Brownian walkers
    Diffusion {
        #[arg(long)]
        walkers: Option<usize>,
        /// Remove the absorbing wall
        #[arg(long)]
        free: bool,
    },
    /// Wall pressure of a small ideal gas
    IdealGas {
        #[arg(long)]
        realizations: Option<usize>,
    },
    /// Fit test of shafts and bores with Gaussian tolerances
    Tolerance {
        #[arg(long)]
        pairs: Option<usize>,
    },
    /// Mean, error and histogram of a measurement file
    Stats {
        file: PathBuf,
        #[arg(long)]
        bins: Option<usize>,
    },
    /// Exact factorial and Euler's number from its series
    Factorial {
        n: Option<u64>,
        #[arg(long)]
        terms: Vec<u64>,
    },
    /// Fibonacci numbers by recursion and iteration
    Fibonacci { n: Option<u32> },
    /// Check whether three sides form a right triangle
    Triangle {
        #[arg(allow_hyphen_values = true)]
        sides: Vec<String>,
    },
    /// Lucas-Lehmer test of Mersenne numbers
    Mersenne { exponents: Vec<u32> },
    /// Logarithm of an integer
    Log {
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
        #[arg(long, default_value_t = std::f64::consts::E)]
        base: f64,
    },
    /// Volume of spheres
    Sphere { radii: Vec<f64> },
    /// Report or fix tabs, non-ASCII characters and long lines
    Filecheck {
        #[arg(short, long)]
        file: PathBuf,
        /// Write the cleaned file here instead of only reporting
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_point(s: &str) -> std::result::Result<(f64, f64), String> {
    let (a, b) = s.split_once(',').ok_or_else(|| format!("expected `x,y`, got `{}`", s))?;
    let x = a.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = b.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok((x, y))
}

fn save(figure: &Figure, out: &Path, name: &str) -> Result<()> {
    let path = out.join(name);
    figure.render(&path).with_context(|| format!("failed to render {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    let config = match &args.config {
        Some(path) => read_config(path).with_context(|| format!("failed to read config {}", path.display()))?,
        None => Config::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    fs::create_dir_all(&args.out).with_context(|| format!("failed to create {}", args.out.display()))?;
    let out = args.out.as_path();

    match args.command {
        Command::Rotor { kick_strength, kicks, starts } => {
            let mut params = config.rotor;
            params.kick_strength = kick_strength.unwrap_or(params.kick_strength);
            params.kicks = kicks.unwrap_or(params.kicks);
            if !starts.is_empty() {
                params.starts = starts;
            }
            run_rotor(&params, out)
        }
        Command::Spiral { centers } => {
            let mut params = config.spiral;
            if !centers.is_empty() {
                params.centers = centers;
            }
            run_spiral(&params, out)
        }
        Command::Derivative { x } => {
            let mut params = config.derivative;
            params.x = x.unwrap_or(params.x);
            run_derivative(&params, out)
        }
        Command::Integrate { max_exp } => {
            let mut params = config.quadrature;
            params.max_exp = max_exp.unwrap_or(params.max_exp);
            run_integrate(&params, out)
        }
        Command::DoubleWell { periods, b, starts } => {
            let mut params = config.double_well;
            params.periods = periods.unwrap_or(params.periods);
            params.system.b = b.unwrap_or(params.system.b);
            if !starts.is_empty() {
                params.starts = starts;
            }
            run_double_well(&params, out)
        }
        Command::Kepler { log } => {
            let mut params = config.kepler;
            params.log_radius |= log;
            run_kepler(&params, out)
        }
        Command::Orbit { dt, years } => {
            let mut params = config.orbit;
            params.dt = dt.unwrap_or(params.dt);
            params.years = years.unwrap_or(params.years);
            run_orbit(&params, out)
        }
        Command::Projectile { data } => run_projectile(&config.projectile, data.as_deref(), out),
        Command::Eigen { hbar, e_max } => {
            let mut params = config.eigen;
            params.hbar = hbar.unwrap_or(params.hbar);
            params.e_max = e_max.unwrap_or(params.e_max);
            run_eigen(&params, out)
        }
        Command::Band { hbar, ks } => {
            let mut params = config.band;
            params.hbar = hbar.unwrap_or(params.hbar);
            if !ks.is_empty() {
                params.selected_k = ks;
            }
            run_band(&params, out)
        }
        Command::Wavepacket { starts, momentum } => {
            let mut params = config.wavepacket;
            params.momentum = momentum.unwrap_or(params.momentum);
            if !starts.is_empty() {
                params.starts = starts;
            }
            run_wavepacket(&params, out)
        }
        Command::Ising { tau, m, size, sweeps, scan } => {
            let mut params = config.ising;
            params.tau = tau.unwrap_or(params.tau);
            params.initial_m = m.unwrap_or(params.initial_m);
            params.size = size.unwrap_or(params.size);
            params.sweeps = sweeps.unwrap_or(params.sweeps);
            run_ising(params, scan, &mut rng, out)
        }
        Command::Diffusion { walkers, free } => {
            let mut params = config.diffusion;
            params.walkers = walkers.unwrap_or(params.walkers);
            params.absorbing &= !free;
            run_diffusion(&params, &mut rng, out)
        }
        Command::IdealGas { realizations } => {
            let mut params = config.ideal_gas;
            params.realizations = realizations.unwrap_or(params.realizations);
            run_ideal_gas(&params, &mut rng, out)
        }
        Command::Tolerance { pairs } => {
            let mut params = config.tolerance;
            params.pairs = pairs.unwrap_or(params.pairs);
            let rate = stochastic::fit_failure_rate(&params, &mut rng)?;
            println!("{} pairs, {:.2} % do not fit", params.pairs, rate);
            Ok(())
        }
        Command::Stats { file, bins } => run_stats(&file, bins, out),
        Command::Factorial { n, terms } => run_factorial(n.unwrap_or(10), &terms),
        Command::Fibonacci { n } => run_fibonacci(n),
        Command::Triangle { sides } => run_triangle(&sides),
        Command::Mersenne { exponents } => run_mersenne(&exponents),
        Command::Log { value, base } => run_log(value.as_deref(), base),
        Command::Sphere { radii } => {
            let radii = if radii.is_empty() { vec![2.3, 3.9, 7.0] } else { radii };
            for r in radii {
                println!("sphere of radius {} has volume {:.6}", r, toys::sphere_volume(r));
            }
            Ok(())
        }
        Command::Filecheck { file, output } => run_filecheck(&file, output.as_deref()),
    }
}

fn run_rotor(params: &maps::RotorParams, out: &Path) -> Result<()> {
    let mut figure = Figure::new(format!("Kicked rotor, K = {}", params.kick_strength), "theta", "p")
        .x_range(0.0..2.0 * std::f64::consts::PI)
        .y_range(-std::f64::consts::PI..std::f64::consts::PI);
    for ((theta, p), orbit) in params.starts.iter().zip(maps::phase_portrait(params)) {
        println!("start ({:.3}, {:.3}): {} points", theta, p, orbit.len());
        figure.push(Series::points(orbit).labelled(format!("({:.2}, {:.2})", theta, p)));
    }
    save(&figure, out, "rotor.svg")
}

fn run_spiral(params: &maps::SpiralParams, out: &Path) -> Result<()> {
    let mut figure = Figure::new("Spiral", "x", "y");
    for &center in &params.centers {
        figure.push(Series::line(maps::spiral(center, params.samples, params.t_max)));
    }
    save(&figure, out, "spiral.svg")
}

fn run_derivative(params: &calculus::DerivativeParams, out: &Path) -> Result<()> {
    let f = ArctanSquare;
    let exact = f.derivative(params.x).context("test function has no analytic derivative")?;
    let steps = calculus::logspace(params.min_exp, params.max_exp, params.samples);
    let scan = calculus::scan_errors(&f, params.x, exact, &steps)?;

    println!("f'({:.6}) = {:.12}", params.x, exact);
    for (name, (h, err)) in [
        ("forward", scan.best_forward),
        ("central", scan.best_central),
        ("extrapolated", scan.best_extrapolated),
    ] {
        println!("{:>12}: smallest error {:.3e} at h = {:.3e}", name, err, h);
    }

    let pair = |errors: &[f64]| scan.steps.iter().copied().zip(errors.iter().copied()).collect::<Vec<_>>();
    let figure = Figure::new("Relative error of difference quotients", "h", "relative error")
        .log_log()
        .with(Series::line(pair(&scan.forward)).labelled("forward"))
        .with(Series::line(pair(&scan.central)).labelled("central"))
        .with(Series::line(pair(&scan.extrapolated)).labelled("extrapolated"));
    save(&figure, out, "derivative.svg")
}

fn run_integrate(params: &calculus::QuadratureParams, out: &Path) -> Result<()> {
    let counts = calculus::subinterval_counts(params.max_exp, params.samples);
    for integrand in &params.integrands {
        let (a, b) = integrand.interval();
        let scan = calculus::scan_quadrature_errors(|x| integrand.value(x), a, b, integrand.exact(), &counts)?;
        if let Some(last) = scan.widths.len().checked_sub(1) {
            println!(
                "{:>14}: dx = {:.3e}  midpoint {:.3e}  trapezoid {:.3e}  simpson {:.3e}",
                integrand.name(),
                scan.widths[last],
                scan.midpoint[last],
                scan.trapezoid[last],
                scan.simpson[last]
            );
        }
        for row in calculus::compare_rules(|x| integrand.value(x), a, b, &params.support_points)? {
            println!(
                "{:>14}: {:>6} points  midpoint {:.10}  trapezoid {:.10}  simpson {:.10}  exact {:.10}",
                integrand.name(),
                row.points,
                row.midpoint,
                row.trapezoid,
                row.simpson,
                integrand.exact()
            );
        }
        let pair = |errors: &[f64]| scan.widths.iter().copied().zip(errors.iter().copied()).collect::<Vec<_>>();
        let figure = Figure::new(format!("Quadrature error for {}", integrand.name()), "dx", "relative error")
            .log_log()
            .with(Series::line(pair(&scan.midpoint)).labelled("midpoint"))
            .with(Series::line(pair(&scan.trapezoid)).labelled("trapezoid"))
            .with(Series::line(pair(&scan.simpson)).labelled("simpson"));
        let name = match integrand {
            Integrand::Sine => "integrate_sine.svg",
            Integrand::Gaussian => "integrate_gaussian.svg",
            Integrand::Step => "integrate_step.svg",
            Integrand::Damped => "integrate_damped.svg",
        };
        save(&figure, out, name)?;
    }
    Ok(())
}

fn run_double_well(params: &dynamics::DoubleWellParams, out: &Path) -> Result<()> {
    let static_part = params.system.static_part();
    let mut figure = Figure::new("Driven double well, stroboscopic section", "x", "p")
        .x_range(-2.0..2.0)
        .y_range(-2.5..2.5);
    for &level in &params.contour_levels {
        for curve in dynamics::energy_contour(&static_part, level, (-2.0, 2.0), 400) {
            figure.push(Series::line(curve));
        }
    }
    for &start in &params.starts {
        let trajectory = dynamics::simulate_double_well(params, start)?;
        let section = trajectory.stroboscopic(params.steps_per_period);
        println!("start ({:.3}, {:.3}): {} stroboscopic points", start.0, start.1, section.len());
        figure.push(Series::points(section).labelled(format!("({:.2}, {:.2})", start.0, start.1)));
    }
    save(&figure, out, "double_well.svg")
}

fn run_kepler(params: &dynamics::KeplerParams, out: &Path) -> Result<()> {
    let mut figure = Figure::new("Kepler orbits", "x", "y");
    for body in &params.bodies {
        let polar = dynamics::sample_orbit(body, params.samples, params.log_radius)?;
        println!(
            "{:>8}: period {:.1} d, e = {:.4}, a = {:.2} AU",
            body.name, body.period_days, body.eccentricity, body.semi_major_axis
        );
        figure.push(Series::line(dynamics::polar_to_cartesian(&polar)).labelled(body.name.clone()));
    }
    save(&figure, out, "kepler.svg")
}

fn run_orbit(params: &dynamics::OrbitParams, out: &Path) -> Result<()> {
    let steps = (params.years / params.dt).round() as usize;
    let mut figure = Figure::new("Orbits around the sun", "x / AU", "y / AU");
    for spec in &params.bodies {
        let body = OrbitBody::from_aphelion(spec.semi_major_axis, spec.eccentricity);
        println!("{:>8}: specific energy {:.6} AU^2/yr^2", spec.name, body.specific_energy());
        let path = dynamics::simulate_orbit(body, params.dt, steps)?;
        figure.push(Series::line(path).labelled(spec.name.clone()));
    }
    save(&figure, out, "orbit.svg")
}

fn run_projectile(params: &dynamics::ProjectileParams, data: Option<&Path>, out: &Path) -> Result<()> {
    let angle = params.optimal_angle();
    let (apex_x, apex_z) = params.apex(angle);
    println!("optimal angle: {:.2} deg", angle.to_degrees());
    println!("range: {:.3} m", params.range(angle));
    println!("apex: ({:.3}, {:.3}) m", apex_x, apex_z);
    let figure = Figure::new("Shot put", "x / m", "z / m")
        .with(Series::line(params.trajectory(angle)).labelled(format!("{:.1} deg", angle.to_degrees())));
    save(&figure, out, "projectile.svg")?;

    if let Some(path) = data {
        let columns = read_columns(path, 3).with_context(|| format!("failed to read {}", path.display()))?;
        let (t, x, z) = (&columns[0], &columns[1], &columns[2]);
        let energies = dynamics::energies_from_samples(t, x, z, params.mass, params.gravity)?;
        let pair = |values: &[f64]| t.iter().copied().zip(values.iter().copied()).collect::<Vec<_>>();
        let figure = Figure::new("Energies of the measured track", "t / s", "E / J")
            .with(Series::line(pair(&energies.kinetic)).labelled("kinetic"))
            .with(Series::line(pair(&energies.potential)).labelled("potential"))
            .with(Series::line(pair(&energies.total)).labelled("total"));
        save(&figure, out, "projectile_energy.svg")?;
    }
    Ok(())
}

fn run_eigen(params: &quantum::EigenParams, out: &Path) -> Result<()> {
    let (grid, v, spectrum) = params.solve()?;
    let mut figure = Figure::new("Eigenstates", "x", "E")
        .with(Series::line(grid.x.iter().copied().zip(v.iter().copied()).collect()).labelled("V(x)"));
    let upper = params.e_max + 0.5 * (params.e_max - v.iter().copied().fold(f64::INFINITY, f64::min)).abs();
    figure = figure.y_range(v.iter().copied().fold(f64::INFINITY, f64::min)..upper);
    for (n, &e) in spectrum.energies.iter().enumerate() {
        println!("E_{} = {:.6}", n, e);
        let state = spectrum.state(n);
        let curve = grid.x.iter().zip(state.iter()).map(|(&x, &psi)| (x, e + params.scale * psi * psi)).collect();
        figure.push(Series::line(curve));
    }
    save(&figure, out, "eigen.svg")
}

fn run_band(params: &quantum::BandParams, out: &Path) -> Result<()> {
    let grid = quantum::periodic_grid(0.0, 1.0, params.points)?;
    let v = Cosine { amplitude: params.amplitude }.sample(&grid.x);
    let ks = params.phases();
    let bands = quantum::band_structure(params.hbar, &grid, &v, &ks, params.e_max)?;

    let mut figure = Figure::new("Band structure", "k", "E");
    for (n, band) in bands.bands.iter().enumerate() {
        let (lo, hi) = band.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &e| (lo.min(e), hi.max(e)));
        println!("band {}: [{:.4}, {:.4}]", n, lo, hi);
        figure.push(Series::line(ks.iter().copied().zip(band.iter().copied()).collect()));
    }
    save(&figure, out, "band.svg")?;

    for (i, &k) in params.selected_k.iter().enumerate() {
        let spectrum = quantum::diagonalize_bloch(params.hbar, &grid, &v, k)?;
        let mut figure = Figure::new(format!("Bloch states at k = {:.3}", k), "x", "E");
        figure.push(Series::line(quantum::tile_periods(&grid, &v, params.periods)).labelled("V(x)"));
        for (n, &e) in spectrum.energies.iter().enumerate().take(bands.bands.len()) {
            let density: Vec<f64> = spectrum.density(n).into_iter().map(|d| e + 0.1 * d).collect();
            figure.push(Series::line(quantum::tile_periods(&grid, &density, params.periods)));
        }
        save(&figure, out, &format!("bloch_{}.svg", i))?;
    }
    Ok(())
}

fn run_wavepacket(params: &quantum::WavepacketParams, out: &Path) -> Result<()> {
    let grid = quantum::discretize(-params.half_width, params.half_width, params.points)?;
    let v = DoubleWell { a: params.tilt }.sample(&grid.x);
    let spectrum = quantum::diagonalize(params.hbar, &grid, &v)?;
    let times = calculus::linspace(0.0, params.t_max, params.time_samples);
    let shown = spectrum.below(params.e_max).len();
    info!(states = spectrum.len(), shown, "spectrum ready");

    for (i, &x0) in params.starts.iter().enumerate() {
        let evolution = quantum::run_evolution(&spectrum, &grid.x, x0, params, &times)?;
        println!("x0 = {:.3}: <E> = {:.6}, reconstruction error {:.2e}", x0, evolution.energy, evolution.reconstruction_error);
        let weights = quantum::excitation_weights(&evolution.coefficients);
        for (n, (e, w)) in spectrum.energies.iter().zip(&weights).take(shown).enumerate() {
            println!("  E_{} = {:.6}  weight {:.4}", n, e, w);
        }

        let mut figure = Figure::new(format!("Wave packet from x0 = {:.2}", x0), "x", "|phi|^2")
            .with(Series::line(grid.x.iter().copied().zip(v.iter().map(|v| 10.0 * v)).collect()).labelled("10 V(x)"));
        let last = times.len().saturating_sub(1);
        for &index in &[0, last / 2, last] {
            if let (Some(density), Some(t)) = (evolution.densities.get(index), times.get(index)) {
                let curve = grid.x.iter().copied().zip(density.iter().copied()).collect();
                figure.push(Series::line(curve).labelled(format!("t = {:.2}", t)));
            }
        }
        save(&figure, out, &format!("wavepacket_{}.svg", i))?;

        let levels: Vec<(f64, f64)> = spectrum.energies.iter().copied().zip(weights.iter().copied()).take(shown).collect();
        if !levels.is_empty() {
            let figure = Figure::new("Excitation of eigenstates", "E", "|c|^2 / max").with(Series::points(levels));
            save(&figure, out, &format!("wavepacket_{}_weights.svg", i))?;
        }
    }
    Ok(())
}

fn run_ising(params: stochastic::IsingParams, scan: bool, rng: &mut StdRng, out: &Path) -> Result<()> {
    if scan {
        let results = stochastic::temperature_scan(&params, rng)?;
        let tau_c = stochastic::critical_temperature();
        println!("critical temperature {:.4}", tau_c);
        for &(tau, m) in &results {
            println!("tau = {:.3}: <|m|> = {:.4}, Onsager {:.4}", tau, m, stochastic::onsager_magnetization(tau));
        }
        let taus = calculus::linspace(0.01, results.last().map_or(4.0, |r| r.0), 400);
        let onsager = taus.iter().map(|&t| (t, stochastic::onsager_magnetization(t))).collect();
        let figure = Figure::new("Magnetisation against temperature", "tau", "|m|")
            .with(Series::points(results).labelled("Metropolis"))
            .with(Series::line(onsager).labelled("Onsager"));
        return save(&figure, out, "ising_scan.svg");
    }

    let size = params.size;
    let tau = params.tau;
    let results = IsingSimulation::new(params, rng)?.run()?;
    println!(
        "tau = {:.3}: m = {:.6} ± {:.6}, autocorrelation time {:.2} sweeps, acceptance {:.3}",
        tau,
        results.magnetization.mean,
        results.magnetization.error,
        results.magnetization.autocorrelation_time,
        results.acceptance_rate
    );
    println!("Onsager m = {:.6}", stochastic::onsager_magnetization(tau));
    let series = results.magnetizations.iter().enumerate().map(|(i, &m)| (i as f64, m)).collect();
    let figure = Figure::new(format!("Magnetisation at tau = {:.2}", tau), "sweep", "m")
        .y_range(-1.05..1.05)
        .with(Series::line(series));
    save(&figure, out, "ising_m.svg")?;
    let path = out.join("ising_lattice.svg");
    render_spin_grid(&path, &format!("{}x{} lattice at tau = {:.2}", size, size, tau), size, results.final_lattice.spins())?;
    println!("wrote {}", path.display());
    Ok(())
}

fn run_diffusion(params: &stochastic::DiffusionParams, rng: &mut StdRng, out: &Path) -> Result<()> {
    let ensemble = stochastic::simulate_diffusion(params, rng)?;
    let wall = if params.absorbing { params.x_abs } else { f64::INFINITY };
    let snapshots = stochastic::ensemble_statistics(&ensemble, wall);
    for s in &snapshots {
        println!("t = {:6.2}: mean {:8.4}, variance {:8.4}, surviving {:.4}", s.time, s.mean, s.variance, s.surviving);
    }

    let (Some(positions), Some(&t)) = (ensemble.positions.last(), ensemble.times.last()) else {
        bail!("no recorded snapshots");
    };
    let (histogram, scaled) = stochastic::snapshot_histogram(positions, wall, params.bins)?;
    let theory: Vec<(f64, f64)> = calculus::linspace(histogram.min, histogram.max, 200)
        .into_iter()
        .map(|x| {
            let density = if params.absorbing {
                stochastic::theory_density_absorbing(x, t, params.x0, params.drift, params.diffusion, params.x_abs)
            } else {
                stochastic::theory_density(x, t, params.x0, params.drift, params.diffusion)
            };
            density.map(|d| (x, d))
        })
        .collect::<rust_cp::Result<_>>()?;
    let figure = Figure::new(format!("Walker density at t = {:.1}", t), "x", "density")
        .with(Series::bars(scaled, histogram.bin_width()).labelled("simulation"))
        .with(Series::line(theory).labelled("theory"));
    save(&figure, out, "diffusion.svg")?;

    let moments = Figure::new("Moments of the ensemble", "t", "")
        .with(Series::line(snapshots.iter().map(|s| (s.time, s.mean)).collect()).labelled("mean"))
        .with(Series::line(snapshots.iter().map(|s| (s.time, s.variance)).collect()).labelled("variance"));
    save(&moments, out, "diffusion_moments.svg")
}

fn run_ideal_gas(params: &stochastic::IdealGasParams, rng: &mut StdRng, out: &Path) -> Result<()> {
    let stats = stochastic::sample_pressures(params, rng)?;
    println!(
        "{} gases of {} particles: pressure {:.4} ± {:.4} (std {:.4})",
        params.realizations, params.particles, stats.summary.mean, stats.summary.std_error, stats.summary.std_dev
    );
    let histogram = Histogram::new(&stats.samples, params.bins)?;
    let bars = histogram.centers().into_iter().zip(histogram.density()).collect();
    let figure = Figure::new("Wall pressure", "P", "density").with(Series::bars(bars, histogram.bin_width()));
    save(&figure, out, "ideal_gas.svg")
}

fn run_stats(file: &Path, bins: Option<usize>, out: &Path) -> Result<()> {
    let data = read_values(file).with_context(|| format!("failed to read {}", file.display()))?;
    let summary = stats::summarize(&data)?;
    println!("n = {}", summary.n);
    println!("mean = {:.6} ± {:.6}", summary.mean, summary.std_error);
    println!("variance = {:.6}, standard deviation = {:.6}", summary.variance, summary.std_dev);

    let running = stats::running_summary(&data);
    let index = |values: &[f64]| values.iter().enumerate().map(|(i, &v)| ((i + 1) as f64, v)).collect::<Vec<_>>();
    let figure = Figure::new("Running mean", "n", "")
        .with(Series::line(index(&running.mean)).labelled("mean"))
        .with(Series::line(index(&running.std_error)).labelled("standard error"));
    save(&figure, out, "stats_running.svg")?;

    let histogram = Histogram::new(&data, bins.unwrap_or_else(|| stats::default_bin_count(data.len())))?;
    let bars = histogram.centers().into_iter().zip(histogram.counts.iter().map(|&c| c as f64)).collect();
    let figure = Figure::new("Histogram", "value", "count").with(Series::bars(bars, histogram.bin_width()));
    save(&figure, out, "stats_histogram.svg")
}

fn run_factorial(n: u64, terms: &[u64]) -> Result<()> {
    println!("{}! = {}", n, toys::factorial(n));
    let defaults = [10, 100, 150, 200];
    let terms = if terms.is_empty() { &defaults[..] } else { terms };
    for &k in terms {
        match toys::euler_approximation(k) {
            Ok(e) => println!("e with {} terms = {:.50}", k, e),
            Err(err) => println!("e with {} terms: {}", k, err),
        }
    }
    Ok(())
}

fn run_fibonacci(n: Option<u32>) -> Result<()> {
    let Some(n) = n else {
        println!("order  fibonacci       time / s   calls");
        for order in [10, 20, 30, 40] {
            let start = Instant::now();
            let (value, calls) = toys::fibonacci_recursive(order);
            println!("{:5}  {:14}  {:9.5}  {:10}", order, value, start.elapsed().as_secs_f64(), calls);
        }
        println!("\norder  fibonacci         ratio to predecessor");
        for (order, value, ratio) in toys::fibonacci_ratios(50)? {
            println!("{:5}  {:16}  {:.15}", order, value, ratio);
        }
        return Ok(());
    };
    if n <= 40 {
        let start = Instant::now();
        let (value, calls) = toys::fibonacci_recursive(n);
        println!("recursive: F({}) = {} in {:.5} s with {} calls", n, value, start.elapsed().as_secs_f64(), calls);
    }
    let value = toys::fibonacci_iterative(n)?;
    let previous = toys::fibonacci_iterative(n.saturating_sub(1))?;
    let ratio = if previous == 0 { 1.0 } else { value as f64 / previous as f64 };
    println!("iterative: F({}) = {}, ratio to predecessor {:.15}", n, value, ratio);
    Ok(())
}

fn run_triangle(sides: &[String]) -> Result<()> {
    let cases: Vec<Vec<String>> = if sides.is_empty() {
        [["3", "4", "5"], ["2", "4", "1"], ["4", "53", "42"], ["42", "26", "94"], ["4", "5", "3"], ["5", "3", "4"]]
            .iter()
            .map(|case| case.iter().map(|s| s.to_string()).collect())
            .collect()
    } else if sides.len() == 3 {
        vec![sides.to_vec()]
    } else {
        bail!("expected three sides, got {}", sides.len());
    };
    for case in cases {
        let parsed: std::result::Result<Vec<i64>, _> = case.iter().map(|s| s.parse::<i64>()).collect();
        match parsed.as_deref() {
            Ok(&[a, b, c]) => {
                let verdict = if toys::is_right_triangle(a, b, c) { "right" } else { "oblique" };
                println!("({}, {}, {}): {}", a, b, c, verdict);
            }
            _ => println!("({}): please enter integer side lengths", case.join(", ")),
        }
    }
    Ok(())
}

fn run_mersenne(exponents: &[u32]) -> Result<()> {
    let defaults = [3, 42, 26];
    let exponents = if exponents.is_empty() { &defaults[..] } else { exponents };
    for &p in exponents {
        let result = toys::lucas_lehmer(p)?;
        if result.prime {
            println!("2^{} - 1 is prime", p);
            println!("{}", result.value);
            println!("{:#b}", result.value);
        } else {
            println!("2^{} - 1 is not prime", p);
        }
    }
    Ok(())
}

fn run_log(value: Option<&str>, base: f64) -> Result<()> {
    let e = std::f64::consts::E;
    let cases: Vec<(String, f64)> = match value {
        Some(v) => vec![(v.to_string(), base)],
        None => vec![
            ("2".into(), e),
            ("1000".into(), 10.0),
            ("1073741824".into(), 2.0),
            ("2401".into(), 7.0),
            ("-2121".into(), 3.0),
            ("apple".into(), 4.0),
        ],
    };
    for (v, b) in cases {
        match v.parse::<i64>() {
            Ok(n) => match toys::logarithm(n, b) {
                Ok(l) => println!("log_{:.4}({}) = {:.12}", b, n, l),
                Err(err) => println!("log_{:.4}({}): {}", b, n, err),
            },
            Err(_) => println!("cannot take the logarithm of '{}'", v),
        }
    }
    Ok(())
}

fn run_filecheck(file: &Path, output: Option<&Path>) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let Some(output) = output else {
        let report = filecheck::report(&bytes);
        if report.is_clean() {
            println!("Nothing found.");
        }
        if !report.tabs.is_empty() {
            println!("tabs found in lines:");
            report.tabs.iter().for_each(|line| println!("line {}", line));
        }
        if !report.non_ascii.is_empty() {
            println!("non-ascii characters in lines:");
            report.non_ascii.iter().for_each(|(line, count)| println!("line {} counts: {}", line, count));
        }
        if !report.long_lines.is_empty() {
            println!("lines too long:");
            report.long_lines.iter().for_each(|line| println!("line {}", line));
        }
        return Ok(());
    };

    let replaced = filecheck::replace(&bytes);
    if replaced.unknown > 0 {
        println!("{} unknown characters replaced with '@'", replaced.unknown);
    }
    if !replaced.long_lines.is_empty() {
        println!("lines too long:");
        replaced.long_lines.iter().for_each(|line| println!("line {}", line));
    }
    filecheck::write_with_backup(output, &replaced.text)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("wrote {}", output.display());
    Ok(())
}

//! Classical fourth-order Runge-Kutta.

use super::traits::OdeSystem;
use crate::error::{CpError, Result};

/// Advance `y` from `t` to `t + dt` with one RK4 step.
pub fn rk4_step<S: OdeSystem<N>, const N: usize>(system: &S, t: f64, y: &[f64; N], dt: f64) -> [f64; N] {
    let mut k1 = [0.0; N];
    let mut k2 = [0.0; N];
    let mut k3 = [0.0; N];
    let mut k4 = [0.0; N];
    let mut tmp = [0.0; N];

    system.rhs(t, y, &mut k1);
    for i in 0..N {
        tmp[i] = y[i] + 0.5 * dt * k1[i];
    }
    system.rhs(t + 0.5 * dt, &tmp, &mut k2);
    for i in 0..N {
        tmp[i] = y[i] + 0.5 * dt * k2[i];
    }
    system.rhs(t + 0.5 * dt, &tmp, &mut k3);
    for i in 0..N {
        tmp[i] = y[i] + dt * k3[i];
    }
    system.rhs(t + dt, &tmp, &mut k4);

    let mut next = *y;
    for i in 0..N {
        next[i] += dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    next
}

/// Solve the system and report the state at every time in `times`.
///
/// `times[0]` is the initial time. Each output interval is split into
/// `substeps` equal RK4 steps.
pub fn integrate<S: OdeSystem<N>, const N: usize>(
    system: &S,
    y0: [f64; N],
    times: &[f64],
    substeps: usize,
) -> Result<Vec<[f64; N]>> {
    if times.is_empty() {
        return Err(CpError::invalid("no output times"));
    }
    if substeps == 0 {
        return Err(CpError::invalid("substeps must be positive"));
    }
    let mut states = Vec::with_capacity(times.len());
    let mut y = y0;
    states.push(y);
    for window in times.windows(2) {
        let dt = (window[1] - window[0]) / substeps as f64;
        let mut t = window[0];
        for _ in 0..substeps {
            y = rk4_step(system, t, &y, dt);
            t += dt;
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(CpError::NoConvergence { iterations: states.len() });
        }
        states.push(y);
    }
    Ok(states)
}

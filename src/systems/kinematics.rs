//! Kinematics - RK4 integration of rocket flight.
//!
//! Each rocket carries a drag and a lift coefficient. The lift term couples
//! the velocity components (spin-induced Magnus offset):
//!
//! ```text
//! dx/dt  = vx
//! dvx/dt = -Cm*vx - Km*vy
//! dy/dt  = vy
//! dvy/dt = -G - Cm*vy + Km*vx
//! ```

use crate::types::{AeroCoefficients, KinematicState};

/// Evaluate the force model at `state`.
///
/// # Arguments
/// * `state` - Current `[x, vx, y, vy]`
/// * `coeffs` - Drag and lift coefficients of the rocket
/// * `gravity` - Gravitational acceleration (positive, acts along -Y)
///
/// # Returns
/// The time derivative of every state component
pub fn derivative(state: &KinematicState, coeffs: AeroCoefficients, gravity: f32) -> KinematicState {
    let vx = state.vx();
    let vy = state.vy();
    KinematicState::new(
        vx,
        -coeffs.drag * vx - coeffs.lift * vy,
        vy,
        -gravity - coeffs.drag * vy + coeffs.lift * vx,
    )
}

/// RK4 (Runge-Kutta 4th order) integration step.
///
/// Stages are evaluated at `s`, `s + dt/2*k1`, `s + dt/2*k2` and `s + dt*k3`,
/// then combined as `s + dt/6 * (k1 + 2*k2 + 2*k3 + k4)`.
///
/// # Arguments
/// * `state` - State at the start of the step
/// * `coeffs` - Drag and lift coefficients of the rocket
/// * `gravity` - Gravitational acceleration
/// * `dt` - Step size in simulation time units
///
/// # Returns
/// The state at the end of the step
pub fn rk4_step(
    state: &KinematicState,
    coeffs: AeroCoefficients,
    gravity: f32,
    dt: f32,
) -> KinematicState {
    if dt == 0.0 {
        return *state;
    }

    let k1 = derivative(state, coeffs, gravity);
    let k2 = derivative(&state.offset(&k1, 0.5 * dt), coeffs, gravity);
    let k3 = derivative(&state.offset(&k2, 0.5 * dt), coeffs, gravity);
    let k4 = derivative(&state.offset(&k3, dt), coeffs, gravity);

    let mut next = [0.0; KinematicState::DIM];
    for (i, value) in next.iter_mut().enumerate() {
        *value = state.0[i] + dt * (k1.0[i] + 2.0 * k2.0[i] + 2.0 * k3.0[i] + k4.0[i]) / 6.0;
    }
    KinematicState(next)
}

/// Simulation step for one frame.
///
/// The step scales with wall-clock frame delta: `time_scale * (elapsed - previous)`.
/// A clock that has not advanced (or was restarted behind `previous`) yields 0.
pub fn frame_dt(elapsed: f32, previous: f32, time_scale: f32) -> f32 {
    (time_scale * (elapsed - previous)).max(0.0)
}

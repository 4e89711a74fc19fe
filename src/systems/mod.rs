//! Salute systems and the pure per-rocket math they run.

pub mod debug;
pub mod fragmentation;
pub mod kinematics;
pub mod salute;

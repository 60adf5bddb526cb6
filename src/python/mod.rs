//! Python bindings for the Durak engine.
//!
//! # Quick Start
//!
//! ```python
//! import rust_durak as durak
//!
//! env = durak.DurakEnv(player_count=3, seed=42)
//! features = env.reset()
//! while not env.is_over:
//!     legal = env.legal_actions()
//!     features, terminal = env.step(0)
//!
//! worker = durak.SelfPlayWorker(durak.SelfPlayConfig(games=64))
//! for trajectory in worker.play_parallel(threads=4):
//!     states = trajectory.features_numpy()
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::DurakError;

mod py_env;
mod py_self_play;

pub use py_env::*;
pub use py_self_play::*;

pub(crate) fn to_py_err(err: DurakError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// rust_durak: Durak rule engine for self-play training.
#[pymodule]
fn rust_durak(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDurakEnv>()?;
    m.add_class::<PySelfPlayConfig>()?;
    m.add_class::<PySelfPlayWorker>()?;
    m.add_class::<PyTrajectory>()?;
    Ok(())
}

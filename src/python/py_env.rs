//! Environment bindings for Python.
//!
//! Actions cross the boundary as indices into `legal_actions()`, which
//! returns their display strings; observations cross as encoded numpy
//! vectors.

use numpy::PyArray1;
use pyo3::prelude::*;

use crate::core::{GameConfig, GameOutcome, PlayerId};
use crate::env::DurakEnv;
use crate::observe::{Observation, ObservationEncoder};

use super::to_py_err;

/// Python wrapper for DurakEnv.
#[pyclass(name = "DurakEnv")]
pub struct PyDurakEnv {
    env: DurakEnv,
    encoder: ObservationEncoder,
}

impl PyDurakEnv {
    fn encode<'py>(&self, py: Python<'py>, obs: &Observation) -> Bound<'py, PyArray1<f32>> {
        PyArray1::from_vec_bound(py, self.encoder.encode(obs))
    }
}

#[pymethods]
impl PyDurakEnv {
    /// Create a new environment.
    ///
    /// # Arguments
    /// - player_count: Number of seats (2-6)
    /// - hand_size: Refill target for hands
    /// - stall_limit: Idle iterations before a trick is forced closed
    /// - seed: Seed of the first episode
    #[new]
    #[pyo3(signature = (player_count = 2, hand_size = 6, stall_limit = 5, seed = 42))]
    fn new(player_count: usize, hand_size: usize, stall_limit: u32, seed: u64) -> PyResult<Self> {
        let config = GameConfig::new()
            .with_players(player_count)
            .with_hand_size(hand_size)
            .with_stall_limit(stall_limit);
        let env = DurakEnv::new(config, seed).map_err(to_py_err)?;
        Ok(Self {
            env,
            encoder: ObservationEncoder::new().with_stall_limit(stall_limit),
        })
    }

    /// Deal a new game and return the encoded view of the first seat to act.
    #[pyo3(signature = (seed = None))]
    fn reset<'py>(&mut self, py: Python<'py>, seed: Option<u64>) -> PyResult<Bound<'py, PyArray1<f32>>> {
        let obs = match seed {
            Some(seed) => self.env.reset_with_seed(seed),
            None => self.env.reset(),
        }
        .map_err(to_py_err)?;
        Ok(self.encode(py, &obs))
    }

    /// Apply the legal action at `index`.
    ///
    /// Returns (features, terminal) for the seat that acts next.
    fn step<'py>(&mut self, py: Python<'py>, index: usize) -> PyResult<(Bound<'py, PyArray1<f32>>, bool)> {
        let action = self.env.legal_actions().get(index).cloned().ok_or_else(|| {
            pyo3::exceptions::PyIndexError::new_err(format!("no legal action at index {index}"))
        })?;
        let outcome = self.env.step(action).map_err(to_py_err)?;
        Ok((self.encode(py, &outcome.observation), outcome.terminal))
    }

    /// Display strings of the legal actions, in index order.
    fn legal_actions(&self) -> Vec<String> {
        self.env.legal_actions().iter().map(ToString::to_string).collect()
    }

    /// Encoded view of any seat.
    fn observe<'py>(&self, py: Python<'py>, player: u8) -> Option<Bound<'py, PyArray1<f32>>> {
        self.env
            .observe(PlayerId::new(player))
            .map(|obs| self.encode(py, &obs))
    }

    /// Seat that must act next, if any.
    #[getter]
    fn pending_player(&self) -> Option<u8> {
        self.env.pending().map(|p| p.player.0)
    }

    #[getter]
    fn is_over(&self) -> bool {
        self.env.is_over()
    }

    /// Seat of the durak; None for a draw or an unfinished game.
    #[getter]
    fn durak(&self) -> Option<u8> {
        self.env.outcome().and_then(GameOutcome::durak).map(|p| p.0)
    }

    #[getter]
    fn feature_len(&self) -> usize {
        self.encoder.feature_len()
    }

    fn __repr__(&self) -> String {
        format!(
            "DurakEnv(players={}, pending={:?}, over={})",
            self.env.config().player_count,
            self.pending_player(),
            self.env.is_over()
        )
    }
}

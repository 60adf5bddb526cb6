//! Self-play bindings for Python.

use numpy::{PyArray1, PyArray2, PyArrayMethods};
use pyo3::prelude::*;

use crate::core::GameConfig;
use crate::training::{SelfPlayConfig, SelfPlayWorker, Trajectory};

use super::to_py_err;

/// Python wrapper for SelfPlayConfig.
#[pyclass(name = "SelfPlayConfig")]
#[derive(Clone)]
pub struct PySelfPlayConfig(pub SelfPlayConfig);

#[pymethods]
impl PySelfPlayConfig {
    /// Create a new self-play configuration.
    ///
    /// # Arguments
    /// - player_count: Number of seats (default: 2)
    /// - games: Games per batch (default: 100)
    /// - seed_offset: Seed of the first game (default: 0)
    /// - max_actions: Decision budget per game (default: 5000)
    /// - record_features: Store encoded observations (default: True)
    #[new]
    #[pyo3(signature = (
        player_count = 2,
        games = 100,
        seed_offset = 0,
        max_actions = 5000,
        record_features = true
    ))]
    fn new(
        player_count: usize,
        games: usize,
        seed_offset: u64,
        max_actions: usize,
        record_features: bool,
    ) -> Self {
        Self(
            SelfPlayConfig::default()
                .with_game(GameConfig::new().with_players(player_count))
                .with_games(games)
                .with_seed_offset(seed_offset)
                .with_max_actions(max_actions)
                .with_features(record_features),
        )
    }

    #[getter]
    fn games(&self) -> usize {
        self.0.games
    }

    #[getter]
    fn player_count(&self) -> usize {
        self.0.game.player_count
    }

    fn __repr__(&self) -> String {
        format!(
            "SelfPlayConfig(players={}, games={}, seed_offset={})",
            self.0.game.player_count, self.0.games, self.0.seed_offset
        )
    }
}

/// Python wrapper for Trajectory.
#[pyclass(name = "Trajectory")]
#[derive(Clone)]
pub struct PyTrajectory(pub Trajectory);

#[pymethods]
impl PyTrajectory {
    #[getter]
    fn seed(&self) -> u64 {
        self.0.seed
    }

    #[getter]
    fn durak(&self) -> Option<u8> {
        self.0.durak().map(|p| p.0)
    }

    #[getter]
    fn is_truncated(&self) -> bool {
        self.0.is_truncated()
    }

    #[getter]
    fn tricks(&self) -> u32 {
        self.0.tricks
    }

    /// Acting seat of each step.
    fn players(&self) -> Vec<u8> {
        self.0.steps.iter().map(|s| s.player.0).collect()
    }

    /// Chosen legal-action index of each step.
    fn action_indices<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<i64>> {
        let indices = self.0.steps.iter().map(|s| s.action_index as i64).collect();
        PyArray1::from_vec_bound(py, indices)
    }

    /// Encoded observations as an [N, feature_len] float32 array.
    fn features_numpy<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<f32>>> {
        let n = self.0.steps.len();
        let dim = self.0.steps.first().map_or(0, |s| s.features.len());
        if n == 0 || dim == 0 {
            return Ok(PyArray2::zeros_bound(py, [n, 0], false));
        }
        let flat: Vec<f32> = self.0.steps.iter().flat_map(|s| s.features.iter().copied()).collect();
        PyArray1::from_vec_bound(py, flat)
            .reshape([n, dim])
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("{}", e)))
    }

    /// Bincode bytes of the replay record.
    fn record_bytes(&self) -> PyResult<Vec<u8>> {
        self.0.record.to_bytes().map_err(to_py_err)
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Trajectory(seed={}, steps={}, durak={:?})",
            self.0.seed,
            self.0.len(),
            self.durak()
        )
    }
}

/// Python wrapper for SelfPlayWorker.
#[pyclass(name = "SelfPlayWorker")]
pub struct PySelfPlayWorker(SelfPlayWorker);

#[pymethods]
impl PySelfPlayWorker {
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<PySelfPlayConfig>) -> PyResult<Self> {
        let config = config.map_or_else(SelfPlayConfig::default, |c| c.0);
        SelfPlayWorker::new(config).map(Self).map_err(to_py_err)
    }

    fn play_game(&self, py: Python<'_>, seed: u64) -> PyResult<PyTrajectory> {
        py.allow_threads(|| self.0.play_game(seed))
            .map(PyTrajectory)
            .map_err(to_py_err)
    }

    /// Play the configured batch, releasing the GIL.
    #[pyo3(signature = (threads = 1))]
    fn play_parallel(&self, py: Python<'_>, threads: usize) -> PyResult<Vec<PyTrajectory>> {
        let trajectories = py
            .allow_threads(|| self.0.play_parallel(threads))
            .map_err(to_py_err)?;
        Ok(trajectories.into_iter().map(PyTrajectory).collect())
    }

    #[getter]
    fn feature_len(&self) -> usize {
        self.0.encoder().feature_len()
    }
}

use rand::{SeedableRng, rngs::StdRng};

use super::Trainer;
use crate::{
    error::{MlErr, Result},
    regressor::GbdtParams,
};

/// Seed of the train/test split when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// Share of the rows held out for evaluation when none is given.
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Builds `Trainer`s.
#[derive(Debug, Clone)]
pub struct TrainerBuilder {
    seed: Option<u64>,
    test_size: f64,
    params: GbdtParams,
}

impl Default for TrainerBuilder {
    fn default() -> Self {
        Self {
            seed: Some(DEFAULT_SEED),
            test_size: DEFAULT_TEST_SIZE,
            params: GbdtParams::default(),
        }
    }
}

impl TrainerBuilder {
    /// Creates a new `TrainerBuilder` with the default seed, test size and
    /// hyperparameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the split seed, `None` draws one from the os.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn params(mut self, params: GbdtParams) -> Self {
        self.params = params;
        self
    }

    /// Builds a new `Trainer`.
    ///
    /// # Errors
    /// Fails when the test size is outside `[0, 1)`.
    pub fn build(&self) -> Result<Trainer<StdRng>> {
        if !(0.0..1.0).contains(&self.test_size) {
            return Err(MlErr::InvalidParam(format!(
                "test size must be in [0, 1), got {}",
                self.test_size
            )));
        }

        let rng = self.generate_rng(self.seed);
        Ok(Trainer::new(self.params, self.test_size, rng))
    }

    fn generate_rng(&self, seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

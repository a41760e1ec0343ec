//! Random-distribution components referenced by parameter values.
//!
//! Every distribution component gets its own [`StreamRng`], numbered in
//! declaration order among the model's distribution components.  Adding a
//! distribution therefore never changes the samples of the ones declared
//! before it.

use rand_distr::{Distribution, Normal, Uniform};
use rustc_hash::FxHashMap;

use pnn_core::StreamRng;
use pnn_model::{BuiltinModel, ModelError, ModelResult, Parameters};

enum Kind {
    /// `uniform` with `low == high`.
    Constant(f64),
    Uniform(Uniform<f64>),
    Normal(Normal<f64>),
}

struct Stream {
    kind: Kind,
    rng:  StreamRng,
}

#[derive(Default)]
pub struct RandomDistributions {
    streams: FxHashMap<String, Stream>,
}

impl RandomDistributions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register distribution component `name`.  `stream` selects its RNG
    /// stream under `seed`.
    pub fn register(
        &mut self,
        name:       &str,
        model:      BuiltinModel,
        parameters: &Parameters,
        seed:       u64,
        stream:     u64,
    ) -> ModelResult<()> {
        let invalid = |parameter: &str, reason: String| ModelError::InvalidParameter {
            component: name.to_owned(),
            parameter: parameter.to_owned(),
            reason,
        };

        let kind = match model {
            BuiltinModel::Uniform => {
                let low  = parameters.scalar("low")?;
                let high = parameters.scalar("high")?;
                if !(low <= high) {
                    return Err(invalid("high", format!("must not be below low ({low}), got {high}")));
                }
                if !(high - low).is_finite() {
                    return Err(invalid("high", format!("range [{low}, {high}) is not finite")));
                }
                if low == high { Kind::Constant(low) } else { Kind::Uniform(Uniform::new(low, high)) }
            }
            BuiltinModel::Normal => {
                let mean = parameters.scalar("mean")?;
                let std  = parameters.scalar("std")?;
                let normal = Normal::new(mean, std)
                    .map_err(|e| invalid("std", e.to_string()))?;
                Kind::Normal(normal)
            }
            other => {
                return Err(ModelError::ComponentParse {
                    reference: name.to_owned(),
                    reason:    format!("{other} is not a random distribution"),
                });
            }
        };

        self.streams
            .insert(name.to_owned(), Stream { kind, rng: StreamRng::new(seed, stream) });
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.streams.contains_key(name)
    }

    /// Draw one value from distribution `name`.
    pub fn sample(&mut self, name: &str) -> Option<f64> {
        let stream = self.streams.get_mut(name)?;
        let value = match &stream.kind {
            Kind::Constant(v) => *v,
            Kind::Uniform(u) => u.sample(stream.rng.inner()),
            Kind::Normal(n) => n.sample(stream.rng.inner()),
        };
        Some(value)
    }
}

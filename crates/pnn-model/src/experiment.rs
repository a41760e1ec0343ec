//! Experiment documents.
//!
//! An experiment declares exactly one simulation task.  The task's uniform
//! time course fixes the scheduler's grid:
//!
//!   reporting_interval = (output_end - output_start) / (number_of_points - 1)
//!   time_horizon       = output_end

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pnn_core::RunConfig;

use crate::{ModelDescription, ModelError, ModelResult, VariablePath};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TimeCourse {
    pub output_start:     f64,
    pub output_end:       f64,
    pub number_of_points: u64,
}

impl TimeCourse {
    pub fn reporting_interval(&self) -> ModelResult<f64> {
        if self.number_of_points < 2 {
            return Err(ModelError::Experiment(format!(
                "number_of_points must be at least 2, got {}",
                self.number_of_points
            )));
        }
        let interval =
            (self.output_end - self.output_start) / (self.number_of_points - 1) as f64;
        if !(interval > 0.0) {
            return Err(ModelError::Experiment(format!(
                "output_end ({}) must be greater than output_start ({})",
                self.output_end, self.output_start
            )));
        }
        Ok(interval)
    }
}

/// Where the task's network comes from.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSource {
    Inline(ModelDescription),
    /// Path to a model description JSON file, relative to the experiment.
    File(PathBuf),
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Task {
    pub name:        String,
    pub model:       ModelSource,
    pub time_course: TimeCourse,
    #[serde(default)]
    pub seed:        u64,
    /// `Group.Population[index].variable` paths sampled at every boundary.
    #[serde(default)]
    pub reports:     Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrator_step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_drain_events: Option<u64>,
}

impl Task {
    /// Derive the scheduler configuration from the time course.
    pub fn run_config(&self) -> ModelResult<RunConfig> {
        let defaults = RunConfig::default();
        let config = RunConfig {
            reporting_interval: self.time_course.reporting_interval()?,
            time_horizon:       self.time_course.output_end,
            seed:               self.seed,
            integrator_step:    self.integrator_step.unwrap_or(defaults.integrator_step),
            max_drain_events:   self.max_drain_events.or(defaults.max_drain_events),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn report_variables(&self) -> ModelResult<Vec<VariablePath>> {
        self.reports.iter().map(|r| r.parse()).collect()
    }

    /// Return the inline model or read it relative to `base_dir`.
    pub fn load_model(&self, base_dir: &Path) -> ModelResult<ModelDescription> {
        match &self.model {
            ModelSource::Inline(m) => {
                m.validate()?;
                Ok(m.clone())
            }
            ModelSource::File(p) => ModelDescription::from_file(&base_dir.join(p)),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Experiment {
    pub tasks: Vec<Task>,
}

impl Experiment {
    pub fn from_json_str(text: &str) -> ModelResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> ModelResult<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// The experiment's only task.  Zero or several tasks is an error.
    pub fn single_task(&self) -> ModelResult<&Task> {
        match self.tasks.as_slice() {
            [task] => Ok(task),
            [] => Err(ModelError::Experiment("no simulation task declared".to_owned())),
            many => Err(ModelError::Experiment(format!(
                "exactly one simulation task is supported, found {}",
                many.len()
            ))),
        }
    }
}

use once_cell::sync::Lazy;
use polars::prelude::DataFrame;
use tracing::{debug, info};

use crate::cleaning::{
    BasementNormalizer, BathBedRatioFilter, LastKnownChange, ViewWaterfrontFiller,
};
use crate::error::{PreprocessError, Result};
use crate::features::{
    CenterDistanceCreator, DropNonPredictive, SqftPriceCreator, WaterDistanceCreator,
};
use crate::schema;

/// A single table-in, table-out transformation.
pub trait TableStep: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn apply(&self, df: &DataFrame) -> Result<DataFrame>;
}

pub struct Stage {
    pub name: &'static str,
    pub steps: Vec<&'static dyn TableStep>,
}

impl Stage {
    fn run(&self, df: DataFrame) -> Result<DataFrame> {
        self.steps.iter().try_fold(df, |current, step| {
            let (rows_in, cols_in) = current.shape();
            let next = step.apply(&current).map_err(|source| PreprocessError::Step {
                step: step.name(),
                source: Box::new(source),
            })?;
            debug!(
                stage = self.name,
                step = step.name(),
                rows_in,
                cols_in,
                rows_out = next.height(),
                cols_out = next.width(),
                "step applied"
            );
            Ok(next)
        })
    }
}

static CLEANING_STAGE: Lazy<Stage> = Lazy::new(|| Stage {
    name: "data_cleaning",
    steps: vec![
        &BathBedRatioFilter as &dyn TableStep,
        &BasementNormalizer,
        &ViewWaterfrontFiller,
        &LastKnownChange,
    ],
});

static FEATURE_STAGE: Lazy<Stage> = Lazy::new(|| Stage {
    name: "feature_engineering",
    steps: vec![
        &SqftPriceCreator as &dyn TableStep,
        &CenterDistanceCreator,
        &WaterDistanceCreator,
        &DropNonPredictive,
    ],
});

pub fn cleaning_stage() -> &'static Stage {
    &CLEANING_STAGE
}

pub fn feature_stage() -> &'static Stage {
    &FEATURE_STAGE
}

#[derive(Debug, Clone)]
pub struct StepDescriptor {
    pub stage: &'static str,
    pub step: &'static str,
    pub description: &'static str,
}

pub fn step_descriptors() -> Vec<StepDescriptor> {
    [cleaning_stage(), feature_stage()]
        .into_iter()
        .flat_map(|stage| {
            stage.steps.iter().map(move |step| StepDescriptor {
                stage: stage.name,
                step: step.name(),
                description: step.description(),
            })
        })
        .collect()
}

/// Cleaning followed by feature engineering for King County sales records.
///
/// Nothing is learned from the data: `fit` is an identity, so `transform` and
/// `fit_transform` give identical results. The transform is not idempotent;
/// feeding its own output back in fails the schema check because
/// `yr_built`/`yr_renovated` have been consolidated away.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    pub fn stages(&self) -> [&'static Stage; 2] {
        [cleaning_stage(), feature_stage()]
    }

    pub fn fit(&self, _df: &DataFrame) -> Result<&Self> {
        Ok(self)
    }

    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        schema::validate_input(df)?;

        let rows_in = df.height();
        let output = self
            .stages()
            .into_iter()
            .try_fold(df.clone(), |current, stage| stage.run(current))?;

        info!(
            rows_in,
            rows_out = output.height(),
            columns = output.width(),
            "preprocessing complete"
        );
        Ok(output)
    }

    pub fn fit_transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?.transform(df)
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let steps: Vec<&str> = self.steps.iter().map(|step| step.name()).collect();
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("steps", &steps)
            .finish()
    }
}

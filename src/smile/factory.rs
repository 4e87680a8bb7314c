// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Smile factory and its builder.

use std::io::Write;

use super::generator::SmileGenerator;
use super::header::{Feature, FeatureFlags};
use crate::generator::{FactoryBuilder, GeneratorFactory, OutputSink, Result};

/// Creates Smile generators that share one feature configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmileFactory {
    features: FeatureFlags,
}

impl SmileFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> SmileFactoryBuilder {
        SmileFactoryBuilder::default()
    }

    pub fn features(&self) -> FeatureFlags {
        self.features
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.features.contains(feature)
    }

    /// Generator over any writer.
    pub fn create_generator_for<W: Write>(&self, out: W) -> SmileGenerator<W> {
        SmileGenerator::new(out, self.features)
    }
}

impl GeneratorFactory for SmileFactory {
    type Feature = Feature;
    type Generator = SmileGenerator<OutputSink>;

    fn create_generator(&self, sink: OutputSink) -> Result<Self::Generator> {
        Ok(self.create_generator_for(sink))
    }
}

/// Feature toggles applied before the factory exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmileFactoryBuilder {
    features: FeatureFlags,
}

impl SmileFactoryBuilder {
    pub fn configure(mut self, feature: Feature, enabled: bool) -> Self {
        self.features.set(feature, enabled);
        self
    }
}

impl FactoryBuilder for SmileFactoryBuilder {
    type Feature = Feature;
    type Factory = SmileFactory;

    fn features() -> &'static [Feature] {
        &Feature::ALL
    }

    fn enable(self, feature: Feature) -> Self {
        self.configure(feature, true)
    }

    fn disable(self, feature: Feature) -> Self {
        self.configure(feature, false)
    }

    fn build(self) -> SmileFactory {
        SmileFactory {
            features: self.features,
        }
    }
}

// Copyright 2025 the ChartIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart-type lookup.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;

use serde_json::Value;

use crate::ChartConfig;
use crate::bar::BarProcessor;
use crate::boxplot::BoxplotProcessor;
use crate::graph::NetworkProcessor;
use crate::heatmap::HeatmapProcessor;
use crate::line::LineProcessor;
use crate::pie::PieProcessor;
use crate::processor::{ChartKind, ChartSpec, CompileChart};
use crate::quantile_bands::QuantileBandsProcessor;
use crate::radar::RadarProcessor;
use crate::sankey::SankeyProcessor;
use crate::sunburst::SunburstProcessor;
use crate::word_cloud::WordCloudProcessor;

/// An immutable map from chart-type key to processor.
///
/// Build one with [`ProcessorTable::standard`] at startup and pass it to whatever compiles
/// charts; there is no global registry.
pub struct ProcessorTable {
    entries: Vec<Box<dyn CompileChart + Send + Sync>>,
}

impl core::fmt::Debug for ProcessorTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|p| p.kind()))
            .finish()
    }
}

impl Default for ProcessorTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ProcessorTable {
    /// Every built-in processor.
    pub fn standard() -> Self {
        Self {
            entries: alloc::vec![
                Box::new(BarProcessor),
                Box::new(LineProcessor::line()),
                Box::new(LineProcessor::area()),
                Box::new(PieProcessor),
                Box::new(RadarProcessor),
                Box::new(BoxplotProcessor),
                Box::new(HeatmapProcessor),
                Box::new(SankeyProcessor),
                Box::new(SunburstProcessor),
                Box::new(WordCloudProcessor),
                Box::new(QuantileBandsProcessor),
                Box::new(NetworkProcessor),
            ],
        }
    }

    /// The processor registered for `kind`.
    pub fn processor(&self, kind: ChartKind) -> Option<&dyn CompileChart> {
        self.entries
            .iter()
            .find(|p| p.kind() == kind)
            .map(|p| &**p as &dyn CompileChart)
    }

    /// The processor registered under `key` (see [`ChartKind`]'s `FromStr`).
    pub fn get(&self, key: &str) -> Option<&dyn CompileChart> {
        self.processor(key.parse().ok()?)
    }

    /// Registered kinds, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = ChartKind> + '_ {
        self.entries.iter().map(|p| p.kind())
    }

    /// Compiles `rows` with the processor registered under `key`.
    ///
    /// An unknown key yields the empty spec.
    pub fn compile(&self, key: &str, rows: &Value, config: &Value, dark: bool) -> ChartSpec {
        let Some(processor) = self.get(key) else {
            log::warn!("no processor registered for chart type `{key}`");
            return ChartSpec::empty(dark);
        };
        processor.compile(rows, &ChartConfig::from_value(config), dark)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use serde_json::json;

    use super::*;

    #[test]
    fn every_kind_is_registered_once() {
        let table = ProcessorTable::standard();
        let kinds: Vec<ChartKind> = table.kinds().collect();
        assert_eq!(kinds, ChartKind::ALL);
        for kind in ChartKind::ALL {
            assert_eq!(table.get(kind.key()).map(|p| p.kind()), Some(kind));
        }
    }

    #[test]
    fn unknown_keys_compile_to_the_empty_spec() {
        let table = ProcessorTable::standard();
        assert!(table.get("gauge").is_none());
        let spec = table.compile("gauge", &json!([{"value": 1}]), &Value::Null, false);
        assert!(spec.is_empty());
    }

    #[test]
    fn keys_are_case_insensitive() {
        let table = ProcessorTable::standard();
        let rows = json!([{"category": "a", "value": 1}]);
        let spec = table.compile("BAR", &rows, &json!({}), true);
        assert!(!spec.is_empty());
        assert_eq!(spec.option["series"][0]["type"], "bar");
    }
}

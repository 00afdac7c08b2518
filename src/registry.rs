use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::error::HarnessError;
use crate::model::{DatasetConfig, DistanceFunction, ElementType, ReportThresholds};

const BIGANN_ROOT: &str = "/ssd1/data/bigann";
const MSTURING_ROOT: &str = "/ssd1/data/MSTuringANNS";
const DEEP_ROOT: &str = "/ssd1/data/deep1b";
const GIST_ROOT: &str = "/ssd1/data/gist";
const SSNPP_ROOT: &str = "/ssd1/data/FB_ssnpp";
const WIKIPEDIA_ROOT: &str = "/ssd1/data/wikipedia_cohere";
const MSMARCO_ROOT: &str = "/ssd1/data/msmarco_websearch";
const TEXT2IMAGE_ROOT: &str = "/ssd1/data/text2image1B";
const OPENAI_ROOT: &str = "/ssd1/data/OpenAIArXiv";

struct BuiltinDataset {
    name: &'static str,
    root: &'static str,
    base: &'static str,
    query: &'static str,
    gt: &'static str,
    element_type: ElementType,
    distance_function: DistanceFunction,
    radius: f64,
    early_stop_radius: f64,
    alpha: f64,
}

const BUILTIN_DATASETS: &[BuiltinDataset] = &[
    BuiltinDataset {
        name: "bigann-1M",
        root: BIGANN_ROOT,
        base: "base.1B.u8bin.crop_nb_1000000",
        query: "query.public.10K.u8bin",
        gt: "range_gt_1M_10000",
        element_type: ElementType::Uint8,
        distance_function: DistanceFunction::Euclidean,
        radius: 10000.0,
        early_stop_radius: 11000.0,
        alpha: 1.15,
    },
    BuiltinDataset {
        name: "bigann-10M",
        root: BIGANN_ROOT,
        base: "base.1B.u8bin.crop_nb_10000000",
        query: "query.public.10K.u8bin",
        gt: "range_gt_10M_10000",
        element_type: ElementType::Uint8,
        distance_function: DistanceFunction::Euclidean,
        radius: 10000.0,
        early_stop_radius: 11000.0,
        alpha: 1.15,
    },
    BuiltinDataset {
        name: "bigann-100M",
        root: BIGANN_ROOT,
        base: "base.1B.u8bin.crop_nb_100000000",
        query: "query.public.10K.u8bin",
        gt: "range_gt_100M_10000",
        element_type: ElementType::Uint8,
        distance_function: DistanceFunction::Euclidean,
        radius: 10000.0,
        early_stop_radius: 11000.0,
        alpha: 1.15,
    },
    BuiltinDataset {
        name: "msturing-1M",
        root: MSTURING_ROOT,
        base: "base1b.fbin.crop_nb_1000000",
        query: "query10K.fbin",
        gt: "range_gt_1M_100K_.3",
        element_type: ElementType::Float,
        distance_function: DistanceFunction::Euclidean,
        radius: 0.3,
        early_stop_radius: 0.4,
        alpha: 1.15,
    },
    BuiltinDataset {
        name: "deep-1M",
        root: DEEP_ROOT,
        base: "base.1B.fbin.crop_nb_1000000",
        query: "query.public.10K.fbin",
        gt: "range_gt_1M_.02",
        element_type: ElementType::Float,
        distance_function: DistanceFunction::Euclidean,
        radius: 0.02,
        early_stop_radius: 0.03,
        alpha: 1.15,
    },
    BuiltinDataset {
        name: "gist-1M",
        root: GIST_ROOT,
        base: "gist_base.fbin",
        query: "gist_query.fbin",
        gt: "range_gt_1M_.5",
        element_type: ElementType::Float,
        distance_function: DistanceFunction::Euclidean,
        radius: 0.5,
        early_stop_radius: 0.6,
        alpha: 1.15,
    },
    BuiltinDataset {
        name: "ssnpp-1M",
        root: SSNPP_ROOT,
        base: "FB_ssnpp_database.u8bin.crop_nb_1000000",
        query: "FB_ssnpp_public_queries.u8bin",
        gt: "ssnpp-1M",
        element_type: ElementType::Uint8,
        distance_function: DistanceFunction::Euclidean,
        radius: 96237.0,
        early_stop_radius: 200000.0,
        alpha: 1.10,
    },
    BuiltinDataset {
        name: "ssnpp-10M",
        root: SSNPP_ROOT,
        base: "FB_ssnpp_database.u8bin.crop_nb_10000000",
        query: "FB_ssnpp_public_queries.u8bin",
        gt: "ssnpp-10M",
        element_type: ElementType::Uint8,
        distance_function: DistanceFunction::Euclidean,
        radius: 96237.0,
        early_stop_radius: 200000.0,
        alpha: 1.10,
    },
    BuiltinDataset {
        name: "ssnpp-100M",
        root: SSNPP_ROOT,
        base: "FB_ssnpp_database.u8bin.crop_nb_100000000",
        query: "FB_ssnpp_public_queries.u8bin",
        gt: "ssnpp-100M",
        element_type: ElementType::Uint8,
        distance_function: DistanceFunction::Euclidean,
        radius: 96237.0,
        early_stop_radius: 200000.0,
        alpha: 1.10,
    },
    BuiltinDataset {
        name: "wikipedia-1M",
        root: WIKIPEDIA_ROOT,
        base: "wikipedia_base.bin.crop_nb_1000000",
        query: "wikipedia_query.bin",
        gt: "range_gt_1M_-10.5",
        element_type: ElementType::Float,
        distance_function: DistanceFunction::MaxInnerProduct,
        radius: -10.5,
        early_stop_radius: -10.4,
        alpha: 1.0,
    },
    BuiltinDataset {
        name: "msmarco-1M",
        root: MSMARCO_ROOT,
        base: "vectors.bin.crop_nb_1000000",
        query: "query.bin",
        gt: "range_gt_1M_-62",
        element_type: ElementType::Float,
        distance_function: DistanceFunction::MaxInnerProduct,
        radius: -62.0,
        early_stop_radius: -60.0,
        alpha: 1.0,
    },
    BuiltinDataset {
        name: "text2image-1M",
        root: TEXT2IMAGE_ROOT,
        base: "base.1B.fbin.crop_nb_1000000",
        query: "query.public.100K.fbin",
        gt: "range_gt_1M_-.6",
        element_type: ElementType::Float,
        distance_function: DistanceFunction::MaxInnerProduct,
        radius: -0.60,
        early_stop_radius: -0.58,
        alpha: 1.0,
    },
    BuiltinDataset {
        name: "openai-1M",
        root: OPENAI_ROOT,
        base: "openai_base_1M.bin",
        query: "openai_query_10K.bin",
        gt: "openai_gt_1M_.2",
        element_type: ElementType::Float,
        distance_function: DistanceFunction::Euclidean,
        radius: 0.2,
        early_stop_radius: 0.25,
        alpha: 1.15,
    },
];

impl BuiltinDataset {
    fn to_config(&self) -> DatasetConfig {
        DatasetConfig {
            base_path: format!("{}/{}", self.root, self.base),
            gt_path: format!("{}/{}", self.root, self.gt),
            query_path: format!("{}/{}", self.root, self.query),
            element_type: self.element_type,
            distance_function: self.distance_function,
            radius: self.radius,
            early_stop_radius: self.early_stop_radius,
            alpha: self.alpha,
            thresholds: ReportThresholds::default(),
        }
    }
}

/// Read-only mapping from dataset name to its engine configuration.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    datasets: BTreeMap<String, DatasetConfig>,
}

impl DatasetRegistry {
    pub fn builtin() -> Self {
        let datasets = BUILTIN_DATASETS
            .iter()
            .map(|entry| (entry.name.to_string(), entry.to_config()))
            .collect();
        Self { datasets }
    }

    /// Built-in datasets, with entries from `path` (if any) taking precedence.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut registry = Self::builtin();
        if let Some(path) = path {
            let overrides = read_registry_file(path)?;
            info!(
                path = %path.display(),
                datasets = overrides.len(),
                "loaded dataset registry file"
            );
            registry.datasets.extend(overrides);
        }
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Result<&DatasetConfig, HarnessError> {
        self.datasets
            .get(name)
            .ok_or_else(|| HarnessError::UnknownDataset(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DatasetConfig)> {
        self.datasets
            .iter()
            .map(|(name, config)| (name.as_str(), config))
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn as_map(&self) -> &BTreeMap<String, DatasetConfig> {
        &self.datasets
    }

    #[cfg(test)]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, DatasetConfig)>,
    {
        Self {
            datasets: entries.into_iter().collect(),
        }
    }
}

fn read_registry_file(path: &Path) -> Result<BTreeMap<String, DatasetConfig>> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

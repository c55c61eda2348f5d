pub mod bank;
pub mod bounding_box;
pub mod config;
pub mod damage;
pub mod data;
pub mod element;
pub mod error;
pub mod fast_rng;
pub mod ion;
pub mod material;
pub mod model;
pub mod output;
pub mod physics;
pub mod sample;
pub mod settings;
pub mod source;
pub mod stopping;
pub mod trim;
mod utilities;

pub use bank::IonBank;
pub use config::{SimConfig, SpeciesThresholds, StoppingTable};
pub use damage::{DamageGrid, DamageMaps};
pub use element::Element;
pub use error::{BcaError, BcaResult};
pub use fast_rng::FastRng;
pub use ion::Ion;
pub use material::Material;
pub use model::{Model, RunStatistics, RunSummary};
pub use output::write_damage_files;
pub use sample::{Boundary, LayeredSample, Sample, SolidSample, WireSample};
pub use settings::{Settings, TrackedSpecies};
pub use source::WireSource;
pub use trim::{CascadeStatistics, Termination, Trim};
pub use utilities::interpolate_log_log;

use crate::bank::IonBank;
use crate::config::SimConfig;
use crate::damage::{DamageGrid, DamageMaps};
use crate::error::BcaResult;
use crate::ion::Ion;
use crate::sample::{Sample, WireSample};
use crate::settings::Settings;
use crate::trim::{Termination, Trim};
use log::{debug, info, warn};
use rand::Rng;

/// How often a progress line is logged, in primaries.
const PROGRESS_INTERVAL: usize = 1000;

/// Per-run counters, kept alongside the damage maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub primaries: u64,
    /// Every ion popped from the bank, primaries included
    pub ions_processed: u64,
    /// Ions that came to rest inside the sample, per tracked species
    pub rested_inside: Vec<u64>,
    /// Ions of untracked species that came to rest inside
    pub rested_untracked: u64,
    pub exited: u64,
    /// Ions abandoned after a degenerate sample
    pub dropped: u64,
    pub collisions: u64,
    pub displacements: u64,
    pub replacements: u64,
    /// Ions stopped by the per-ion collision cap
    pub capped: u64,
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub maps: DamageMaps,
    pub statistics: RunStatistics,
}

/// A wire irradiation: settings, physics configuration and the sample
/// built from them.
#[derive(Debug, Clone)]
pub struct Model {
    pub settings: Settings,
    pub config: SimConfig,
    pub sample: WireSample,
}

impl Model {
    pub fn new(settings: Settings, config: SimConfig) -> BcaResult<Self> {
        config.validate()?;
        let sample = settings.build_sample()?;
        Ok(Model {
            settings,
            config,
            sample,
        })
    }

    /// Simulate every primary and return the accumulated damage.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> BcaResult<RunSummary> {
        let [nx, ny] = self.settings.bins;
        let species = self.settings.tracked_z();
        let mut interstitials = DamageGrid::new(nx, ny, species.clone())?;
        let mut trim = Trim::new(&self.config, &self.sample, DamageGrid::new(nx, ny, species)?);
        let mut statistics = RunStatistics {
            rested_inside: vec![0; self.settings.species.len()],
            ..RunStatistics::default()
        };
        let mut bank = IonBank::new();

        info!(
            "{} primaries of Z={} at {} eV into a {:.1} Å wire",
            self.settings.primaries,
            self.settings.source.z,
            self.settings.source.energy,
            self.settings.wire_diameter()
        );

        for n in 0..self.settings.primaries {
            if n % PROGRESS_INTERVAL == 0 {
                info!("pka #{}", n + 1);
            }
            let primary = self
                .settings
                .source
                .sample(&self.sample, &self.config, rng)?;
            bank.add_primary(primary);
            self.run_cascade(&mut trim, &mut bank, &mut interstitials, &mut statistics, rng)?;
            statistics.primaries += 1;
        }

        let cascade = *trim.statistics();
        statistics.collisions = cascade.collisions;
        statistics.displacements = cascade.displacements;
        statistics.replacements = cascade.replacements;
        statistics.capped = cascade.capped;
        info!(
            "done: {} ions, {} displacements, {} exited, {} dropped",
            statistics.ions_processed,
            statistics.displacements,
            statistics.exited,
            statistics.dropped
        );

        Ok(RunSummary {
            maps: DamageMaps {
                interstitials,
                vacancies: trim.into_vacancies(),
            },
            statistics,
        })
    }

    /// Drain the bank: follow each ion, then tally it where it came to
    /// rest. Runs until the cascade seeded by the current primary is done.
    fn run_cascade<S: Sample + ?Sized, R: Rng + ?Sized>(
        &self,
        trim: &mut Trim<'_, S>,
        bank: &mut IonBank,
        interstitials: &mut DamageGrid,
        statistics: &mut RunStatistics,
        rng: &mut R,
    ) -> BcaResult<()> {
        while let Some(mut ion) = bank.pop_ion() {
            statistics.ions_processed += 1;
            match trim.advance(&mut ion, bank, rng) {
                Ok(Termination::Exited) => statistics.exited += 1,
                Ok(Termination::Replaced) => {}
                Ok(Termination::Stopped) | Ok(Termination::CollisionLimit) => {
                    self.tally_rest(&ion, interstitials, statistics);
                }
                Err(err) if err.is_recoverable() => {
                    warn!(
                        "dropping Z={} ion (generation {}) at {:?}: {}",
                        ion.z, ion.generation, ion.position, err
                    );
                    statistics.dropped += 1;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    fn tally_rest(&self, ion: &Ion, interstitials: &mut DamageGrid, statistics: &mut RunStatistics) {
        if self.sample.lookup_material(&ion.position).is_none() {
            statistics.exited += 1;
            return;
        }
        match interstitials.species_index(ion.z) {
            Some(index) => {
                interstitials.record(&ion.position, self.sample.extents(), ion.z);
                statistics.rested_inside[index] += 1;
            }
            None => statistics.rested_untracked += 1,
        }
        debug!(
            "Z={} (generation {}) at rest at {:?}",
            ion.z, ion.generation, ion.position
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FastRng;
    use rand::SeedableRng;

    fn settings(primaries: usize, energy: f64, radius: f64) -> Settings {
        let args = vec![
            "bca-wire".to_string(),
            "unused".to_string(),
            energy.to_string(),
            "0".to_string(),
            primaries.to_string(),
            "29".to_string(),
            "63.546".to_string(),
            radius.to_string(),
        ];
        let mut settings = Settings::from_args(&args).unwrap();
        settings.seed = Some(1234);
        settings
    }

    #[test]
    fn test_run_statistics_are_consistent() {
        let model = Model::new(settings(20, 2000.0, 2.0), SimConfig::default()).unwrap();
        let mut rng = FastRng::seed_from_u64(1234);
        let summary = model.run(&mut rng).unwrap();
        let stats = &summary.statistics;

        assert_eq!(stats.primaries, 20);
        // every ion either rests inside, leaves, replaces an atom or is dropped
        let rested: u64 = stats.rested_inside.iter().sum::<u64>() + stats.rested_untracked;
        assert_eq!(
            stats.ions_processed,
            rested + stats.exited + stats.replacements + stats.dropped
        );
        // each displacement banks one recoil
        assert_eq!(stats.ions_processed, stats.primaries + stats.displacements + stats.replacements);

        for (index, count) in stats.rested_inside.iter().enumerate() {
            assert_eq!(summary.maps.interstitials.total(index), *count);
        }
        let vacancies: u64 = (0..3).map(|s| summary.maps.vacancies.total(s)).sum();
        assert_eq!(vacancies, stats.displacements);
    }

    #[test]
    fn test_degenerate_ion_is_dropped_and_cascade_continues() {
        let model = Model::new(settings(1, 1.0e4, 1.0), SimConfig::default()).unwrap();
        let species = model.settings.tracked_z();
        let mut interstitials = DamageGrid::new(20, 20, species.clone()).unwrap();
        let mut trim = Trim::new(&model.config, &model.sample, DamageGrid::new(20, 20, species).unwrap());
        let mut statistics = RunStatistics {
            rested_inside: vec![0; 3],
            ..RunStatistics::default()
        };
        let center = nalgebra::Vector3::new(10.0, 10.0, 50.0);
        let down = nalgebra::Vector3::new(0.0, -1.0, 0.0);

        // a NaN energy cannot be flown
        let mut broken = Ion::new(29, 63.546, f64::NAN, center, down).unwrap();
        broken.set_cutoff_energy(&model.config);
        // already below its cutoff, so it rests where it starts
        let mut resting = Ion::new(22, 47.867, 1.0, center, down).unwrap();
        resting.set_cutoff_energy(&model.config);

        let mut bank = IonBank::new();
        bank.add_primary(broken);
        bank.bank_recoil(resting);
        let mut rng = FastRng::seed_from_u64(3);
        model
            .run_cascade(&mut trim, &mut bank, &mut interstitials, &mut statistics, &mut rng)
            .unwrap();

        assert!(bank.is_empty());
        assert_eq!(statistics.ions_processed, 2);
        assert_eq!(statistics.dropped, 1);
        assert_eq!(statistics.exited, 0);
        assert_eq!(statistics.rested_inside, vec![0, 1, 0]);
        assert_eq!(interstitials.total(0), 0);
        assert_eq!(interstitials.total(1), 1);
        assert_eq!(trim.statistics().collisions, 0);
    }

    #[test]
    fn test_zero_primaries() {
        let model = Model::new(settings(0, 1.0e4, 1.0), SimConfig::default()).unwrap();
        let summary = model.run(&mut FastRng::seed_from_u64(1)).unwrap();
        assert_eq!(summary.statistics.ions_processed, 0);
        assert_eq!(summary.maps.interstitials.total(0), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimConfig {
            max_collisions_per_ion: 0,
            ..SimConfig::default()
        };
        assert!(Model::new(settings(1, 1.0e4, 1.0), config).is_err());
    }
}

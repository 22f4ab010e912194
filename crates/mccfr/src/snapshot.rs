use crate::config::TrainerConfig;
use crate::storage::StorageDto;
use bp_core::Epoch;

/// Everything needed to resume or inspect a training run at one point in
/// time: both counter stores, the config that produced them, and the
/// iteration count. Serialised to a single JSON file per call (spec A6);
/// round-trip equality is the only normative requirement on its layout.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub t: Epoch,
    pub config: TrainerConfig,
    pub regrets: StorageDto,
    pub phi: StorageDto,
}

impl Snapshot {
    pub fn write(&self, path: &std::path::Path) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer(file, self)?;
        Ok(())
    }

    pub fn read(path: &std::path::Path) -> std::io::Result<Self> {
        let file = std::fs::File::open(path)?;
        serde_json::from_reader(file).map_err(std::io::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StrategyStorage;
    use bp_gameplay::{ActionProfile, PokerConfig, PokerState};

    /// A snapshot written to disk and read back is identical, including the
    /// nested regret/phi storage DTOs.
    #[test]
    fn round_trips_through_a_file() {
        let config = TrainerConfig::default();
        let regrets: StrategyStorage<i32> = StrategyStorage::new(config.action_profile.clone());
        let phi: StrategyStorage<f32> = StrategyStorage::new(config.action_profile.clone());
        let state = PokerState::new(PokerConfig::default());
        let idx = regrets.index(&state, 0, 0);
        regrets.add_regret(idx, 7, -1_000_000).unwrap();

        let snapshot = Snapshot { t: 42, config, regrets: regrets.to_dto(), phi: phi.to_dto() };
        let dir = std::env::temp_dir().join(format!("bp-mccfr-snapshot-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("snapshot.json");
        snapshot.write(&path).unwrap();
        let restored = Snapshot::read(&path).unwrap();

        assert_eq!(restored.t, snapshot.t);
        let restored_regrets =
            StrategyStorage::<i32>::from_dto(restored.regrets, ActionProfile::blueprint(2));
        let restored_idx = restored_regrets.get(&state, 0, 0).unwrap();
        assert_eq!(restored_regrets.load(restored_idx), 7);
        std::fs::remove_dir_all(&dir).ok();
    }
}
